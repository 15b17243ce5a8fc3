use crate::VideoGrant;

/// Process-wide capability policy, used to build the [`VideoGrant`] for every issued token.
///
/// Each field is an optional override; `None` resolves to the documented default for that capability.
/// Build it once at startup and share it by reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GrantPolicy {
	pub room_create: Option<bool>,
	pub room_list: Option<bool>,
	pub room_record: Option<bool>,
	pub room_admin: Option<bool>,
	pub can_publish: Option<bool>,
	pub can_subscribe: Option<bool>,
	pub can_publish_data: Option<bool>,
	pub can_update_own_metadata: Option<bool>,
	pub ingress_admin: Option<bool>,
	pub hidden: Option<bool>,
	pub recorder: Option<bool>,
	pub agent: Option<bool>,
}

impl GrantPolicy {
	pub const ROOM_CREATE: &'static str = "ROOM_CREATE";
	pub const ROOM_LIST: &'static str = "ROOM_LIST";
	pub const ROOM_RECORD: &'static str = "ROOM_RECORD";
	pub const ROOM_ADMIN: &'static str = "ROOM_ADMIN";
	pub const CAN_PUBLISH: &'static str = "CAN_PUBLISH";
	pub const CAN_SUBSCRIBE: &'static str = "CAN_SUBSCRIBE";
	pub const CAN_PUBLISH_DATA: &'static str = "CAN_PUBLISH_DATA";
	pub const CAN_UPDATE_OWN_METADATA: &'static str = "CAN_UPDATE_OWN_METADATA";
	pub const INGRESS_ADMIN: &'static str = "INGRESS_ADMIN";
	pub const HIDDEN: &'static str = "HIDDEN";
	pub const RECORDER: &'static str = "RECORDER";
	pub const AGENT: &'static str = "AGENT";

	/// Resolve the policy from the process environment.
	pub fn from_env() -> Self {
		Self::from_lookup(|name| std::env::var(name).ok())
	}

	/// Resolve the policy from an arbitrary flag source, queried by exact name.
	///
	/// Flags that are missing or don't parse as a boolean are left unset, so they fall back to the default.
	pub fn from_lookup<F>(lookup: F) -> Self
	where
		F: Fn(&str) -> Option<String>,
	{
		let flag = |name: &str| lookup(name).as_deref().and_then(parse_bool);

		Self {
			room_create: flag(Self::ROOM_CREATE),
			room_list: flag(Self::ROOM_LIST),
			room_record: flag(Self::ROOM_RECORD),
			room_admin: flag(Self::ROOM_ADMIN),
			can_publish: flag(Self::CAN_PUBLISH),
			can_subscribe: flag(Self::CAN_SUBSCRIBE),
			can_publish_data: flag(Self::CAN_PUBLISH_DATA),
			can_update_own_metadata: flag(Self::CAN_UPDATE_OWN_METADATA),
			ingress_admin: flag(Self::INGRESS_ADMIN),
			hidden: flag(Self::HIDDEN),
			recorder: flag(Self::RECORDER),
			agent: flag(Self::AGENT),
		}
	}

	/// Build the grant for the given room.
	///
	/// The grant always allows joining; everything else comes from the policy.
	pub fn grant(&self, room: impl Into<String>) -> VideoGrant {
		VideoGrant {
			room_create: self.room_create.unwrap_or(false),
			room_list: self.room_list.unwrap_or(false),
			room_record: self.room_record.unwrap_or(false),
			room_admin: self.room_admin.unwrap_or(false),
			room_join: true,
			room: room.into(),
			can_publish: self.can_publish.unwrap_or(true),
			can_subscribe: self.can_subscribe.unwrap_or(true),
			can_publish_data: self.can_publish_data.unwrap_or(true),
			can_update_own_metadata: self.can_update_own_metadata.unwrap_or(false),
			ingress_admin: self.ingress_admin.unwrap_or(false),
			hidden: self.hidden.unwrap_or(false),
			recorder: self.recorder.unwrap_or(false),
			agent: self.agent.unwrap_or(false),
		}
	}
}

/// Parse a boolean flag, accepting the usual spellings of true and false.
///
/// Returns `None` for anything else, including values with surrounding whitespace.
pub fn parse_bool(value: &str) -> Option<bool> {
	match value {
		"1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
		"0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	use std::collections::HashMap;

	fn policy(flags: &[(&str, &str)]) -> GrantPolicy {
		let flags: HashMap<String, String> = flags.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
		GrantPolicy::from_lookup(|name| flags.get(name).cloned())
	}

	#[test]
	fn parse_bool_spellings() {
		for value in ["1", "t", "T", "TRUE", "true", "True"] {
			assert_eq!(parse_bool(value), Some(true), "{value}");
		}
		for value in ["0", "f", "F", "FALSE", "false", "False"] {
			assert_eq!(parse_bool(value), Some(false), "{value}");
		}
		for value in ["", "yes", "no", "tRUE", " true", "2", "on"] {
			assert_eq!(parse_bool(value), None, "{value}");
		}
	}

	#[test]
	fn defaults() {
		let grant = GrantPolicy::default().grant("room1");

		assert_eq!(
			grant,
			VideoGrant {
				room_join: true,
				room: "room1".to_string(),
				can_publish: true,
				can_subscribe: true,
				can_publish_data: true,
				..Default::default()
			}
		);
	}

	#[test]
	fn configured_flags() {
		let grant = policy(&[
			("ROOM_CREATE", "true"),
			("ROOM_LIST", "false"),
			("CAN_PUBLISH", "true"),
			("CAN_SUBSCRIBE", "false"),
		])
		.grant("test-room");

		assert!(grant.room_create);
		assert!(!grant.room_list);
		assert!(grant.can_publish);
		assert!(!grant.can_subscribe);
		assert_eq!(grant.room, "test-room");
	}

	#[test]
	fn every_flag_overrides_its_default() {
		let all = [
			GrantPolicy::ROOM_CREATE,
			GrantPolicy::ROOM_LIST,
			GrantPolicy::ROOM_RECORD,
			GrantPolicy::ROOM_ADMIN,
			GrantPolicy::CAN_PUBLISH,
			GrantPolicy::CAN_SUBSCRIBE,
			GrantPolicy::CAN_PUBLISH_DATA,
			GrantPolicy::CAN_UPDATE_OWN_METADATA,
			GrantPolicy::INGRESS_ADMIN,
			GrantPolicy::HIDDEN,
			GrantPolicy::RECORDER,
			GrantPolicy::AGENT,
		];

		let enabled: Vec<_> = all.iter().map(|name| (*name, "1")).collect();
		let grant = policy(&enabled).grant("room");
		assert!(grant.room_create && grant.room_list && grant.room_record && grant.room_admin);
		assert!(grant.can_publish && grant.can_subscribe && grant.can_publish_data);
		assert!(grant.can_update_own_metadata && grant.ingress_admin);
		assert!(grant.hidden && grant.recorder && grant.agent);

		let disabled: Vec<_> = all.iter().map(|name| (*name, "F")).collect();
		let grant = policy(&disabled).grant("room");
		assert_eq!(
			grant,
			VideoGrant {
				room_join: true,
				room: "room".to_string(),
				..Default::default()
			}
		);
	}

	#[test]
	fn malformed_flags_fall_back() {
		let grant = policy(&[
			("ROOM_ADMIN", "yes"),
			("CAN_PUBLISH", "nope"),
			("CAN_UPDATE_OWN_METADATA", ""),
			("HIDDEN", " true"),
		])
		.grant("room");

		assert_eq!(grant, GrantPolicy::default().grant("room"));
	}

	#[test]
	fn room_join_is_always_set() {
		for room in ["a", "room1", "with spaces", "ünïcödé"] {
			let grant = policy(&[("ROOM_ADMIN", "true")]).grant(room);
			assert!(grant.room_join);
			assert_eq!(grant.room, room);
		}
	}
}
