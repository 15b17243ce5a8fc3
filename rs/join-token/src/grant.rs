use serde::{Deserialize, Serialize};

/// The capabilities a participant has within a single room.
///
/// Serialized under the `video` claim with camelCase keys.
/// Plain flags are omitted when false, while the publish/subscribe flags are always written,
/// since a verifier treats a missing `canPublish`, `canSubscribe`, or `canPublishData` as allowed.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
	/// Create or delete rooms.
	#[serde(default, skip_serializing_if = "is_false")]
	pub room_create: bool,

	/// List the available rooms.
	#[serde(default, skip_serializing_if = "is_false")]
	pub room_list: bool,

	/// Start a recording of the room.
	#[serde(default, skip_serializing_if = "is_false")]
	pub room_record: bool,

	/// Administer the room: kick participants, mute tracks, etc.
	#[serde(default, skip_serializing_if = "is_false")]
	pub room_admin: bool,

	/// Join the room. Always true for an issued token.
	#[serde(default, skip_serializing_if = "is_false")]
	pub room_join: bool,

	/// The room these capabilities apply to.
	#[serde(default, skip_serializing_if = "String::is_empty")]
	pub room: String,

	/// Publish audio and video tracks.
	#[serde(default = "allowed")]
	pub can_publish: bool,

	/// Subscribe to the tracks of other participants.
	#[serde(default = "allowed")]
	pub can_subscribe: bool,

	/// Send data messages to other participants.
	#[serde(default = "allowed")]
	pub can_publish_data: bool,

	/// Update the participant's own name and metadata.
	#[serde(default)]
	pub can_update_own_metadata: bool,

	/// Create and manage ingress endpoints.
	#[serde(default, skip_serializing_if = "is_false")]
	pub ingress_admin: bool,

	/// Hidden from the other participants.
	#[serde(default, skip_serializing_if = "is_false")]
	pub hidden: bool,

	/// The participant is a recorder.
	#[serde(default, skip_serializing_if = "is_false")]
	pub recorder: bool,

	/// The participant is an agent.
	#[serde(default, skip_serializing_if = "is_false")]
	pub agent: bool,
}

fn is_false(value: &bool) -> bool {
	!*value
}

fn allowed() -> bool {
	true
}
