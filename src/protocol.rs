use serde::Serialize;
use serde_json::{json, Value};

use crate::job::{Animation, Objective, ObjectiveKind, PlayerContext};

// ============================================================================
// State Sync Channels
// ============================================================================

pub const CHANNEL_OBJECTIVE: &str = "job:Objective";
pub const CHANNEL_CLEAR_OBJECTIVE: &str = "job:ClearObjective";
pub const CHANNEL_PROGRESS: &str = "job:Progress";
pub const CHANNEL_OBJECTIVE_CLEARED: &str = "job:ObjectiveCleared";

/// Job state pushed to the player's client
#[derive(Debug, Clone)]
pub enum JobUpdate<'a> {
    /// Current objective, or `None` once the job has nothing left
    Objective(Option<&'a Objective>),
    /// Drop markers and blips for the objective just finished
    ClearObjective,
    /// Progress counter of the current objective (-1 when not started)
    Progress(i64),
    /// An objective of this kind was completed and paid out
    ObjectiveCleared(ObjectiveKind),
}

impl JobUpdate<'_> {
    pub fn channel(&self) -> &'static str {
        match self {
            JobUpdate::Objective(_) => CHANNEL_OBJECTIVE,
            JobUpdate::ClearObjective => CHANNEL_CLEAR_OBJECTIVE,
            JobUpdate::Progress(_) => CHANNEL_PROGRESS,
            JobUpdate::ObjectiveCleared(_) => CHANNEL_OBJECTIVE_CLEARED,
        }
    }

    pub fn payload(&self) -> Value {
        match self {
            JobUpdate::Objective(Some(objective)) => {
                serde_json::to_value(objective).unwrap_or(Value::Null)
            }
            JobUpdate::Objective(None) => json!("none"),
            JobUpdate::ClearObjective => json!(true),
            JobUpdate::Progress(progress) => json!(progress),
            JobUpdate::ObjectiveCleared(kind) => json!(kind),
        }
    }
}

/// Send a job update over the player's state channel
pub fn publish(player: &mut dyn PlayerContext, update: JobUpdate<'_>) {
    player.publish_state(update.channel(), update.payload());
}

// ============================================================================
// Server -> Client Messages
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    State {
        channel: String,
        payload: Value,
    },
    Notify {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    PlayAnimation {
        dict: String,
        name: String,
        duration_ms: u32,
        flags: u32,
    },
    PlayAudio {
        sound: String,
    },
    #[serde(rename_all = "camelCase")]
    InventoryUpdate {
        item_id: String,
        quantity: u32,
    },
}

impl ServerMessage {
    pub fn play_animation(animation: &Animation) -> Self {
        ServerMessage::PlayAnimation {
            dict: animation.dict.clone(),
            name: animation.name.clone(),
            duration_ms: animation.duration_ms,
            flags: animation.flags,
        }
    }

    /// Get message type string
    pub fn msg_type(&self) -> &'static str {
        match self {
            ServerMessage::State { .. } => "state",
            ServerMessage::Notify { .. } => "notify",
            ServerMessage::PlayAnimation { .. } => "playAnimation",
            ServerMessage::PlayAudio { .. } => "playAudio",
            ServerMessage::InventoryUpdate { .. } => "inventoryUpdate",
        }
    }

    /// Encode for the wire
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_channels() {
        assert_eq!(JobUpdate::Objective(None).channel(), "job:Objective");
        assert_eq!(JobUpdate::ClearObjective.channel(), "job:ClearObjective");
        assert_eq!(JobUpdate::Progress(3).channel(), "job:Progress");
    }

    #[test]
    fn test_update_payloads() {
        assert_eq!(JobUpdate::Objective(None).payload(), json!("none"));
        assert_eq!(JobUpdate::ClearObjective.payload(), json!(true));
        assert_eq!(JobUpdate::Progress(-1).payload(), json!(-1));
        assert_eq!(
            JobUpdate::ObjectiveCleared(ObjectiveKind::HoldInteract).payload(),
            json!("hold_interact")
        );
    }

    #[test]
    fn test_server_message_json() {
        let msg = ServerMessage::Notify {
            text: "Job complete".to_string(),
        };
        assert_eq!(msg.msg_type(), "notify");
        assert_eq!(msg.to_json(), r#"{"type":"notify","text":"Job complete"}"#);

        let anim = ServerMessage::PlayAnimation {
            dict: "mini@repair".to_string(),
            name: "fixing_a_player".to_string(),
            duration_ms: 2000,
            flags: 1,
        };
        let value: Value = serde_json::from_str(&anim.to_json()).unwrap();
        assert_eq!(value["type"], "playAnimation");
        assert_eq!(value["durationMs"], 2000);
    }
}
