//! Player Sessions
//!
//! A connected player as seen by the job engine. Everything the engine pushes
//! to the player is turned into a `ServerMessage` and queued on the session's
//! outbound channel.

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::data::ItemDefinition;
use crate::item::Inventory;
use crate::job::{Animation, PlayerContext, VehicleRef};
use crate::position::Vec3;
use crate::protocol::ServerMessage;

pub struct Session {
    pub session_id: Uuid,
    pub player_id: String,
    pub position: Vec3,
    pub vehicle: Option<VehicleRef>,
    pub inventory: Inventory,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl Session {
    pub fn new(player_id: &str, position: Vec3, tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            player_id: player_id.to_string(),
            position,
            vehicle: None,
            inventory: Inventory::new(),
            tx,
        }
    }

    /// Move up to `step` units toward `target`
    pub fn move_toward(&mut self, target: Vec3, step: f32) {
        self.position = self.position.step_toward(&target, step);
    }

    pub fn enter_vehicle(&mut self, vehicle: VehicleRef) {
        self.vehicle = Some(vehicle);
    }

    pub fn exit_vehicle(&mut self) {
        self.vehicle = None;
    }

    fn send(&self, msg: ServerMessage) {
        if self.tx.send(msg).is_err() {
            debug!("Session {} outbound channel closed", self.session_id);
        }
    }
}

impl PlayerContext for Session {
    fn player_id(&self) -> &str {
        &self.player_id
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn vehicle(&self) -> Option<VehicleRef> {
        self.vehicle
    }

    fn item_count(&self, item_id: &str) -> u32 {
        self.inventory.count(item_id)
    }

    fn publish_state(&mut self, channel: &str, payload: Value) {
        self.send(ServerMessage::State {
            channel: channel.to_string(),
            payload,
        });
    }

    fn notify(&mut self, message: &str) {
        self.send(ServerMessage::Notify {
            text: message.to_string(),
        });
    }

    fn play_animation(&mut self, animation: &Animation) {
        self.send(ServerMessage::play_animation(animation));
    }

    fn play_audio(&mut self, sound: &str) {
        self.send(ServerMessage::PlayAudio {
            sound: sound.to_string(),
        });
    }

    fn grant_item(&mut self, item: &ItemDefinition, quantity: u32) {
        let overflow = self.inventory.add_item(item, quantity);
        if overflow > 0 {
            warn!(
                "Inventory full for {}: dropped {}x {}",
                self.player_id, overflow, item.id
            );
        }
        self.send(ServerMessage::InventoryUpdate {
            item_id: item.id.clone(),
            quantity: self.inventory.count(&item.id),
        });
    }
}
