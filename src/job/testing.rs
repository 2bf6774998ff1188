//! Test doubles for the service boundary.

use std::collections::HashMap;

use serde_json::Value;

use crate::data::ItemDefinition;
use crate::position::Vec3;

use super::api::{PlayerContext, VehicleRef};
use super::objective::Animation;

/// A player that records everything the engine does to it
pub struct RecordingPlayer {
    pub id: String,
    pub position: Vec3,
    pub vehicle: Option<VehicleRef>,
    pub items: HashMap<String, u32>,
    pub published: Vec<(String, Value)>,
    pub notifications: Vec<String>,
    pub animations: Vec<Animation>,
    pub audio: Vec<String>,
    pub grants: Vec<(String, u32)>,
}

impl RecordingPlayer {
    pub fn at(position: Vec3) -> Self {
        Self {
            id: "p1".to_string(),
            position,
            vehicle: None,
            items: HashMap::new(),
            published: Vec::new(),
            notifications: Vec::new(),
            animations: Vec::new(),
            audio: Vec::new(),
            grants: Vec::new(),
        }
    }

    /// Payloads published on one channel, oldest first
    pub fn states_on(&self, channel: &str) -> Vec<Value> {
        self.published
            .iter()
            .filter(|(c, _)| c == channel)
            .map(|(_, payload)| payload.clone())
            .collect()
    }
}

impl PlayerContext for RecordingPlayer {
    fn player_id(&self) -> &str {
        &self.id
    }

    fn position(&self) -> Vec3 {
        self.position
    }

    fn vehicle(&self) -> Option<VehicleRef> {
        self.vehicle
    }

    fn item_count(&self, item_id: &str) -> u32 {
        self.items.get(item_id).copied().unwrap_or(0)
    }

    fn publish_state(&mut self, channel: &str, payload: Value) {
        self.published.push((channel.to_string(), payload));
    }

    fn notify(&mut self, message: &str) {
        self.notifications.push(message.to_string());
    }

    fn play_animation(&mut self, animation: &Animation) {
        self.animations.push(animation.clone());
    }

    fn play_audio(&mut self, sound: &str) {
        self.audio.push(sound.to_string());
    }

    fn grant_item(&mut self, item: &ItemDefinition, quantity: u32) {
        *self.items.entry(item.id.clone()).or_insert(0) += quantity;
        self.grants.push((item.id.clone(), quantity));
    }
}
