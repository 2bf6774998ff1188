//! Job Engine Service Boundary
//!
//! Traits for everything the engine calls out to: the player session it is
//! driving, the skill and item services used for rewards, and the word
//! dictionary used when building typing objectives.

use serde_json::Value;

use crate::data::ItemDefinition;
use crate::error::JobError;
use crate::position::Vec3;

use super::objective::Animation;

/// Handle to a vehicle the player is sitting in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VehicleRef(pub u32);

/// The player an objective is evaluated against.
///
/// Implementations forward presentation calls to whatever transport the
/// session uses; the engine never assumes delivery.
pub trait PlayerContext {
    fn player_id(&self) -> &str;

    fn position(&self) -> Vec3;

    /// The vehicle the player currently occupies, if any
    fn vehicle(&self) -> Option<VehicleRef>;

    /// How many of an item the player is carrying
    fn item_count(&self, item_id: &str) -> u32;

    /// Publish state on a named sync channel
    fn publish_state(&mut self, channel: &str, payload: Value);

    /// Chat-style text message
    fn notify(&mut self, message: &str);

    fn play_animation(&mut self, animation: &Animation);

    fn play_audio(&mut self, sound: &str);

    /// Add items to the player's inventory
    fn grant_item(&mut self, item: &ItemDefinition, quantity: u32);

    fn in_vehicle(&self) -> bool {
        self.vehicle().is_some()
    }
}

/// Grants skill experience
pub trait SkillService {
    fn has_skill(&self, skill: &str) -> bool;

    /// Add XP to a player's skill. Unknown skills are rejected.
    fn grant_xp(&self, player_id: &str, skill: &str, amount: i64) -> Result<(), JobError>;
}

/// Item definition lookup
pub trait ItemCatalog {
    fn lookup_item(&self, key: &str) -> Option<&ItemDefinition>;
}

/// Source of words for typing objectives
pub trait WordDictionary {
    fn pick_random_word(&self) -> Option<String>;
}

/// Services an objective needs when it completes
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub items: &'a dyn ItemCatalog,
    pub skills: &'a dyn SkillService,
}

impl<'a> Services<'a> {
    pub fn new(items: &'a dyn ItemCatalog, skills: &'a dyn SkillService) -> Self {
        Self { items, skills }
    }
}
