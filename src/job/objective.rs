//! Objectives
//!
//! A single job step: what to do, where, under which preconditions, how it is
//! presented, and what it pays out. Objectives evaluate themselves against a
//! player each time the job is checked.

use serde::{Deserialize, Serialize, Serializer};
use tracing::debug;

use crate::error::JobError;
use crate::position::Vec3;
use crate::protocol::{publish, JobUpdate};

use super::api::{PlayerContext, Services, WordDictionary};
use super::flags::{ModifierFlags, ObjectiveKind};
use super::progress;
use super::reward::{issue_rewards, Reward};

/// Smallest accepted range radius
pub const MIN_RANGE: f32 = 2.0;
pub const DEFAULT_RANGE: f32 = 5.0;
pub const DEFAULT_MAX_PROGRESS: u32 = 5;

/// What caused a check to run. The engine treats every trigger the same; the
/// caller picks the cadence (every tick for capture/hold, per key press for mash).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckTrigger {
    Tick,
    Interact,
    Key(char),
}

// ============================================================================
// Presentation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Animation {
    pub dict: String,
    pub name: String,
    #[serde(default)]
    pub flags: u32,
    #[serde(default, alias = "duration_ms")]
    pub duration_ms: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[serde(default = "opaque")]
    pub a: u8,
}

fn opaque() -> u8 {
    255
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    #[serde(rename = "type")]
    pub marker_type: u32,
    pub position: Vec3,
    #[serde(default)]
    pub direction: Vec3,
    #[serde(default)]
    pub rotation: Vec3,
    pub scale: Vec3,
    pub color: Rgba,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blip {
    pub sprite: u32,
    pub color: u32,
    pub position: Vec3,
}

/// An item the player must (or must not) carry while working the objective
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemRestriction {
    pub label: String,
    #[serde(alias = "requires_in_inventory")]
    pub requires_in_inventory: bool,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl ItemRestriction {
    pub fn is_met(&self, carried: u32) -> bool {
        let quantity = self.quantity.max(1);
        if self.requires_in_inventory {
            carried >= quantity
        } else {
            carried < quantity
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
    Player,
    Vehicle,
    Npc,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTarget {
    pub id: String,
    pub kind: TargetKind,
}

// ============================================================================
// Objective
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Objective {
    pub(super) kind: ObjectiveKind,
    pub(super) flags: ModifierFlags,
    pub(super) position: Option<Vec3>,
    pub(super) range: f32,
    pub(super) max_progress: u32,
    /// `None` until the objective starts counting (sent as -1)
    #[serde(serialize_with = "serialize_progress")]
    pub(super) progress: Option<u32>,
    pub(super) help_text: Option<String>,
    pub(super) every_sound: Option<String>,
    pub(super) finish_sound: Option<String>,
    pub(super) animation: Option<Animation>,
    pub(super) marker: Option<Marker>,
    pub(super) blip: Option<Blip>,
    pub(super) rewards: Vec<Reward>,
    pub(super) item_restrictions: Option<Vec<ItemRestriction>>,
    pub(super) target: Option<ObjectiveTarget>,
    pub(super) order_word: Option<String>,
    /// Position was filled in from the player rather than authored
    #[serde(skip)]
    pub(super) position_defaulted: bool,
}

fn serialize_progress<S: Serializer>(progress: &Option<u32>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(progress_value(*progress))
}

fn progress_value(progress: Option<u32>) -> i64 {
    progress.map(i64::from).unwrap_or(-1)
}

impl Objective {
    /// Create an objective with default range and progress.
    ///
    /// Typing objectives draw their word from `words` here; an empty dictionary
    /// is an error for them and ignored for every other kind.
    pub fn new(
        kind: ObjectiveKind,
        flags: ModifierFlags,
        words: &dyn WordDictionary,
    ) -> Result<Self, JobError> {
        let order_word = if kind == ObjectiveKind::OrderedKeys {
            Some(words.pick_random_word().ok_or(JobError::EmptyDictionary)?)
        } else {
            None
        };

        Ok(Self {
            order_word,
            ..Self::blank(kind, flags)
        })
    }

    /// The loop sentinel
    pub fn infinite_marker() -> Self {
        Self::blank(ObjectiveKind::InfiniteMarker, ModifierFlags::NONE)
    }

    fn blank(kind: ObjectiveKind, flags: ModifierFlags) -> Self {
        Self {
            kind,
            flags,
            position: None,
            range: DEFAULT_RANGE,
            max_progress: DEFAULT_MAX_PROGRESS,
            progress: None,
            help_text: None,
            every_sound: None,
            finish_sound: None,
            animation: None,
            marker: None,
            blip: None,
            rewards: Vec::new(),
            item_restrictions: None,
            target: None,
            order_word: None,
            position_defaulted: false,
        }
    }

    // ------------------------------------------------------------------------
    // Setters
    // ------------------------------------------------------------------------

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = Some(position);
        self.position_defaulted = false;
        self
    }

    /// Set the completion radius, clamped to at least `MIN_RANGE`
    pub fn set_range(&mut self, range: f32) -> &mut Self {
        self.range = range.max(MIN_RANGE);
        self
    }

    pub fn set_max_progress(&mut self, max_progress: u32) -> &mut Self {
        self.max_progress = max_progress;
        self
    }

    pub fn set_help_text(&mut self, text: impl Into<String>) -> &mut Self {
        self.help_text = Some(text.into());
        self
    }

    pub fn set_rewards(&mut self, rewards: Vec<Reward>) -> &mut Self {
        self.rewards = rewards;
        self
    }

    pub fn set_every_sound(&mut self, sound: impl Into<String>) -> &mut Self {
        self.every_sound = Some(sound.into());
        self
    }

    pub fn set_finish_sound(&mut self, sound: impl Into<String>) -> &mut Self {
        self.finish_sound = Some(sound.into());
        self
    }

    pub fn set_animation(&mut self, animation: Animation) -> &mut Self {
        self.animation = Some(animation);
        self
    }

    pub fn set_marker(&mut self, marker: Marker) -> &mut Self {
        self.marker = Some(marker);
        self
    }

    pub fn set_blip(&mut self, blip: Blip) -> &mut Self {
        self.blip = Some(blip);
        self
    }

    pub fn set_item_restrictions(&mut self, restrictions: Vec<ItemRestriction>) -> &mut Self {
        self.item_restrictions = Some(restrictions);
        self
    }

    pub fn set_target(&mut self, id: impl Into<String>, kind: TargetKind) -> &mut Self {
        self.target = Some(ObjectiveTarget { id: id.into(), kind });
        self
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn kind(&self) -> ObjectiveKind {
        self.kind
    }

    pub fn flags(&self) -> ModifierFlags {
        self.flags
    }

    pub fn position(&self) -> Option<Vec3> {
        self.position
    }

    pub fn range(&self) -> f32 {
        self.range
    }

    pub fn max_progress(&self) -> u32 {
        self.max_progress
    }

    pub fn progress(&self) -> Option<u32> {
        self.progress
    }

    /// Progress as published to clients (-1 when not started)
    pub fn progress_value(&self) -> i64 {
        progress_value(self.progress)
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help_text.as_deref()
    }

    pub fn rewards(&self) -> &[Reward] {
        &self.rewards
    }

    pub fn item_restrictions(&self) -> Option<&[ItemRestriction]> {
        self.item_restrictions.as_deref()
    }

    pub fn target(&self) -> Option<&ObjectiveTarget> {
        self.target.as_ref()
    }

    pub fn order_word(&self) -> Option<&str> {
        self.order_word.as_deref()
    }

    pub fn is_infinite_marker(&self) -> bool {
        self.kind == ObjectiveKind::InfiniteMarker
    }

    /// Forget per-run state so the objective can be run again. A position
    /// taken from the player is dropped too; authored positions stay.
    pub fn reset_for_recycle(&mut self) {
        self.progress = None;
        if self.position_defaulted {
            self.position = None;
            self.position_defaulted = false;
        }
    }

    // ------------------------------------------------------------------------
    // Evaluation
    // ------------------------------------------------------------------------

    /// Check the objective and, when it completes, pay out its rewards and
    /// announce it on the cleared channel.
    ///
    /// Returns true once the objective is done and the job may advance.
    pub fn attempt_objective(
        &mut self,
        player: &mut dyn PlayerContext,
        services: Services<'_>,
        trigger: &CheckTrigger,
    ) -> Result<bool, JobError> {
        if !self.check_objective(player, trigger)? {
            publish(player, JobUpdate::Progress(self.progress_value()));
            return Ok(false);
        }

        let summary = issue_rewards(player, &self.rewards, services);

        if let Some(ref sound) = self.finish_sound {
            player.play_audio(sound);
        }

        publish(player, JobUpdate::ObjectiveCleared(self.kind));
        if summary.is_clean() {
            debug!(
                "Player {} cleared {:?} objective: {} xp, {} item reward lines",
                player.player_id(),
                self.kind,
                summary.xp.len(),
                summary.items.len()
            );
        } else {
            debug!(
                "Player {} cleared {:?} objective with {} of {} reward lines failed",
                player.player_id(),
                self.kind,
                summary.failures.len(),
                summary.xp.len() + summary.items.len() + summary.failures.len()
            );
        }
        Ok(true)
    }

    /// Run the range, modifier and kind checks in order.
    pub fn check_objective(
        &mut self,
        player: &mut dyn PlayerContext,
        trigger: &CheckTrigger,
    ) -> Result<bool, JobError> {
        let player_position = player.position();
        let target = match self.position {
            Some(position) => position,
            None => {
                self.position = Some(player_position);
                self.position_defaulted = true;
                player_position
            }
        };

        let mut valid = true;

        if self.kind.is_navigable() && player_position.distance(&target) > self.range {
            valid = false;
        }

        if valid && self.flags.contains(ModifierFlags::ON_FOOT) && player.in_vehicle() {
            valid = false;
        }

        if valid && self.flags.contains(ModifierFlags::IN_VEHICLE) && !player.in_vehicle() {
            valid = false;
        }

        if valid && self.flags.contains(ModifierFlags::TRACKS_PROGRESS) && self.progress.is_none() {
            self.progress = Some(0);
        }

        if valid && self.flags.contains(ModifierFlags::ITEM_RESTRICTED) {
            valid = self.restrictions_met(&*player);
        }

        if !valid {
            return Ok(false);
        }

        debug!(
            "Player {} passed gates for {:?} ({:?})",
            player.player_id(),
            self.kind,
            trigger
        );
        progress::evaluate_kind(self, player)
    }

    fn restrictions_met(&self, player: &dyn PlayerContext) -> bool {
        self.item_restrictions
            .iter()
            .flatten()
            .all(|r| r.is_met(player.item_count(&r.label)))
    }

    /// Play the per-tick animation and sound, if configured
    pub(super) fn present(&self, player: &mut dyn PlayerContext) {
        if let Some(ref animation) = self.animation {
            player.play_animation(animation);
        }
        if let Some(ref sound) = self.every_sound {
            player.play_audio(sound);
        }
    }
}
