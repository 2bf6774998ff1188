//! Objective kinds and modifier flags.
//!
//! Kinds are a closed enum; modifiers are a composable bit set. The two never
//! share a numeric space.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize, Serializer};

/// What an objective asks the player to do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum ObjectiveKind {
    /// Reach a point
    GoToPoint = 0,
    /// Stay inside a zone until progress fills
    CaptureZone = 1,
    /// Hold an interaction key until progress fills
    HoldInteract = 2,
    /// Tap an interaction key until progress fills
    MashInteract = 3,
    /// Act on another player or entity
    TargetPlayer = 4,
    /// Type a word key by key
    OrderedKeys = 5,
    /// Sentinel: everything after this loops forever
    InfiniteMarker = 6,
}

impl ObjectiveKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "go_to_point" | "point" | "goto" => Some(ObjectiveKind::GoToPoint),
            "capture_zone" | "capture" => Some(ObjectiveKind::CaptureZone),
            "hold_interact" | "hold" => Some(ObjectiveKind::HoldInteract),
            "mash_interact" | "mash" => Some(ObjectiveKind::MashInteract),
            "target_player" | "target" => Some(ObjectiveKind::TargetPlayer),
            "ordered_keys" | "order" => Some(ObjectiveKind::OrderedKeys),
            "infinite_marker" | "infinite" => Some(ObjectiveKind::InfiniteMarker),
            _ => None,
        }
    }

    /// Kinds that are gated by the player's distance to the objective
    pub fn is_navigable(&self) -> bool {
        (*self as u8) <= (ObjectiveKind::OrderedKeys as u8)
    }

    /// Kinds the engine can evaluate today
    pub fn is_supported(&self) -> bool {
        !matches!(self, ObjectiveKind::TargetPlayer | ObjectiveKind::OrderedKeys)
    }
}

/// Composable behavior modifiers attached to an objective
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ModifierFlags(u32);

impl ModifierFlags {
    pub const NONE: ModifierFlags = ModifierFlags(0);
    pub const ON_FOOT: ModifierFlags = ModifierFlags(1);
    pub const IN_VEHICLE: ModifierFlags = ModifierFlags(2);
    pub const TRACKS_PROGRESS: ModifierFlags = ModifierFlags(4);
    pub const SPAWN_VEHICLE: ModifierFlags = ModifierFlags(8);
    pub const REMOVE_VEHICLE: ModifierFlags = ModifierFlags(16);
    pub const PICKUP_PASSENGER: ModifierFlags = ModifierFlags(32);
    pub const DROPOFF_PASSENGER: ModifierFlags = ModifierFlags(64);
    pub const ELIMINATE_TARGET: ModifierFlags = ModifierFlags(128);
    pub const REPAIR_TARGET: ModifierFlags = ModifierFlags(256);
    pub const ITEM_RESTRICTED: ModifierFlags = ModifierFlags(512);

    const NAMED: [(&'static str, ModifierFlags); 10] = [
        ("on_foot", Self::ON_FOOT),
        ("in_vehicle", Self::IN_VEHICLE),
        ("tracks_progress", Self::TRACKS_PROGRESS),
        ("spawn_vehicle", Self::SPAWN_VEHICLE),
        ("remove_vehicle", Self::REMOVE_VEHICLE),
        ("pickup_passenger", Self::PICKUP_PASSENGER),
        ("dropoff_passenger", Self::DROPOFF_PASSENGER),
        ("eliminate_target", Self::ELIMINATE_TARGET),
        ("repair_target", Self::REPAIR_TARGET),
        ("item_restricted", Self::ITEM_RESTRICTED),
    ];

    pub const fn bits(&self) -> u32 {
        self.0
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// True when every bit in `other` is also set here
    pub const fn contains(&self, other: ModifierFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: ModifierFlags) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ModifierFlags) {
        self.0 &= !other.0;
    }

    /// Look up a single flag by its snake_case name
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.to_lowercase();
        Self::NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, flag)| *flag)
    }

    /// Parse a list of flag names, returning the first unknown name on failure
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, String> {
        names.iter().try_fold(ModifierFlags::NONE, |acc, name| {
            ModifierFlags::from_name(name.as_ref())
                .map(|flag| acc | flag)
                .ok_or_else(|| name.as_ref().to_string())
        })
    }

    /// Names of every set flag, in bit order
    pub fn names(&self) -> Vec<&'static str> {
        Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect()
    }
}

impl BitOr for ModifierFlags {
    type Output = ModifierFlags;

    fn bitor(self, rhs: ModifierFlags) -> ModifierFlags {
        ModifierFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierFlags {
    fn bitor_assign(&mut self, rhs: ModifierFlags) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for ModifierFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModifierFlags({})", self.names().join(" | "))
    }
}

// Serialized as the raw bit set so clients can test flags cheaply.
impl Serialize for ModifierFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.0)
    }
}
