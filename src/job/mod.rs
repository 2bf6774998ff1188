//! Job System Module
//!
//! Objective-driven jobs: an ordered queue of objectives per player, checked
//! by the game loop or by player input, with rewards paid as each objective
//! clears. Job templates are loaded from TOML.

pub mod api;
pub mod assignments;
pub mod definition;
pub mod flags;
pub mod objective;
mod progress;
pub mod registry;
pub mod reward;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ItemCatalog, PlayerContext, Services, SkillService, VehicleRef, WordDictionary};
pub use assignments::{JobAssignments, ReplacePolicy};
pub use definition::{JobTemplate, ObjectiveTemplate, RawJobFile};
pub use flags::{ModifierFlags, ObjectiveKind};
pub use objective::{
    Animation, Blip, CheckTrigger, ItemRestriction, Marker, Objective, ObjectiveTarget, Rgba,
    TargetKind,
};
pub use registry::JobRegistry;
pub use reward::{issue_rewards, Reward, RewardKind, RewardSummary};
pub use state::{CheckOutcome, Job, JobStatus};
