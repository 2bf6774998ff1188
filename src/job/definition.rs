//! Job Template Definitions
//!
//! Jobs are described in TOML files. A template is parsed and validated once,
//! then turned into fresh `Objective` values every time a player takes the job.

use serde::Deserialize;

use crate::error::JobError;
use crate::position::Vec3;

use super::api::WordDictionary;
use super::flags::{ModifierFlags, ObjectiveKind};
use super::objective::{Animation, Blip, ItemRestriction, Marker, Objective, ObjectiveTarget};
use super::reward::Reward;
use super::state::Job;

/// A job file as it appears on disk
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobFile {
    pub job: RawJob,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawJob {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub objectives: Vec<RawObjective>,
}

/// Raw objective as it appears in TOML
#[derive(Debug, Clone, Deserialize)]
pub struct RawObjective {
    pub kind: String,
    #[serde(default)]
    pub flags: Vec<String>,
    pub position: Option<Vec3>,
    pub range: Option<f32>,
    pub max_progress: Option<u32>,
    pub help_text: Option<String>,
    pub every_sound: Option<String>,
    pub finish_sound: Option<String>,
    pub animation: Option<Animation>,
    pub marker: Option<Marker>,
    pub blip: Option<Blip>,
    #[serde(default)]
    pub rewards: Vec<Reward>,
    pub item_restrictions: Option<Vec<ItemRestriction>>,
    pub target: Option<ObjectiveTarget>,
}

// ============================================================================
// Resolved Templates
// ============================================================================

/// A validated objective recipe
#[derive(Debug, Clone)]
pub struct ObjectiveTemplate {
    pub kind: ObjectiveKind,
    pub flags: ModifierFlags,
    pub settings: RawObjective,
}

impl ObjectiveTemplate {
    pub fn from_raw(raw: &RawObjective) -> Result<Self, String> {
        let kind = ObjectiveKind::from_str(&raw.kind)
            .ok_or_else(|| format!("invalid objective kind '{}'", raw.kind))?;

        if !kind.is_supported() {
            return Err(format!("objective kind '{}' is not supported yet", raw.kind));
        }

        let flags = ModifierFlags::from_names(&raw.flags)
            .map_err(|name| format!("invalid modifier flag '{}'", name))?;

        Ok(Self {
            kind,
            flags,
            settings: raw.clone(),
        })
    }

    /// Build a fresh objective from this recipe
    pub fn instantiate(&self, words: &dyn WordDictionary) -> Result<Objective, JobError> {
        if self.kind == ObjectiveKind::InfiniteMarker {
            return Ok(Objective::infinite_marker());
        }

        let raw = &self.settings;
        let mut objective = Objective::new(self.kind, self.flags, words)?;

        if let Some(position) = raw.position {
            objective.set_position(position);
        }
        if let Some(range) = raw.range {
            objective.set_range(range);
        }
        if let Some(max_progress) = raw.max_progress {
            objective.set_max_progress(max_progress);
        }
        if let Some(ref text) = raw.help_text {
            objective.set_help_text(text.clone());
        }
        if let Some(ref sound) = raw.every_sound {
            objective.set_every_sound(sound.clone());
        }
        if let Some(ref sound) = raw.finish_sound {
            objective.set_finish_sound(sound.clone());
        }
        if let Some(ref animation) = raw.animation {
            objective.set_animation(animation.clone());
        }
        if let Some(ref marker) = raw.marker {
            objective.set_marker(marker.clone());
        }
        if let Some(ref blip) = raw.blip {
            objective.set_blip(blip.clone());
        }
        if let Some(ref restrictions) = raw.item_restrictions {
            objective.set_item_restrictions(restrictions.clone());
        }
        if let Some(ref target) = raw.target {
            objective.set_target(target.id.clone(), target.kind);
        }
        objective.set_rewards(raw.rewards.clone());

        Ok(objective)
    }
}

/// A fully resolved job definition
#[derive(Debug, Clone)]
pub struct JobTemplate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub objectives: Vec<ObjectiveTemplate>,
}

impl JobTemplate {
    /// Create a template from raw TOML data
    pub fn from_raw(raw: &RawJob) -> Result<Self, JobError> {
        let objectives = raw
            .objectives
            .iter()
            .enumerate()
            .map(|(index, o)| {
                ObjectiveTemplate::from_raw(o).map_err(|reason| JobError::InvalidObjective {
                    job: raw.id.clone(),
                    index,
                    reason,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        if objectives.iter().all(|o| o.kind == ObjectiveKind::InfiniteMarker) {
            return Err(JobError::EmptyJob(raw.id.clone()));
        }

        Ok(Self {
            id: raw.id.clone(),
            name: raw.name.clone(),
            description: raw.description.clone(),
            objectives,
        })
    }

    /// Build a new job for `owner` with freshly created objectives
    pub fn instantiate(&self, owner: &str, words: &dyn WordDictionary) -> Result<Job, JobError> {
        let mut job = Job::new(owner, &self.name);
        for template in &self.objectives {
            job.add(template.instantiate(words)?)?;
        }
        Ok(job)
    }

    /// Whether this job loops forever once started
    pub fn is_looping(&self) -> bool {
        self.objectives
            .iter()
            .any(|o| o.kind == ObjectiveKind::InfiniteMarker)
    }
}
