//! Skill experience ledger.
//!
//! Tracks raw XP per player and skill. Only skills registered up front can be
//! granted; leveling curves live elsewhere.

use std::collections::{HashMap, HashSet};

use dashmap::DashMap;
use tracing::debug;

use crate::error::JobError;
use crate::job::SkillService;

/// Known skills and the XP each player has earned in them
pub struct SkillBook {
    known: HashSet<String>,
    /// player_id -> (skill -> total xp)
    xp: DashMap<String, HashMap<String, i64>>,
}

impl SkillBook {
    pub fn new<S: AsRef<str>>(skills: &[S]) -> Self {
        Self {
            known: skills.iter().map(|s| s.as_ref().to_lowercase()).collect(),
            xp: DashMap::new(),
        }
    }

    /// Total XP a player has in a skill
    pub fn xp_for(&self, player_id: &str, skill: &str) -> i64 {
        self.xp
            .get(player_id)
            .and_then(|skills| skills.get(&skill.to_lowercase()).copied())
            .unwrap_or(0)
    }

    /// Drop a player's ledger (on disconnect)
    pub fn forget_player(&self, player_id: &str) {
        self.xp.remove(player_id);
    }

    pub fn skill_count(&self) -> usize {
        self.known.len()
    }
}

impl SkillService for SkillBook {
    fn has_skill(&self, skill: &str) -> bool {
        self.known.contains(&skill.to_lowercase())
    }

    fn grant_xp(&self, player_id: &str, skill: &str, amount: i64) -> Result<(), JobError> {
        let key = skill.to_lowercase();
        if !self.known.contains(&key) {
            return Err(JobError::UnknownSkill {
                skill: skill.to_string(),
            });
        }

        let mut skills = self.xp.entry(player_id.to_string()).or_default();
        let total = skills.entry(key).or_insert(0);
        *total += amount;
        debug!("Player {} gained {} {} XP (total {})", player_id, amount, skill, total);

        Ok(())
    }
}
