//! Objective Rewards
//!
//! Rewards are paid once, when an objective is cleared. A broken reward entry
//! never blocks the job; it is logged and reported in the summary instead.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::api::{PlayerContext, Services};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RewardKind {
    Xp,
    Item,
}

/// One reward line: XP for a skill, or a quantity of an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reward {
    #[serde(rename = "type")]
    pub kind: RewardKind,
    /// Skill key for XP, item id for items
    pub key: String,
    pub quantity: u32,
}

impl Reward {
    pub fn new(kind: RewardKind, key: impl Into<String>, quantity: u32) -> Self {
        Self {
            kind,
            key: key.into(),
            quantity,
        }
    }

    pub fn xp(skill: impl Into<String>, amount: u32) -> Self {
        Self::new(RewardKind::Xp, skill, amount)
    }

    pub fn item(item_id: impl Into<String>, quantity: u32) -> Self {
        Self::new(RewardKind::Item, item_id, quantity)
    }
}

/// A reward line that could not be paid
#[derive(Debug, Clone, PartialEq)]
pub struct RewardFailure {
    pub reward: Reward,
    pub reason: String,
}

/// What a call to `issue_rewards` actually handed out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RewardSummary {
    pub xp: Vec<(String, u32)>,
    pub items: Vec<(String, u32)>,
    pub failures: Vec<RewardFailure>,
}

impl RewardSummary {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Pay out every reward in order.
///
/// Stackable items are granted in one inventory call; non-stackable items are
/// granted one unit at a time so each lands in its own slot. The player gets a
/// message per granted item line.
pub fn issue_rewards(
    player: &mut dyn PlayerContext,
    rewards: &[Reward],
    services: Services<'_>,
) -> RewardSummary {
    let mut summary = RewardSummary::default();

    for reward in rewards {
        if reward.quantity == 0 {
            debug!("Skipping empty {:?} reward '{}'", reward.kind, reward.key);
            continue;
        }

        match reward.kind {
            RewardKind::Xp => {
                let result = services.skills.grant_xp(
                    player.player_id(),
                    &reward.key,
                    i64::from(reward.quantity),
                );
                match result {
                    Ok(()) => summary.xp.push((reward.key.clone(), reward.quantity)),
                    Err(e) => {
                        warn!("XP reward for player {} failed: {}", player.player_id(), e);
                        summary.failures.push(RewardFailure {
                            reward: reward.clone(),
                            reason: e.to_string(),
                        });
                    }
                }
            }
            RewardKind::Item => {
                let Some(item) = services.items.lookup_item(&reward.key) else {
                    warn!(
                        "Reward misconfiguration: item '{}' does not exist, skipping",
                        reward.key
                    );
                    summary.failures.push(RewardFailure {
                        reward: reward.clone(),
                        reason: format!("unknown item '{}'", reward.key),
                    });
                    continue;
                };

                if item.is_stackable() {
                    player.grant_item(item, reward.quantity);
                    player.notify(&format!("Received {}x {}", reward.quantity, item.display_name));
                } else {
                    for _ in 0..reward.quantity {
                        player.grant_item(item, 1);
                        player.notify(&format!("Received 1x {}", item.display_name));
                    }
                }
                summary.items.push((reward.key.clone(), reward.quantity));
            }
        }
    }

    summary
}
