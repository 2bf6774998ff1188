//! Player Job Assignments
//!
//! Tracks the one job each player is working on. Checks are single-flight per
//! player: a check that arrives while another is still running for the same
//! player is dropped instead of advancing the job twice.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, TryLockError};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::JobError;
use crate::protocol::{publish, JobUpdate};

use super::api::{PlayerContext, Services};
use super::objective::{CheckTrigger, Objective};
use super::state::{CheckOutcome, Job};

/// What to do when a player who already has a job is given another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplacePolicy {
    /// Drop the old job and start the new one
    #[default]
    Replace,
    /// Refuse the new job
    Reject,
}

struct JobSlot {
    name: String,
    checking: AtomicBool,
    job: Mutex<Job>,
}

impl JobSlot {
    fn lock(&self) -> MutexGuard<'_, Job> {
        self.job.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears the in-flight flag when a check ends, including on early return
struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Active jobs keyed by player ID
pub struct JobAssignments {
    slots: DashMap<String, Arc<JobSlot>>,
    policy: ReplacePolicy,
}

impl JobAssignments {
    pub fn new(policy: ReplacePolicy) -> Self {
        Self {
            slots: DashMap::new(),
            policy,
        }
    }

    /// Give `job` to the player and publish its first objective.
    ///
    /// The slot is claimed before the job starts, so two assignments racing
    /// for the same player cannot both pass the policy check. It stays marked
    /// in flight until `start` returns.
    pub fn assign(&self, player: &mut dyn PlayerContext, job: Job) -> Result<(), JobError> {
        let player_id = player.player_id().to_string();
        let name = job.name().to_string();

        let slot = Arc::new(JobSlot {
            name: name.clone(),
            checking: AtomicBool::new(true),
            job: Mutex::new(job),
        });

        let replaced = match self.slots.entry(player_id.clone()) {
            Entry::Occupied(mut entry) => match self.policy {
                ReplacePolicy::Reject => {
                    return Err(JobError::JobAlreadyAssigned {
                        player_id,
                        job: entry.get().name.clone(),
                    });
                }
                ReplacePolicy::Replace => {
                    let old_name = entry.get().name.clone();
                    entry.insert(Arc::clone(&slot));
                    Some(old_name)
                }
            },
            Entry::Vacant(entry) => {
                entry.insert(Arc::clone(&slot));
                None
            }
        };
        let _in_flight = InFlight(&slot.checking);

        if let Some(old_name) = replaced {
            info!("Replacing job '{}' for {} with '{}'", old_name, player_id, name);
            publish(player, JobUpdate::ClearObjective);
        }

        let complete = {
            let mut job = slot.lock();
            job.start(player);
            job.is_complete()
        };

        if complete {
            self.slots
                .remove_if(&player_id, |_, current| Arc::ptr_eq(current, &slot));
            return Ok(());
        }

        info!("Assigned job '{}' to {}", name, player_id);
        Ok(())
    }

    /// Run one check of the player's job.
    ///
    /// Returns `Idle` when the player has no job or a check is already running
    /// for them. A completed job is removed.
    pub fn check(
        &self,
        player: &mut dyn PlayerContext,
        services: Services<'_>,
        trigger: &CheckTrigger,
    ) -> Result<CheckOutcome, JobError> {
        let player_id = player.player_id().to_string();

        // Clone the slot out so no map shard stays locked while the job runs
        let Some(slot) = self.slots.get(&player_id).map(|s| Arc::clone(s.value())) else {
            return Ok(CheckOutcome::Idle);
        };

        if slot
            .checking
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Check for {} already in flight, skipping", player_id);
            return Ok(CheckOutcome::Idle);
        }
        let _in_flight = InFlight(&slot.checking);

        let outcome = slot.lock().check(player, services, trigger)?;

        if outcome == CheckOutcome::Completed {
            self.slots
                .remove_if(&player_id, |_, current| Arc::ptr_eq(current, &slot));
        }

        Ok(outcome)
    }

    /// Drop the player's job, if any
    pub fn clear(&self, player: &mut dyn PlayerContext) -> bool {
        match self.slots.remove(player.player_id()) {
            Some((_, slot)) => {
                info!("Cleared job '{}' for {}", slot.name, player.player_id());
                publish(player, JobUpdate::ClearObjective);
                true
            }
            None => false,
        }
    }

    /// Drop a player's job without notifying them (e.g. on disconnect)
    pub fn forget(&self, player_id: &str) {
        self.slots.remove(player_id);
    }

    pub fn has_job(&self, player_id: &str) -> bool {
        self.slots.contains_key(player_id)
    }

    /// Read the player's job. Returns `None` if they have none or it is busy.
    pub fn with_job<R>(&self, player_id: &str, f: impl FnOnce(&Job) -> R) -> Option<R> {
        let slot = self.slots.get(player_id).map(|s| Arc::clone(s.value()))?;
        let result = match slot.job.try_lock() {
            Ok(job) => f(&job),
            Err(TryLockError::Poisoned(poisoned)) => f(&poisoned.into_inner()),
            Err(TryLockError::WouldBlock) => return None,
        };
        Some(result)
    }

    /// Snapshot of the player's current objective
    pub fn current_objective(&self, player_id: &str) -> Option<Objective> {
        self.with_job(player_id, |job| job.current().cloned()).flatten()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for JobAssignments {
    fn default() -> Self {
        Self::new(ReplacePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{ItemDefinition, ItemRegistry};
    use crate::job::api::{PlayerContext, VehicleRef};
    use crate::job::flags::{ModifierFlags, ObjectiveKind};
    use crate::job::objective::Animation;
    use crate::job::testing::RecordingPlayer;
    use crate::position::Vec3;
    use crate::protocol::CHANNEL_CLEAR_OBJECTIVE;
    use crate::skills::SkillBook;
    use crate::words::WordList;
    use serde_json::Value;

    fn counter_job(owner: &str, name: &str, max: u32) -> Job {
        let mut objective =
            Objective::new(ObjectiveKind::MashInteract, ModifierFlags::NONE, &WordList::empty()).unwrap();
        objective.set_max_progress(max).set_every_sound("click");

        let mut job = Job::new(owner, name);
        job.add(objective).unwrap();
        job
    }

    #[test]
    fn test_assign_and_complete_removes_job() {
        let items = ItemRegistry::new();
        let skills = SkillBook::new::<&str>(&[]);
        let services = Services::new(&items, &skills);
        let assignments = JobAssignments::default();
        let mut player = RecordingPlayer::at(Vec3::default());

        assignments.assign(&mut player, counter_job("p1", "Press", 2)).unwrap();
        assert!(assignments.has_job("p1"));
        assert_eq!(
            assignments.current_objective("p1").map(|o| o.kind()),
            Some(ObjectiveKind::MashInteract)
        );

        let trigger = CheckTrigger::Key('e');
        assert_eq!(
            assignments.check(&mut player, services, &trigger).unwrap(),
            CheckOutcome::Pending
        );
        assert_eq!(
            assignments.check(&mut player, services, &trigger).unwrap(),
            CheckOutcome::Completed
        );
        assert!(!assignments.has_job("p1"));
        assert_eq!(
            assignments.check(&mut player, services, &trigger).unwrap(),
            CheckOutcome::Idle
        );
    }

    #[test]
    fn test_reject_policy_keeps_first_job() {
        let assignments = JobAssignments::new(ReplacePolicy::Reject);
        let mut player = RecordingPlayer::at(Vec3::default());

        assignments.assign(&mut player, counter_job("p1", "First", 3)).unwrap();
        let err = assignments
            .assign(&mut player, counter_job("p1", "Second", 3))
            .unwrap_err();

        assert!(matches!(err, JobError::JobAlreadyAssigned { ref job, .. } if job == "First"));
        assert_eq!(assignments.with_job("p1", |j| j.name().to_string()), Some("First".to_string()));
    }

    #[test]
    fn test_replace_policy_swaps_job() {
        let assignments = JobAssignments::new(ReplacePolicy::Replace);
        let mut player = RecordingPlayer::at(Vec3::default());

        assignments.assign(&mut player, counter_job("p1", "First", 3)).unwrap();
        assignments.assign(&mut player, counter_job("p1", "Second", 3)).unwrap();

        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments.with_job("p1", |j| j.name().to_string()), Some("Second".to_string()));
        assert_eq!(player.states_on(CHANNEL_CLEAR_OBJECTIVE).len(), 1);
    }

    #[test]
    fn test_concurrent_assign_with_reject_admits_one() {
        let assignments = JobAssignments::new(ReplacePolicy::Reject);

        let results: Vec<Result<(), JobError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|i| {
                    let assignments = &assignments;
                    scope.spawn(move || {
                        let mut player = RecordingPlayer::at(Vec3::default());
                        assignments.assign(&mut player, counter_job("p1", &format!("Job {}", i), 3))
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .all(|e| matches!(e, JobError::JobAlreadyAssigned { .. })));
        assert_eq!(assignments.len(), 1);
    }

    #[test]
    fn test_clear() {
        let assignments = JobAssignments::default();
        let mut player = RecordingPlayer::at(Vec3::default());

        assert!(!assignments.clear(&mut player));
        assignments.assign(&mut player, counter_job("p1", "Press", 3)).unwrap();
        assert!(assignments.clear(&mut player));
        assert!(assignments.is_empty());
    }

    /// Re-enters the assignments from inside a presentation callback
    struct ReentrantPlayer<'a> {
        inner: RecordingPlayer,
        assignments: &'a JobAssignments,
        services: Services<'a>,
        nested: Vec<CheckOutcome>,
    }

    impl PlayerContext for ReentrantPlayer<'_> {
        fn player_id(&self) -> &str {
            self.inner.player_id()
        }

        fn position(&self) -> Vec3 {
            self.inner.position()
        }

        fn vehicle(&self) -> Option<VehicleRef> {
            self.inner.vehicle()
        }

        fn item_count(&self, item_id: &str) -> u32 {
            self.inner.item_count(item_id)
        }

        fn publish_state(&mut self, channel: &str, payload: Value) {
            self.inner.publish_state(channel, payload);
        }

        fn notify(&mut self, message: &str) {
            self.inner.notify(message);
        }

        fn play_animation(&mut self, animation: &Animation) {
            self.inner.play_animation(animation);
        }

        fn play_audio(&mut self, sound: &str) {
            self.inner.play_audio(sound);
            let assignments = self.assignments;
            let services = self.services;
            let outcome = assignments
                .check(self, services, &CheckTrigger::Tick)
                .unwrap();
            self.nested.push(outcome);
        }

        fn grant_item(&mut self, item: &ItemDefinition, quantity: u32) {
            self.inner.grant_item(item, quantity);
        }
    }

    #[test]
    fn test_reentrant_check_is_noop() {
        let items = ItemRegistry::new();
        let skills = SkillBook::new::<&str>(&[]);
        let services = Services::new(&items, &skills);
        let assignments = JobAssignments::default();

        let mut player = ReentrantPlayer {
            inner: RecordingPlayer::at(Vec3::default()),
            assignments: &assignments,
            services,
            nested: Vec::new(),
        };
        assignments.assign(&mut player, counter_job("p1", "Press", 3)).unwrap();

        let outcome = assignments
            .check(&mut player, services, &CheckTrigger::Key('e'))
            .unwrap();
        assert_eq!(outcome, CheckOutcome::Pending);
        assert_eq!(player.nested, vec![CheckOutcome::Idle]);
        assert_eq!(
            assignments.current_objective("p1").and_then(|o| o.progress()),
            Some(1)
        );

        // Guard released once the outer check returned
        assignments
            .check(&mut player, services, &CheckTrigger::Key('e'))
            .unwrap();
        assert_eq!(
            assignments.current_objective("p1").and_then(|o| o.progress()),
            Some(2)
        );
        assert_eq!(player.nested.len(), 2);
    }

    #[test]
    fn test_policy_from_config_value() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: ReplacePolicy,
        }
        let wrapper: Wrapper = toml::from_str("policy = \"reject\"").unwrap();
        assert_eq!(wrapper.policy, ReplacePolicy::Reject);
    }
}
