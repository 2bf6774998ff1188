//! Job State Machine
//!
//! A job is an ordered queue of objectives owned by one player. The head of the
//! queue is the current objective. Reaching an infinite marker switches the job
//! into looping mode, where finished objectives go back on the tail instead of
//! being dropped.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::JobError;
use crate::protocol::{publish, JobUpdate};

use super::api::{PlayerContext, Services, SkillService};
use super::objective::{CheckTrigger, Objective};
use super::reward::RewardKind;

/// Lifecycle of a job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Working through the queue; finished objectives are dropped
    Active,
    /// Past the infinite marker; finished objectives are recycled
    Looping,
    /// Queue drained. Terminal.
    Complete,
}

/// Result of one `Job::check`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Current objective is not done yet
    Pending,
    /// Current objective finished; a new one is up
    Advanced,
    /// Last objective finished; the job is over
    Completed,
    /// Nothing ran (job complete, or another check was in flight)
    Idle,
}

#[derive(Debug, Clone)]
pub struct Job {
    owner: String,
    name: String,
    objectives: VecDeque<Objective>,
    status: JobStatus,
    started_at: Option<DateTime<Utc>>,
    completed_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn new(owner: &str, name: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            objectives: VecDeque::new(),
            status: JobStatus::Active,
            started_at: None,
            completed_at: None,
        }
    }

    /// Append an objective to the tail of the queue.
    ///
    /// Kinds the engine cannot evaluate are rejected here rather than failing
    /// silently mid-job.
    pub fn add(&mut self, objective: Objective) -> Result<(), JobError> {
        let kind = objective.kind();
        if !kind.is_supported() {
            return Err(JobError::UnsupportedObjectiveKind(kind));
        }
        self.objectives.push_back(objective);
        Ok(())
    }

    /// Check the job is runnable: at least one real objective, and every XP
    /// reward names a skill the skill service knows.
    pub fn validate(&self, skills: &dyn SkillService) -> Result<(), JobError> {
        if self.objectives.iter().all(Objective::is_infinite_marker) {
            return Err(JobError::EmptyJob(self.name.clone()));
        }

        let unknown = self
            .objectives
            .iter()
            .flat_map(|o| o.rewards())
            .find(|r| r.kind == RewardKind::Xp && !skills.has_skill(&r.key));

        match unknown {
            Some(reward) => Err(JobError::UnknownSkill {
                skill: reward.key.clone(),
            }),
            None => Ok(()),
        }
    }

    /// Publish the first objective to the player
    pub fn start(&mut self, player: &mut dyn PlayerContext) {
        self.started_at = Some(Utc::now());
        self.consume_markers();

        match self.objectives.front() {
            Some(objective) => publish(player, JobUpdate::Objective(Some(objective))),
            None => self.finish(player),
        }
    }

    /// Retire the current objective and move to the next one
    pub fn next(&mut self, player: &mut dyn PlayerContext) {
        if self.status == JobStatus::Complete {
            return;
        }

        let Some(mut finished) = self.objectives.pop_front() else {
            self.finish(player);
            return;
        };
        publish(player, JobUpdate::ClearObjective);

        if self.status == JobStatus::Looping {
            finished.reset_for_recycle();
            self.objectives.push_back(finished);
        }

        self.consume_markers();

        match self.objectives.front() {
            Some(objective) => publish(player, JobUpdate::Objective(Some(objective))),
            None => self.finish(player),
        }
    }

    /// Evaluate the current objective and advance when it is done
    pub fn check(
        &mut self,
        player: &mut dyn PlayerContext,
        services: Services<'_>,
        trigger: &CheckTrigger,
    ) -> Result<CheckOutcome, JobError> {
        if self.status == JobStatus::Complete {
            return Ok(CheckOutcome::Idle);
        }

        let Some(objective) = self.objectives.front_mut() else {
            return Ok(CheckOutcome::Idle);
        };

        if !objective.attempt_objective(player, services, trigger)? {
            return Ok(CheckOutcome::Pending);
        }

        self.next(player);

        if self.status == JobStatus::Complete {
            Ok(CheckOutcome::Completed)
        } else {
            Ok(CheckOutcome::Advanced)
        }
    }

    /// Drop infinite markers sitting at the head, entering loop mode
    fn consume_markers(&mut self) {
        while self.objectives.front().is_some_and(Objective::is_infinite_marker) {
            self.objectives.pop_front();
            if self.status != JobStatus::Looping {
                self.status = JobStatus::Looping;
                info!("Job '{}' for {} is now looping", self.name, self.owner);
            }
        }
    }

    fn finish(&mut self, player: &mut dyn PlayerContext) {
        self.status = JobStatus::Complete;
        self.completed_at = Some(Utc::now());

        publish(player, JobUpdate::Objective(None));
        player.notify(&format!("Job complete: {}", self.name));

        info!(
            "{} completed job '{}' in {}s",
            self.owner,
            self.name,
            self.duration_secs().unwrap_or(0)
        );
        debug!("Job '{}' queue drained", self.name);
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn is_looping(&self) -> bool {
        self.status == JobStatus::Looping
    }

    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }

    /// The objective at the head of the queue
    pub fn current(&self) -> Option<&Objective> {
        self.objectives.front()
    }

    pub fn objectives(&self) -> impl Iterator<Item = &Objective> {
        self.objectives.iter()
    }

    pub fn len(&self) -> usize {
        self.objectives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objectives.is_empty()
    }

    /// Seconds since start (or until completion)
    pub fn duration_secs(&self) -> Option<i64> {
        self.started_at.map(|start| {
            let end = self.completed_at.unwrap_or_else(Utc::now);
            (end - start).num_seconds()
        })
    }
}
