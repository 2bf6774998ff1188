//! Per-kind progress strategies.
//!
//! Capture, hold and mash objectives share one counter strategy; they only
//! differ in how often the input layer triggers a check.

use crate::error::JobError;

use super::api::PlayerContext;
use super::flags::ObjectiveKind;
use super::objective::Objective;

/// Dispatch to the strategy for the objective's kind.
pub(super) fn evaluate_kind(
    objective: &mut Objective,
    player: &mut dyn PlayerContext,
) -> Result<bool, JobError> {
    match objective.kind {
        ObjectiveKind::GoToPoint => Ok(true),
        ObjectiveKind::CaptureZone | ObjectiveKind::HoldInteract | ObjectiveKind::MashInteract => {
            Ok(advance_counter(objective, player))
        }
        kind @ (ObjectiveKind::TargetPlayer
        | ObjectiveKind::OrderedKeys
        | ObjectiveKind::InfiniteMarker) => Err(JobError::UnsupportedObjectiveKind(kind)),
    }
}

/// Add one step of progress. Plays presentation and reports not-done until the
/// counter reaches `max_progress`.
pub(super) fn advance_counter(objective: &mut Objective, player: &mut dyn PlayerContext) -> bool {
    let progress = objective.progress.unwrap_or(0) + 1;
    objective.progress = Some(progress);

    if progress < objective.max_progress {
        objective.present(player);
        return false;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::flags::ModifierFlags;
    use crate::job::testing::RecordingPlayer;
    use crate::position::Vec3;
    use crate::words::WordList;

    fn objective(kind: ObjectiveKind, max: u32) -> Objective {
        let mut objective = Objective::new(kind, ModifierFlags::NONE, &WordList::empty()).unwrap();
        objective.set_max_progress(max).set_every_sound("beep");
        objective
    }

    #[test]
    fn test_counter_kinds_behave_the_same() {
        for kind in [
            ObjectiveKind::CaptureZone,
            ObjectiveKind::HoldInteract,
            ObjectiveKind::MashInteract,
        ] {
            let mut obj = objective(kind, 3);
            let mut player = RecordingPlayer::at(Vec3::default());

            assert!(!evaluate_kind(&mut obj, &mut player).unwrap());
            assert!(!evaluate_kind(&mut obj, &mut player).unwrap());
            assert!(evaluate_kind(&mut obj, &mut player).unwrap());
            assert_eq!(obj.progress(), Some(3));
            assert_eq!(player.audio.len(), 2, "{:?}", kind);
        }
    }

    #[test]
    fn test_counter_resumes_from_tracked_zero() {
        let mut obj = objective(ObjectiveKind::HoldInteract, 2);
        obj.progress = Some(0);
        let mut player = RecordingPlayer::at(Vec3::default());

        assert!(!advance_counter(&mut obj, &mut player));
        assert!(advance_counter(&mut obj, &mut player));
    }

    #[test]
    fn test_single_step_objective() {
        let mut obj = objective(ObjectiveKind::MashInteract, 1);
        let mut player = RecordingPlayer::at(Vec3::default());

        assert!(advance_counter(&mut obj, &mut player));
        assert!(player.audio.is_empty());
    }

    #[test]
    fn test_go_to_point_completes_immediately() {
        let mut obj = objective(ObjectiveKind::GoToPoint, 5);
        let mut player = RecordingPlayer::at(Vec3::default());
        assert!(evaluate_kind(&mut obj, &mut player).unwrap());
        assert_eq!(obj.progress(), None);
    }

    #[test]
    fn test_stub_kinds_are_errors() {
        let mut marker = Objective::infinite_marker();
        let mut player = RecordingPlayer::at(Vec3::default());
        assert!(matches!(
            evaluate_kind(&mut marker, &mut player),
            Err(JobError::UnsupportedObjectiveKind(ObjectiveKind::InfiniteMarker))
        ));

        let mut target = objective(ObjectiveKind::TargetPlayer, 1);
        assert!(matches!(
            evaluate_kind(&mut target, &mut player),
            Err(JobError::UnsupportedObjectiveKind(ObjectiveKind::TargetPlayer))
        ));
    }
}
