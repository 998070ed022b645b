/// When the combined sheet gets rendered
///
/// The app asks `render_request` after every session change. A render is
/// due when all five views are present and no artifact matches them.

use super::data::ImageSet;
use super::session::{Epoch, Session};

/// Where the combined-sheet renderer stands for the current views
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderState {
    #[default]
    Idle,
    Rendering(blake3::Hash),
    /// The last attempt for these inputs failed in this batch; not retried
    /// automatically until a new batch starts
    Failed { inputs: blake3::Hash, epoch: Epoch },
}

impl RenderState {
    pub fn is_rendering(&self) -> bool {
        matches!(self, RenderState::Rendering(_))
    }

    /// Record the outcome of a render that finished for `inputs`
    pub fn finish(&mut self, inputs: blake3::Hash) {
        if *self == RenderState::Rendering(inputs) {
            *self = RenderState::Idle;
        }
    }
}

/// The snapshot to composite and its digest, or `None` if nothing is due
pub fn render_request(session: &Session, render: RenderState) -> Option<(ImageSet, blake3::Hash)> {
    let set = session.snapshot();
    if !set.is_complete() || session.combined().is_some() {
        return None;
    }

    let inputs = set.digest();
    match render {
        RenderState::Rendering(current) if current == inputs => None,
        RenderState::Failed { inputs: failed, epoch }
            if failed == inputs && epoch == session.epoch() =>
        {
            None
        }
        _ => Some((set.clone(), inputs)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::data::fixtures::*;
    use crate::state::data::ViewSlot;
    use crate::state::session::CombinedArtifact;
    use chrono::Utc;

    fn fill(session: &mut Session) {
        let epoch = session.epoch();
        for (slot, payload) in complete_set().iter() {
            session.set_view(epoch, slot, payload.cloned());
        }
    }

    fn accept_render(session: &mut Session) {
        let artifact = CombinedArtifact {
            payload: solid_png(4, 4, RED),
            inputs: session.snapshot().digest(),
            rendered_at: Utc::now(),
        };
        session.accept_combined(artifact);
    }

    #[test]
    fn test_incomplete_set_never_renders() {
        let mut session = Session::new();
        assert!(render_request(&session, RenderState::Idle).is_none());

        fill(&mut session);
        let epoch = session.epoch();
        session.set_view(epoch, ViewSlot::Top, None);

        assert_eq!(session.snapshot().present_count(), 4);
        assert!(render_request(&session, RenderState::Idle).is_none());
        assert!(session.combined().is_none());
    }

    #[test]
    fn test_complete_set_renders() {
        let mut session = Session::new();
        fill(&mut session);

        let (set, inputs) = render_request(&session, RenderState::Idle).unwrap();
        assert!(set.is_complete());
        assert_eq!(inputs, session.snapshot().digest());
    }

    #[test]
    fn test_current_artifact_suppresses_render() {
        let mut session = Session::new();
        fill(&mut session);
        accept_render(&mut session);

        assert!(render_request(&session, RenderState::Idle).is_none());
    }

    #[test]
    fn test_replaced_slot_renders_again() {
        let mut session = Session::new();
        fill(&mut session);
        let before = session.snapshot().digest();
        accept_render(&mut session);

        let epoch = session.epoch();
        session.set_view(epoch, ViewSlot::Right, Some(solid_png(100, 100, BLUE)));

        let (_, inputs) = render_request(&session, RenderState::Idle).unwrap();
        assert_ne!(inputs, before);
        assert_eq!(inputs, session.snapshot().digest());
    }

    #[test]
    fn test_same_inputs_not_rendered_twice() {
        let mut session = Session::new();
        fill(&mut session);
        let inputs = session.snapshot().digest();

        assert!(render_request(&session, RenderState::Rendering(inputs)).is_none());

        // A render for older inputs does not block the new ones
        let older = complete_set().with_view(ViewSlot::Front, None).digest();
        assert!(render_request(&session, RenderState::Rendering(older)).is_some());
    }

    #[test]
    fn test_failed_inputs_not_retried_in_same_batch() {
        let mut session = Session::new();
        fill(&mut session);
        let failed = RenderState::Failed {
            inputs: session.snapshot().digest(),
            epoch: session.epoch(),
        };

        assert!(render_request(&session, failed).is_none());

        // Changing any view lifts the block
        let epoch = session.epoch();
        session.set_view(epoch, ViewSlot::Back, Some(solid_png(100, 100, RED)));
        assert!(render_request(&session, failed).is_some());
    }

    #[test]
    fn test_new_batch_retries_failed_inputs() {
        let mut session = Session::new();
        fill(&mut session);
        let failed = RenderState::Failed {
            inputs: session.snapshot().digest(),
            epoch: session.epoch(),
        };

        // Clearing and loading the very same views again
        session.reset_views();
        fill(&mut session);

        assert_eq!(session.snapshot().digest(), complete_set().digest());
        assert!(render_request(&session, failed).is_some());
    }

    #[test]
    fn test_finish_only_clears_matching_render() {
        let set = complete_set();
        let mut state = RenderState::Rendering(set.digest());

        state.finish(set.with_view(ViewSlot::Top, None).digest());
        assert!(state.is_rendering());

        state.finish(set.digest());
        assert_eq!(state, RenderState::Idle);
    }
}
