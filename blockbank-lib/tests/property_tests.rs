//! Property-based tests for the demo wizard
//!
//! Drives a `DemoFlow` with arbitrary sequences of presses and timer firings
//! and checks the state invariants after every action.

use blockbank_lib::demo::{
    Control, DemoFlow, DemoPhase, DemoStep, ProcessingTicket, SlotStatus, Transition, WizardState,
};
use proptest::prelude::*;

#[derive(Debug, Clone, Copy)]
enum Action {
    Advance,
    Back,
    Reset,
    Press(Control),
    /// Fire the most recently scheduled timer.
    FireTimer,
    /// Fire a timer that was scheduled earlier and already used.
    FireStaleTimer,
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        3 => Just(Action::Advance),
        2 => Just(Action::Back),
        1 => Just(Action::Reset),
        1 => Just(Action::Press(Control::Back)),
        1 => Just(Action::Press(Control::Continue)),
        1 => Just(Action::Press(Control::ProcessTransaction)),
        1 => Just(Action::Press(Control::Restart)),
        2 => Just(Action::FireTimer),
        1 => Just(Action::FireStaleTimer),
    ]
}

fn check_invariants(state: WizardState) -> Result<(), TestCaseError> {
    prop_assert!((1..=4).contains(&state.current_step));
    prop_assert!(!(state.is_processing && state.is_complete));
    if state.is_processing || state.is_complete {
        prop_assert_eq!(state.current_step, 4);
    }
    Ok(())
}

proptest! {
    /// Invariants hold after any sequence of actions, and a ticket completes
    /// at most once.
    #[test]
    fn test_invariants_hold(actions in prop::collection::vec(action(), 0..60)) {
        let mut flow = DemoFlow::new();
        let mut pending: Option<ProcessingTicket> = None;
        let mut used: Vec<ProcessingTicket> = Vec::new();

        for action in actions {
            let before = flow.phase();
            let transition = match action {
                Action::Advance => flow.advance(),
                Action::Back => flow.back(),
                Action::Reset => flow.reset(),
                Action::Press(control) => flow.press(control),
                Action::FireTimer => {
                    if let Some(ticket) = pending.take() {
                        prop_assert_eq!(before, DemoPhase::Processing);
                        prop_assert!(flow.complete(ticket));
                        used.push(ticket);
                    }
                    Transition::Ignored
                }
                Action::FireStaleTimer => {
                    for ticket in &used {
                        prop_assert!(!flow.complete(*ticket));
                    }
                    prop_assert_eq!(flow.phase(), before);
                    Transition::Ignored
                }
            };

            if let Transition::ProcessingStarted(ticket) = transition {
                prop_assert_eq!(before, DemoPhase::Step(DemoStep::Review));
                prop_assert!(pending.is_none(), "processing scheduled twice");
                pending = Some(ticket);
            }
            if transition == Transition::Reset {
                prop_assert_eq!(before, DemoPhase::Complete);
                prop_assert_eq!(flow.state(), WizardState::INITIAL);
            }
            if flow.phase() == DemoPhase::Complete && before != DemoPhase::Complete {
                prop_assert_eq!(before, DemoPhase::Processing);
            }
            check_invariants(flow.state())?;
        }
    }

    /// Advancing n times from the start lands on step n + 1.
    #[test]
    fn test_advance_counts_steps(n in 0usize..3) {
        let mut flow = DemoFlow::new();
        for _ in 0..n {
            flow.advance();
        }
        let state = flow.state();
        prop_assert_eq!(state.current_step as usize, n + 1);
        prop_assert!(!state.is_processing);
        prop_assert!(!state.is_complete);
    }

    /// Advance then back is a round trip on every step but the last.
    #[test]
    fn test_advance_back_round_trip(start in 1u8..=3) {
        let mut flow = DemoFlow::new();
        for _ in 1..start {
            flow.advance();
        }
        let before = flow.state();
        flow.advance();
        flow.back();
        prop_assert_eq!(flow.state(), before);
    }

    /// The progress indicator marks n-1 slots done on step n.
    #[test]
    fn test_progress_matches_step(n in 1u8..=4) {
        let step = DemoStep::from_number(n).unwrap();
        let progress = blockbank_lib::demo::ProgressIndicator::for_step(step);
        prop_assert_eq!(progress.count(SlotStatus::Done), n as usize - 1);
        prop_assert_eq!(progress.count(SlotStatus::Active), 1);
        prop_assert_eq!(progress.count(SlotStatus::Pending), 4 - n as usize);
    }
}
