//! Interactive transaction demo.
//!
//! A fixed four-step wizard (transaction type, details, network and fee,
//! review), followed by a timed processing phase and a completion screen.
//! Nothing the visitor sees in the wizard is read back: every field is a
//! fixed placeholder.
//!
//! [`DemoFlow`] is the pure state machine. It never sleeps; entering the
//! processing phase hands out a [`ProcessingTicket`] and the owner is
//! expected to call [`DemoFlow::complete`] with that ticket once its timer
//! fires. Stale or repeated tickets are rejected, so a completion is applied
//! at most once per entry into processing.
//!
//! [`DemoDriver`] (native targets) owns a flow together with the tokio timer.

use serde::{Deserialize, Serialize};
use tracing::debug;

#[cfg(not(target_arch = "wasm32"))]
mod driver;
pub mod view;

#[cfg(not(target_arch = "wasm32"))]
pub use driver::DemoDriver;
pub use view::{
    DemoView, ProgressIndicator, ProgressSlot, SlotStatus, StepContent, FABRICATED_TX_HASH,
    SECTION_BADGE, SECTION_SUBTITLE, SECTION_TITLE,
};

/// Number of wizard steps.
pub const STEP_COUNT: u8 = 4;

/// One of the four wizard steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DemoStep {
    Type,
    Details,
    Network,
    Review,
}

impl DemoStep {
    /// All steps in wizard order.
    pub const ALL: [DemoStep; 4] = [
        DemoStep::Type,
        DemoStep::Details,
        DemoStep::Network,
        DemoStep::Review,
    ];

    /// 1-based position in the wizard.
    pub fn number(self) -> u8 {
        match self {
            Self::Type => 1,
            Self::Details => 2,
            Self::Network => 3,
            Self::Review => 4,
        }
    }

    pub fn from_number(number: u8) -> Option<Self> {
        match number {
            1 => Some(Self::Type),
            2 => Some(Self::Details),
            3 => Some(Self::Network),
            4 => Some(Self::Review),
            _ => None,
        }
    }

    /// Short label under the progress indicator.
    pub fn label(self) -> &'static str {
        match self {
            Self::Type => "Type",
            Self::Details => "Details",
            Self::Network => "Network",
            Self::Review => "Review",
        }
    }

    /// Heading of the step content.
    pub fn title(self) -> &'static str {
        match self {
            Self::Type => "Select Transaction Type",
            Self::Details => "Enter Transaction Details",
            Self::Network => "Select Network & Fees",
            Self::Review => "Review & Confirm",
        }
    }

    pub fn next(self) -> Option<Self> {
        Self::from_number(self.number() + 1)
    }

    pub fn previous(self) -> Option<Self> {
        Self::from_number(self.number() - 1)
    }

    pub fn is_last(self) -> bool {
        self.number() == STEP_COUNT
    }
}

/// Where the wizard currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "step", rename_all = "lowercase")]
pub enum DemoPhase {
    Step(DemoStep),
    Processing,
    Complete,
}

impl Default for DemoPhase {
    fn default() -> Self {
        Self::Step(DemoStep::Type)
    }
}

/// Flat snapshot of the wizard, in the shape a view layer binds to.
///
/// Exactly one of "idle on a step", `is_processing`, `is_complete` holds.
/// While processing or complete, `current_step` stays at the review step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    pub current_step: u8,
    pub is_processing: bool,
    pub is_complete: bool,
}

impl WizardState {
    /// The state every wizard starts in and returns to on reset.
    pub const INITIAL: WizardState = WizardState {
        current_step: 1,
        is_processing: false,
        is_complete: false,
    };
}

impl Default for WizardState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl From<DemoPhase> for WizardState {
    fn from(phase: DemoPhase) -> Self {
        match phase {
            DemoPhase::Step(step) => WizardState {
                current_step: step.number(),
                is_processing: false,
                is_complete: false,
            },
            DemoPhase::Processing => WizardState {
                current_step: STEP_COUNT,
                is_processing: true,
                is_complete: false,
            },
            DemoPhase::Complete => WizardState {
                current_step: STEP_COUNT,
                is_processing: false,
                is_complete: true,
            },
        }
    }
}

/// Token identifying one entry into the processing phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessingTicket(u64);

/// Result of applying a user action or timer to a [`DemoFlow`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Moved between two wizard steps.
    Moved { from: DemoStep, to: DemoStep },
    /// Entered processing; the owner must schedule exactly one completion.
    ProcessingStarted(ProcessingTicket),
    /// Returned to the first step from the completion screen.
    Reset,
    /// The action is not available in the current phase.
    Ignored,
}

impl Transition {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }
}

/// An actionable control in the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Control {
    Back,
    Continue,
    ProcessTransaction,
    Restart,
}

impl Control {
    pub fn label(self) -> &'static str {
        match self {
            Self::Back => "Back",
            Self::Continue => "Continue",
            Self::ProcessTransaction => "Process Transaction",
            Self::Restart => "Try Another Transaction",
        }
    }
}

/// The demo state machine.
#[derive(Debug, Clone, Default)]
pub struct DemoFlow {
    phase: DemoPhase,
    generation: u64,
}

impl DemoFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> DemoPhase {
        self.phase
    }

    pub fn state(&self) -> WizardState {
        self.phase.into()
    }

    /// Continue to the next step, or start processing from the review step.
    pub fn advance(&mut self) -> Transition {
        let DemoPhase::Step(step) = self.phase else {
            return Transition::Ignored;
        };

        match step.next() {
            Some(next) => {
                self.phase = DemoPhase::Step(next);
                debug!(from = step.number(), to = next.number(), "demo step advanced");
                Transition::Moved {
                    from: step,
                    to: next,
                }
            }
            None => {
                self.generation += 1;
                self.phase = DemoPhase::Processing;
                debug!(generation = self.generation, "demo processing started");
                Transition::ProcessingStarted(ProcessingTicket(self.generation))
            }
        }
    }

    /// Go back one step. Not available on the first step.
    pub fn back(&mut self) -> Transition {
        let DemoPhase::Step(step) = self.phase else {
            return Transition::Ignored;
        };
        match step.previous() {
            Some(previous) => {
                self.phase = DemoPhase::Step(previous);
                debug!(from = step.number(), to = previous.number(), "demo step back");
                Transition::Moved {
                    from: step,
                    to: previous,
                }
            }
            None => Transition::Ignored,
        }
    }

    /// Finish processing for `ticket`.
    ///
    /// Returns `false` (and changes nothing) unless the flow is processing
    /// under this very ticket.
    pub fn complete(&mut self, ticket: ProcessingTicket) -> bool {
        if self.phase != DemoPhase::Processing || ticket.0 != self.generation {
            return false;
        }
        self.phase = DemoPhase::Complete;
        debug!(generation = ticket.0, "demo processing complete");
        true
    }

    /// Return to the first step from the completion screen.
    pub fn reset(&mut self) -> Transition {
        if self.phase != DemoPhase::Complete {
            return Transition::Ignored;
        }
        self.phase = DemoPhase::Step(DemoStep::Type);
        Transition::Reset
    }

    pub fn can_go_back(&self) -> bool {
        matches!(self.phase, DemoPhase::Step(step) if step.previous().is_some())
    }

    /// Controls the view renders for the current phase, in display order.
    pub fn controls(&self) -> Vec<Control> {
        match self.phase {
            DemoPhase::Step(step) => {
                let mut controls = Vec::with_capacity(2);
                if self.can_go_back() {
                    controls.push(Control::Back);
                }
                controls.push(if step.is_last() {
                    Control::ProcessTransaction
                } else {
                    Control::Continue
                });
                controls
            }
            DemoPhase::Processing => Vec::new(),
            DemoPhase::Complete => vec![Control::Restart],
        }
    }

    /// Apply a control press. Controls that are not rendered are ignored.
    pub fn press(&mut self, control: Control) -> Transition {
        if !self.controls().contains(&control) {
            return Transition::Ignored;
        }
        match control {
            Control::Back => self.back(),
            Control::Continue | Control::ProcessTransaction => self.advance(),
            Control::Restart => self.reset(),
        }
    }

    /// Build the view model for the current phase.
    pub fn view(&self) -> DemoView {
        DemoView::for_flow(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at_review() -> DemoFlow {
        let mut flow = DemoFlow::new();
        for _ in 0..3 {
            flow.advance();
        }
        flow
    }

    #[test]
    fn test_initial_state() {
        let flow = DemoFlow::new();
        assert_eq!(flow.phase(), DemoPhase::Step(DemoStep::Type));
        assert_eq!(flow.state(), WizardState::INITIAL);
    }

    #[test]
    fn test_advance_through_steps() {
        let mut flow = DemoFlow::new();
        for n in 1..STEP_COUNT {
            let before = flow.state();
            let transition = flow.advance();
            let after = flow.state();

            assert_eq!(
                transition,
                Transition::Moved {
                    from: DemoStep::from_number(n).unwrap(),
                    to: DemoStep::from_number(n + 1).unwrap(),
                }
            );
            assert_eq!(after.current_step, before.current_step + 1);
            assert_eq!(after.is_processing, before.is_processing);
            assert_eq!(after.is_complete, before.is_complete);
        }
    }

    #[test]
    fn test_advance_from_review_starts_processing_once() {
        let mut flow = at_review();
        assert!(matches!(flow.advance(), Transition::ProcessingStarted(_)));
        assert_eq!(flow.phase(), DemoPhase::Processing);
        assert!(flow.state().is_processing);
        assert_eq!(flow.state().current_step, 4);

        assert_eq!(flow.advance(), Transition::Ignored);
        assert_eq!(flow.phase(), DemoPhase::Processing);
    }

    #[test]
    fn test_complete_applies_once() {
        let mut flow = at_review();
        let Transition::ProcessingStarted(ticket) = flow.advance() else {
            panic!("expected processing");
        };
        assert!(flow.complete(ticket));
        assert_eq!(flow.phase(), DemoPhase::Complete);
        assert!(!flow.complete(ticket));
        assert_eq!(flow.phase(), DemoPhase::Complete);
    }

    #[test]
    fn test_stale_ticket_is_rejected() {
        let mut flow = at_review();
        let Transition::ProcessingStarted(first) = flow.advance() else {
            panic!("expected processing");
        };
        assert!(flow.complete(first));
        flow.reset();
        for _ in 0..3 {
            flow.advance();
        }
        let Transition::ProcessingStarted(second) = flow.advance() else {
            panic!("expected processing");
        };

        assert_ne!(first, second);
        assert!(!flow.complete(first));
        assert_eq!(flow.phase(), DemoPhase::Processing);
        assert!(flow.complete(second));
    }

    #[test]
    fn test_complete_needs_processing() {
        let mut flow = DemoFlow::new();
        assert!(!flow.complete(ProcessingTicket(0)));
        assert_eq!(flow.state(), WizardState::INITIAL);
    }

    #[test]
    fn test_back() {
        let mut flow = DemoFlow::new();
        assert_eq!(flow.back(), Transition::Ignored);
        assert!(!flow.can_go_back());

        flow.advance();
        flow.advance();
        flow.advance();
        for expected in [3, 2, 1] {
            flow.back();
            assert_eq!(flow.state().current_step, expected);
        }
        assert_eq!(flow.state(), WizardState::INITIAL);
    }

    #[test]
    fn test_back_is_ignored_while_processing() {
        let mut flow = at_review();
        flow.advance();
        assert_eq!(flow.back(), Transition::Ignored);
        assert_eq!(flow.phase(), DemoPhase::Processing);
    }

    #[test]
    fn test_reset_only_from_complete() {
        let mut flow = at_review();
        assert_eq!(flow.reset(), Transition::Ignored);

        let Transition::ProcessingStarted(ticket) = flow.advance() else {
            panic!("expected processing");
        };
        assert_eq!(flow.reset(), Transition::Ignored);

        flow.complete(ticket);
        assert_eq!(flow.reset(), Transition::Reset);
        assert_eq!(flow.state(), WizardState::INITIAL);
    }

    #[test]
    fn test_controls_per_phase() {
        let mut flow = DemoFlow::new();
        assert_eq!(flow.controls(), vec![Control::Continue]);

        flow.advance();
        assert_eq!(flow.controls(), vec![Control::Back, Control::Continue]);

        flow.advance();
        flow.advance();
        assert_eq!(
            flow.controls(),
            vec![Control::Back, Control::ProcessTransaction]
        );

        let Transition::ProcessingStarted(ticket) = flow.advance() else {
            panic!("expected processing");
        };
        assert!(flow.controls().is_empty());

        flow.complete(ticket);
        assert_eq!(flow.controls(), vec![Control::Restart]);
    }

    #[test]
    fn test_press_ignores_hidden_controls() {
        let mut flow = DemoFlow::new();
        assert_eq!(flow.press(Control::Back), Transition::Ignored);
        assert_eq!(flow.press(Control::ProcessTransaction), Transition::Ignored);
        assert_eq!(flow.press(Control::Restart), Transition::Ignored);
        assert_eq!(flow.state(), WizardState::INITIAL);

        assert!(matches!(
            flow.press(Control::Continue),
            Transition::Moved { .. }
        ));
    }

    #[test]
    fn test_step_numbering() {
        for (index, step) in DemoStep::ALL.iter().enumerate() {
            assert_eq!(step.number() as usize, index + 1);
            assert_eq!(DemoStep::from_number(step.number()), Some(*step));
        }
        assert_eq!(DemoStep::from_number(0), None);
        assert_eq!(DemoStep::from_number(5), None);
        assert_eq!(DemoStep::Type.previous(), None);
        assert_eq!(DemoStep::Review.next(), None);
    }

    #[test]
    fn test_wizard_state_serializes_camel_case() {
        let json = serde_json::to_value(WizardState::INITIAL).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"currentStep": 1, "isProcessing": false, "isComplete": false})
        );
    }
}
