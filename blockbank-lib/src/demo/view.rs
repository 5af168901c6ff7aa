//! View model for the demo wizard.
//!
//! Frontends render a [`DemoView`]; none of them decide for themselves what
//! is shown in which phase.

use serde::Serialize;

use super::{Control, DemoFlow, DemoPhase, DemoStep, STEP_COUNT};

/// Transaction hash shown on the completion screen. Always the same value.
pub const FABRICATED_TX_HASH: &str =
    "0x7d8f4e7b15df8c52e6e4b8a19a4fc887392dc165fb96f454a388069e07ff5e9d";

/// Width of one progress segment, in percent.
const SEGMENT_PERCENT: f32 = 33.33;

/// Status of one slot in the progress indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotStatus {
    Done,
    Active,
    Pending,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSlot {
    pub number: u8,
    pub label: &'static str,
    pub status: SlotStatus,
}

/// Step indicator shown above every wizard step.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressIndicator {
    pub slots: Vec<ProgressSlot>,
}

impl ProgressIndicator {
    pub fn for_step(current: DemoStep) -> Self {
        let slots = DemoStep::ALL
            .iter()
            .map(|step| {
                let status = match step.number().cmp(&current.number()) {
                    std::cmp::Ordering::Less => SlotStatus::Done,
                    std::cmp::Ordering::Equal => SlotStatus::Active,
                    std::cmp::Ordering::Greater => SlotStatus::Pending,
                };
                ProgressSlot {
                    number: step.number(),
                    label: step.label(),
                    status,
                }
            })
            .collect();
        Self { slots }
    }

    pub fn count(&self, status: SlotStatus) -> usize {
        self.slots.iter().filter(|s| s.status == status).count()
    }

    /// Width of the progress bar fill, 0 on the first step.
    pub fn fill_percent(&self) -> f32 {
        let done = self.count(SlotStatus::Done) as f32;
        done * SEGMENT_PERCENT
    }
}

/// A labelled input with its fixed default value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaceholderField {
    pub label: &'static str,
    pub value: &'static str,
    pub placeholder: &'static str,
    /// Unit shown in front of the value (e.g. "USD").
    pub prefix: Option<&'static str>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SpeedOption {
    pub name: &'static str,
    pub eta: &'static str,
}

/// Label/value line in a summary box.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: &'static str,
}

const fn row(label: &'static str, value: &'static str) -> SummaryRow {
    SummaryRow { label, value }
}

pub const TRANSACTION_TYPES: [&str; 4] = [
    "Cross-Border Payment",
    "Identity Verification",
    "Smart Contract",
    "Asset Tokenization",
];

pub const NETWORKS: [&str; 4] = ["Ethereum", "Solana", "Ripple", "Hyperledger"];

pub const SPEEDS: [SpeedOption; 3] = [
    SpeedOption {
        name: "Standard",
        eta: "~30 min",
    },
    SpeedOption {
        name: "Fast",
        eta: "~5 min",
    },
    SpeedOption {
        name: "Instant",
        eta: "~30 sec",
    },
];

const DETAIL_FIELDS: [PlaceholderField; 3] = [
    PlaceholderField {
        label: "Recipient Address",
        value: "0x742d35Cc6634C0532925a3b844Bc454e4438f44e",
        placeholder: "0x...",
        prefix: None,
    },
    PlaceholderField {
        label: "Amount",
        value: "250.00",
        placeholder: "0.00",
        prefix: Some("USD"),
    },
    PlaceholderField {
        label: "Transaction Note",
        value: "International payment for services",
        placeholder: "Add a note...",
        prefix: None,
    },
];

const FEE_ROWS: [SummaryRow; 2] = [row("Network Fee", "$2.50"), row("Total Amount", "$252.50")];

const REVIEW_ROWS: [SummaryRow; 6] = [
    row("Transaction Type", "Cross-Border Payment"),
    row("Recipient", "0x742d...f44e"),
    row("Amount", "$250.00"),
    row("Network", "Ethereum"),
    row("Speed", "Fast (~5 min)"),
    row("Fee", "$2.50"),
];

const REVIEW_TOTAL: SummaryRow = row("Total", "$252.50");

/// Fixed content of a wizard step.
///
/// These are decoration: the values shown on the review step do not come
/// from the earlier steps, and nothing is read back on transition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum StepContent {
    TransactionType {
        options: Vec<&'static str>,
        selected: usize,
    },
    Details {
        fields: Vec<PlaceholderField>,
    },
    Network {
        networks: Vec<&'static str>,
        speeds: Vec<SpeedOption>,
        selected_speed: usize,
        fees: Vec<SummaryRow>,
    },
    Review {
        rows: Vec<SummaryRow>,
        total: SummaryRow,
    },
}

impl StepContent {
    pub fn for_step(step: DemoStep) -> Self {
        match step {
            DemoStep::Type => Self::TransactionType {
                options: TRANSACTION_TYPES.to_vec(),
                selected: 0,
            },
            DemoStep::Details => Self::Details {
                fields: DETAIL_FIELDS.to_vec(),
            },
            DemoStep::Network => Self::Network {
                networks: NETWORKS.to_vec(),
                speeds: SPEEDS.to_vec(),
                selected_speed: 1,
                fees: FEE_ROWS.to_vec(),
            },
            DemoStep::Review => Self::Review {
                rows: REVIEW_ROWS.to_vec(),
                total: REVIEW_TOTAL,
            },
        }
    }
}

/// Everything a frontend needs to draw the wizard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum DemoView {
    Step {
        step: DemoStep,
        title: &'static str,
        progress: ProgressIndicator,
        content: StepContent,
        controls: Vec<Control>,
    },
    /// Busy indicator under a full progress bar; no controls are rendered.
    Processing {
        progress: ProgressIndicator,
        title: &'static str,
        message: &'static str,
        explainer: &'static str,
    },
    Complete {
        title: &'static str,
        message: &'static str,
        transaction_hash: &'static str,
        controls: Vec<Control>,
    },
}

impl DemoView {
    pub fn for_flow(flow: &DemoFlow) -> Self {
        match flow.phase() {
            DemoPhase::Step(step) => Self::Step {
                step,
                title: step.title(),
                progress: ProgressIndicator::for_step(step),
                content: StepContent::for_step(step),
                controls: flow.controls(),
            },
            DemoPhase::Processing => Self::Processing {
                progress: ProgressIndicator::for_step(DemoStep::Review),
                title: "Processing Transaction",
                message: "Your transaction is being processed and verified on the blockchain. \
                          This typically takes a few minutes.",
                explainer: "Your transaction is being validated by network nodes, and once \
                            consensus is reached, it will be added to the blockchain as a \
                            permanent record.",
            },
            DemoPhase::Complete => Self::Complete {
                title: "Transaction Complete!",
                message: "Your blockchain transaction has been successfully processed and \
                          verified on the network.",
                transaction_hash: FABRICATED_TX_HASH,
                controls: flow.controls(),
            },
        }
    }

    /// Controls rendered in this view.
    pub fn controls(&self) -> &[Control] {
        match self {
            Self::Step { controls, .. } | Self::Complete { controls, .. } => controls.as_slice(),
            Self::Processing { .. } => &[],
        }
    }

    /// The progress indicator is hidden once the wizard is complete.
    pub fn progress(&self) -> Option<&ProgressIndicator> {
        match self {
            Self::Step { progress, .. } | Self::Processing { progress, .. } => Some(progress),
            Self::Complete { .. } => None,
        }
    }
}

/// Section heading above the wizard card.
pub const SECTION_BADGE: &str = "Interactive Demo";
pub const SECTION_TITLE: &str = "Experience Blockchain Banking";
pub const SECTION_SUBTITLE: &str = "Try our interactive demo to see how blockchain transactions \
     work in real-time. Follow the steps to simulate a cross-border payment.";

const _: () = assert!(STEP_COUNT as usize == DemoStep::ALL.len());

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::Transition;

    #[test]
    fn test_progress_slots_for_each_step() {
        for step in DemoStep::ALL {
            let progress = ProgressIndicator::for_step(step);
            let n = step.number() as usize;
            assert_eq!(progress.count(SlotStatus::Done), n - 1);
            assert_eq!(progress.count(SlotStatus::Active), 1);
            assert_eq!(progress.count(SlotStatus::Pending), 4 - n);
            assert_eq!(progress.slots[n - 1].status, SlotStatus::Active);
        }
    }

    #[test]
    fn test_fill_percent() {
        assert_eq!(ProgressIndicator::for_step(DemoStep::Type).fill_percent(), 0.0);
        let review = ProgressIndicator::for_step(DemoStep::Review).fill_percent();
        assert!((review - 99.99).abs() < 0.01);
    }

    #[test]
    fn test_review_content_is_fixed() {
        let StepContent::Review { rows, total } = StepContent::for_step(DemoStep::Review) else {
            panic!("review content expected");
        };
        assert_eq!(rows.len(), 6);
        assert_eq!(total.value, "$252.50");
        assert!(rows.iter().any(|r| r.value == "Fast (~5 min)"));
    }

    #[test]
    fn test_processing_view_keeps_progress_without_controls() {
        let mut flow = DemoFlow::new();
        for _ in 0..4 {
            flow.advance();
        }
        let view = flow.view();
        assert!(matches!(view, DemoView::Processing { .. }));
        assert!(view.controls().is_empty());

        let progress = view.progress().expect("progress shown while processing");
        assert_eq!(progress.count(SlotStatus::Done), 3);
        assert_eq!(progress.slots[3].status, SlotStatus::Active);
        assert!((progress.fill_percent() - 99.99).abs() < 0.01);
    }

    #[test]
    fn test_complete_view_shows_fabricated_hash() {
        let mut flow = DemoFlow::new();
        for _ in 0..3 {
            flow.advance();
        }
        let Transition::ProcessingStarted(ticket) = flow.advance() else {
            panic!("expected processing");
        };
        flow.complete(ticket);

        let DemoView::Complete {
            transaction_hash,
            controls,
            ..
        } = flow.view()
        else {
            panic!("complete view expected");
        };
        assert_eq!(transaction_hash, FABRICATED_TX_HASH);
        assert_eq!(controls, vec![Control::Restart]);
        assert!(flow.view().progress().is_none());
    }
}
