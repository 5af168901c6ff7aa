//! Page shell: which sections are mounted.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::content::anchor_for;
use crate::session::SessionHandle;
use crate::{BlockbankError, Result};

/// Scroll offset, in pixels, past which the header switches style.
pub const SCROLL_THRESHOLD: f64 = 10.0;

pub fn is_scrolled(offset: f64) -> bool {
    offset > SCROLL_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Header,
    Hero,
    Solutions,
    Enterprise,
    Customers,
    Demo,
    Kyc,
    Payments,
    Footer,
}

impl Section {
    /// Page order.
    pub const ALL: [Section; 9] = [
        Self::Header,
        Self::Hero,
        Self::Solutions,
        Self::Enterprise,
        Self::Customers,
        Self::Demo,
        Self::Kyc,
        Self::Payments,
        Self::Footer,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Header => "header",
            Self::Hero => "hero",
            Self::Solutions => "solutions",
            Self::Enterprise => "enterprise",
            Self::Customers => "customers",
            Self::Demo => "demo",
            Self::Kyc => "kyc",
            Self::Payments => "payments",
            Self::Footer => "footer",
        }
    }

    /// Element id the navigation links point at.
    pub fn anchor(self) -> String {
        match self {
            Self::Customers => anchor_for("For Customers"),
            other => other.name().to_string(),
        }
    }

    pub fn requires_account(self) -> bool {
        matches!(self, Self::Kyc | Self::Payments)
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Section {
    type Err = BlockbankError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|section| section.name() == wanted || section.anchor() == wanted)
            .ok_or_else(|| BlockbankError::invalid_data("section", s))
    }
}

/// The page frame. Account sections appear only for a signed-in user.
#[derive(Debug, Clone)]
pub struct PageShell {
    session: SessionHandle,
}

impl PageShell {
    pub fn new(session: SessionHandle) -> Self {
        Self { session }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    /// Mounted sections, in page order.
    pub fn sections(&self) -> Vec<Section> {
        let signed_in = self.session.is_signed_in();
        Section::ALL
            .into_iter()
            .filter(|s| signed_in || !s.requires_account())
            .collect()
    }

    pub fn is_mounted(&self, section: Section) -> bool {
        self.sections().contains(&section)
    }
}
