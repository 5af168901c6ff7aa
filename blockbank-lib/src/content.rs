//! Static marketing copy.
//!
//! The hero, solutions, enterprise and customer sections plus the header and
//! footer navigation, as typed data. Frontends only decide how to draw it.

use serde::Serialize;

pub const BRAND: &str = "BlockBank";

/// Anchor id for a navigation label: lowercase, whitespace runs become `-`.
///
/// ```
/// use blockbank_lib::content::anchor_for;
/// assert_eq!(anchor_for("For Customers"), "for-customers");
/// assert_eq!(anchor_for("About Us"), "about-us");
/// ```
pub fn anchor_for(label: &str) -> String {
    label
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stat {
    pub value: &'static str,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Hero {
    pub badge: &'static str,
    /// Headline text before and after the highlighted word.
    pub headline_before: &'static str,
    pub highlight: &'static str,
    pub headline_after: &'static str,
    pub subtitle: &'static str,
    pub primary_cta: &'static str,
    pub secondary_cta: &'static str,
    pub stats: [Stat; 3],
}

impl Hero {
    pub fn headline(&self) -> String {
        format!(
            "{}{}{}",
            self.headline_before, self.highlight, self.headline_after
        )
    }
}

pub const HERO: Hero = Hero {
    badge: "The Future of Banking",
    headline_before: "Revolutionizing Banking with ",
    highlight: "Blockchain",
    headline_after: " Technology",
    subtitle: "Transparent, secure, and efficient financial solutions powered by blockchain. \
               Experience the future of banking today.",
    primary_cta: "Explore Solutions",
    secondary_cta: "How It Works",
    stats: [
        Stat {
            value: "85%",
            text: "Reduction in processing time",
        },
        Stat {
            value: "60%",
            text: "Lower transaction costs",
        },
        Stat {
            value: "99.9%",
            text: "Security and reliability",
        },
    ],
};

/// Heading block shared by the content sections.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectionHeading {
    pub badge: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

/// Accent used for a solution card's gradient bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Accent {
    Blue,
    Teal,
    Indigo,
    Green,
    Amber,
}

impl Accent {
    pub fn name(self) -> &'static str {
        match self {
            Self::Blue => "blue",
            Self::Teal => "teal",
            Self::Indigo => "indigo",
            Self::Green => "green",
            Self::Amber => "amber",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Solution {
    pub title: &'static str,
    pub description: &'static str,
    pub benefits: [&'static str; 3],
    pub accent: Accent,
}

pub const SOLUTIONS_HEADING: SectionHeading = SectionHeading {
    badge: "Blockchain Solutions",
    title: "Transforming Banking Functions",
    subtitle: "Our blockchain technology revolutionizes core banking operations, delivering \
               unprecedented efficiency, security, and transparency.",
};

pub const SOLUTIONS: [Solution; 5] = [
    Solution {
        title: "Payments",
        description: "Instant cross-border transactions with minimal fees and real-time \
                      settlement, powered by blockchain.",
        benefits: [
            "Instant settlements",
            "Lower transaction fees",
            "Cross-border efficiency",
        ],
        accent: Accent::Blue,
    },
    Solution {
        title: "KYC & Identity",
        description: "Secure, decentralized identity verification that reduces onboarding \
                      friction and enhances security.",
        benefits: ["Single verification", "User-controlled data", "Reduced fraud"],
        accent: Accent::Teal,
    },
    Solution {
        title: "Trade Finance",
        description: "Transparent supply chain financing with smart contracts automating \
                      approvals and payments.",
        benefits: [
            "Automated verification",
            "Real-time tracking",
            "Reduced paperwork",
        ],
        accent: Accent::Indigo,
    },
    Solution {
        title: "Lending",
        description: "Decentralized lending platforms with peer-to-peer options and smart \
                      contract-enforced terms.",
        benefits: [
            "Automated approvals",
            "Transparent terms",
            "Reduced intermediaries",
        ],
        accent: Accent::Green,
    },
    Solution {
        title: "Tokenization",
        description: "Convert real-world assets into digital tokens for fractional ownership \
                      and improved liquidity.",
        benefits: [
            "Asset fractioning",
            "Increased liquidity",
            "Expanded access",
        ],
        accent: Accent::Amber,
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnterpriseBenefit {
    pub title: &'static str,
    pub description: &'static str,
    pub stat: &'static str,
    pub stat_text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnterpriseMetric {
    pub label: &'static str,
    pub value: &'static str,
}

pub const ENTERPRISE_HEADING: SectionHeading = SectionHeading {
    badge: "Enterprise Advantages",
    title: "Transform Your Banking Infrastructure",
    subtitle: "Our blockchain solutions deliver measurable business impact through streamlined \
               operations, enhanced security, and significant cost savings.",
};

pub const ENTERPRISE_BENEFITS: [EnterpriseBenefit; 4] = [
    EnterpriseBenefit {
        title: "Operational Efficiency",
        description: "Automate processes, eliminate redundancies, and reduce manual \
                      reconciliation with smart contracts.",
        stat: "85%",
        stat_text: "faster processes",
    },
    EnterpriseBenefit {
        title: "Cost Reduction",
        description: "Lower transaction fees, eliminate intermediaries, and reduce overhead \
                      costs across operations.",
        stat: "60%",
        stat_text: "cost savings",
    },
    EnterpriseBenefit {
        title: "Security & Trust",
        description: "Tamper-proof ledger provides immutable records and enhanced protection \
                      against fraud.",
        stat: "99.9%",
        stat_text: "data integrity",
    },
    EnterpriseBenefit {
        title: "Regulatory Compliance",
        description: "Real-time audit trails and transparent records simplify compliance and \
                      reporting.",
        stat: "70%",
        stat_text: "audit time reduced",
    },
];

pub const ENTERPRISE_METRICS: [EnterpriseMetric; 4] = [
    EnterpriseMetric {
        label: "Transaction Speed",
        value: "2-3 sec",
    },
    EnterpriseMetric {
        label: "Network Uptime",
        value: "99.99%",
    },
    EnterpriseMetric {
        label: "Processing Cost",
        value: "-74%",
    },
    EnterpriseMetric {
        label: "Implementation",
        value: "4-6 weeks",
    },
];

pub const ENTERPRISE_IMAGE: &str = "https://images.pexels.com/photos/7567444/pexels-photo-7567444.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2";
pub const ENTERPRISE_CTA: &str = "Schedule Enterprise Demo";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerBenefit {
    pub title: &'static str,
    pub description: &'static str,
    pub image: &'static str,
}

pub const CUSTOMERS_HEADING: SectionHeading = SectionHeading {
    badge: "Customer Benefits",
    title: "Banking That Works For You",
    subtitle: "Experience the advantages of blockchain-powered banking with faster \
               transactions, greater transparency, and enhanced control over your financial \
               data.",
};

pub const CUSTOMER_BENEFITS: [CustomerBenefit; 4] = [
    CustomerBenefit {
        title: "Faster, Cheaper Transactions",
        description: "Send money across borders in seconds, not days, with minimal fees.",
        image: "https://images.pexels.com/photos/6694543/pexels-photo-6694543.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    CustomerBenefit {
        title: "Transparent Tracking",
        description: "Monitor your transactions in real-time on the immutable blockchain ledger.",
        image: "https://images.pexels.com/photos/7876439/pexels-photo-7876439.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    CustomerBenefit {
        title: "Data Control & Ownership",
        description: "Take back control of your financial data with secure, selective sharing.",
        image: "https://images.pexels.com/photos/8370752/pexels-photo-8370752.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
    CustomerBenefit {
        title: "Inclusive Access",
        description: "Access financial services without traditional banking requirements.",
        image: "https://images.pexels.com/photos/6693655/pexels-photo-6693655.jpeg?auto=compress&cs=tinysrgb&w=1260&h=750&dpr=2",
    },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallToAction {
    pub title: &'static str,
    pub text: &'static str,
    pub button: &'static str,
}

pub const CUSTOMER_CTA: CallToAction = CallToAction {
    title: "Ready to experience the future of banking?",
    text: "Try our blockchain banking platform today and discover a new level of financial \
           freedom, security, and convenience.",
    button: "Get Started",
};

/// A navigation entry; the anchor is derived from the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub label: &'static str,
    pub anchor: String,
}

impl NavItem {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            anchor: anchor_for(label),
        }
    }

    pub fn href(&self) -> String {
        format!("#{}", self.anchor)
    }
}

const HEADER_LINKS: [&str; 5] = ["Solutions", "Enterprise", "For Customers", "About", "Contact"];

const FOOTER_LINKS: [&str; 6] = [
    "Solutions",
    "Enterprise",
    "For Customers",
    "Demo",
    "About Us",
    "Contact",
];

pub const HEADER_CTA: &str = "Try Demo";

pub fn header_nav() -> Vec<NavItem> {
    HEADER_LINKS.iter().copied().map(NavItem::new).collect()
}

pub fn footer_links() -> Vec<NavItem> {
    FOOTER_LINKS.iter().copied().map(NavItem::new).collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footer {
    pub tagline: &'static str,
    pub address: [&'static str; 2],
    pub contact: [&'static str; 2],
    pub contact_cta: &'static str,
    pub legal_links: [&'static str; 3],
}

impl Footer {
    pub fn copyright(&self, year: i32) -> String {
        format!("\u{a9} {} {}. All rights reserved.", year, BRAND)
    }
}

pub const FOOTER: Footer = Footer {
    tagline: "Transforming banking with blockchain technology. Delivering transparent, secure, \
              and efficient financial solutions for enterprises and customers.",
    address: ["123 Blockchain Avenue", "San Francisco, CA 94103"],
    contact: ["info@blockbank.com", "+1 (555) 123-4567"],
    contact_cta: "Contact Sales",
    legal_links: ["Privacy Policy", "Terms of Service", "Legal"],
};
