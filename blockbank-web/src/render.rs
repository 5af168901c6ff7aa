//! HTML rendering of the page sections and the demo wizard.
//!
//! Pure string building so it can be tested off the browser. All text that
//! did not come from a literal in this file goes through [`escape`].

use std::fmt::Write;

use blockbank_lib::content::{
    self, NavItem, BRAND, CUSTOMERS_HEADING, CUSTOMER_BENEFITS, CUSTOMER_CTA,
    ENTERPRISE_BENEFITS, ENTERPRISE_CTA, ENTERPRISE_HEADING, ENTERPRISE_IMAGE,
    ENTERPRISE_METRICS, FOOTER, HEADER_CTA, HERO, SOLUTIONS, SOLUTIONS_HEADING,
};
use blockbank_lib::demo::{
    self, Control, DemoView, ProgressIndicator, SlotStatus, StepContent, STEP_COUNT,
};
use blockbank_lib::kyc::DocumentType;
use blockbank_lib::notify::Toast;
use blockbank_lib::payment::{Currency, TransactionRecord, TransactionStatus};
use blockbank_lib::shell::Section;

/// Escape text for use in element content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Value of the `data-control` attribute the page listens on.
pub fn control_id(control: Control) -> &'static str {
    match control {
        Control::Back => "back",
        Control::Continue => "continue",
        Control::ProcessTransaction => "processTransaction",
        Control::Restart => "restart",
    }
}

pub fn parse_control(id: &str) -> Option<Control> {
    [
        Control::Back,
        Control::Continue,
        Control::ProcessTransaction,
        Control::Restart,
    ]
    .into_iter()
    .find(|c| control_id(*c) == id)
}

/// The mounted sections in order. `year` feeds the footer copyright.
pub fn page(sections: &[Section], view: &DemoView, year: i32) -> String {
    sections
        .iter()
        .map(|s| section(*s, view, year))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn section(section: Section, view: &DemoView, year: i32) -> String {
    match section {
        Section::Header => header(),
        Section::Hero => hero(),
        Section::Solutions => solutions(),
        Section::Enterprise => enterprise(),
        Section::Customers => customers(),
        Section::Demo => demo_section(view),
        Section::Kyc => kyc_form(),
        Section::Payments => payment_form(),
        Section::Footer => footer(year),
    }
}

fn nav_links(items: &[NavItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                r#"<a href="{}">{}</a>"#,
                escape(&item.href()),
                escape(item.label)
            )
        })
        .collect()
}

fn heading(out: &mut String, heading: &content::SectionHeading) {
    let _ = write!(
        out,
        r#"<span class="badge">{}</span><h2>{}</h2><p class="subtitle">{}</p>"#,
        escape(heading.badge),
        escape(heading.title),
        escape(heading.subtitle)
    );
}

pub fn header() -> String {
    format!(
        r##"<header id="header"><a class="brand" href="#">{}</a><nav>{}</nav><a class="cta" href="#demo">{}</a></header>"##,
        escape(BRAND),
        nav_links(&content::header_nav()),
        escape(HEADER_CTA)
    )
}

pub fn hero() -> String {
    let mut out = String::from(r#"<section id="hero">"#);
    let _ = write!(
        out,
        r#"<span class="badge">{}</span><h1>{}<span class="highlight">{}</span>{}</h1><p class="subtitle">{}</p>"#,
        escape(HERO.badge),
        escape(HERO.headline_before),
        escape(HERO.highlight),
        escape(HERO.headline_after),
        escape(HERO.subtitle)
    );
    let _ = write!(
        out,
        r##"<div class="actions"><a class="primary" href="#solutions">{}</a><a class="secondary" href="#demo">{}</a></div><ul class="stats">"##,
        escape(HERO.primary_cta),
        escape(HERO.secondary_cta)
    );
    for stat in &HERO.stats {
        let _ = write!(
            out,
            "<li><strong>{}</strong> {}</li>",
            escape(stat.value),
            escape(stat.text)
        );
    }
    out.push_str("</ul></section>");
    out
}

pub fn solutions() -> String {
    let mut out = String::from(r#"<section id="solutions">"#);
    heading(&mut out, &SOLUTIONS_HEADING);
    for solution in &SOLUTIONS {
        let _ = write!(
            out,
            r#"<article class="solution accent-{}"><h3>{}</h3><p>{}</p><ul>"#,
            solution.accent.name(),
            escape(solution.title),
            escape(solution.description)
        );
        for benefit in solution.benefits {
            let _ = write!(out, "<li>{}</li>", escape(benefit));
        }
        out.push_str("</ul></article>");
    }
    out.push_str("</section>");
    out
}

pub fn enterprise() -> String {
    let mut out = String::from(r#"<section id="enterprise">"#);
    heading(&mut out, &ENTERPRISE_HEADING);
    for benefit in &ENTERPRISE_BENEFITS {
        let _ = write!(
            out,
            r#"<article class="benefit"><h3>{}</h3><p>{}</p><p class="stat"><strong>{}</strong> {}</p></article>"#,
            escape(benefit.title),
            escape(benefit.description),
            escape(benefit.stat),
            escape(benefit.stat_text)
        );
    }
    let _ = write!(
        out,
        r#"<img src="{}" alt="{}"><dl class="metrics">"#,
        escape(ENTERPRISE_IMAGE),
        escape(ENTERPRISE_HEADING.title)
    );
    for metric in &ENTERPRISE_METRICS {
        let _ = write!(
            out,
            "<dt>{}</dt><dd>{}</dd>",
            escape(metric.label),
            escape(metric.value)
        );
    }
    let _ = write!(
        out,
        r##"</dl><a class="cta" href="#contact">{}</a></section>"##,
        escape(ENTERPRISE_CTA)
    );
    out
}

pub fn customers() -> String {
    let mut out = format!(r#"<section id="{}">"#, Section::Customers.anchor());
    heading(&mut out, &CUSTOMERS_HEADING);
    for benefit in &CUSTOMER_BENEFITS {
        let _ = write!(
            out,
            r#"<article class="benefit"><img src="{}" alt="{}"><h3>{}</h3><p>{}</p></article>"#,
            escape(benefit.image),
            escape(benefit.title),
            escape(benefit.title),
            escape(benefit.description)
        );
    }
    let _ = write!(
        out,
        r#"<div class="cta"><h3>{}</h3><p>{}</p><button>{}</button></div></section>"#,
        escape(CUSTOMER_CTA.title),
        escape(CUSTOMER_CTA.text),
        escape(CUSTOMER_CTA.button)
    );
    out
}

fn demo_section(view: &DemoView) -> String {
    let mut out = String::from(r#"<section id="demo">"#);
    let _ = write!(
        out,
        r#"<span class="badge">{}</span><h2>{}</h2><p class="subtitle">{}</p>"#,
        escape(demo::SECTION_BADGE),
        escape(demo::SECTION_TITLE),
        escape(demo::SECTION_SUBTITLE)
    );
    let _ = write!(
        out,
        r#"<div id="demo-wizard">{}</div></section>"#,
        wizard(view)
    );
    out
}

fn progress(out: &mut String, progress: &ProgressIndicator) {
    let _ = write!(
        out,
        r#"<div class="progress"><div class="bar" style="width: {:.2}%"></div><ol>"#,
        progress.fill_percent()
    );
    for slot in &progress.slots {
        let status = match slot.status {
            SlotStatus::Done => "done",
            SlotStatus::Active => "active",
            SlotStatus::Pending => "pending",
        };
        // Completed slots show a check mark instead of their number.
        let marker = match slot.status {
            SlotStatus::Done => "&#10003;".to_string(),
            _ => slot.number.to_string(),
        };
        let _ = write!(
            out,
            r#"<li class="{}"><span>{}</span>{}</li>"#,
            status,
            marker,
            escape(slot.label)
        );
    }
    out.push_str("</ol></div>");
}

fn step_content(out: &mut String, content: &StepContent) {
    match content {
        StepContent::TransactionType { options, selected } => {
            out.push_str(r#"<div class="options">"#);
            for (i, option) in options.iter().enumerate() {
                let class = if i == *selected { "option selected" } else { "option" };
                let _ = write!(out, r#"<div class="{}">{}</div>"#, class, escape(option));
            }
            out.push_str("</div>");
        }
        StepContent::Details { fields } => {
            for field in fields {
                let _ = write!(out, "<label>{}", escape(field.label));
                if let Some(prefix) = field.prefix {
                    let _ = write!(out, r#"<span class="prefix">{}</span>"#, escape(prefix));
                }
                let _ = write!(
                    out,
                    r#"<input value="{}" placeholder="{}" readonly></label>"#,
                    escape(field.value),
                    escape(field.placeholder)
                );
            }
        }
        StepContent::Network {
            networks,
            speeds,
            selected_speed,
            fees,
        } => {
            out.push_str("<select>");
            for network in networks {
                let _ = write!(out, "<option>{}</option>", escape(network));
            }
            out.push_str(r#"</select><div class="speeds">"#);
            for (i, speed) in speeds.iter().enumerate() {
                let class = if i == *selected_speed { "speed selected" } else { "speed" };
                let _ = write!(
                    out,
                    r#"<div class="{}">{} <small>{}</small></div>"#,
                    class,
                    escape(speed.name),
                    escape(speed.eta)
                );
            }
            out.push_str(r#"</div><dl class="fees">"#);
            for fee in fees {
                let _ = write!(out, "<dt>{}</dt><dd>{}</dd>", escape(fee.label), escape(fee.value));
            }
            out.push_str("</dl>");
        }
        StepContent::Review { rows, total } => {
            out.push_str(r#"<dl class="review">"#);
            for row in rows {
                let _ = write!(out, "<dt>{}</dt><dd>{}</dd>", escape(row.label), escape(row.value));
            }
            let _ = write!(
                out,
                r#"<dt class="total">{}</dt><dd class="total">{}</dd></dl>"#,
                escape(total.label),
                escape(total.value)
            );
        }
    }
}

fn controls(out: &mut String, controls: &[Control]) {
    out.push_str(r#"<div class="controls">"#);
    for control in controls {
        let _ = write!(
            out,
            r#"<button data-control="{}">{}</button>"#,
            control_id(*control),
            escape(control.label())
        );
    }
    out.push_str("</div>");
}

/// The wizard card for the current view.
pub fn wizard(view: &DemoView) -> String {
    let mut out = String::new();
    match view {
        DemoView::Step {
            step,
            title,
            progress: indicator,
            content,
            controls: buttons,
        } => {
            progress(&mut out, indicator);
            let _ = write!(
                out,
                r#"<div class="step" data-step="{}"><h3>{}</h3><p class="counter">Step {} of {}</p>"#,
                step.number(),
                escape(title),
                step.number(),
                STEP_COUNT
            );
            step_content(&mut out, content);
            controls(&mut out, buttons);
            out.push_str("</div>");
        }
        DemoView::Processing {
            progress: indicator,
            title,
            message,
            explainer,
        } => {
            progress(&mut out, indicator);
            let _ = write!(
                out,
                r#"<div class="processing"><div class="spinner"></div><h3>{}</h3><p>{}</p><p class="explainer">{}</p></div>"#,
                escape(title),
                escape(message),
                escape(explainer)
            );
        }
        DemoView::Complete {
            title,
            message,
            transaction_hash,
            controls: buttons,
        } => {
            let _ = write!(
                out,
                r#"<div class="complete"><h3>{}</h3><p>{}</p><code class="hash">{}</code>"#,
                escape(title),
                escape(message),
                escape(transaction_hash)
            );
            controls(&mut out, buttons);
            out.push_str("</div>");
        }
    }
    out
}

pub fn kyc_form() -> String {
    let mut out = String::from(
        r#"<section id="kyc"><h2>KYC Verification</h2><form id="kyc-form">"#,
    );
    out.push_str(r#"<label>Full Name<input name="fullName" required></label>"#);
    out.push_str(r#"<label>Date of Birth<input name="dateOfBirth" type="date" required></label>"#);
    out.push_str(r#"<label>Address<input name="address" required></label>"#);
    out.push_str(r#"<label>Document Type<select name="documentType">"#);
    for document_type in DocumentType::ALL {
        let _ = write!(
            out,
            r#"<option value="{}">{}</option>"#,
            document_type.wire_name(),
            escape(document_type.label())
        );
    }
    out.push_str("</select></label>");
    out.push_str(r#"<label>Document Number<input name="documentNumber" required></label>"#);
    out.push_str(
        r#"<label>Document Front<input name="documentFront" type="file" accept="image/*" required></label>"#,
    );
    out.push_str(
        r#"<label>Document Back<input name="documentBack" type="file" accept="image/*" required></label>"#,
    );
    out.push_str(r#"<button type="submit">Submit Verification</button></form></section>"#);
    out
}

pub fn payment_form() -> String {
    let mut out = String::from(
        r#"<section id="payments"><h2>Send Payment</h2><button data-action="connectWallet">Connect Wallet</button><form id="payment-form">"#,
    );
    out.push_str(
        r#"<label>Recipient Email<input name="receiverEmail" type="email" required></label>"#,
    );
    out.push_str(r#"<label>Amount<input name="amount" type="number" step="any" required></label>"#);
    out.push_str(r#"<label>Currency<select name="currency">"#);
    for currency in Currency::ALL {
        let _ = write!(
            out,
            r#"<option value="{}">{} ({})</option>"#,
            currency.code(),
            escape(currency.display_name()),
            currency.code()
        );
    }
    out.push_str("</select></label>");
    out.push_str(r#"<button type="submit">Send Payment</button></form>"#);
    out.push_str(r#"<div id="recent-transactions"></div></section>"#);
    out
}

/// "Recent Transactions" list as seen by `user_id`.
pub fn transactions(records: &[TransactionRecord], user_id: &str) -> String {
    if records.is_empty() {
        return r#"<p class="empty">No transactions yet</p>"#.to_string();
    }
    let mut out = String::from(r#"<ul class="transactions">"#);
    for record in records {
        let status = match record.status {
            TransactionStatus::Completed => "completed",
            TransactionStatus::Pending => "pending",
            TransactionStatus::Failed => "failed",
        };
        let date = chrono::DateTime::from_timestamp(record.created_at, 0)
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        let _ = write!(
            out,
            r#"<li><span class="summary">{}</span><time>{}</time><span class="status {}">{}</span></li>"#,
            escape(&record.summary_for(user_id)),
            date,
            status,
            record.status.label()
        );
    }
    out.push_str("</ul>");
    out
}

/// Toast stack, newest last.
pub fn notifications(toasts: &[Toast]) -> String {
    let mut out = String::from(r#"<div class="toasts">"#);
    for toast in toasts {
        let level = serde_json::to_value(toast.notification.level)
            .ok()
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default();
        let _ = write!(
            out,
            r#"<div class="toast {}" data-id="{}">{}</div>"#,
            level,
            toast.id,
            escape(&toast.notification.message)
        );
    }
    out.push_str("</div>");
    out
}

pub fn footer(year: i32) -> String {
    let mut out = format!(
        r#"<footer id="contact"><div class="brand">{}</div><p>{}</p><nav>{}</nav>"#,
        escape(BRAND),
        escape(FOOTER.tagline),
        nav_links(&content::footer_links())
    );
    out.push_str("<address>");
    for line in FOOTER.address.iter().chain(FOOTER.contact.iter()) {
        let _ = write!(out, "<div>{}</div>", escape(line));
    }
    let _ = write!(out, r#"</address><button>{}</button><ul class="legal">"#, escape(FOOTER.contact_cta));
    for link in FOOTER.legal_links {
        let _ = write!(out, r##"<li><a href="#">{}</a></li>"##, escape(link));
    }
    let _ = write!(
        out,
        r#"</ul><p class="copyright">{}</p></footer>"#,
        escape(&FOOTER.copyright(year))
    );
    out
}
