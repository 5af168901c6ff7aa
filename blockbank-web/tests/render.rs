//! HTML output for the page sections and the wizard views.

use blockbank_lib::demo::{Control, DemoFlow, DemoView, Transition};
use blockbank_lib::notify::NotificationCenter;
use blockbank_lib::payment::{Currency, TransactionRecord};
use blockbank_lib::shell::{PageShell, Section};
use blockbank_lib::{Notification, SessionHandle};
use blockbank_web::render;
use rust_decimal::Decimal;

fn flow_at(advances: usize) -> DemoFlow {
    let mut flow = DemoFlow::new();
    for _ in 0..advances {
        flow.advance();
    }
    flow
}

#[test]
fn test_escape() {
    assert_eq!(
        render::escape(r#"<b>"Tom" & 'Jerry'</b>"#),
        "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
    );
    assert_eq!(render::escape("plain"), "plain");
}

#[test]
fn test_control_ids_round_trip() {
    for control in [
        Control::Back,
        Control::Continue,
        Control::ProcessTransaction,
        Control::Restart,
    ] {
        assert_eq!(render::parse_control(render::control_id(control)), Some(control));
    }
    assert_eq!(render::parse_control("explode"), None);
}

#[test]
fn test_first_step_has_no_back_button() {
    let html = render::wizard(&DemoView::for_flow(&flow_at(0)));
    assert!(html.contains(r#"data-step="1""#));
    assert!(html.contains("Step 1 of 4"));
    assert!(html.contains(r#"data-control="continue""#));
    assert!(!html.contains(r#"data-control="back""#));
    assert!(html.contains(r#"<li class="active"><span>1</span>Type</li>"#));
}

#[test]
fn test_review_step_offers_processing() {
    let html = render::wizard(&DemoView::for_flow(&flow_at(3)));
    assert!(html.contains("Review &amp; Confirm"));
    assert!(html.contains(r#"data-control="back""#));
    assert!(html.contains(r#"data-control="processTransaction""#));
    assert!(html.contains("$252.50"));
    assert!(html.contains(r#"class="done""#));
}

#[test]
fn test_processing_and_complete_views() {
    let mut flow = flow_at(3);
    let Transition::ProcessingStarted(ticket) = flow.advance() else {
        panic!("expected processing to start");
    };
    let html = render::wizard(&DemoView::for_flow(&flow));
    assert!(html.contains("Processing Transaction"));
    assert!(!html.contains("<button"));
    assert!(html.contains(r#"class="progress""#));
    assert!(html.contains("width: 99.99%"));
    assert_eq!(html.matches(r#"<li class="done">"#).count(), 3);

    assert!(flow.complete(ticket));
    let html = render::wizard(&DemoView::for_flow(&flow));
    assert!(html.contains("Transaction Complete!"));
    assert!(html.contains("0x7d8f4e7b15df8c52e6e4b8a19a4fc887392dc165fb96f454a388069e07ff5e9d"));
    assert!(html.contains(r#"data-control="restart""#));
    assert!(!html.contains(r#"class="progress""#));
}

#[test]
fn test_page_signed_out() {
    let shell = PageShell::new(SessionHandle::signed_out());
    let view = DemoView::for_flow(&DemoFlow::new());
    let html = render::page(&shell.sections(), &view, 2024);

    assert!(html.contains(r#"<header id="header">"#));
    assert!(html.contains(r##"<a href="#for-customers">For Customers</a>"##));
    assert!(html.contains(r#"<section id="for-customers">"#));
    assert!(html.contains(r#"<div id="demo-wizard">"#));
    assert!(html.contains("Revolutionizing Banking with <span class=\"highlight\">Blockchain</span> Technology"));
    assert!(html.contains("© 2024 BlockBank. All rights reserved."));
    assert!(!html.contains(r#"id="kyc""#));
    assert!(!html.contains(r#"id="payments""#));
}

#[test]
fn test_account_sections() {
    let html = render::section(Section::Kyc, &DemoView::for_flow(&DemoFlow::new()), 2024);
    assert!(html.contains(r#"<option value="drivers_license">"#));
    assert!(html.contains(r#"accept="image/*""#));

    let html = render::payment_form();
    for currency in Currency::ALL {
        assert!(html.contains(&format!(r#"<option value="{}">"#, currency.code())));
    }
    assert!(html.contains(r#"data-action="connectWallet""#));
}

#[test]
fn test_transactions_list() {
    assert!(render::transactions(&[], "alice").contains("No transactions yet"));

    let sent = TransactionRecord::new("alice", "bob", Decimal::new(15, 1), Currency::Eth);
    let received = TransactionRecord::new("carol", "alice", Decimal::new(2, 0), Currency::Btc);
    let html = render::transactions(&[sent, received], "alice");
    assert!(html.contains("Sent 1.5 ETH"));
    assert!(html.contains("Received 2 BTC"));
    assert!(html.contains(r#"<span class="status pending">Pending</span>"#));
}

#[test]
fn test_notifications_are_escaped() {
    let center = NotificationCenter::default();
    center.push(Notification::error("<script>alert(1)</script>"));
    center.push(Notification::success("Saved"));
    let html = render::notifications(&center.active());
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains(r#"<div class="toast success" data-id="1">Saved</div>"#));
}
