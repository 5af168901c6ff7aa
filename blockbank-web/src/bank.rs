//! Account sections in the browser.
//!
//! Sign-in itself belongs to whatever identity provider the host page uses;
//! the page hands the signed-in user over with `setUser`. Records and
//! uploaded documents live in memory for the lifetime of the page.

use std::cell::RefCell;
use std::sync::Arc;

use blockbank_lib::kyc::{Document, KycForm, KycService};
use blockbank_lib::notify::NotificationCenter;
use blockbank_lib::payment::{Currency, PaymentForm, PaymentService};
use blockbank_lib::session::{AuthMethod, SocialProvider, User};
use blockbank_lib::shell::{self, PageShell};
use blockbank_lib::storage::{InMemoryStore, Profile, RecordStore};
use blockbank_lib::{Notification, SessionHandle, SiteConfig};
use chrono::NaiveDate;
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::delay::TimeoutDelay;
use crate::wallet::InjectedWallet;
use crate::wizard::DemoWizard;
use crate::{render, utils};

/// The signed-in user as reported by the host page.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct HostUser {
    id: String,
    email: String,
    #[serde(default)]
    display_name: Option<String>,
    /// "google" / "github" for social sign-in.
    #[serde(default)]
    provider: Option<String>,
}

impl From<HostUser> for User {
    fn from(host: HostUser) -> Self {
        let provider = host
            .provider
            .and_then(|p| p.parse::<SocialProvider>().ok())
            .map(AuthMethod::Social)
            .unwrap_or(AuthMethod::Password);
        User {
            id: host.id,
            email: blockbank_lib::session::normalize_email(&host.email),
            display_name: host.display_name,
            provider,
            created_at: (js_sys::Date::now() / 1000.0) as i64,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct KycDetails {
    full_name: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    date_of_birth: String,
    address: String,
    document_type: String,
    document_number: String,
}

/// Page state for the signed-in sections
#[wasm_bindgen]
pub struct BrowserBank {
    session: RefCell<SessionHandle>,
    store: Arc<InMemoryStore>,
    payments: PaymentService<InMemoryStore, TimeoutDelay>,
    kyc: KycService<InMemoryStore, InMemoryStore>,
    notifications: NotificationCenter,
}

#[wasm_bindgen]
impl BrowserBank {
    /// Create the page state, optionally from a JSON site configuration
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<BrowserBank, JsValue> {
        let config = match config_json {
            Some(json) => {
                SiteConfig::from_json(&json).map_err(|e| utils::js_error(&e.to_string()))?
            }
            None => SiteConfig::default(),
        };
        let store = Arc::new(InMemoryStore::new());
        Ok(BrowserBank {
            session: RefCell::new(SessionHandle::signed_out()),
            payments: PaymentService::new(store.clone(), TimeoutDelay, config.clone()),
            kyc: KycService::new(store.clone(), store.clone(), &config),
            store,
            notifications: NotificationCenter::default(),
        })
    }

    /// Accept the user signed in by the host page
    #[wasm_bindgen(js_name = setUser)]
    pub fn set_user(&self, user: JsValue) -> Result<(), JsValue> {
        let host: HostUser = serde_wasm_bindgen::from_value(user)
            .map_err(|e| utils::js_error(&format!("Invalid user: {}", e)))?;
        let user = User::from(host);
        utils::log(&format!("signed in as {}", user.label()));
        *self.session.borrow_mut() = SessionHandle::signed_in(user);
        Ok(())
    }

    #[wasm_bindgen(js_name = clearUser)]
    pub fn clear_user(&self) {
        *self.session.borrow_mut() = SessionHandle::signed_out();
    }

    #[wasm_bindgen(js_name = isSignedIn)]
    pub fn is_signed_in(&self) -> bool {
        self.session.borrow().is_signed_in()
    }

    /// Names of the mounted sections, in page order
    pub fn sections(&self) -> Vec<JsValue> {
        PageShell::new(self.session())
            .sections()
            .into_iter()
            .map(|s| JsValue::from_str(s.name()))
            .collect()
    }

    /// Full page HTML with the wizard in its current state
    #[wasm_bindgen(js_name = renderPage)]
    pub fn render_page(&self, wizard: &DemoWizard) -> String {
        let sections = PageShell::new(self.session()).sections();
        render::page(&sections, &wizard.current_view(), utils::current_year())
    }

    /// Register someone payments can be sent to
    #[wasm_bindgen(js_name = addProfile)]
    pub async fn add_profile(&self, id: String, email: String) -> Result<(), JsValue> {
        self.store
            .insert_profile(Profile::new(id, &email))
            .await
            .map(|_| ())
            .map_err(|e| utils::js_error(&e.to_string()))
    }

    /// Simulated payment; resolves to a notification object
    #[wasm_bindgen(js_name = sendPayment)]
    pub async fn send_payment(
        &self,
        receiver_email: String,
        amount: String,
        currency: String,
    ) -> Result<JsValue, JsValue> {
        let note = match currency.parse::<Currency>() {
            Ok(currency) => {
                let form = PaymentForm::new(receiver_email, amount, currency);
                self.payments.send(&self.session(), &form).await
            }
            Err(_) => Notification::error("Please select a currency"),
        };
        self.publish(note)
    }

    /// ETH transfer through the injected wallet
    #[wasm_bindgen(js_name = sendWithWallet)]
    pub async fn send_with_wallet(
        &self,
        receiver_email: String,
        amount: String,
        receiver_address: String,
    ) -> Result<JsValue, JsValue> {
        let note = match InjectedWallet::detect() {
            Some(wallet) => {
                let form = PaymentForm::new(receiver_email, amount, Currency::Eth);
                self.payments
                    .send_with_wallet(&self.session(), &form, &wallet, &receiver_address)
                    .await
            }
            None => Notification::error("Please install MetaMask to connect your wallet"),
        };
        self.publish(note)
    }

    #[wasm_bindgen(js_name = connectWallet)]
    pub async fn connect_wallet(&self) -> Result<JsValue, JsValue> {
        let wallet = InjectedWallet::detect();
        let note = self.payments.connect_wallet(wallet.as_ref()).await;
        self.publish(note)
    }

    /// Submit the KYC form. `details` holds the text fields.
    #[wasm_bindgen(js_name = submitKyc)]
    pub async fn submit_kyc(
        &self,
        details: JsValue,
        front_name: String,
        front: Vec<u8>,
        back_name: String,
        back: Vec<u8>,
    ) -> Result<JsValue, JsValue> {
        let details: KycDetails = serde_wasm_bindgen::from_value(details)
            .map_err(|e| utils::js_error(&format!("Invalid KYC details: {}", e)))?;
        let document_type = match details.document_type.parse() {
            Ok(document_type) => document_type,
            Err(e) => return self.publish(Notification::from(&e)),
        };
        let form = KycForm {
            full_name: details.full_name,
            date_of_birth: NaiveDate::parse_from_str(details.date_of_birth.trim(), "%Y-%m-%d")
                .ok(),
            address: details.address,
            document_type,
            document_number: details.document_number,
            document_front: Some(Document::from_file_name(front_name, front)),
            document_back: Some(Document::from_file_name(back_name, back)),
        };
        let note = self.kyc.submit(&self.session(), &form).await;
        self.publish(note)
    }

    #[wasm_bindgen(js_name = recentTransactions)]
    pub async fn recent_transactions(&self) -> Result<JsValue, JsValue> {
        let records = self.payments.recent_transactions(&self.session()).await;
        utils::to_js(&records)
    }

    #[wasm_bindgen(js_name = renderTransactions)]
    pub async fn render_transactions(&self) -> String {
        let session = self.session();
        let records = self.payments.recent_transactions(&session).await;
        let user_id = session.current_user().map(|u| u.id).unwrap_or_default();
        render::transactions(&records, &user_id)
    }

    #[wasm_bindgen(js_name = renderNotifications)]
    pub fn render_notifications(&self) -> String {
        render::notifications(&self.notifications.active())
    }

    /// Dismiss a toast by its `data-id`
    pub fn dismiss(&self, id: u32) -> bool {
        self.notifications.dismiss(u64::from(id))
    }

    #[wasm_bindgen(js_name = isLoading)]
    pub fn is_loading(&self) -> bool {
        self.payments.is_loading() || self.kyc.is_loading()
    }
}

impl BrowserBank {
    fn session(&self) -> SessionHandle {
        self.session.borrow().clone()
    }

    fn publish(&self, note: Notification) -> Result<JsValue, JsValue> {
        let value = utils::to_js(&note)?;
        self.notifications.push(note);
        Ok(value)
    }
}

/// Whether the header should switch to its scrolled style
#[wasm_bindgen(js_name = isScrolled)]
pub fn is_scrolled(offset: f64) -> bool {
    shell::is_scrolled(offset)
}
