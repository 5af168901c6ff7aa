//! End-to-end tests for the account sections: sign-in, KYC and payments
//! against the in-memory store and the mock collaborators.

use std::sync::Arc;
use std::time::Duration;

use blockbank_lib::delay::{NoDelay, TokioDelay};
use blockbank_lib::kyc::{Document, DocumentType, KycForm, KycService};
use blockbank_lib::payment::{
    Currency, FixedOutcome, PaymentForm, PaymentService, TransactionStatus,
};
use blockbank_lib::session::{AuthService, Credentials};
use blockbank_lib::storage::{InMemoryStore, ObjectStore, Profile, RecordStore, StoredPath};
use blockbank_lib::test_utils::{test_address, MockIdentityProvider, MockWallet};
use blockbank_lib::wallet::WalletError;
use blockbank_lib::{NotificationLevel, SessionHandle, SiteConfig};
use chrono::NaiveDate;

const RECEIVER: &str = "0x742d35Cc6634C0532925a3b844Bc454e4438f44e";

async fn signed_in(email: &str) -> SessionHandle {
    let provider = MockIdentityProvider::new();
    provider.add_account(email, "password1");
    let auth = AuthService::new(provider, SessionHandle::signed_out());
    let note = auth.sign_in(&Credentials::new(email, "password1")).await;
    assert_eq!(note.level, NotificationLevel::Success);
    auth.session().clone()
}

async fn store_with_recipient() -> Arc<InMemoryStore> {
    let store = Arc::new(InMemoryStore::new());
    store
        .insert_profile(Profile::new("bob-id", "bob@example.com"))
        .await
        .unwrap();
    store
}

fn payments(
    store: &Arc<InMemoryStore>,
    succeed: bool,
) -> PaymentService<InMemoryStore, NoDelay> {
    PaymentService::with_outcome(
        store.clone(),
        NoDelay,
        Box::new(FixedOutcome(succeed)),
        SiteConfig::default(),
    )
}

fn kyc_form() -> KycForm {
    KycForm {
        full_name: "Alice Example".into(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 7, 14),
        address: "123 Blockchain Avenue".into(),
        document_type: DocumentType::Passport,
        document_number: "P0001".into(),
        document_front: Some(Document::from_file_name("front.png", b"front".to_vec())),
        document_back: Some(Document::from_file_name("back.png", b"back".to_vec())),
    }
}

#[tokio::test]
async fn test_kyc_submission_uploads_both_sides() {
    let session = signed_in("alice@example.com").await;
    let user = session.current_user().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let kyc = KycService::new(store.clone(), store.clone(), &SiteConfig::default());

    let note = kyc.submit(&session, &kyc_form()).await;
    assert_eq!(note.message, "KYC verification submitted successfully");
    assert!(!kyc.is_loading());

    let front = StoredPath::new("kyc-documents", format!("{}/front", user.id));
    assert_eq!(store.download(&front).await.unwrap(), b"front");
    let rows = store.kyc_for(&user.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].document_back.path, format!("{}/back", user.id));
    assert_eq!(rows[0].document_front_sha256.len(), 64);
}

#[tokio::test]
async fn test_kyc_resubmission_fails_on_existing_documents() {
    let session = signed_in("alice@example.com").await;
    let store = Arc::new(InMemoryStore::new());
    let kyc = KycService::new(store.clone(), store.clone(), &SiteConfig::default());

    kyc.submit(&session, &kyc_form()).await;
    let note = kyc.submit(&session, &kyc_form()).await;
    assert!(note.is_error());
    assert_eq!(note.message, "Failed to submit KYC verification");
    assert!(!kyc.is_loading());
}

#[tokio::test]
async fn test_kyc_retry_after_record_failure() {
    let session = signed_in("alice@example.com").await;
    let user = session.current_user().unwrap();
    let store = Arc::new(InMemoryStore::new());
    let kyc = KycService::new(store.clone(), store.clone(), &SiteConfig::default());

    store.set_fail_records(true);
    let note = kyc.submit(&session, &kyc_form()).await;
    assert_eq!(note.message, "Failed to submit KYC verification");
    assert_eq!(store.object_count(), 0);

    store.set_fail_records(false);
    let note = kyc.submit(&session, &kyc_form()).await;
    assert_eq!(note.message, "KYC verification submitted successfully");
    assert_eq!(store.object_count(), 2);
    assert_eq!(store.kyc_for(&user.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_kyc_requires_sign_in_and_storage() {
    let store = Arc::new(InMemoryStore::new());
    let kyc = KycService::new(store.clone(), store.clone(), &SiteConfig::default());
    let note = kyc.submit(&SessionHandle::signed_out(), &kyc_form()).await;
    assert_eq!(note.message, "Please log in to continue");
    assert_eq!(store.object_count(), 0);

    let session = signed_in("alice@example.com").await;
    store.set_fail_uploads(true);
    let note = kyc.submit(&session, &kyc_form()).await;
    assert_eq!(note.message, "Failed to submit KYC verification");
}

#[tokio::test]
async fn test_simulated_payment_success() {
    let session = signed_in("alice@example.com").await;
    let store = store_with_recipient().await;
    let service = payments(&store, true);

    let form = PaymentForm::new(" BOB@example.com ", "1.5", Currency::Eth);
    let note = service.send(&session, &form).await;
    assert_eq!(note.message, "Payment of 1.5 ETH sent successfully!");

    let recent = service.recent_transactions(&session).await;
    assert_eq!(recent.len(), 1);
    assert_eq!(recent[0].status, TransactionStatus::Completed);
    assert_eq!(recent[0].receiver_id, "bob-id");
    let hash = recent[0].transaction_hash.as_ref().unwrap();
    assert_eq!(hash.as_str().len(), 66);
}

#[tokio::test]
async fn test_simulated_payment_failure_marks_record_failed() {
    let session = signed_in("alice@example.com").await;
    let store = store_with_recipient().await;
    let service = payments(&store, false);

    let form = PaymentForm::new("bob@example.com", "2", Currency::Usdc);
    let note = service.send(&session, &form).await;
    assert!(note.is_error());
    assert_eq!(note.message, "Transaction failed due to network issues");

    let all = store.transactions();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, TransactionStatus::Failed);
    assert!(all[0].transaction_hash.is_none());
    assert!(!service.is_loading());
}

#[tokio::test]
async fn test_payment_preconditions() {
    let store = store_with_recipient().await;
    let service = payments(&store, true);
    let form = PaymentForm::new("bob@example.com", "1", Currency::Eth);

    let note = service.send(&SessionHandle::signed_out(), &form).await;
    assert_eq!(note.message, "Please log in to send payments");

    let session = signed_in("alice@example.com").await;
    let unknown = PaymentForm::new("nobody@example.com", "1", Currency::Eth);
    let note = service.send(&session, &unknown).await;
    assert_eq!(
        note.message,
        "Recipient not found. Please check the email address."
    );

    let invalid = PaymentForm::new("bob@example.com", "0", Currency::Eth);
    let note = service.send(&session, &invalid).await;
    assert_eq!(note.message, "Please enter a valid amount");
    assert!(store.transactions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_simulated_payment_waits_for_delay() {
    let session = signed_in("alice@example.com").await;
    let store = store_with_recipient().await;
    let service = PaymentService::with_outcome(
        store.clone(),
        TokioDelay,
        Box::new(FixedOutcome::SUCCEED),
        SiteConfig::default().with_payment_delay(Duration::from_secs(3)),
    );

    let start = tokio::time::Instant::now();
    let form = PaymentForm::new("bob@example.com", "1", Currency::Eth);
    service.send(&session, &form).await;
    assert!(start.elapsed() >= Duration::from_secs(3));
}

#[tokio::test]
async fn test_wallet_payment_sends_exact_wei() {
    let session = signed_in("alice@example.com").await;
    let store = store_with_recipient().await;
    let service = payments(&store, true);
    let wallet = MockWallet::new(test_address(1));

    let form = PaymentForm::new("bob@example.com", "0.25", Currency::Eth);
    let note = service
        .send_with_wallet(&session, &form, &wallet, RECEIVER)
        .await;
    assert_eq!(note.message, "Payment of 0.25 ETH sent successfully!");

    let sent = wallet.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].value_wei, 250_000_000_000_000_000);
    assert_eq!(sent[0].gas, 21_000);
    assert_eq!(sent[0].to.as_str(), RECEIVER);

    let recent = service.recent_transactions(&session).await;
    assert_eq!(recent[0].status, TransactionStatus::Completed);
}

#[tokio::test]
async fn test_wallet_rejection_and_connect() {
    let session = signed_in("alice@example.com").await;
    let store = store_with_recipient().await;
    let service = payments(&store, true);
    let wallet = MockWallet::new(test_address(1)).rejecting();

    let form = PaymentForm::new("bob@example.com", "1", Currency::Eth);
    let note = service
        .send_with_wallet(&session, &form, &wallet, RECEIVER)
        .await;
    assert_eq!(note.message, "Transaction rejected by user");
    assert!(store.transactions().is_empty());

    let note = service.connect_wallet(Some(&wallet)).await;
    assert_eq!(note.message, "Failed to connect wallet");

    let note = service.connect_wallet(None::<&MockWallet>).await;
    assert_eq!(note.message, "Please install MetaMask to connect your wallet");

    let connected = MockWallet::new(test_address(0xab));
    let note = service.connect_wallet(Some(&connected)).await;
    assert_eq!(note.message, "Connected to wallet: 0xabab...abab");

    let empty = MockWallet::with_accounts(Vec::new());
    let note = service
        .send_with_wallet(&session, &form, &empty, RECEIVER)
        .await;
    assert_eq!(note.message, WalletError::NoAccounts.to_string());
}

#[tokio::test]
async fn test_recent_transactions_limit() {
    let session = signed_in("alice@example.com").await;
    let store = store_with_recipient().await;
    let service = payments(&store, true);

    for i in 1..=7 {
        let form = PaymentForm::new("bob@example.com", i.to_string(), Currency::Eth);
        service.send(&session, &form).await;
    }
    let recent = service.recent_transactions(&session).await;
    assert_eq!(recent.len(), 5);
    assert_eq!(recent[0].amount.to_string(), "7");
}

#[tokio::test]
async fn test_wallets_listing() {
    let session = signed_in("alice@example.com").await;
    let store = Arc::new(InMemoryStore::new());
    let service = payments(&store, true);

    let note = service
        .add_wallet(&session, RECEIVER, Currency::Eth, None)
        .await;
    assert_eq!(note.level, NotificationLevel::Success);
    let wallets = service.wallets(&session).await.unwrap();
    assert_eq!(wallets.len(), 1);
    assert_eq!(wallets[0].short_address(), "0x742d35...38f44e");
}
