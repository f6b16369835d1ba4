//! Shared test harness: a fully wired service stack over a temp-dir
//! SQLite database and blob store.

#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use tempfile::TempDir;

use doclock_auth::jwt::{JwtDecoder, JwtEncoder};
use doclock_auth::mpin::MpinHasher;
use doclock_core::config::{AuthConfig, DatabaseConfig, LimitsConfig};
use doclock_database::DatabasePool;
use doclock_database::repositories::card::CardRepository;
use doclock_database::repositories::document::DocumentRepository;
use doclock_database::repositories::folder::FolderRepository;
use doclock_database::repositories::notification::NotificationRepository;
use doclock_database::repositories::secure_qr::SecureQrRepository;
use doclock_database::repositories::share::ShareRepository;
use doclock_database::repositories::usage::StorageUsageRepository;
use doclock_database::repositories::user::UserRepository;
use doclock_realtime::ChangeFeed;
use doclock_service::auth::{LoginRequest, RegisterRequest};
use doclock_service::{
    AuthService, CardService, DocumentService, FolderService, NotificationService, RequestContext,
    SecureQrService, ShareService,
};
use doclock_storage::LocalBlobStore;

/// A wired service stack backed by throwaway on-disk state.
pub struct TestApp {
    pub auth: AuthService,
    pub folders: FolderService,
    pub documents: DocumentService,
    pub shares: ShareService,
    pub notifications: NotificationService,
    pub secure_qrs: SecureQrService,
    pub cards: CardService,
    pub feed: ChangeFeed,
    _tmp: TempDir,
}

impl TestApp {
    /// Spawns a stack with the default limits (depth 3, 1 GB quota).
    pub async fn spawn() -> Self {
        Self::spawn_with_limits(LimitsConfig::default()).await
    }

    /// Spawns a stack with custom limits.
    pub async fn spawn_with_limits(limits: LimitsConfig) -> Self {
        let tmp = TempDir::new().expect("tempdir");
        let db_path = tmp.path().join("doclock-test.db");
        let blob_root = tmp.path().join("blobs");

        let db_config = DatabaseConfig {
            url: format!("sqlite://{}", db_path.display()),
            max_connections: 5,
            connect_timeout_seconds: 5,
        };
        let db = DatabasePool::connect(&db_config).await.expect("connect");
        doclock_database::migration::run_migrations(db.pool())
            .await
            .expect("migrations");
        let pool = db.pool().clone();

        let blob_store = Arc::new(
            LocalBlobStore::new(&blob_root.display().to_string())
                .await
                .expect("blob store"),
        );
        let feed = ChangeFeed::new();

        let folder_repo = Arc::new(FolderRepository::new(pool.clone()));
        let document_repo = Arc::new(DocumentRepository::new(pool.clone()));
        let share_repo = Arc::new(ShareRepository::new(pool.clone()));
        let qr_repo = Arc::new(SecureQrRepository::new(pool.clone()));
        let usage_repo = Arc::new(StorageUsageRepository::new(pool.clone()));
        let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));
        let card_repo = Arc::new(CardRepository::new(pool.clone()));
        let user_repo = Arc::new(UserRepository::new(pool.clone()));

        let auth_config = AuthConfig {
            jwt_secret: "integration-test-secret".to_string(),
            token_ttl_minutes: 60,
        };
        let notifications = NotificationService::new(notification_repo);

        Self {
            auth: AuthService::new(
                user_repo.clone(),
                usage_repo.clone(),
                MpinHasher::new(),
                JwtEncoder::new(&auth_config),
                JwtDecoder::new(&auth_config),
            ),
            folders: FolderService::new(
                folder_repo.clone(),
                document_repo.clone(),
                share_repo.clone(),
                qr_repo.clone(),
                usage_repo.clone(),
                blob_store.clone(),
                feed.clone(),
                limits.clone(),
            ),
            documents: DocumentService::new(
                document_repo.clone(),
                folder_repo,
                share_repo.clone(),
                qr_repo.clone(),
                usage_repo,
                blob_store,
                feed.clone(),
                limits,
            ),
            shares: ShareService::new(
                share_repo.clone(),
                document_repo.clone(),
                card_repo.clone(),
                user_repo,
                notifications.clone(),
                feed.clone(),
            ),
            notifications,
            secure_qrs: SecureQrService::new(qr_repo, document_repo),
            cards: CardService::new(card_repo, share_repo),
            feed,
            _tmp: tmp,
        }
    }

    /// Registers an account and returns a context built from its verified
    /// bearer token.
    pub async fn register(&self, name: &str, mobile: &str) -> RequestContext {
        let auth = self
            .auth
            .register(RegisterRequest {
                name: name.to_string(),
                mobile: mobile.to_string(),
                mpin: "4821".to_string(),
                device_id: "test-device".to_string(),
            })
            .await
            .expect("register");
        self.auth.verify_token(&auth.token).expect("verify token")
    }

    /// Logs an existing account in with the harness MPIN.
    pub async fn login(&self, mobile: &str) -> RequestContext {
        let auth = self
            .auth
            .login(LoginRequest {
                mobile: mobile.to_string(),
                mpin: "4821".to_string(),
                device_id: "test-device".to_string(),
            })
            .await
            .expect("login");
        self.auth.verify_token(&auth.token).expect("verify token")
    }
}

/// A payload that sniffs as a PDF, padded to the requested size.
pub fn pdf_bytes(len: usize) -> Bytes {
    let mut data = b"%PDF-1.4\n".to_vec();
    data.resize(len.max(data.len()), b'x');
    Bytes::from(data)
}

/// A payload that sniffs as a PNG.
pub fn png_bytes() -> Bytes {
    let mut data = vec![0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
    data.extend_from_slice(&[0u8; 64]);
    Bytes::from(data)
}
