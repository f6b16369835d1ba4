//! DocLock Server: folder hierarchy, sharing, and secure QR bundles.
//!
//! Main entry point that wires all crates together and starts the service.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use doclock_auth::jwt::{JwtDecoder, JwtEncoder};
use doclock_auth::mpin::MpinHasher;
use doclock_core::config::AppConfig;
use doclock_core::error::AppError;
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
use doclock_service::{
    AuthService, CardService, DocumentService, FolderService, NotificationService, SecureQrService,
    ShareService,
};
use doclock_storage::LocalBlobStore;

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let config_path =
        std::env::var("DOCLOCK_CONFIG").unwrap_or_else(|_| "config/default.toml".to_string());
    AppConfig::load(&config_path)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main run function: connect, migrate, wire services, wait for shutdown.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting DocLock v{}", env!("CARGO_PKG_VERSION"));

    let db = DatabasePool::connect(&config.database).await?;
    doclock_database::migration::run_migrations(db.pool()).await?;
    let pool = db.pool().clone();

    let blob_store = Arc::new(LocalBlobStore::new(&config.storage.root_path).await?);
    let feed = ChangeFeed::new();

    let folder_repo = Arc::new(FolderRepository::new(pool.clone()));
    let document_repo = Arc::new(DocumentRepository::new(pool.clone()));
    let share_repo = Arc::new(ShareRepository::new(pool.clone()));
    let qr_repo = Arc::new(SecureQrRepository::new(pool.clone()));
    let usage_repo = Arc::new(StorageUsageRepository::new(pool.clone()));
    let notification_repo = Arc::new(NotificationRepository::new(pool.clone()));
    let card_repo = Arc::new(CardRepository::new(pool.clone()));
    let user_repo = Arc::new(UserRepository::new(pool.clone()));

    let notification_service = NotificationService::new(notification_repo);
    let _folder_service = FolderService::new(
        folder_repo.clone(),
        document_repo.clone(),
        share_repo.clone(),
        qr_repo.clone(),
        usage_repo.clone(),
        blob_store.clone(),
        feed.clone(),
        config.limits.clone(),
    );
    let _document_service = DocumentService::new(
        document_repo.clone(),
        folder_repo.clone(),
        share_repo.clone(),
        qr_repo.clone(),
        usage_repo.clone(),
        blob_store,
        feed.clone(),
        config.limits.clone(),
    );
    let _share_service = ShareService::new(
        share_repo.clone(),
        document_repo.clone(),
        card_repo.clone(),
        user_repo.clone(),
        notification_service.clone(),
        feed,
    );
    let _secure_qr_service = SecureQrService::new(qr_repo, document_repo);
    let _card_service = CardService::new(card_repo, share_repo);
    let _auth_service = AuthService::new(
        user_repo,
        usage_repo,
        MpinHasher::new(),
        JwtEncoder::new(&config.auth),
        JwtDecoder::new(&config.auth),
    );

    tracing::info!("DocLock services wired; press Ctrl+C to stop");

    tokio::signal::ctrl_c().await.map_err(|e| {
        AppError::with_source(
            doclock_core::error::ErrorKind::Internal,
            "Failed to listen for shutdown signal",
            e,
        )
    })?;

    tracing::info!("Shutdown signal received");
    db.close().await;
    Ok(())
}
