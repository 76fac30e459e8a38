pub mod config;
pub mod models;
pub mod report;
pub mod roster;
pub mod scoring;
pub mod service;
pub mod session;
pub mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::service::{CardioService, ServiceError};
use crate::session::{FileSessionStorage, UnavailableBackend};
use crate::store::DemoStore;

fn init_tracing() {
    // A subscriber may already be installed by an embedding host.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .try_init();
}

/// Service wired for a desktop run: on-disk session blob, in-memory roster.
pub fn build_service(settings: config::ServiceConfig) -> CardioService {
    CardioService::new(
        Arc::new(DemoStore::new()),
        Box::new(FileSessionStorage::new(config::session_dir())),
        Box::new(UnavailableBackend),
        settings,
    )
}

pub async fn run() -> Result<(), ServiceError> {
    init_tracing();
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let service = build_service(config::ServiceConfig::from_env());

    let Some(user) = service.restore_session().await? else {
        tracing::info!("No saved session; sign in to continue");
        return Ok(());
    };

    let summary = service.dashboard().await?;
    tracing::info!(
        hospital = %user.hospital_name,
        patients = summary.total_patients,
        analyses = summary.total_analyses,
        low = summary.distribution.low,
        medium = summary.distribution.medium,
        high = summary.distribution.high,
        unassessed = summary.distribution.unassessed,
        "Dashboard ready"
    );
    for patient_id in &summary.high_risk_patients {
        tracing::warn!(patient_id = %patient_id, "High risk patient needs follow-up");
    }
    Ok(())
}
