//! Application façade used by the client.
//!
//! `CardioService` owns the active session and routes every data call by
//! session kind: demo sessions read and write the injected repository,
//! authenticated sessions go to the hosted backend (a pass-through stub
//! until that integration exists), and no session is refused.

use std::sync::{Arc, Mutex, RwLock};

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ServiceConfig;
use crate::models::{AnalysisRecord, AnalysisRequest, ModelError, NewPatient, PatientRecord};
use crate::report::MedicalReport;
use crate::roster::{self, DashboardSummary, RosterEntry, RosterFilter};
use crate::session::{
    self, ActiveSession, AuthBackend, HospitalUser, MemorySessionStorage, Registration, Session,
    SessionError, SessionStorage, UnavailableBackend, DEMO_USER_ID,
};
use crate::store::{seed, DemoStore, PatientRepository, StoreError};

// ═══════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════

/// How a failure should be surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Bad or missing input; the form stays open.
    Validation,
    /// The data source refused or could not serve the request.
    Backend,
    /// Anything else. Logged, shown as a generic failure.
    Unexpected,
}

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Not signed in")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ModelError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Patient not found: {0}")]
    PatientNotFound(String),
    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),
    #[error("{0} is not available outside the demo session")]
    NotSupported(&'static str),
    #[error("Internal lock error")]
    LockPoisoned,
}

const GENERIC_FAILURE: &str = "Something went wrong. Please try again.";

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Session(
                SessionError::MissingCredentials
                | SessionError::InvalidCredentials
                | SessionError::DemoRegistration,
            ) => ErrorKind::Validation,
            Self::Session(SessionError::BackendUnavailable | SessionError::Backend(_)) => {
                ErrorKind::Backend
            }
            Self::Session(_) => ErrorKind::Unexpected,
            Self::Store(StoreError::LockPoisoned) | Self::LockPoisoned => ErrorKind::Unexpected,
            Self::Store(_)
            | Self::Unauthorized
            | Self::PatientNotFound(_)
            | Self::AnalysisNotFound(_)
            | Self::NotSupported(_) => ErrorKind::Backend,
        }
    }

    /// Text for the failure notification.
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Unexpected => GENERIC_FAILURE.to_string(),
            _ => self.to_string(),
        }
    }
}

// ═══════════════════════════════════════════════════════════
// View types
// ═══════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientHistory {
    pub patient: PatientRecord,
    /// Newest first.
    pub analyses: Vec<AnalysisRecord>,
    pub total_analyses: usize,
    pub last_analysis: Option<DateTime<Utc>>,
}

// ═══════════════════════════════════════════════════════════
// CardioService
// ═══════════════════════════════════════════════════════════

pub struct CardioService {
    active: RwLock<Option<ActiveSession>>,
    store: Arc<dyn PatientRepository>,
    storage: Box<dyn SessionStorage>,
    backend: Box<dyn AuthBackend>,
    rng: Mutex<StdRng>,
    config: ServiceConfig,
}

impl CardioService {
    pub fn new(
        store: Arc<dyn PatientRepository>,
        storage: Box<dyn SessionStorage>,
        backend: Box<dyn AuthBackend>,
        config: ServiceConfig,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            active: RwLock::new(None),
            store,
            storage,
            backend,
            rng: Mutex::new(rng),
            config,
        }
    }

    /// Isolated in-memory service: fresh store, memory storage, no backend.
    pub fn in_memory(config: ServiceConfig) -> Self {
        Self::new(
            Arc::new(DemoStore::new()),
            Box::new(MemorySessionStorage::new()),
            Box::new(UnavailableBackend),
            config,
        )
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // ── Session ─────────────────────────────────────────────

    fn session(&self) -> Result<Session, ServiceError> {
        let guard = self.active.read().map_err(|_| ServiceError::LockPoisoned)?;
        guard
            .as_ref()
            .map(|active| active.session.clone())
            .ok_or(ServiceError::Unauthorized)
    }

    fn set_active(&self, active: Option<ActiveSession>) -> Result<(), ServiceError> {
        let mut guard = self.active.write().map_err(|_| ServiceError::LockPoisoned)?;
        *guard = active;
        Ok(())
    }

    pub fn current_user(&self) -> Result<Option<HospitalUser>, ServiceError> {
        let guard = self.active.read().map_err(|_| ServiceError::LockPoisoned)?;
        Ok(guard.as_ref().map(|active| active.user.clone()))
    }

    pub fn is_signed_in(&self) -> bool {
        self.active.read().map(|g| g.is_some()).unwrap_or(false)
    }

    /// Populate the store for a demo session when it holds nothing yet.
    fn enter_demo(&self) -> Result<(), ServiceError> {
        if !self.config.seed_demo_data {
            return Ok(());
        }
        // The rng guard serialises check-then-seed across concurrent sign-ins.
        let mut rng = self.rng.lock().map_err(|_| ServiceError::LockPoisoned)?;
        if !self.store.is_empty()? {
            return Ok(());
        }
        seed::seed_demo_data(self.store.as_ref(), &mut *rng, Utc::now())?;
        Ok(())
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<HospitalUser, ServiceError> {
        let active = session::authenticate(email, password, self.backend.as_ref())?;

        if active.session.is_demo() {
            self.enter_demo()?;
            session::persist_demo(self.storage.as_ref())?;
        }

        let user = active.user.clone();
        tracing::info!(
            user_id = %user.id,
            demo = active.session.is_demo(),
            "Signed in"
        );
        self.set_active(Some(active))?;
        Ok(user)
    }

    pub async fn sign_up(&self, registration: &Registration) -> Result<HospitalUser, ServiceError> {
        let user = session::register(registration, self.backend.as_ref())?;
        tracing::info!(user_id = %user.id, "Hospital account registered");
        Ok(user)
    }

    /// Resume a demo session persisted by an earlier run.
    pub async fn restore_session(&self) -> Result<Option<HospitalUser>, ServiceError> {
        let Some(active) = session::restore_demo(self.storage.as_ref())? else {
            return Ok(None);
        };

        self.enter_demo()?;
        let user = active.user.clone();
        tracing::info!(user_id = %user.id, "Demo session restored");
        self.set_active(Some(active))?;
        Ok(Some(user))
    }

    /// End the session. Demo data and the persisted flag are discarded.
    pub async fn sign_out(&self) -> Result<(), ServiceError> {
        let previous = {
            let mut guard = self.active.write().map_err(|_| ServiceError::LockPoisoned)?;
            guard.take()
        };

        if let Some(active) = previous {
            if active.session.is_demo() {
                session::forget_demo(self.storage.as_ref())?;
                self.store.clear()?;
            }
            tracing::info!(user_id = %active.user.id, "Signed out");
        }
        Ok(())
    }

    // ── Patients ────────────────────────────────────────────

    pub async fn create_patient(&self, form: NewPatient) -> Result<PatientRecord, ServiceError> {
        form.validate()?;
        let now = Utc::now();

        let patient = match self.session()? {
            Session::Demo => self.store.create_patient(form, DEMO_USER_ID, now)?,
            Session::Authenticated { .. } => {
                // Echoed back unsaved until the hosted tables exist.
                let user_id = self
                    .current_user()?
                    .map(|u| u.id)
                    .ok_or(ServiceError::Unauthorized)?;
                let stamp = now.timestamp_millis();
                PatientRecord {
                    id: format!("PAT{stamp}"),
                    mrn: format!("MRN{stamp}"),
                    user_id,
                    details: form,
                    registration_date: now,
                    created_at: now,
                }
            }
        };

        tracing::info!(patient_id = %patient.id, mrn = %patient.mrn, "Patient registered");
        Ok(patient)
    }

    pub async fn list_patients(&self) -> Result<Vec<PatientRecord>, ServiceError> {
        match self.session()? {
            Session::Demo => Ok(self.store.patients()?),
            Session::Authenticated { .. } => Ok(Vec::new()),
        }
    }

    // ── Analyses ────────────────────────────────────────────

    /// Score and store an analysis after the configured processing delay.
    pub async fn create_analysis(
        &self,
        request: AnalysisRequest,
    ) -> Result<AnalysisRecord, ServiceError> {
        request.validate()?;

        match self.session()? {
            Session::Demo => {}
            Session::Authenticated { .. } => {
                return Err(ServiceError::NotSupported("Analysis creation"))
            }
        }

        if self.store.patient(&request.patient_id)?.is_none() {
            return Err(ServiceError::PatientNotFound(request.patient_id));
        }

        if !self.config.analysis_delay.is_zero() {
            tracing::debug!(
                delay_ms = self.config.analysis_delay.as_millis() as u64,
                "Analysis in progress"
            );
            tokio::time::sleep(self.config.analysis_delay).await;
        }

        let id = format!("ANA{}", Uuid::new_v4().simple());
        let record = AnalysisRecord::from_request(id, DEMO_USER_ID, request, Utc::now());
        self.store.insert_analysis(record.clone())?;

        tracing::info!(
            analysis_id = %record.id,
            patient_id = %record.patient_id,
            score = record.assessment.score,
            tier = record.assessment.tier.as_str(),
            "Analysis created"
        );
        Ok(record)
    }

    pub async fn get_analysis(&self, analysis_id: &str) -> Result<AnalysisRecord, ServiceError> {
        match self.session()? {
            Session::Demo => self
                .store
                .analysis(analysis_id)?
                .ok_or_else(|| ServiceError::AnalysisNotFound(analysis_id.to_string())),
            Session::Authenticated { .. } => Err(ServiceError::NotSupported("Analysis retrieval")),
        }
    }

    pub async fn get_patient_history(&self, patient_id: &str) -> Result<PatientHistory, ServiceError> {
        match self.session()? {
            Session::Demo => {}
            Session::Authenticated { .. } => {
                return Err(ServiceError::NotSupported("Patient history"))
            }
        }

        let patient = self
            .store
            .patient(patient_id)?
            .ok_or_else(|| ServiceError::PatientNotFound(patient_id.to_string()))?;
        let analyses = self.store.analyses_for(patient_id)?;

        Ok(PatientHistory {
            total_analyses: analyses.len(),
            last_analysis: analyses.first().map(|a| a.analysis_date),
            patient,
            analyses,
        })
    }

    // ── Roster, dashboard, report ───────────────────────────

    pub async fn roster(&self, filter: &RosterFilter) -> Result<Vec<RosterEntry>, ServiceError> {
        let entries = self.roster_entries().await?;
        Ok(entries.into_iter().filter(|e| filter.matches(e)).collect())
    }

    async fn roster_entries(&self) -> Result<Vec<RosterEntry>, ServiceError> {
        let patients = self.list_patients().await?;
        let mut entries = Vec::with_capacity(patients.len());
        for patient in &patients {
            let history = match self.session()? {
                Session::Demo => self.store.analyses_for(&patient.id)?,
                Session::Authenticated { .. } => Vec::new(),
            };
            entries.push(RosterEntry::new(patient, &history));
        }
        Ok(entries)
    }

    pub async fn dashboard(&self) -> Result<DashboardSummary, ServiceError> {
        let entries = self.roster_entries().await?;
        Ok(roster::summarize(&entries))
    }

    pub async fn report(&self, analysis_id: &str) -> Result<MedicalReport, ServiceError> {
        let analysis = self.get_analysis(analysis_id).await?;
        let patient = self
            .store
            .patient(&analysis.patient_id)?
            .ok_or_else(|| ServiceError::PatientNotFound(analysis.patient_id.clone()))?;
        let hospital = self.current_user()?.ok_or(ServiceError::Unauthorized)?;
        let history = self.store.analyses_for(&analysis.patient_id)?;

        let mut rng = self.rng.lock().map_err(|_| ServiceError::LockPoisoned)?;
        let report = MedicalReport::build(
            &hospital,
            &patient,
            &analysis,
            &history,
            Utc::now(),
            &mut *rng,
        );
        tracing::debug!(report_id = %report.report_id, analysis_id, "Report assembled");
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, Instant};

    use crate::models::enums::RiskTier;
    use crate::models::BiomarkerRecord;
    use crate::session::{SessionTokens, DEMO_EMAIL, DEMO_PASSWORD, DEMO_SESSION_KEY};

    fn service() -> CardioService {
        CardioService::in_memory(ServiceConfig::immediate(11))
    }

    async fn demo_service() -> CardioService {
        let svc = service();
        svc.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        svc
    }

    fn form() -> NewPatient {
        NewPatient {
            first_name: "Priya".into(),
            last_name: "Nair".into(),
            age: "58".into(),
            gender: "female".into(),
            contact_no: "+91-90000-00001".into(),
            district: "Ernakulam".into(),
            city: "Kochi".into(),
            pincode: "682001".into(),
            existing_conditions: vec!["Hypertension".into()],
            ..Default::default()
        }
    }

    struct TokenBackend;

    impl AuthBackend for TokenBackend {
        fn sign_in(
            &self,
            email: &str,
            _password: &str,
        ) -> Result<(SessionTokens, HospitalUser), SessionError> {
            Ok((
                SessionTokens {
                    access_token: "jwt".into(),
                    refresh_token: "r".into(),
                },
                HospitalUser {
                    id: "user-77".into(),
                    hospital_name: "Apollo".into(),
                    location: "Chennai".into(),
                    email: email.into(),
                    patient_id: "PID77".into(),
                    created_at: Utc::now(),
                },
            ))
        }

        fn sign_up(&self, _: &Registration) -> Result<HospitalUser, SessionError> {
            Err(SessionError::Backend("sign-up disabled".into()))
        }
    }

    fn authenticated_service() -> CardioService {
        CardioService::new(
            Arc::new(DemoStore::new()),
            Box::new(MemorySessionStorage::new()),
            Box::new(TokenBackend),
            ServiceConfig::immediate(1),
        )
    }

    #[tokio::test]
    async fn calls_without_session_are_unauthorized() {
        let svc = service();
        let err = svc.list_patients().await.unwrap_err();
        assert!(matches!(err, ServiceError::Unauthorized));
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert!(!svc.is_signed_in());
    }

    #[tokio::test]
    async fn demo_sign_in_seeds_roster() {
        let svc = demo_service().await;
        let user = svc.current_user().unwrap().unwrap();
        assert_eq!(user.id, DEMO_USER_ID);

        let patients = svc.list_patients().await.unwrap();
        let ids: Vec<&str> = patients.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["PAT001", "PAT002", "PAT003"]);
    }

    #[tokio::test]
    async fn seeding_can_be_disabled() {
        let config = ServiceConfig {
            seed_demo_data: false,
            ..ServiceConfig::immediate(1)
        };
        let svc = CardioService::in_memory(config);
        svc.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert!(svc.list_patients().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_patient_appends_with_generated_ids() {
        let svc = demo_service().await;
        let patient = svc.create_patient(form()).await.unwrap();
        assert_eq!(patient.id, "PAT004");
        assert!(patient.mrn.starts_with("MRN"));
        assert!(patient.mrn.ends_with("004"));
        assert_eq!(patient.user_id, DEMO_USER_ID);
        assert_eq!(svc.list_patients().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn invalid_patient_is_a_validation_error() {
        let svc = demo_service().await;
        let err = svc
            .create_patient(NewPatient {
                city: String::new(),
                ..form()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.user_message(), "City is required");
        assert_eq!(svc.list_patients().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn create_analysis_scores_and_stores() {
        let svc = demo_service().await;
        let patient = svc.create_patient(form()).await.unwrap();

        let request = AnalysisRequest {
            patient_id: patient.id.clone(),
            month: 1,
            biomarkers: BiomarkerRecord::default()
                .with_bmi("32")
                .with_systolic_bp("150")
                .with_diastolic_bp("95")
                .with_cholesterol("250")
                .with_ldl("140")
                .with_smoking_status("current")
                .with_diabetes("type2")
                .with_family_history("yes"),
            clinical_notes: None,
        };
        let analysis = svc.create_analysis(request).await.unwrap();
        assert!(analysis.id.starts_with("ANA"));
        assert_eq!(analysis.assessment.score, 100);
        assert_eq!(analysis.assessment.tier, RiskTier::High);
        assert_eq!(analysis.assessment.ten_year_risk, 30.0);

        let fetched = svc.get_analysis(&analysis.id).await.unwrap();
        assert_eq!(fetched, analysis);

        let history = svc.get_patient_history(&patient.id).await.unwrap();
        assert_eq!(history.total_analyses, 1);
        assert_eq!(history.last_analysis, Some(analysis.analysis_date));
    }

    #[tokio::test]
    async fn analysis_for_unknown_patient_fails() {
        let svc = demo_service().await;
        let err = svc
            .create_analysis(AnalysisRequest {
                patient_id: "PAT999".into(),
                month: 1,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::PatientNotFound(id) if id == "PAT999"));
    }

    #[tokio::test]
    async fn analysis_month_is_validated() {
        let svc = demo_service().await;
        let err = svc
            .create_analysis(AnalysisRequest {
                patient_id: "PAT001".into(),
                month: 0,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn analysis_waits_for_configured_delay() {
        let config = ServiceConfig {
            analysis_delay: Duration::from_millis(30),
            ..ServiceConfig::immediate(2)
        };
        let svc = CardioService::in_memory(config);
        svc.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();

        let started = Instant::now();
        svc.create_analysis(AnalysisRequest {
            patient_id: "PAT003".into(),
            month: 4,
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[tokio::test]
    async fn history_is_newest_first() {
        let svc = demo_service().await;
        svc.create_analysis(AnalysisRequest {
            patient_id: "PAT001".into(),
            month: 4,
            ..Default::default()
        })
        .await
        .unwrap();

        let history = svc.get_patient_history("PAT001").await.unwrap();
        assert_eq!(history.total_analyses, 4);
        assert!(history
            .analyses
            .windows(2)
            .all(|w| w[0].analysis_date >= w[1].analysis_date));
        assert!(history.analyses.iter().any(|a| a.month == 4));
    }

    #[tokio::test]
    async fn missing_analysis_and_patient_are_reported() {
        let svc = demo_service().await;
        assert!(matches!(
            svc.get_analysis("ANA-nope").await,
            Err(ServiceError::AnalysisNotFound(_))
        ));
        assert!(matches!(
            svc.get_patient_history("PAT404").await,
            Err(ServiceError::PatientNotFound(_))
        ));
    }

    #[tokio::test]
    async fn sign_out_discards_demo_state() {
        let svc = demo_service().await;
        svc.create_patient(form()).await.unwrap();
        svc.sign_out().await.unwrap();

        assert!(!svc.is_signed_in());
        assert!(svc.storage.load(DEMO_SESSION_KEY).unwrap().is_none());
        assert!(svc.store.is_empty().unwrap());

        // A fresh demo sign-in starts from the seeded roster again.
        svc.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap();
        assert_eq!(svc.list_patients().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn restore_resumes_persisted_demo() {
        let storage = MemorySessionStorage::new();
        session::persist_demo(&storage).unwrap();
        let svc = CardioService::new(
            Arc::new(DemoStore::new()),
            Box::new(storage),
            Box::new(UnavailableBackend),
            ServiceConfig::immediate(3),
        );

        let user = svc.restore_session().await.unwrap().unwrap();
        assert_eq!(user.hospital_name, "Demo General Hospital");
        assert_eq!(svc.list_patients().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn restore_without_blob_stays_signed_out() {
        let svc = service();
        assert!(svc.restore_session().await.unwrap().is_none());
        assert!(!svc.is_signed_in());
    }

    #[tokio::test]
    async fn authenticated_session_is_pass_through() {
        let svc = authenticated_service();
        let user = svc.sign_in("doc@apollo.in", "pw").await.unwrap();
        assert_eq!(user.id, "user-77");

        assert!(svc.list_patients().await.unwrap().is_empty());

        let echoed = svc.create_patient(form()).await.unwrap();
        assert_eq!(echoed.user_id, "user-77");
        assert!(echoed.id.starts_with("PAT"));
        assert!(svc.list_patients().await.unwrap().is_empty());

        let err = svc
            .create_analysis(AnalysisRequest {
                patient_id: echoed.id.clone(),
                month: 1,
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotSupported(_)));
        assert!(matches!(
            svc.get_patient_history(&echoed.id).await,
            Err(ServiceError::NotSupported(_))
        ));

        // Authenticated sign-in never persists the demo flag.
        assert!(svc.storage.load(DEMO_SESSION_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn backend_errors_surface_as_backend_kind() {
        let svc = service();
        let err = svc.sign_in("doc@city.org", "pw").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);

        let err = authenticated_service()
            .sign_up(&Registration {
                email: "new@city.org".into(),
                password: "pw".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Backend);
        assert!(err.user_message().contains("sign-up disabled"));
    }

    #[tokio::test]
    async fn demo_email_registration_is_validation() {
        let err = service()
            .sign_up(&Registration {
                email: DEMO_EMAIL.into(),
                password: "pw".into(),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[tokio::test]
    async fn dashboard_reflects_seeded_tiers() {
        let svc = demo_service().await;
        svc.create_patient(form()).await.unwrap();

        let summary = svc.dashboard().await.unwrap();
        assert_eq!(summary.total_patients, 4);
        assert_eq!(summary.total_analyses, 9);
        assert_eq!(summary.distribution.low, 1);
        assert_eq!(summary.distribution.medium, 1);
        assert_eq!(summary.distribution.high, 1);
        assert_eq!(summary.distribution.unassessed, 1);
        assert_eq!(summary.high_risk_patients, vec!["PAT002"]);
    }

    #[tokio::test]
    async fn roster_filter_by_tier() {
        let svc = demo_service().await;
        let filter = RosterFilter {
            tier: Some(RiskTier::Medium),
            ..Default::default()
        };
        let entries = svc.roster(&filter).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "Sarah Johnson");
        assert_eq!(entries[0].analysis_count, 3);
    }

    #[tokio::test]
    async fn report_for_seeded_analysis() {
        let svc = demo_service().await;
        let report = svc.report("ANAPAT002_M1").await.unwrap();
        assert!(report.report_id.starts_with("RPT-"));
        assert_eq!(report.patient.full_name(), "Michael Chen");
        assert_eq!(report.assessment.tier, RiskTier::High);
        assert_eq!(report.hospital_name, "Demo General Hospital");
        assert_eq!(report.analysis_history.previous_analyses, 3);
        assert_eq!(report.analysis_history.all_analyses[0].id, "ANAPAT002_M1");
        assert_eq!(
            report.analysis_history.first_analysis_date,
            report.patient.registration_date
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_demo_sign_ins_seed_once() {
        for round in 0..50 {
            let svc = Arc::new(CardioService::in_memory(ServiceConfig::immediate(round)));
            let tasks: Vec<_> = (0..4)
                .map(|_| {
                    let svc = Arc::clone(&svc);
                    tokio::spawn(async move { svc.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await })
                })
                .collect();
            for task in tasks {
                let result = task.await.unwrap();
                assert!(result.is_ok(), "round {round}: {:?}", result.err());
            }
            assert_eq!(svc.list_patients().await.unwrap().len(), 3);
            assert_eq!(svc.dashboard().await.unwrap().total_analyses, 9);
        }
    }

    /// Reports empty but refuses every write.
    struct ReadOnlyStore;

    impl PatientRepository for ReadOnlyStore {
        fn create_patient(
            &self,
            _: NewPatient,
            _: &str,
            _: DateTime<Utc>,
        ) -> Result<PatientRecord, StoreError> {
            Err(StoreError::LockPoisoned)
        }
        fn insert_patient(&self, _: PatientRecord) -> Result<(), StoreError> {
            Err(StoreError::LockPoisoned)
        }
        fn patients(&self) -> Result<Vec<PatientRecord>, StoreError> {
            Ok(Vec::new())
        }
        fn patient(&self, _: &str) -> Result<Option<PatientRecord>, StoreError> {
            Ok(None)
        }
        fn insert_analysis(&self, _: AnalysisRecord) -> Result<(), StoreError> {
            Err(StoreError::LockPoisoned)
        }
        fn analysis(&self, _: &str) -> Result<Option<AnalysisRecord>, StoreError> {
            Ok(None)
        }
        fn analyses_for(&self, _: &str) -> Result<Vec<AnalysisRecord>, StoreError> {
            Ok(Vec::new())
        }
        fn is_empty(&self) -> Result<bool, StoreError> {
            Ok(true)
        }
        fn clear(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn failed_seeding_leaves_no_persisted_session() {
        let svc = CardioService::new(
            Arc::new(ReadOnlyStore),
            Box::new(MemorySessionStorage::new()),
            Box::new(UnavailableBackend),
            ServiceConfig::immediate(4),
        );
        let err = svc.sign_in(DEMO_EMAIL, DEMO_PASSWORD).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert!(!svc.is_signed_in());
        assert!(svc.storage.load(DEMO_SESSION_KEY).unwrap().is_none());
    }

    #[test]
    fn unexpected_errors_get_generic_message() {
        let err = ServiceError::Store(StoreError::LockPoisoned);
        assert_eq!(err.kind(), ErrorKind::Unexpected);
        assert_eq!(err.user_message(), GENERIC_FAILURE);
    }
}
