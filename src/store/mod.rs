//! Patient and analysis storage.
//!
//! [`PatientRepository`] is the seam the service talks to; [`DemoStore`] is
//! the in-memory implementation behind demo sessions. Nothing here is
//! durable: state lives as long as the store value.

pub mod demo;
pub mod seed;

pub use demo::DemoStore;

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{AnalysisRecord, NewPatient, PatientRecord};

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Patient not found: {0}")]
    PatientNotFound(String),
    #[error("Analysis not found: {0}")]
    AnalysisNotFound(String),
    #[error("Duplicate id: {0}")]
    DuplicateId(String),
    #[error("Internal lock error")]
    LockPoisoned,
}

pub trait PatientRepository: Send + Sync {
    /// Register a patient, assigning its id and MRN.
    fn create_patient(
        &self,
        details: NewPatient,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PatientRecord, StoreError>;

    /// Insert a fully formed record (seeding, imports).
    fn insert_patient(&self, patient: PatientRecord) -> Result<(), StoreError>;

    /// All patients in registration order.
    fn patients(&self) -> Result<Vec<PatientRecord>, StoreError>;

    fn patient(&self, id: &str) -> Result<Option<PatientRecord>, StoreError>;

    /// Append an analysis. The patient must exist.
    fn insert_analysis(&self, analysis: AnalysisRecord) -> Result<(), StoreError>;

    fn analysis(&self, id: &str) -> Result<Option<AnalysisRecord>, StoreError>;

    /// Analyses for one patient, newest first.
    fn analyses_for(&self, patient_id: &str) -> Result<Vec<AnalysisRecord>, StoreError>;

    fn is_empty(&self) -> Result<bool, StoreError>;

    /// Drop all patients and analyses.
    fn clear(&self) -> Result<(), StoreError>;
}
