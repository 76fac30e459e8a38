use std::sync::RwLock;

use chrono::{DateTime, Datelike, Utc};

use super::{PatientRepository, StoreError};
use crate::models::{AnalysisRecord, NewPatient, PatientRecord};

/// In-memory store backed by RwLock.
/// Append-only until [`PatientRepository::clear`].
pub struct DemoStore {
    patients: RwLock<Vec<PatientRecord>>,
    analyses: RwLock<Vec<AnalysisRecord>>,
}

impl DemoStore {
    pub fn new() -> Self {
        Self {
            patients: RwLock::new(Vec::new()),
            analyses: RwLock::new(Vec::new()),
        }
    }
}

impl Default for DemoStore {
    fn default() -> Self {
        Self::new()
    }
}

fn patient_id(seq: usize) -> String {
    format!("PAT{seq:03}")
}

fn mrn(year: i32, seq: usize) -> String {
    format!("MRN{year}{seq:03}")
}

impl PatientRepository for DemoStore {
    fn create_patient(
        &self,
        details: NewPatient,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PatientRecord, StoreError> {
        let mut patients = self.patients.write().map_err(|_| StoreError::LockPoisoned)?;

        let mut seq = patients.len() + 1;
        while patients.iter().any(|p| p.id == patient_id(seq)) {
            seq += 1;
        }

        let record = PatientRecord {
            id: patient_id(seq),
            mrn: mrn(now.year(), seq),
            user_id: user_id.to_string(),
            details,
            registration_date: now,
            created_at: now,
        };
        patients.push(record.clone());

        tracing::debug!(patient_id = %record.id, mrn = %record.mrn, "Patient stored");
        Ok(record)
    }

    fn insert_patient(&self, patient: PatientRecord) -> Result<(), StoreError> {
        let mut patients = self.patients.write().map_err(|_| StoreError::LockPoisoned)?;
        if patients.iter().any(|p| p.id == patient.id) {
            return Err(StoreError::DuplicateId(patient.id));
        }
        patients.push(patient);
        Ok(())
    }

    fn patients(&self) -> Result<Vec<PatientRecord>, StoreError> {
        let patients = self.patients.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(patients.clone())
    }

    fn patient(&self, id: &str) -> Result<Option<PatientRecord>, StoreError> {
        let patients = self.patients.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(patients.iter().find(|p| p.id == id).cloned())
    }

    fn insert_analysis(&self, analysis: AnalysisRecord) -> Result<(), StoreError> {
        let known_patient = {
            let patients = self.patients.read().map_err(|_| StoreError::LockPoisoned)?;
            patients.iter().any(|p| p.id == analysis.patient_id)
        };
        if !known_patient {
            return Err(StoreError::PatientNotFound(analysis.patient_id));
        }

        let mut analyses = self.analyses.write().map_err(|_| StoreError::LockPoisoned)?;
        if analyses.iter().any(|a| a.id == analysis.id) {
            return Err(StoreError::DuplicateId(analysis.id));
        }
        analyses.push(analysis);
        Ok(())
    }

    fn analysis(&self, id: &str) -> Result<Option<AnalysisRecord>, StoreError> {
        let analyses = self.analyses.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(analyses.iter().find(|a| a.id == id).cloned())
    }

    fn analyses_for(&self, patient_id: &str) -> Result<Vec<AnalysisRecord>, StoreError> {
        let analyses = self.analyses.read().map_err(|_| StoreError::LockPoisoned)?;
        let mut matching: Vec<AnalysisRecord> = analyses
            .iter()
            .filter(|a| a.patient_id == patient_id)
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.analysis_date.cmp(&a.analysis_date));
        Ok(matching)
    }

    fn is_empty(&self) -> Result<bool, StoreError> {
        let patients = self.patients.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(patients.is_empty())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.patients
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        self.analyses
            .write()
            .map_err(|_| StoreError::LockPoisoned)?
            .clear();
        Ok(())
    }
}
