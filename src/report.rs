//! Printable medical report data.
//!
//! Assembles everything a report page shows for one analysis. Rendering
//! (print, PDF) happens in the client; this module stops at the data and
//! its JSON export.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;

use crate::models::enums::Trend;
use crate::models::{AnalysisRecord, BiomarkerRecord, EcgSummary, PatientRecord};
use crate::scoring::profile::{biomarker_comparisons, health_profile, BiomarkerComparison, HealthAxis};
use crate::scoring::RiskAssessment;
use crate::session::HospitalUser;

const REPORT_SUFFIX_LEN: usize = 9;
const REPORT_SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
    pub report_id: String,
    pub generated_at: DateTime<Utc>,
    pub hospital_name: String,
    pub hospital_location: String,
    pub patient: PatientRecord,
    pub analysis_id: String,
    pub analysis_date: DateTime<Utc>,
    pub month_label: String,
    pub biomarkers: BiomarkerRecord,
    pub comparisons: Vec<BiomarkerComparison>,
    pub health_profile: Vec<HealthAxis>,
    pub assessment: RiskAssessment,
    pub risk_label: &'static str,
    pub risk_color: &'static str,
    pub ecg: EcgSummary,
    pub care_plan: Vec<String>,
    pub clinical_notes: Option<String>,
    pub analysis_history: AnalysisHistory,
}

/// The patient's analysis record as of the report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisHistory {
    pub previous_analyses: usize,
    pub trend_direction: Trend,
    /// Registration date; the patient's record starts there.
    pub first_analysis_date: DateTime<Utc>,
    /// Newest first.
    pub all_analyses: Vec<AnalysisRecord>,
}

impl AnalysisHistory {
    /// `history` must be newest first. The trend compares `analysis` with the
    /// analysis just before it; with fewer than two analyses it is stable.
    pub fn new(patient: &PatientRecord, analysis: &AnalysisRecord, history: &[AnalysisRecord]) -> Self {
        let older = match history.iter().position(|a| a.id == analysis.id) {
            Some(i) => history.get(i + 1),
            None => history.first(),
        };
        let trend_direction = match older {
            Some(previous) if history.len() > 1 => {
                Trend::between(analysis.risk_score(), previous.risk_score())
            }
            _ => Trend::Stable,
        };

        Self {
            previous_analyses: history.len(),
            trend_direction,
            first_analysis_date: patient.registration_date,
            all_analyses: history.to_vec(),
        }
    }
}

/// `RPT-<epoch millis>-<9 uppercase base-36 chars>`.
pub fn report_id(now: DateTime<Utc>, rng: &mut impl Rng) -> String {
    let suffix: String = (0..REPORT_SUFFIX_LEN)
        .map(|_| REPORT_SUFFIX_CHARSET[rng.gen_range(0..REPORT_SUFFIX_CHARSET.len())] as char)
        .collect();
    format!("RPT-{}-{suffix}", now.timestamp_millis())
}

impl MedicalReport {
    pub fn build(
        hospital: &HospitalUser,
        patient: &PatientRecord,
        analysis: &AnalysisRecord,
        history: &[AnalysisRecord],
        now: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Self {
        Self {
            report_id: report_id(now, rng),
            generated_at: now,
            hospital_name: hospital.hospital_name.clone(),
            hospital_location: hospital.location.clone(),
            patient: patient.clone(),
            analysis_id: analysis.id.clone(),
            analysis_date: analysis.analysis_date,
            month_label: analysis.month_label(),
            biomarkers: analysis.biomarkers.clone(),
            comparisons: biomarker_comparisons(&analysis.biomarkers),
            health_profile: health_profile(&analysis.biomarkers),
            assessment: analysis.assessment.clone(),
            risk_label: analysis.assessment.label(),
            risk_color: analysis.assessment.color(),
            ecg: analysis.ecg.clone(),
            care_plan: analysis.care_plan.clone(),
            clinical_notes: analysis.clinical_notes.clone(),
            analysis_history: AnalysisHistory::new(patient, analysis, history),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
