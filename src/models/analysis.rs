use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::biomarker::BiomarkerRecord;
use super::enums::RiskTier;
use super::ModelError;
use crate::scoring::{self, care_plan, RiskAssessment};

/// Number of monthly assessment periods offered by the intake form.
pub const ASSESSMENT_MONTHS: u8 = 12;

/// Input for a new analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub patient_id: String,
    /// Assessment period, 1-based.
    pub month: u8,
    #[serde(default)]
    pub biomarkers: BiomarkerRecord,
    #[serde(default)]
    pub clinical_notes: Option<String>,
}

impl AnalysisRequest {
    pub fn validate(&self) -> Result<(), ModelError> {
        if self.patient_id.trim().is_empty() {
            return Err(ModelError::MissingField("Patient"));
        }
        if !(1..=ASSESSMENT_MONTHS).contains(&self.month) {
            return Err(ModelError::InvalidField {
                field: "Month",
                reason: format!("{} is outside 1-{ASSESSMENT_MONTHS}", self.month),
            });
        }
        Ok(())
    }
}

/// Resting ECG summary attached to each analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EcgSummary {
    pub heart_rate: f64,
    pub rhythm: String,
    pub findings: Vec<String>,
}

/// A stored analysis: biomarkers plus the assessment computed from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRecord {
    pub id: String,
    pub patient_id: String,
    pub user_id: String,
    pub month: u8,
    pub biomarkers: BiomarkerRecord,
    pub assessment: RiskAssessment,
    pub ecg: EcgSummary,
    /// Tier-level follow-up plan.
    pub care_plan: Vec<String>,
    pub analysis_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub clinical_notes: Option<String>,
}

impl AnalysisRecord {
    /// Score the request's biomarkers and attach the tier-level plan and ECG.
    pub fn from_request(
        id: String,
        user_id: &str,
        request: AnalysisRequest,
        analysis_date: DateTime<Utc>,
    ) -> Self {
        let assessment = scoring::assess(&request.biomarkers);
        let ecg = care_plan::ecg_summary(&request.biomarkers, assessment.tier);
        let care_plan = care_plan::care_plan(assessment.tier);

        Self {
            id,
            patient_id: request.patient_id,
            user_id: user_id.to_string(),
            month: request.month,
            biomarkers: request.biomarkers,
            assessment,
            ecg,
            care_plan,
            analysis_date,
            created_at: Utc::now(),
            clinical_notes: request.clinical_notes,
        }
    }

    pub fn risk_tier(&self) -> RiskTier {
        self.assessment.tier
    }

    pub fn risk_score(&self) -> u32 {
        self.assessment.score
    }

    pub fn month_label(&self) -> String {
        month_label(self.month)
    }
}

/// "1st Month", "2nd Month", ... "12th Month".
pub fn month_label(month: u8) -> String {
    let suffix = match (month % 10, month % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{month}{suffix} Month")
}
