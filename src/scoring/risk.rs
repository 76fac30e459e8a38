//! Cardiovascular risk scoring.
//!
//! Additive point system over the biomarker form. Each rule contributes
//! independently; the sum is capped at [`MAX_SCORE`] and mapped to a tier.
//! HbA1c, sleep and activity are collected on the form but do not score.

use serde::{Deserialize, Serialize};

use super::parse::parse_or;
use crate::models::enums::{DiabetesStatus, RiskTier, SmokingStatus};
use crate::models::BiomarkerRecord;

pub const MAX_SCORE: u32 = 100;
/// Upper bound of the ten-year risk estimate, in percent.
pub const MAX_TEN_YEAR_RISK: f64 = 30.0;
const TEN_YEAR_RISK_PER_POINT: f64 = 0.3;

pub const DEFAULT_BMI: f64 = 25.0;
pub const DEFAULT_SYSTOLIC: f64 = 120.0;
pub const DEFAULT_DIASTOLIC: f64 = 80.0;
pub const DEFAULT_CHOLESTEROL: f64 = 200.0;
pub const DEFAULT_LDL: f64 = 100.0;

pub const OBESITY_POINTS: u32 = 15;
pub const OVERWEIGHT_POINTS: u32 = 8;
pub const HYPERTENSION_POINTS: u32 = 20;
pub const CHOLESTEROL_POINTS: u32 = 18;
pub const SMOKING_POINTS: u32 = 25;
pub const DIABETES_POINTS: u32 = 22;
pub const FAMILY_HISTORY_POINTS: u32 = 10;

pub const FACTOR_OBESITY: &str = "Obesity (BMI > 30)";
pub const FACTOR_OVERWEIGHT: &str = "Overweight (BMI 25-30)";
pub const FACTOR_HYPERTENSION: &str = "Hypertension";
pub const FACTOR_CHOLESTEROL: &str = "High cholesterol";
pub const FACTOR_SMOKING: &str = "Current smoking";
pub const FACTOR_DIABETES: &str = "Diabetes";
pub const FACTOR_FAMILY_HISTORY: &str = "Family history of CVD";

pub const REC_WEIGHT: &str = "Weight management through diet and exercise";
pub const REC_BLOOD_PRESSURE: &str = "Blood pressure management and monitoring";
pub const REC_CHOLESTEROL: &str = "Cholesterol management with diet and medication";
pub const REC_SMOKING: &str = "Smoking cessation program";
pub const REC_DIABETES: &str = "Diabetes management and monitoring";

/// Result of scoring one biomarker record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    /// Capped score, 0-100.
    pub score: u32,
    /// Sum of triggered points before capping.
    pub raw_score: u32,
    pub tier: RiskTier,
    /// Estimated ten-year risk, percent.
    pub ten_year_risk: f64,
    /// Triggered factor labels, in rule order.
    pub factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    pub fn label(&self) -> &'static str {
        self.tier.label()
    }

    pub fn color(&self) -> &'static str {
        self.tier.color()
    }
}

/// `min(score * 0.3, 30)`.
pub fn ten_year_risk(score: u32) -> f64 {
    (f64::from(score) * TEN_YEAR_RISK_PER_POINT).min(MAX_TEN_YEAR_RISK)
}

/// Score a biomarker record. Total and deterministic.
pub fn assess(record: &BiomarkerRecord) -> RiskAssessment {
    let mut tally = Tally::default();

    let bmi = parse_or(record.bmi.as_deref(), DEFAULT_BMI);
    if bmi > 30.0 {
        tally.add(OBESITY_POINTS, FACTOR_OBESITY, Some(REC_WEIGHT));
    } else if bmi > 25.0 {
        tally.add(OVERWEIGHT_POINTS, FACTOR_OVERWEIGHT, None);
    }

    let systolic = parse_or(record.systolic_bp.as_deref(), DEFAULT_SYSTOLIC);
    let diastolic = parse_or(record.diastolic_bp.as_deref(), DEFAULT_DIASTOLIC);
    if systolic > 140.0 || diastolic > 90.0 {
        tally.add(HYPERTENSION_POINTS, FACTOR_HYPERTENSION, Some(REC_BLOOD_PRESSURE));
    }

    let cholesterol = parse_or(record.cholesterol.as_deref(), DEFAULT_CHOLESTEROL);
    let ldl = parse_or(record.ldl.as_deref(), DEFAULT_LDL);
    if cholesterol > 240.0 || ldl > 130.0 {
        tally.add(CHOLESTEROL_POINTS, FACTOR_CHOLESTEROL, Some(REC_CHOLESTEROL));
    }

    if record.smoking() == Some(SmokingStatus::Current) {
        tally.add(SMOKING_POINTS, FACTOR_SMOKING, Some(REC_SMOKING));
    }

    if matches!(
        record.diabetes_status(),
        Some(DiabetesStatus::Type1 | DiabetesStatus::Type2)
    ) {
        tally.add(DIABETES_POINTS, FACTOR_DIABETES, Some(REC_DIABETES));
    }

    if record.has_family_history() {
        tally.add(FAMILY_HISTORY_POINTS, FACTOR_FAMILY_HISTORY, None);
    }

    tally.finish()
}

#[derive(Default)]
struct Tally {
    points: u32,
    factors: Vec<String>,
    recommendations: Vec<String>,
}

impl Tally {
    fn add(&mut self, points: u32, factor: &str, recommendation: Option<&str>) {
        self.points += points;
        self.factors.push(factor.to_string());
        if let Some(rec) = recommendation {
            self.recommendations.push(rec.to_string());
        }
    }

    fn finish(self) -> RiskAssessment {
        let score = self.points.min(MAX_SCORE);
        RiskAssessment {
            score,
            raw_score: self.points,
            tier: RiskTier::from_score(score),
            ten_year_risk: ten_year_risk(score),
            factors: self.factors,
            recommendations: self.recommendations,
        }
    }
}
