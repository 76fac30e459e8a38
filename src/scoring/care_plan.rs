//! Tier-level follow-up plan and ECG summary attached to stored analyses.
//! Unlike the factor recommendations in [`super::risk`], these depend only on
//! the tier.

use super::parse::parse_or;
use crate::models::enums::RiskTier;
use crate::models::{BiomarkerRecord, EcgSummary};

const DEFAULT_HEART_RATE: f64 = 72.0;
const DEFAULT_RHYTHM: &str = "Normal sinus rhythm";

const LOW_PLAN: [&str; 4] = [
    "Continue current lifestyle and medication regimen",
    "Maintain regular exercise routine",
    "Follow-up in 6 months",
    "Continue dietary modifications",
];

const MEDIUM_PLAN: [&str; 4] = [
    "Increase physical activity to 150 minutes per week",
    "Consider medication adjustment",
    "Follow-up in 3 months",
    "Dietary consultation recommended",
];

const HIGH_PLAN: [&str; 4] = [
    "Immediate medical intervention required",
    "Start intensive medication therapy",
    "Follow-up in 4-6 weeks",
    "Consider specialist referral",
];

const LOW_ECG: [&str; 4] = [
    "Normal sinus rhythm detected",
    "Heart rate within normal range",
    "No significant abnormalities detected",
    "Regular P-wave morphology",
];

const MEDIUM_ECG: [&str; 4] = [
    "Normal sinus rhythm detected",
    "Heart rate slightly elevated",
    "Minor ST-segment depression noted",
    "No significant arrhythmias detected",
];

const HIGH_ECG: [&str; 4] = [
    "Sinus rhythm with irregular intervals",
    "Tachycardia detected",
    "Significant ST-segment changes",
    "Occasional premature beats detected",
];

pub fn care_plan(tier: RiskTier) -> Vec<String> {
    let plan = match tier {
        RiskTier::Low => LOW_PLAN,
        RiskTier::Medium => MEDIUM_PLAN,
        RiskTier::High => HIGH_PLAN,
    };
    plan.iter().map(|s| s.to_string()).collect()
}

pub fn ecg_findings(tier: RiskTier) -> Vec<String> {
    let findings = match tier {
        RiskTier::Low => LOW_ECG,
        RiskTier::Medium => MEDIUM_ECG,
        RiskTier::High => HIGH_ECG,
    };
    findings.iter().map(|s| s.to_string()).collect()
}

pub fn ecg_summary(record: &BiomarkerRecord, tier: RiskTier) -> EcgSummary {
    let rhythm = record
        .rhythm
        .as_deref()
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or(DEFAULT_RHYTHM);

    EcgSummary {
        heart_rate: parse_or(record.heart_rate.as_deref(), DEFAULT_HEART_RATE),
        rhythm: rhythm.to_string(),
        findings: ecg_findings(tier),
    }
}
