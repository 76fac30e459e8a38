//! Presentation-neutral numbers behind the results dashboard: each biomarker
//! against its optimal value, and a five-axis health profile (0-100, higher
//! is healthier).

use serde::Serialize;

use super::parse::parse_or;
use super::risk::{DEFAULT_BMI, DEFAULT_CHOLESTEROL, DEFAULT_LDL, DEFAULT_SYSTOLIC};
use crate::models::BiomarkerRecord;

const DEFAULT_HDL: f64 = 50.0;
const DEFAULT_ACTIVITY_HOURS: f64 = 2.0;
const DEFAULT_SLEEP_HOURS: f64 = 7.0;
const TARGET_SLEEP_HOURS: f64 = 8.0;
const OPTIMAL_BMI: f64 = 22.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BiomarkerComparison {
    pub name: &'static str,
    pub value: f64,
    pub optimal: f64,
    pub unit: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthAxis {
    pub subject: &'static str,
    pub value: f64,
}

pub fn biomarker_comparisons(record: &BiomarkerRecord) -> Vec<BiomarkerComparison> {
    let row = |name, raw: &Option<String>, default, optimal, unit| BiomarkerComparison {
        name,
        value: parse_or(raw.as_deref(), default),
        optimal,
        unit,
    };
    vec![
        row("Cholesterol", &record.cholesterol, DEFAULT_CHOLESTEROL, 200.0, "mg/dL"),
        row("LDL", &record.ldl, DEFAULT_LDL, 100.0, "mg/dL"),
        row("HDL", &record.hdl, DEFAULT_HDL, 60.0, "mg/dL"),
        row("Systolic BP", &record.systolic_bp, DEFAULT_SYSTOLIC, 120.0, "mmHg"),
        row("BMI", &record.bmi, DEFAULT_BMI, OPTIMAL_BMI, "kg/m²"),
    ]
}

/// Five-axis profile, each axis clamped to 0-100.
pub fn health_profile(record: &BiomarkerRecord) -> Vec<HealthAxis> {
    let cholesterol = parse_or(record.cholesterol.as_deref(), DEFAULT_CHOLESTEROL);
    let systolic = parse_or(record.systolic_bp.as_deref(), DEFAULT_SYSTOLIC);
    let bmi = parse_or(record.bmi.as_deref(), DEFAULT_BMI);
    let activity = parse_or(record.physical_activity.as_deref(), DEFAULT_ACTIVITY_HOURS);
    let sleep = parse_or(record.sleep_hours.as_deref(), DEFAULT_SLEEP_HOURS);

    let axes = [
        ("Cholesterol", 100.0 - (cholesterol - 150.0)),
        ("Blood Pressure", 100.0 - (systolic - 90.0) / 50.0 * 100.0),
        ("BMI", 100.0 - (bmi - OPTIMAL_BMI).abs() / 10.0 * 100.0),
        ("Lifestyle", activity * 20.0),
        ("Sleep", sleep / TARGET_SLEEP_HOURS * 100.0),
    ];

    axes.into_iter()
        .map(|(subject, value)| HealthAxis {
            subject,
            value: value.clamp(0.0, 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn axis(profile: &[HealthAxis], subject: &str) -> f64 {
        profile.iter().find(|a| a.subject == subject).unwrap().value
    }

    #[test]
    fn comparisons_use_defaults() {
        let rows = biomarker_comparisons(&BiomarkerRecord::default());
        let values: Vec<f64> = rows.iter().map(|r| r.value).collect();
        assert_eq!(values, vec![200.0, 100.0, 50.0, 120.0, 25.0]);
        assert_eq!(rows[2].optimal, 60.0);
        assert_eq!(rows[4].unit, "kg/m²");
    }

    #[test]
    fn default_profile() {
        let profile = health_profile(&BiomarkerRecord::default());
        assert_eq!(profile.len(), 5);
        assert_eq!(axis(&profile, "Cholesterol"), 50.0);
        assert_eq!(axis(&profile, "Blood Pressure"), 40.0);
        assert!((axis(&profile, "BMI") - 70.0).abs() < 1e-9);
        assert_eq!(axis(&profile, "Lifestyle"), 40.0);
        assert_eq!(axis(&profile, "Sleep"), 87.5);
    }

    #[test]
    fn lifestyle_scales_activity_hours() {
        let lifestyle = |hours: &str| {
            axis(&health_profile(&BiomarkerRecord::default().with_physical_activity(hours)), "Lifestyle")
        };
        assert_eq!(lifestyle("3"), 60.0);
        assert_eq!(lifestyle("5"), 100.0);
        assert_eq!(lifestyle("12"), 100.0);
        assert_eq!(lifestyle("-1"), 0.0);
    }

    #[test]
    fn axes_are_clamped() {
        let record = BiomarkerRecord::default()
            .with_cholesterol("320")
            .with_systolic_bp("80")
            .with_bmi("45")
            .with_physical_activity("12")
            .with_sleep_hours("11");
        let profile = health_profile(&record);
        assert_eq!(axis(&profile, "Cholesterol"), 0.0);
        assert_eq!(axis(&profile, "Blood Pressure"), 100.0);
        assert_eq!(axis(&profile, "BMI"), 0.0);
        assert_eq!(axis(&profile, "Lifestyle"), 100.0);
        assert_eq!(axis(&profile, "Sleep"), 100.0);
    }
}
