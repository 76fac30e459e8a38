use serde::{Deserialize, Serialize};

use super::enums::{DiabetesStatus, SmokingStatus};

/// Biomarker form as entered for one patient and one period.
///
/// Every field is the raw form string. Numeric fields are parsed leniently
/// at scoring time (see [`crate::scoring::parse`]), so a record never fails
/// to construct.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BiomarkerRecord {
    pub bmi: Option<String>,
    pub systolic_bp: Option<String>,
    pub diastolic_bp: Option<String>,
    /// Total cholesterol, mg/dL.
    pub cholesterol: Option<String>,
    pub ldl: Option<String>,
    pub hdl: Option<String>,
    pub hba1c: Option<String>,
    pub hs_crp: Option<String>,
    pub smoking_status: Option<String>,
    pub diabetes: Option<String>,
    /// "yes" / "no".
    pub family_history: Option<String>,
    /// Hours per week.
    pub physical_activity: Option<String>,
    pub sleep_hours: Option<String>,
    pub diet_quality: Option<String>,
    pub stress_level: Option<String>,
    pub comorbidities: Option<String>,
    pub heart_rate: Option<String>,
    pub rhythm: Option<String>,
}

macro_rules! with_field {
    ($($method:ident => $field:ident),+ $(,)?) => {
        impl BiomarkerRecord {
            $(
                pub fn $method(mut self, value: impl Into<String>) -> Self {
                    self.$field = Some(value.into());
                    self
                }
            )+
        }
    };
}

with_field!(
    with_bmi => bmi,
    with_systolic_bp => systolic_bp,
    with_diastolic_bp => diastolic_bp,
    with_cholesterol => cholesterol,
    with_ldl => ldl,
    with_hdl => hdl,
    with_hba1c => hba1c,
    with_hs_crp => hs_crp,
    with_smoking_status => smoking_status,
    with_diabetes => diabetes,
    with_family_history => family_history,
    with_physical_activity => physical_activity,
    with_sleep_hours => sleep_hours,
    with_diet_quality => diet_quality,
    with_stress_level => stress_level,
    with_comorbidities => comorbidities,
    with_heart_rate => heart_rate,
    with_rhythm => rhythm,
);

impl BiomarkerRecord {
    /// Smoking status, if the field holds a recognised value.
    pub fn smoking(&self) -> Option<SmokingStatus> {
        self.smoking_status.as_deref()?.trim().parse().ok()
    }

    /// Diabetes status, if the field holds a recognised value.
    pub fn diabetes_status(&self) -> Option<DiabetesStatus> {
        self.diabetes.as_deref()?.trim().parse().ok()
    }

    pub fn has_family_history(&self) -> bool {
        self.family_history.as_deref().map(str::trim) == Some("yes")
    }
}
