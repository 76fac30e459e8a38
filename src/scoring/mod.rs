//! Biomarker scoring: the risk rule, tier-level care plan and dashboard
//! profile numbers. Everything here is pure.

pub mod care_plan;
pub mod parse;
pub mod profile;
pub mod risk;

pub use risk::{assess, ten_year_risk, RiskAssessment};
