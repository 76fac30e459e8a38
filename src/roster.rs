//! Patient roster and dashboard aggregates.
//!
//! Each patient is summarised by their latest analysis. Patients never
//! analysed stay unassessed rather than being given a placeholder tier.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::enums::{PatientStatus, RiskTier};
use crate::models::{AnalysisRecord, PatientRecord};

/// Recent-patient rows shown on the dashboard.
pub const RECENT_PATIENTS_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterEntry {
    pub id: String,
    pub name: String,
    pub mrn: String,
    pub age: Option<u32>,
    pub gender: String,
    /// Latest analysis date, or registration date when never analysed.
    pub last_activity: DateTime<Utc>,
    pub risk_tier: Option<RiskTier>,
    pub risk_score: Option<u32>,
    pub analysis_count: usize,
    pub registration_date: DateTime<Utc>,
    pub status: PatientStatus,
}

impl RosterEntry {
    /// `history` must be newest first.
    pub fn new(patient: &PatientRecord, history: &[AnalysisRecord]) -> Self {
        let latest = history.first();
        let risk_tier = latest.map(AnalysisRecord::risk_tier);
        let status = match risk_tier {
            Some(RiskTier::High) => PatientStatus::FollowUp,
            _ => PatientStatus::Active,
        };

        Self {
            id: patient.id.clone(),
            name: patient.full_name(),
            mrn: patient.mrn.clone(),
            age: patient.age(),
            gender: patient.details.gender.clone(),
            last_activity: latest
                .map(|a| a.analysis_date)
                .unwrap_or(patient.registration_date),
            risk_tier,
            risk_score: latest.map(AnalysisRecord::risk_score),
            analysis_count: history.len(),
            registration_date: patient.registration_date,
            status,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterFilter {
    /// Case-insensitive match on full name or MRN.
    pub search: Option<String>,
    pub tier: Option<RiskTier>,
    pub status: Option<PatientStatus>,
}

impl RosterFilter {
    pub fn matches(&self, entry: &RosterEntry) -> bool {
        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                let term = term.to_lowercase();
                entry.name.to_lowercase().contains(&term)
                    || entry.mrn.to_lowercase().contains(&term)
            }
        };
        let tier_ok = self.tier.is_none() || self.tier == entry.risk_tier;
        let status_ok = self.status.map_or(true, |s| s == entry.status);

        search_ok && tier_ok && status_ok
    }

    pub fn apply<'a>(&self, entries: &'a [RosterEntry]) -> Vec<&'a RosterEntry> {
        entries.iter().filter(|e| self.matches(e)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub unassessed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_patients: usize,
    pub total_analyses: usize,
    pub distribution: RiskDistribution,
    /// Ids of patients whose latest analysis is high risk.
    pub high_risk_patients: Vec<String>,
    /// Most recently active patients, newest first.
    pub recent: Vec<RosterEntry>,
}

pub fn summarize(entries: &[RosterEntry]) -> DashboardSummary {
    let mut distribution = RiskDistribution::default();
    for entry in entries {
        match entry.risk_tier {
            Some(RiskTier::Low) => distribution.low += 1,
            Some(RiskTier::Medium) => distribution.medium += 1,
            Some(RiskTier::High) => distribution.high += 1,
            None => distribution.unassessed += 1,
        }
    }

    let mut recent = entries.to_vec();
    recent.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
    recent.truncate(RECENT_PATIENTS_LIMIT);

    DashboardSummary {
        total_patients: entries.len(),
        total_analyses: entries.iter().map(|e| e.analysis_count).sum(),
        distribution,
        high_risk_patients: entries
            .iter()
            .filter(|e| e.risk_tier == Some(RiskTier::High))
            .map(|e| e.id.clone())
            .collect(),
        recent,
    }
}
