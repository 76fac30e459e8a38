//! Demo roster: three patients with three monthly analyses each.
//!
//! Biomarkers start from a per-profile baseline and are jittered with the
//! caller's RNG, then scored like any other analysis. Baselines keep each
//! patient inside their intended tier whatever the jitter.

use chrono::{DateTime, Datelike, Duration, Months, NaiveTime, Utc};
use rand::Rng;

use super::{PatientRepository, StoreError};
use crate::models::{AnalysisRecord, AnalysisRequest, BiomarkerRecord, NewPatient, PatientRecord};
use crate::session::DEMO_USER_ID;

/// Analyses generated per demo patient.
pub const SEEDED_MONTHS: u32 = 3;
const SEED_DAY_OF_MONTH: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Profile {
    Low,
    Medium,
    High,
}

struct Baseline {
    systolic: i32,
    diastolic: i32,
    ldl: i32,
    cholesterol: i32,
    bmi: f64,
    hba1c: f64,
    heart_rate: i32,
    smoking: &'static str,
    diabetes: &'static str,
    activity_hours: &'static str,
    sleep_hours: &'static str,
}

impl Profile {
    fn baseline(self) -> Baseline {
        match self {
            // Hypertension + diabetes: 42-52 points.
            Self::Medium => Baseline {
                systolic: 150,
                diastolic: 88,
                ldl: 115,
                cholesterol: 205,
                bmi: 24.0,
                hba1c: 7.0,
                heart_rate: 78,
                smoking: "never",
                diabetes: "type2",
                activity_hours: "3",
                sleep_hours: "6.5",
            },
            // Hypertension + cholesterol + smoking + overweight: 71-81 points.
            Self::High => Baseline {
                systolic: 155,
                diastolic: 95,
                ldl: 165,
                cholesterol: 250,
                bmi: 28.0,
                hba1c: 6.1,
                heart_rate: 88,
                smoking: "current",
                diabetes: "prediabetic",
                activity_hours: "1",
                sleep_hours: "5.5",
            },
            // Nothing triggers; family history adds at most 10.
            Self::Low => Baseline {
                systolic: 118,
                diastolic: 75,
                ldl: 95,
                cholesterol: 180,
                bmi: 22.5,
                hba1c: 5.4,
                heart_rate: 70,
                smoking: "never",
                diabetes: "none",
                activity_hours: "5",
                sleep_hours: "7.5",
            },
        }
    }
}

struct DemoPatient {
    id: &'static str,
    mrn: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    age: &'static str,
    gender: &'static str,
    contact_no: &'static str,
    email: &'static str,
    state: &'static str,
    district: &'static str,
    city: &'static str,
    pincode: &'static str,
    conditions: &'static [&'static str],
    registered_days_ago: i64,
    profile: Profile,
}

const DEMO_PATIENTS: [DemoPatient; 3] = [
    DemoPatient {
        id: "PAT001",
        mrn: "MRN2024001",
        first_name: "Sarah",
        last_name: "Johnson",
        age: "45",
        gender: "female",
        contact_no: "+1-555-0123",
        email: "sarah.johnson@email.com",
        state: "California",
        district: "Los Angeles",
        city: "Los Angeles",
        pincode: "90210",
        conditions: &["Hypertension", "Diabetes Type 2"],
        registered_days_ago: 180,
        profile: Profile::Medium,
    },
    DemoPatient {
        id: "PAT002",
        mrn: "MRN2024002",
        first_name: "Michael",
        last_name: "Chen",
        age: "52",
        gender: "male",
        contact_no: "+1-555-0124",
        email: "michael.chen@email.com",
        state: "New York",
        district: "Manhattan",
        city: "New York",
        pincode: "10001",
        conditions: &["High Cholesterol", "Family History"],
        registered_days_ago: 150,
        profile: Profile::High,
    },
    DemoPatient {
        id: "PAT003",
        mrn: "MRN2024003",
        first_name: "Emma",
        last_name: "Rodriguez",
        age: "38",
        gender: "female",
        contact_no: "+1-555-0125",
        email: "emma.rodriguez@email.com",
        state: "Texas",
        district: "Harris",
        city: "Houston",
        pincode: "77001",
        conditions: &[],
        registered_days_ago: 120,
        profile: Profile::Low,
    },
];

fn jitter_int(rng: &mut impl Rng, base: i32, spread: i32) -> String {
    (base + rng.gen_range(-spread..=spread)).to_string()
}

fn jitter_tenths(rng: &mut impl Rng, base: f64, spread: f64) -> String {
    let value = base + rng.gen_range(-spread..=spread);
    format!("{:.1}", (value * 10.0).round() / 10.0)
}

fn biomarkers(profile: Profile, rng: &mut impl Rng) -> BiomarkerRecord {
    let b = profile.baseline();
    let family_history = if rng.gen_bool(0.5) { "yes" } else { "no" };

    BiomarkerRecord::default()
        .with_systolic_bp(jitter_int(rng, b.systolic, 5))
        .with_diastolic_bp(jitter_int(rng, b.diastolic, 2))
        .with_ldl(jitter_int(rng, b.ldl, 10))
        .with_cholesterol(jitter_int(rng, b.cholesterol, 10))
        .with_bmi(jitter_tenths(rng, b.bmi, 0.5))
        .with_hba1c(jitter_tenths(rng, b.hba1c, 0.3))
        .with_heart_rate(jitter_int(rng, b.heart_rate, 5))
        .with_smoking_status(b.smoking)
        .with_diabetes(b.diabetes)
        .with_family_history(family_history)
        .with_physical_activity(b.activity_hours)
        .with_sleep_hours(b.sleep_hours)
}

/// Mid-month timestamp `months_back` months before `now`.
fn seeded_date(now: DateTime<Utc>, months_back: u32) -> DateTime<Utc> {
    let date = now
        .date_naive()
        .checked_sub_months(Months::new(months_back))
        .and_then(|d| d.with_day(SEED_DAY_OF_MONTH))
        .unwrap_or_else(|| now.date_naive());
    date.and_time(NaiveTime::from_hms_opt(10, 0, 0).unwrap_or_default())
        .and_utc()
}

/// Build the demo roster without touching a store.
pub fn demo_dataset(
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> (Vec<PatientRecord>, Vec<AnalysisRecord>) {
    let mut patients = Vec::with_capacity(DEMO_PATIENTS.len());
    let mut analyses = Vec::new();

    for demo in &DEMO_PATIENTS {
        let registered = now - Duration::days(demo.registered_days_ago);
        patients.push(PatientRecord {
            id: demo.id.into(),
            mrn: demo.mrn.into(),
            user_id: DEMO_USER_ID.into(),
            details: NewPatient {
                first_name: demo.first_name.into(),
                last_name: demo.last_name.into(),
                age: demo.age.into(),
                gender: demo.gender.into(),
                contact_no: demo.contact_no.into(),
                email: demo.email.into(),
                state: demo.state.into(),
                district: demo.district.into(),
                city: demo.city.into(),
                pincode: demo.pincode.into(),
                existing_conditions: demo.conditions.iter().map(|c| c.to_string()).collect(),
            },
            registration_date: registered,
            created_at: registered,
        });

        for months_back in 0..SEEDED_MONTHS {
            // Oldest seeded period is the 1st month.
            let period = SEEDED_MONTHS - months_back;
            let request = AnalysisRequest {
                patient_id: demo.id.into(),
                month: period as u8,
                biomarkers: biomarkers(demo.profile, rng),
                clinical_notes: None,
            };
            let mut record = AnalysisRecord::from_request(
                format!("ANA{}_M{}", demo.id, months_back + 1),
                DEMO_USER_ID,
                request,
                seeded_date(now, months_back),
            );
            record.clinical_notes = Some(format!(
                "Assessment {period}: Patient showing {} cardiovascular risk.",
                record.risk_tier().as_str()
            ));
            analyses.push(record);
        }
    }

    (patients, analyses)
}

/// Load the demo roster into `store`.
pub fn seed_demo_data(
    store: &dyn PatientRepository,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    let (patients, analyses) = demo_dataset(rng, now);
    let (patient_count, analysis_count) = (patients.len(), analyses.len());

    for patient in patients {
        store.insert_patient(patient)?;
    }
    for analysis in analyses {
        store.insert_analysis(analysis)?;
    }

    tracing::info!(
        patients = patient_count,
        analyses = analysis_count,
        "Demo data seeded"
    );
    Ok(())
}
