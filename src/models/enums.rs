use serde::{Deserialize, Serialize};

use super::ModelError;

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::str::FromStr for $name {
            type Err = ModelError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(ModelError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

str_enum!(SmokingStatus {
    Never => "never",
    Former => "former",
    Current => "current",
});

str_enum!(DiabetesStatus {
    None => "none",
    Prediabetic => "prediabetic",
    Type1 => "type1",
    Type2 => "type2",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
    Other => "other",
});

// Derived from the latest risk tier, never stored.
str_enum!(PatientStatus {
    Active => "active",
    FollowUp => "follow_up",
});

str_enum!(Trend {
    Improving => "improving",
    Stable => "stable",
    Declining => "declining",
});

impl Trend {
    /// Direction of travel from `previous` to `current` risk score.
    pub fn between(current: u32, previous: u32) -> Self {
        match current.cmp(&previous) {
            std::cmp::Ordering::Less => Self::Improving,
            std::cmp::Ordering::Equal => Self::Stable,
            std::cmp::Ordering::Greater => Self::Declining,
        }
    }
}

str_enum!(RiskTier {
    Low => "low",
    Medium => "medium",
    High => "high",
});

/// Scores below this are low risk.
pub const MEDIUM_RISK_THRESHOLD: u32 = 30;
/// Scores at or above this are high risk.
pub const HIGH_RISK_THRESHOLD: u32 = 60;

impl RiskTier {
    pub fn from_score(score: u32) -> Self {
        if score < MEDIUM_RISK_THRESHOLD {
            Self::Low
        } else if score < HIGH_RISK_THRESHOLD {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Display label shown on badges and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low Risk",
            Self::Medium => "Medium Risk",
            Self::High => "High Risk",
        }
    }

    /// Hex color paired with the tier.
    pub fn color(&self) -> &'static str {
        match self {
            Self::Low => "#22C55E",
            Self::Medium => "#F59E0B",
            Self::High => "#EF4444",
        }
    }
}
