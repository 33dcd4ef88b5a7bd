use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when an abbreviation does not name a known category
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown blood pressure category: {0:?}")]
pub struct UnknownCategory(pub String);

/// Blood pressure category based on AHA guidelines.
///
/// Variants are declared in ascending severity, so the derived `Ord`
/// compares categories by rank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum BloodPressureCategory {
    /// Hypotension (systolic < 90 or diastolic < 60)
    Hypotension,

    /// Normal blood pressure
    Normal,

    /// Elevated blood pressure (systolic 120-129 and diastolic < 80)
    Elevated,

    /// Stage 1 Hypertension (systolic 130-139 or diastolic 80-89)
    Hypertension1,

    /// Stage 2 Hypertension (systolic >= 140 or diastolic >= 90)
    Hypertension2,

    /// Hypertensive crisis (systolic > 180 or diastolic > 120)
    HypertensiveCrisis,
}

impl BloodPressureCategory {
    /// All categories in ascending order of severity
    pub const ALL: [BloodPressureCategory; 6] = [
        BloodPressureCategory::Hypotension,
        BloodPressureCategory::Normal,
        BloodPressureCategory::Elevated,
        BloodPressureCategory::Hypertension1,
        BloodPressureCategory::Hypertension2,
        BloodPressureCategory::HypertensiveCrisis,
    ];

    /// Severity rank from 1 (Hypotension) to 6 (Hypertensive Crisis)
    pub fn rank(self) -> u8 {
        match self {
            BloodPressureCategory::Hypotension => 1,
            BloodPressureCategory::Normal => 2,
            BloodPressureCategory::Elevated => 3,
            BloodPressureCategory::Hypertension1 => 4,
            BloodPressureCategory::Hypertension2 => 5,
            BloodPressureCategory::HypertensiveCrisis => 6,
        }
    }

    /// Full display name
    pub fn name(self) -> &'static str {
        match self {
            BloodPressureCategory::Hypotension => "Hypotension",
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "Hypertension Stage 1",
            BloodPressureCategory::Hypertension2 => "Hypertension Stage 2",
            BloodPressureCategory::HypertensiveCrisis => "Hypertensive Crisis",
        }
    }

    /// Short name stored in the `Category` column
    pub fn abbreviation(self) -> &'static str {
        match self {
            BloodPressureCategory::Hypotension => "Low",
            BloodPressureCategory::Normal => "Normal",
            BloodPressureCategory::Elevated => "Elevated",
            BloodPressureCategory::Hypertension1 => "High-1",
            BloodPressureCategory::Hypertension2 => "High-2",
            BloodPressureCategory::HypertensiveCrisis => "Crisis",
        }
    }

    /// Hex color used for chart bands
    pub fn color(self) -> &'static str {
        match self {
            BloodPressureCategory::Hypotension => "#3498DB",
            BloodPressureCategory::Normal => "#2ECC71",
            BloodPressureCategory::Elevated => "#F39C12",
            BloodPressureCategory::Hypertension1 => "#E67E22",
            BloodPressureCategory::Hypertension2 => "#E74C3C",
            BloodPressureCategory::HypertensiveCrisis => "#C0392B",
        }
    }

    /// Exact-match lookup of a category by its abbreviation
    pub fn from_abbreviation(text: &str) -> Result<Self, UnknownCategory> {
        Self::ALL
            .into_iter()
            .find(|category| category.abbreviation() == text)
            .ok_or_else(|| UnknownCategory(text.to_string()))
    }
}

impl fmt::Display for BloodPressureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BloodPressureCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_abbreviation(s)
    }
}

impl TryFrom<String> for BloodPressureCategory {
    type Error = UnknownCategory;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_abbreviation(&value)
    }
}

impl From<BloodPressureCategory> for String {
    fn from(category: BloodPressureCategory) -> Self {
        category.abbreviation().to_string()
    }
}
