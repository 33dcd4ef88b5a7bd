use crate::entities::category::{BloodPressureCategory, UnknownCategory};

/// Categorize blood pressure based on measurements.
///
/// Rules are checked in order and the first match wins, so the worse of the
/// two numbers decides the hypertensive tiers before hypotension is
/// considered.
pub fn classify(systolic: i32, diastolic: i32) -> BloodPressureCategory {
    if systolic > 180 || diastolic > 120 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140 || diastolic >= 90 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::Hypertension1
    } else if (120..130).contains(&systolic) && diastolic < 80 {
        BloodPressureCategory::Elevated
    } else if systolic < 90 || diastolic < 60 {
        BloodPressureCategory::Hypotension
    } else {
        BloodPressureCategory::Normal
    }
}

/// All categories in ascending order of severity
pub fn all_categories() -> [BloodPressureCategory; 6] {
    BloodPressureCategory::ALL
}

/// Look up a category by its stored abbreviation
pub fn category_from_abbreviation(text: &str) -> Result<BloodPressureCategory, UnknownCategory> {
    BloodPressureCategory::from_abbreviation(text)
}
