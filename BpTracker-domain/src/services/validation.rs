use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use validator::{Validate, ValidationErrors};

/// Input was outside clinical ranges or internally inconsistent
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

/// Raw values entered by the user, before a reading is created.
///
/// The accepted ranges live only in the `range` attributes below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[validate(schema(function = "validate_pressure_order"))]
pub struct ReadingInput {
    /// Systolic blood pressure (the higher number)
    #[validate(range(min = 70, max = 250, message = "Systolic must be between 70 and 250"))]
    pub systolic: i32,

    /// Diastolic blood pressure (the lower number)
    #[validate(range(min = 40, max = 150, message = "Diastolic must be between 40 and 150"))]
    pub diastolic: i32,

    /// Heart rate in beats per minute
    #[validate(range(min = 30, max = 250, message = "BPM must be between 30 and 250"))]
    pub bpm: i32,
}

fn validate_pressure_order(input: &ReadingInput) -> Result<(), validator::ValidationError> {
    if input.diastolic >= input.systolic {
        let mut error = validator::ValidationError::new("pressure_order");
        error.message = Some(Cow::Owned(format!(
            "Diastolic ({}) must be less than systolic ({})",
            input.diastolic, input.systolic
        )));
        return Err(error);
    }
    Ok(())
}

/// Validate all components of a reading.
///
/// Field ranges are checked first; the systolic/diastolic ordering is only
/// checked once every field is in range.
pub fn validate_reading(systolic: i32, diastolic: i32, bpm: i32) -> Result<ReadingInput, ValidationError> {
    let input = ReadingInput { systolic, diastolic, bpm };

    input.validate().map_err(|errors| {
        let error = ValidationError(describe(&errors));
        debug!("Rejected reading {}/{} {}: {}", systolic, diastolic, bpm, error);
        error
    })?;

    Ok(input)
}

/// Flatten validator errors into one message, in field order
fn describe(errors: &ValidationErrors) -> String {
    const FIELD_ORDER: [&str; 4] = ["systolic", "diastolic", "bpm", "__all__"];

    let field_errors = errors.field_errors();
    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by_key(|(field, _)| {
        FIELD_ORDER
            .iter()
            .position(|known| known == *field)
            .unwrap_or(FIELD_ORDER.len())
    });

    fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |err| {
                let message = err
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("Invalid {}", field));

                match err.params.get("value") {
                    Some(value) => format!("{}, got: {}", message, value),
                    None => message,
                }
            })
        })
        .collect::<Vec<String>>()
        .join("; ")
}
