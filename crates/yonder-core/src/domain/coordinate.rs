use serde::Deserialize;

use crate::ValidationError;

/// Coordinate as it appears on the wire.
///
/// Some services send `"37.42"`, others `37.42`; both coerce to `f64`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Coordinate {
    Number(f64),
    Text(String),
}

impl Coordinate {
    pub fn to_f64(&self, field: &'static str) -> Result<f64, ValidationError> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => {
                text.trim()
                    .parse::<f64>()
                    .map_err(|_| ValidationError::NonNumericValue {
                        field,
                        value: text.clone(),
                    })?
            }
        };

        if !value.is_finite() {
            return Err(ValidationError::NonFiniteValue { field });
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(value: serde_json::Value) -> Coordinate {
        serde_json::from_value(value).expect("coordinate should deserialize")
    }

    #[test]
    fn numbers_and_numeric_strings_coerce() {
        assert_eq!(coordinate(serde_json::json!(37.4)).to_f64("lat"), Ok(37.4));
        assert_eq!(
            coordinate(serde_json::json!(" -122.08 ")).to_f64("lng"),
            Ok(-122.08)
        );
    }

    #[test]
    fn non_numeric_text_is_rejected_not_zeroed() {
        let error = coordinate(serde_json::json!("north"))
            .to_f64("lat")
            .expect_err("must reject");
        assert_eq!(
            error,
            ValidationError::NonNumericValue {
                field: "lat",
                value: String::from("north")
            }
        );
    }

    #[test]
    fn nan_text_is_rejected() {
        let error = coordinate(serde_json::json!("NaN"))
            .to_f64("lon")
            .expect_err("must reject");
        assert_eq!(error, ValidationError::NonFiniteValue { field: "lon" });
    }

    #[test]
    fn null_and_objects_do_not_deserialize() {
        assert!(serde_json::from_value::<Coordinate>(serde_json::Value::Null).is_err());
        assert!(serde_json::from_value::<Coordinate>(serde_json::json!({"v": 1})).is_err());
    }
}
