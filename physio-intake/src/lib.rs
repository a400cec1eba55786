//! Assessment form JSON to engine `InputRecord` converter, plus the
//! submission log row built from an evaluated assessment.

use physio_core::{
    Gender, GripPair, InputRecord, MeasurementPair, PhysioError, RiskResult, ScreeningConfig,
    Subject,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

mod submission;

pub use submission::{parse_submitted_at, SubmissionRow, SHEET_HEADER, SHEET_NAME};

/// Ages outside this range are still evaluated, but are logged.
const EXPECTED_AGE_RANGE: std::ops::RangeInclusive<u32> = 18..=110;

/// Identity fields collected on the first form step.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PatientInfo {
    pub company: String,
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
}

/// One finished assessment session: who was measured and what was recorded.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub patient: PatientInfo,
    pub record: InputRecord,
}

impl Assessment {
    pub fn subject(&self) -> Subject {
        self.record.subject
    }

    /// Run the engine with the default screening cutoffs.
    pub fn evaluate(&self) -> RiskResult {
        physio_core::evaluate(&self.record)
    }

    pub fn evaluate_with(&self, config: &ScreeningConfig) -> RiskResult {
        physio_core::evaluate_with(&self.record, config)
    }
}

/// Parse an assessment from a JSON string.
pub fn parse_assessment_str(document: &str) -> Result<Assessment, PhysioError> {
    let value: Value =
        serde_json::from_str(document).map_err(|err| PhysioError::Parse(err.to_string()))?;
    parse_assessment_value(&value)
}

/// Parse an assessment from a `serde_json::Value`.
pub fn parse_assessment_value(document: &Value) -> Result<Assessment, PhysioError> {
    if !document.is_object() {
        return Err(PhysioError::Parse(
            "Expected a JSON object for the assessment".to_string(),
        ));
    }

    let patient = document
        .get("patient")
        .ok_or_else(|| PhysioError::MissingData("patient".to_string()))?;
    let patient = parse_patient(patient)?;

    let grip = document.get("gripStrength");
    let record = InputRecord {
        subject: Subject {
            age: patient.age,
            gender: patient.gender,
        },
        grip: GripPair {
            right: parse_measurement(grip.and_then(|g| g.get("right")), "gripStrength.right")?,
            left: parse_measurement(grip.and_then(|g| g.get("left")), "gripStrength.left")?,
        },
        sit_to_stand: parse_measurement(document.get("cs30"), "cs30")?,
        balance: parse_measurement(document.get("balanceTime"), "balanceTime")?,
        flexion: parse_measurement(document.get("ffd"), "ffd")?,
    };

    if !EXPECTED_AGE_RANGE.contains(&patient.age) {
        warn!(
            age = patient.age,
            "age outside the expected adult range; nearest norm band will be used"
        );
    }
    if record.flexion.is_empty() {
        warn!("no flexion attempt recorded; adopted FFD falls back to 0 cm");
    }
    debug!(
        company = %patient.company,
        age = patient.age,
        gender = ?patient.gender,
        "parsed assessment"
    );

    Ok(Assessment { patient, record })
}

fn parse_patient(patient: &Value) -> Result<PatientInfo, PhysioError> {
    let age_value = patient
        .get("age")
        .filter(|value| !is_blank(value))
        .ok_or_else(|| PhysioError::MissingData("patient.age".to_string()))?;
    let age = parse_age(age_value)?;

    let gender = match patient.get("gender").and_then(Value::as_str) {
        Some("male") => Gender::Male,
        Some("female") => Gender::Female,
        Some(other) => {
            return Err(PhysioError::InvalidValue {
                field: "patient.gender".to_string(),
                value: other.to_string(),
            })
        }
        None => return Err(PhysioError::MissingData("patient.gender".to_string())),
    };

    Ok(PatientInfo {
        company: text_field(patient, "company"),
        id: text_field(patient, "id"),
        name: text_field(patient, "name"),
        age,
        gender,
    })
}

fn parse_age(value: &Value) -> Result<u32, PhysioError> {
    let parsed = match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    };

    parsed
        .and_then(|age| u32::try_from(age).ok())
        .ok_or_else(|| invalid("patient.age", value))
}

fn text_field(value: &Value, key: &str) -> String {
    match value.get(key) {
        Some(Value::String(text)) => text.trim().to_string(),
        Some(Value::Number(number)) => number.to_string(),
        _ => String::new(),
    }
}

fn parse_measurement(value: Option<&Value>, field: &str) -> Result<MeasurementPair, PhysioError> {
    let Some(value) = value.filter(|value| !value.is_null()) else {
        return Ok(MeasurementPair::missing());
    };

    if !value.is_object() {
        return Err(invalid(field, value));
    }

    Ok(MeasurementPair::new(
        parse_attempt(value.get("first"), &format!("{field}.first"))?,
        parse_attempt(value.get("second"), &format!("{field}.second"))?,
    ))
}

/// `null`, absent and blank form text all mean "not recorded".
fn parse_attempt(value: Option<&Value>, field: &str) -> Result<Option<f64>, PhysioError> {
    let Some(value) = value.filter(|value| !is_blank(value)) else {
        return Ok(None);
    };

    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };

    match number {
        Some(number) if number.is_finite() => Ok(Some(number)),
        _ => Err(invalid(field, value)),
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        _ => false,
    }
}

fn invalid(field: &str, value: &Value) -> PhysioError {
    PhysioError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> Value {
        json!({
            "patient": { "company": "株式会社テスト", "id": "1001", "name": "山田 太郎", "age": 65, "gender": "male" },
            "gripStrength": {
                "right": { "first": 30, "second": 32 },
                "left": { "first": 28, "second": 29 }
            },
            "cs30": { "first": 12, "second": 16 },
            "balanceTime": { "first": 1.5, "second": 1.8 },
            "ffd": { "first": 8, "second": 3 }
        })
    }

    #[test]
    fn test_parse_full_document() {
        let assessment = parse_assessment_value(&document()).unwrap();
        assert_eq!(assessment.patient.company, "株式会社テスト");
        assert_eq!(assessment.patient.id, "1001");
        assert_eq!(assessment.subject().age, 65);
        assert_eq!(assessment.subject().gender, Gender::Male);
        assert_eq!(
            assessment.record.grip.right,
            MeasurementPair::new(Some(30.0), Some(32.0))
        );
        assert_eq!(
            assessment.record.balance,
            MeasurementPair::new(Some(1.5), Some(1.8))
        );
    }

    #[test]
    fn test_null_blank_and_absent_attempts_are_missing() {
        let mut doc = document();
        doc["cs30"] = json!({ "first": null, "second": "  " });
        doc["ffd"] = json!({ "second": "-2.5" });
        doc.as_object_mut().unwrap().remove("balanceTime");

        let assessment = parse_assessment_value(&doc).unwrap();
        assert!(assessment.record.sit_to_stand.is_empty());
        assert!(assessment.record.balance.is_empty());
        assert_eq!(
            assessment.record.flexion,
            MeasurementPair::new(None, Some(-2.5))
        );
    }

    #[test]
    fn test_rejects_non_numeric_attempt() {
        let mut doc = document();
        doc["gripStrength"]["left"]["first"] = json!("strong");
        let err = parse_assessment_value(&doc).unwrap_err();
        assert!(matches!(
            err,
            PhysioError::InvalidValue { ref field, .. } if field == "gripStrength.left.first"
        ));
    }

    #[test]
    fn test_requires_age_and_gender() {
        let mut doc = document();
        doc["patient"]["age"] = Value::Null;
        assert!(matches!(
            parse_assessment_value(&doc),
            Err(PhysioError::MissingData(_))
        ));

        let mut doc = document();
        doc["patient"]["gender"] = json!("other");
        assert!(matches!(
            parse_assessment_value(&doc),
            Err(PhysioError::InvalidValue { .. })
        ));

        let mut doc = document();
        doc["patient"]["age"] = json!(-3);
        assert!(matches!(
            parse_assessment_value(&doc),
            Err(PhysioError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_age_accepts_form_text() {
        let mut doc = document();
        doc["patient"]["age"] = json!("47");
        assert_eq!(parse_assessment_value(&doc).unwrap().patient.age, 47);
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(
            parse_assessment_str("{ not json"),
            Err(PhysioError::Parse(_))
        ));
        assert!(matches!(
            parse_assessment_str("[]"),
            Err(PhysioError::Parse(_))
        ));
    }

    #[test]
    fn test_evaluate_from_assessment() {
        let assessment = parse_assessment_value(&document()).unwrap();
        let result = assessment.evaluate();
        assert!(result.is_fall_risk);
        assert!(!result.is_sarcopenia_risk);
        assert_eq!(result.adopted.flexion, 3.0);
    }
}
