//! Row appended to the remote results sheet after each assessment.

use chrono::{DateTime, SecondsFormat, Utc};
use physio_core::{Gender, PhysioError, RiskResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::Assessment;

pub const SHEET_NAME: &str = "測定結果";

/// Column headers, in the order of [`SubmissionRow::to_cells`].
pub const SHEET_HEADER: [&str; 11] = [
    "日時",
    "企業名",
    "社員ID",
    "氏名",
    "年齢",
    "性別",
    "握力(kg)",
    "CS-30(回)",
    "バランス(秒)",
    "FFD(cm)",
    "判定フラグ",
];

const FLAG_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubmissionRow {
    pub date: String,
    pub company: String,
    pub id: String,
    pub name: String,
    pub age: u32,
    pub gender: Gender,
    #[serde(rename = "bestGrip")]
    pub best_grip: f64,
    #[serde(rename = "bestCS30")]
    pub best_cs30: f64,
    #[serde(rename = "bestBalance")]
    pub best_balance: f64,
    #[serde(rename = "bestFFD")]
    pub best_ffd: f64,
    pub flags: String,
}

impl SubmissionRow {
    pub fn new(assessment: &Assessment, result: &RiskResult, submitted_at: DateTime<Utc>) -> Self {
        let patient = &assessment.patient;
        Self {
            date: submitted_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            company: patient.company.clone(),
            id: patient.id.clone(),
            name: patient.name.clone(),
            age: patient.age,
            gender: patient.gender,
            best_grip: result.adopted.grip,
            best_cs30: result.adopted.sit_to_stand,
            best_balance: result.adopted.balance,
            best_ffd: result.adopted.flexion,
            flags: result.messages.join(FLAG_SEPARATOR),
        }
    }

    pub fn to_cells(&self) -> Vec<Value> {
        vec![
            Value::from(self.date.clone()),
            Value::from(self.company.clone()),
            Value::from(self.id.clone()),
            Value::from(self.name.clone()),
            Value::from(self.age),
            Value::from(match self.gender {
                Gender::Male => "male",
                Gender::Female => "female",
            }),
            Value::from(self.best_grip),
            Value::from(self.best_cs30),
            Value::from(self.best_balance),
            Value::from(self.best_ffd),
            Value::from(self.flags.clone()),
        ]
    }
}

/// Parse an RFC 3339 timestamp supplied by the caller.
pub fn parse_submitted_at(value: &str) -> Result<DateTime<Utc>, PhysioError> {
    DateTime::parse_from_rfc3339(value.trim())
        .map(|parsed| parsed.with_timezone(&Utc))
        .map_err(|err| PhysioError::Parse(format!("Invalid timestamp {value:?}: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_assessment_value;
    use serde_json::json;

    fn assessment() -> Assessment {
        parse_assessment_value(&json!({
            "patient": { "company": "ACME", "id": "", "name": "Hanako", "age": 72, "gender": "female" },
            "gripStrength": {
                "right": { "first": 15, "second": 16.5 },
                "left": { "first": null, "second": 14 }
            },
            "cs30": { "first": 9, "second": 8 },
            "balanceTime": { "first": 6, "second": 4 },
            "ffd": { "first": 12, "second": 10 }
        }))
        .unwrap()
    }

    #[test]
    fn test_row_fields_and_flag_join() {
        let assessment = assessment();
        let result = assessment.evaluate();
        let at = parse_submitted_at("2026-04-01T09:30:00+09:00").unwrap();
        let row = SubmissionRow::new(&assessment, &result, at);

        assert_eq!(row.date, "2026-04-01T00:30:00.000Z");
        assert_eq!(row.best_grip, 16.5);
        assert_eq!(row.best_cs30, 9.0);
        assert_eq!(row.best_balance, 6.0);
        assert_eq!(row.best_ffd, 10.0);
        assert_eq!(row.flags.matches(FLAG_SEPARATOR).count(), 2);
        assert!(row.flags.starts_with("【サルコペニア疑い】"));
    }

    #[test]
    fn test_row_serializes_sheet_keys() {
        let assessment = assessment();
        let result = assessment.evaluate();
        let at = parse_submitted_at("2026-04-01T00:00:00Z").unwrap();
        let value = serde_json::to_value(SubmissionRow::new(&assessment, &result, at)).unwrap();

        for key in [
            "date",
            "company",
            "id",
            "name",
            "age",
            "gender",
            "bestGrip",
            "bestCS30",
            "bestBalance",
            "bestFFD",
            "flags",
        ] {
            assert!(value.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(value["gender"], json!("female"));
    }

    #[test]
    fn test_cells_match_header() {
        let assessment = assessment();
        let result = assessment.evaluate();
        let at = parse_submitted_at("2026-04-01T00:00:00Z").unwrap();
        let cells = SubmissionRow::new(&assessment, &result, at).to_cells();

        assert_eq!(cells.len(), SHEET_HEADER.len());
        assert_eq!(cells[1], json!("ACME"));
        assert_eq!(cells[4], json!(72));
        assert_eq!(cells[6], json!(16.5));
    }

    #[test]
    fn test_empty_flags_when_no_advisories() {
        let mut assessment = assessment();
        assessment.record.grip.right = physio_core::MeasurementPair::new(Some(30.0), None);
        assessment.record.sit_to_stand = physio_core::MeasurementPair::new(Some(25.0), None);
        assessment.record.balance = physio_core::MeasurementPair::new(Some(20.0), None);
        assessment.record.flexion = physio_core::MeasurementPair::new(Some(-1.0), None);
        let result = assessment.evaluate();
        let at = parse_submitted_at("2026-04-01T00:00:00Z").unwrap();
        assert_eq!(SubmissionRow::new(&assessment, &result, at).flags, "");
    }

    #[test]
    fn test_rejects_bad_timestamp() {
        assert!(matches!(
            parse_submitted_at("yesterday"),
            Err(PhysioError::Parse(_))
        ));
    }
}
