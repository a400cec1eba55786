//! Bridge WASM <-> JavaScript cho form đo thể lực chạy trên trình duyệt.

use physio_core::{PhysioError, ScreeningConfig};
use physio_intake::{parse_assessment_value, parse_submitted_at, SubmissionRow};
use serde::Deserialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

/// Cấu hình từ JS: trường nào có thì ghi đè giá trị mặc định.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct JsScreeningConfig {
    pub grip_cutoff_male: Option<f64>,
    pub grip_cutoff_female: Option<f64>,
    pub sit_to_stand_cutoff_male: Option<f64>,
    pub sit_to_stand_cutoff_female: Option<f64>,
    pub fall_sit_to_stand_max: Option<f64>,
    pub fall_balance_min: Option<f64>,
    pub fall_caution_sit_to_stand_max: Option<f64>,
    pub flexibility_low_above: Option<f64>,
    pub item_sit_to_stand_max: Option<f64>,
    pub item_balance_min: Option<f64>,
}

impl From<JsScreeningConfig> for ScreeningConfig {
    fn from(cfg: JsScreeningConfig) -> Self {
        let base = ScreeningConfig::default();
        ScreeningConfig {
            grip_cutoff_male: cfg.grip_cutoff_male.unwrap_or(base.grip_cutoff_male),
            grip_cutoff_female: cfg.grip_cutoff_female.unwrap_or(base.grip_cutoff_female),
            sit_to_stand_cutoff_male: cfg
                .sit_to_stand_cutoff_male
                .unwrap_or(base.sit_to_stand_cutoff_male),
            sit_to_stand_cutoff_female: cfg
                .sit_to_stand_cutoff_female
                .unwrap_or(base.sit_to_stand_cutoff_female),
            fall_sit_to_stand_max: cfg
                .fall_sit_to_stand_max
                .unwrap_or(base.fall_sit_to_stand_max),
            fall_balance_min: cfg.fall_balance_min.unwrap_or(base.fall_balance_min),
            fall_caution_sit_to_stand_max: cfg
                .fall_caution_sit_to_stand_max
                .unwrap_or(base.fall_caution_sit_to_stand_max),
            flexibility_low_above: cfg
                .flexibility_low_above
                .unwrap_or(base.flexibility_low_above),
            item_sit_to_stand_max: cfg
                .item_sit_to_stand_max
                .unwrap_or(base.item_sit_to_stand_max),
            item_balance_min: cfg.item_balance_min.unwrap_or(base.item_balance_min),
        }
    }
}

#[wasm_bindgen]
pub fn evaluate_assessment(input: JsValue, config: Option<JsValue>) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let document = from_value::<serde_json::Value>(input)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON assessment: {err}")))?;
    let assessment =
        parse_assessment_value(&document).map_err(|err| JsValue::from_str(&format_error(err)))?;

    let cfg = match config {
        Some(js_cfg) => {
            let cfg: JsScreeningConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            ScreeningConfig::from(cfg)
        }
        None => ScreeningConfig::default(),
    };

    let result = assessment.evaluate_with(&cfg);

    to_value(&result).map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Dựng dòng gửi lên bảng kết quả; thời điểm do JS truyền vào (ISO 8601).
#[wasm_bindgen]
pub fn build_submission_row(input: JsValue, submitted_at: String) -> Result<JsValue, JsValue> {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();

    let document = from_value::<serde_json::Value>(input)
        .map_err(|err| JsValue::from_str(&format!("Không đọc được JSON assessment: {err}")))?;
    let assessment =
        parse_assessment_value(&document).map_err(|err| JsValue::from_str(&format_error(err)))?;
    let at = parse_submitted_at(&submitted_at).map_err(|err| JsValue::from_str(&format_error(err)))?;

    let result = assessment.evaluate();
    let row = SubmissionRow::new(&assessment, &result, at);

    to_value(&row).map_err(|err| JsValue::from_str(&format!("Không serialize dòng gửi: {err}")))
}

fn format_error(err: PhysioError) -> String {
    format!("Assessment error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = ScreeningConfig::from(JsScreeningConfig {
            grip_cutoff_female: Some(20.0),
            ..JsScreeningConfig::default()
        });
        assert_eq!(cfg.grip_cutoff_female, 20.0);
        assert_eq!(cfg.grip_cutoff_male, 28.0);
        assert_eq!(cfg.fall_balance_min, 2.0);
    }

    #[test]
    fn test_empty_config_is_default() {
        assert_eq!(
            ScreeningConfig::from(JsScreeningConfig::default()),
            ScreeningConfig::default()
        );
    }
}
