//! Logic lõi đánh giá thể lực: chọn giá trị chấp nhận, chấm điểm chuẩn hóa,
//! phân loại nguy cơ và dựng hồ sơ radar.

use serde::{Deserialize, Serialize};

pub mod adopt;
pub mod classify;
pub mod norms;
pub mod profile;

pub use adopt::AdoptedValues;
pub use classify::{Advisory, ItemRisks, ScreeningFlags};
pub use profile::{AgeGroup, Metric, ProfilePoint};

/// Giới tính dùng để tra bảng chuẩn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
}

/// Hai lần đo của cùng một chỉ số. `None` nghĩa là lần đo đó không được ghi.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct MeasurementPair {
    pub attempt1: Option<f64>,
    pub attempt2: Option<f64>,
}

impl MeasurementPair {
    pub fn new(attempt1: Option<f64>, attempt2: Option<f64>) -> Self {
        Self { attempt1, attempt2 }
    }

    /// Cặp đo không có lần nào được ghi.
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Lực nắm tay hai bên, mỗi bên hai lần.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct GripPair {
    pub right: MeasurementPair,
    pub left: MeasurementPair,
}

/// Thông tin nhân khẩu học dùng cho tra bảng. Tuổi không bị kiểm tra phạm vi.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Subject {
    pub age: u32,
    pub gender: Gender,
}

/// Bản ghi đầu vào của một phiên đo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct InputRecord {
    pub subject: Subject,
    pub grip: GripPair,
    /// Số lần đứng lên ngồi xuống trong 30 giây (CS-30).
    pub sit_to_stand: MeasurementPair,
    /// Số giây đứng một chân nhắm mắt.
    pub balance: MeasurementPair,
    /// Khoảng cách đầu ngón tay tới sàn (cm), âm nghĩa là vượt qua sàn.
    pub flexion: MeasurementPair,
}

/// Các ngưỡng sàng lọc lâm sàng. `Default` là bộ ngưỡng AWGS 2019 + CS-30.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScreeningConfig {
    pub grip_cutoff_male: f64,
    pub grip_cutoff_female: f64,
    pub sit_to_stand_cutoff_male: f64,
    pub sit_to_stand_cutoff_female: f64,
    /// CS-30 nhỏ hơn hoặc bằng giá trị này là nguy cơ té ngã.
    pub fall_sit_to_stand_max: f64,
    /// Thăng bằng dưới số giây này là nguy cơ té ngã.
    pub fall_balance_min: f64,
    pub fall_caution_sit_to_stand_max: f64,
    /// FFD lớn hơn giá trị này là giảm độ dẻo.
    pub flexibility_low_above: f64,
    pub item_sit_to_stand_max: f64,
    pub item_balance_min: f64,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            grip_cutoff_male: 28.0,
            grip_cutoff_female: 18.0,
            sit_to_stand_cutoff_male: 17.0,
            sit_to_stand_cutoff_female: 15.0,
            fall_sit_to_stand_max: 14.0,
            fall_balance_min: 2.0,
            fall_caution_sit_to_stand_max: 19.0,
            flexibility_low_above: 5.0,
            item_sit_to_stand_max: 14.0,
            item_balance_min: 5.0,
        }
    }
}

impl ScreeningConfig {
    pub fn grip_cutoff(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.grip_cutoff_male,
            Gender::Female => self.grip_cutoff_female,
        }
    }

    pub fn sit_to_stand_cutoff(&self, gender: Gender) -> f64 {
        match gender {
            Gender::Male => self.sit_to_stand_cutoff_male,
            Gender::Female => self.sit_to_stand_cutoff_female,
        }
    }
}

/// Kết quả đánh giá cuối cùng.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskResult {
    pub is_sarcopenia_risk: bool,
    pub is_locomo_risk: bool,
    pub is_fall_risk: bool,
    pub is_flexibility_low: bool,
    pub item_risks: ItemRisks,
    pub advisories: Vec<Advisory>,
    pub messages: Vec<String>,
    pub profile: Vec<ProfilePoint>,
    pub age_group: AgeGroup,
    pub age_group_label: String,
    pub adopted: AdoptedValues,
}

/// Lỗi chung của các adapter nhập/xuất quanh engine.
#[derive(Debug, thiserror::Error)]
pub enum PhysioError {
    #[error("Thiếu trường bắt buộc: {0}")]
    MissingData(String),
    #[error("Giá trị không hợp lệ ở {field}: {value}")]
    InvalidValue { field: String, value: String },
    #[error("Không đọc được dữ liệu: {0}")]
    Parse(String),
}

/// Đánh giá với bộ ngưỡng mặc định.
pub fn evaluate(record: &InputRecord) -> RiskResult {
    evaluate_with(record, &ScreeningConfig::default())
}

/// Đánh giá với bộ ngưỡng tùy chỉnh. Hàm thuần, không giữ trạng thái.
pub fn evaluate_with(record: &InputRecord, config: &ScreeningConfig) -> RiskResult {
    let subject = record.subject;
    let adopted = AdoptedValues::select(record);
    let scores = norms::MetricScores::compute(&adopted, subject);
    let flags = ScreeningFlags::compute(&adopted, &scores, subject.gender, config);
    let advisories = classify::compose_advisories(&flags);
    let age_group = AgeGroup::from_age(subject.age);

    RiskResult {
        is_sarcopenia_risk: flags.sarcopenia_risk,
        is_locomo_risk: flags.locomotive_risk,
        is_fall_risk: flags.fall_risk,
        is_flexibility_low: flags.flexibility_low,
        item_risks: ItemRisks::compute(&adopted, &flags, config),
        messages: advisories
            .iter()
            .map(|advisory| advisory.message().to_string())
            .collect(),
        advisories,
        profile: profile::assemble_profile(&scores),
        age_group,
        age_group_label: age_group.label().to_string(),
        adopted,
    }
}
