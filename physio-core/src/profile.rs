//! Dựng dữ liệu biểu đồ radar và nhãn nhóm tuổi.

use serde::{Deserialize, Serialize};

use crate::norms::MetricScores;

/// Đường tham chiếu "trung bình" trên biểu đồ, cố định cho mọi chỉ số.
pub const REFERENCE_AVERAGE: f64 = 60.0;
pub const SCALE_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Grip,
    SitToStand,
    Balance,
    Flexion,
}

impl Metric {
    pub fn label(self) -> &'static str {
        match self {
            Metric::Grip => "全身筋力(握力)",
            Metric::SitToStand => "下肢筋力(CS-30)",
            Metric::Balance => "バランス(片脚)",
            Metric::Flexion => "柔軟性(FFD)",
        }
    }
}

/// Một điểm trên biểu đồ radar.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfilePoint {
    pub metric: Metric,
    pub label: String,
    pub score: f64,
    pub reference_average: f64,
    pub scale_max: f64,
}

impl ProfilePoint {
    fn new(metric: Metric, score: f64) -> Self {
        Self {
            metric,
            label: metric.label().to_string(),
            score,
            reference_average: REFERENCE_AVERAGE,
            scale_max: SCALE_MAX,
        }
    }
}

/// Nhóm tuổi dùng làm nhãn "chuẩn so sánh" trên báo cáo.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum AgeGroup {
    Young,
    Middle,
    Senior,
}

impl AgeGroup {
    pub fn from_age(age: u32) -> Self {
        if age < 40 {
            AgeGroup::Young
        } else if age < 60 {
            AgeGroup::Middle
        } else {
            AgeGroup::Senior
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Young => "20-30代",
            AgeGroup::Middle => "40-50代",
            AgeGroup::Senior => "60代以上",
        }
    }
}

pub fn assemble_profile(scores: &MetricScores) -> Vec<ProfilePoint> {
    vec![
        ProfilePoint::new(Metric::Grip, scores.grip),
        ProfilePoint::new(Metric::SitToStand, scores.sit_to_stand),
        ProfilePoint::new(Metric::Balance, scores.balance),
        ProfilePoint::new(Metric::Flexion, scores.flexion),
    ]
}
