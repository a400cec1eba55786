//! Phân loại nguy cơ: cờ sàng lọc, cờ hiển thị từng mục và lời khuyên.
//!
//! Cờ được tính trước, sau đó lời khuyên mới được dựng từ cờ qua bảng ưu tiên
//! và bảng loại trừ trùng lặp.

use serde::{Deserialize, Serialize};

use crate::norms::MetricScores;
use crate::{AdoptedValues, Gender, ScreeningConfig};

/// CS-30 ở mức điểm này trở xuống là nhóm kém nhất.
const SIT_TO_STAND_WORST_SCORE: f64 = 20.0;

/// Toàn bộ cờ sàng lọc của một lần đánh giá.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ScreeningFlags {
    pub low_muscle: bool,
    pub low_performance: bool,
    pub sarcopenia_risk: bool,
    pub fall_risk: bool,
    /// CS-30 dưới mức cảnh giác; thông điệp bị chặn khi đã có nguy cơ té ngã.
    pub fall_caution: bool,
    pub locomotive_risk: bool,
    pub flexibility_low: bool,
}

impl ScreeningFlags {
    pub fn compute(
        adopted: &AdoptedValues,
        scores: &MetricScores,
        gender: Gender,
        config: &ScreeningConfig,
    ) -> Self {
        let low_muscle = adopted.grip < config.grip_cutoff(gender);
        let low_performance = adopted.sit_to_stand < config.sit_to_stand_cutoff(gender);

        Self {
            low_muscle,
            low_performance,
            sarcopenia_risk: low_muscle && low_performance,
            fall_risk: adopted.sit_to_stand <= config.fall_sit_to_stand_max
                || adopted.balance < config.fall_balance_min,
            fall_caution: adopted.sit_to_stand <= config.fall_caution_sit_to_stand_max,
            locomotive_risk: scores.sit_to_stand <= SIT_TO_STAND_WORST_SCORE || low_muscle,
            flexibility_low: adopted.flexion > config.flexibility_low_above,
        }
    }
}

/// Cờ tô đỏ ô trong bảng kết quả. Ngưỡng khác với cờ sàng lọc.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ItemRisks {
    pub grip: bool,
    pub sit_to_stand: bool,
    pub balance: bool,
    pub flexion: bool,
}

impl ItemRisks {
    pub fn compute(
        adopted: &AdoptedValues,
        flags: &ScreeningFlags,
        config: &ScreeningConfig,
    ) -> Self {
        Self {
            grip: flags.low_muscle,
            sit_to_stand: adopted.sit_to_stand <= config.item_sit_to_stand_max,
            balance: adopted.balance < config.item_balance_min,
            flexion: flags.flexibility_low,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Advisory {
    Sarcopenia,
    LowMuscle,
    FallRisk,
    FallCaution,
    Locomotive,
    Flexibility,
}

impl Advisory {
    pub fn message(self) -> &'static str {
        match self {
            Advisory::Sarcopenia => {
                "【サルコペニア疑い】筋力と身体機能の低下が見られます。専門家の指導下での運動をお勧めします。"
            }
            Advisory::LowMuscle => {
                "【筋力低下】握力が基準値を下回っています。タンパク質摂取と筋力トレーニングを意識してください。"
            }
            Advisory::FallRisk => {
                "【転倒高リスク】バランス能力または下肢筋力が低下しています。転倒に十分注意してください。"
            }
            Advisory::FallCaution => "【転倒注意】下肢筋力がやや低下傾向です。",
            Advisory::Locomotive => "【ロコモ疑い】移動機能の低下が始まっている可能性があります。",
            Advisory::Flexibility => {
                "【柔軟性低下】体が硬くなっています。腰痛予防のために毎日のストレッチを推奨します。"
            }
        }
    }

    fn triggered(self, flags: &ScreeningFlags) -> bool {
        match self {
            Advisory::Sarcopenia => flags.sarcopenia_risk,
            Advisory::LowMuscle => flags.low_muscle,
            Advisory::FallRisk => flags.fall_risk,
            Advisory::FallCaution => flags.fall_caution,
            Advisory::Locomotive => flags.locomotive_risk,
            Advisory::Flexibility => flags.flexibility_low,
        }
    }
}

pub fn advisory_order() -> &'static [Advisory] {
    &[
        Advisory::Sarcopenia,
        Advisory::LowMuscle,
        Advisory::FallRisk,
        Advisory::FallCaution,
        Advisory::Locomotive,
        Advisory::Flexibility,
    ]
}

/// `(a, b)`: khi `a` được đưa ra thì `b` bị bỏ.
pub const SUPPRESSIONS: [(Advisory, Advisory); 3] = [
    (Advisory::Sarcopenia, Advisory::LowMuscle),
    (Advisory::Sarcopenia, Advisory::Locomotive),
    (Advisory::FallRisk, Advisory::FallCaution),
];

/// Dựng danh sách lời khuyên theo thứ tự cố định, sau khi áp bảng loại trừ.
pub fn compose_advisories(flags: &ScreeningFlags) -> Vec<Advisory> {
    let triggered = advisory_order()
        .iter()
        .copied()
        .filter(|advisory| advisory.triggered(flags))
        .collect::<Vec<_>>();

    triggered
        .iter()
        .copied()
        .filter(|advisory| {
            !SUPPRESSIONS
                .iter()
                .any(|(winner, loser)| loser == advisory && triggered.contains(winner))
        })
        .collect()
}
