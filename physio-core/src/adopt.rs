//! Chọn giá trị chấp nhận (adopted value) từ hai lần đo.
//!
//! Quy tắc xử lý lần đo thiếu được áp dụng một lần duy nhất ở đây; các bước
//! chấm điểm và phân loại phía sau chỉ thấy số đã chọn.

use serde::{Deserialize, Serialize};

use crate::{InputRecord, MeasurementPair};

/// Giá trị chấp nhận của từng chỉ số, dùng cho chấm điểm và hiển thị.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AdoptedValues {
    /// Giá trị lớn nhất của hai bên, dùng cho phán định.
    pub grip: f64,
    pub grip_right: f64,
    pub grip_left: f64,
    pub sit_to_stand: f64,
    pub balance: f64,
    /// Bằng 0 khi cả hai lần đều thiếu. Giá trị này không có nghĩa là "dẻo tốt".
    pub flexion: f64,
}

impl AdoptedValues {
    pub fn select(record: &InputRecord) -> Self {
        let grip_right = record.grip.right.higher_is_better();
        let grip_left = record.grip.left.higher_is_better();

        Self {
            grip: grip_right.max(grip_left),
            grip_right,
            grip_left,
            sit_to_stand: record.sit_to_stand.higher_is_better(),
            balance: record.balance.higher_is_better(),
            flexion: record.flexion.lower_is_better(),
        }
    }
}

impl MeasurementPair {
    /// Lần đo lớn hơn thắng; lần thiếu được tính là 0 và không bao giờ thắng
    /// một lần đo thật.
    pub fn higher_is_better(&self) -> f64 {
        match (self.attempt1, self.attempt2) {
            (Some(a), Some(b)) => a.max(b),
            (Some(a), None) | (None, Some(a)) => a.max(0.0),
            (None, None) => 0.0,
        }
    }

    /// Lần đo nhỏ hơn thắng; lần thiếu bị bỏ qua. Thiếu cả hai thì trả về 0.
    pub fn lower_is_better(&self) -> f64 {
        match (self.attempt1, self.attempt2) {
            (Some(a), Some(b)) => a.min(b),
            (Some(a), None) | (None, Some(a)) => a,
            (None, None) => 0.0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.attempt1.is_none() && self.attempt2.is_none()
    }
}
