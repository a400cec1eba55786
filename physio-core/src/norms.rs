//! Bảng chuẩn theo giới tính/độ tuổi và các hàm chấm điểm 0-100.

use crate::{AdoptedValues, Gender, Subject};

/// Bảng tra theo tuổi: các dải có cận trên (không bao gồm) theo thứ tự tăng dần,
/// cộng một dải cuối mở về phía trên cho mọi tuổi còn lại.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AgeTable<T: 'static> {
    pub bounded: &'static [(u32, T)],
    pub oldest: T,
}

impl<T: Copy + 'static> AgeTable<T> {
    pub fn lookup(&self, age: u32) -> T {
        self.bounded
            .iter()
            .find(|(below, _)| age < *below)
            .map_or(self.oldest, |(_, value)| *value)
    }
}

/// Các mốc CS-30: `[v1, v3_min, v3_max, v5]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SitToStandCriteria {
    pub poor_max: f64,
    pub average_min: f64,
    pub average_max: f64,
    pub excellent_min: f64,
}

const fn cs30(
    poor_max: f64,
    average_min: f64,
    average_max: f64,
    excellent_min: f64,
) -> SitToStandCriteria {
    SitToStandCriteria {
        poor_max,
        average_min,
        average_max,
        excellent_min,
    }
}

pub const SIT_TO_STAND_MALE: AgeTable<SitToStandCriteria> = AgeTable {
    bounded: &[
        (60, cs30(17.0, 22.0, 27.0, 32.0)),
        (70, cs30(13.0, 18.0, 21.0, 26.0)),
        (80, cs30(11.0, 16.0, 20.0, 25.0)),
    ],
    oldest: cs30(9.0, 14.0, 16.0, 20.0),
};

pub const SIT_TO_STAND_FEMALE: AgeTable<SitToStandCriteria> = AgeTable {
    bounded: &[
        (60, cs30(15.0, 20.0, 24.0, 30.0)),
        (70, cs30(11.0, 17.0, 21.0, 27.0)),
        (80, cs30(9.0, 15.0, 19.0, 24.0)),
    ],
    oldest: cs30(8.0, 13.0, 16.0, 20.0),
};

/// Lực nắm trung bình (kg) theo khảo sát thể lực quốc gia.
pub const GRIP_REFERENCE_MALE: AgeTable<f64> = AgeTable {
    bounded: &[(40, 47.0), (60, 44.0), (65, 41.9), (70, 39.4), (75, 37.5)],
    oldest: 35.1,
};

pub const GRIP_REFERENCE_FEMALE: AgeTable<f64> = AgeTable {
    bounded: &[(40, 28.0), (60, 27.0), (65, 26.1), (70, 25.1), (75, 23.8)],
    oldest: 22.8,
};

/// Mốc thăng bằng (giây) cho mức 60 và 80 điểm, khác nhau theo giới.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BalanceCriteria {
    pub average_max: f64,
    pub good_max: f64,
}

pub const BALANCE_POOR_BELOW: f64 = 2.0;
pub const BALANCE_FAIR_BELOW: f64 = 5.0;

pub const BALANCE_MALE: BalanceCriteria = BalanceCriteria {
    average_max: 10.0,
    good_max: 24.0,
};

pub const BALANCE_FEMALE: BalanceCriteria = BalanceCriteria {
    average_max: 11.0,
    good_max: 28.0,
};

/// Dải FFD (cm) theo thứ tự, cận trên bao gồm. Vượt mọi cận thì 20 điểm.
pub const FLEXION_BANDS: [(f64, f64); 4] = [(-10.0, 100.0), (0.0, 80.0), (5.0, 60.0), (15.0, 40.0)];
pub const FLEXION_FLOOR_SCORE: f64 = 20.0;

pub fn sit_to_stand_criteria(subject: Subject) -> SitToStandCriteria {
    match subject.gender {
        Gender::Male => SIT_TO_STAND_MALE.lookup(subject.age),
        Gender::Female => SIT_TO_STAND_FEMALE.lookup(subject.age),
    }
}

pub fn grip_reference(subject: Subject) -> f64 {
    match subject.gender {
        Gender::Male => GRIP_REFERENCE_MALE.lookup(subject.age),
        Gender::Female => GRIP_REFERENCE_FEMALE.lookup(subject.age),
    }
}

pub fn sit_to_stand_score(count: f64, subject: Subject) -> f64 {
    let criteria = sit_to_stand_criteria(subject);
    if count <= criteria.poor_max {
        20.0
    } else if count < criteria.average_min {
        40.0
    } else if count <= criteria.average_max {
        60.0
    } else if count < criteria.excellent_min {
        80.0
    } else {
        100.0
    }
}

/// Điểm liên tục theo tỉ lệ so với trung bình cùng nhóm.
pub fn grip_score(kg: f64, subject: Subject) -> f64 {
    let ratio = kg / grip_reference(subject);
    if ratio < 0.8 {
        20.0 + ratio * 10.0
    } else if ratio < 1.0 {
        40.0 + (ratio - 0.8) * 100.0
    } else if ratio < 1.2 {
        60.0 + (ratio - 1.0) * 100.0
    } else {
        (80.0 + (ratio - 1.2) * 50.0).min(100.0)
    }
}

pub fn balance_score(seconds: f64, gender: Gender) -> f64 {
    if seconds < BALANCE_POOR_BELOW {
        return 20.0;
    }
    if seconds < BALANCE_FAIR_BELOW {
        return 40.0;
    }

    let criteria = match gender {
        Gender::Male => BALANCE_MALE,
        Gender::Female => BALANCE_FEMALE,
    };
    if seconds <= criteria.average_max {
        60.0
    } else if seconds <= criteria.good_max {
        80.0
    } else {
        100.0
    }
}

pub fn flexion_score(cm: f64) -> f64 {
    FLEXION_BANDS
        .iter()
        .find(|(upper, _)| cm <= *upper)
        .map_or(FLEXION_FLOOR_SCORE, |(_, score)| *score)
}

/// Điểm của cả bốn chỉ số cho một lần đánh giá.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricScores {
    pub grip: f64,
    pub sit_to_stand: f64,
    pub balance: f64,
    pub flexion: f64,
}

impl MetricScores {
    pub fn compute(adopted: &AdoptedValues, subject: Subject) -> Self {
        Self {
            grip: grip_score(adopted.grip, subject),
            sit_to_stand: sit_to_stand_score(adopted.sit_to_stand, subject),
            balance: balance_score(adopted.balance, subject.gender),
            flexion: flexion_score(adopted.flexion),
        }
    }
}
