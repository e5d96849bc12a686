use crate::constants::KELVIN_OFFSET;

/// 섭씨를 켈빈으로 변환한다.
pub fn to_kelvin(value_c: f64) -> f64 {
    value_c + KELVIN_OFFSET
}
