//! 물/얼음 포화 수증기압과 그 역계산.
//! 입력: 온도(°C), 압력(Pa 또는 bar abs)
//! 출력: 포화압(Pa), 포화온도(°C), 증강계수(무차원)

use crate::constants::{KELVIN_OFFSET, P_CRITICAL_PA, T_CRITICAL_K};
use crate::units::{bara_to_pa, to_kelvin};
use crate::error::{CalcError, CalcResult};

// ---------------- IF97 Region 4 (포화선) ----------------
const R4_N: [f64; 6] = [
    -7.859_517_83,
    1.844_082_59,
    -11.786_649_7,
    22.680_741_1,
    -15.961_871_9,
    1.801_225_02,
];

// 얼음선 Magnus 계수
const MAGNUS_P0_PA: f64 = 611.21;
const MAGNUS_A: f64 = 18.678;
const MAGNUS_B: f64 = 234.5;
const MAGNUS_C: f64 = 257.14;

// 증강계수 회귀 계수 (압력항 a,b,c / 온도항 d,e,f)
const EF_A: f64 = -1.6318e-8;
const EF_B: f64 = 2.1268e-11;
const EF_C: f64 = -6.1558e-15;
const EF_D: f64 = 1.0006;
const EF_E: f64 = 1.579e-4;
const EF_F: f64 = -1.6387e-6;
const EF_MIN: f64 = 0.95;
const EF_MAX: f64 = 1.15;

const SAT_TEMP_LOW_C: f64 = 0.01;
const SAT_TEMP_HIGH_C: f64 = 373.0;
const SAT_TEMP_ITERATIONS: usize = 50;
const SAT_TEMP_TOLERANCE_C: f64 = 0.01;

/// 포화 수증기압 [Pa].
///
/// 0°C 초과는 IAPWS-IF97 Region 4 식, 0°C 이하는 Magnus형 근사식을 쓴다.
/// 임계온도(373.946°C) 이상에서는 포화선이 없으므로 0을 반환한다.
pub fn saturation_vapor_pressure(t_c: f64) -> f64 {
    let t_k = to_kelvin(t_c);
    if t_k <= KELVIN_OFFSET {
        return MAGNUS_P0_PA * ((MAGNUS_A - t_c / MAGNUS_B) * (t_c / (MAGNUS_C + t_c))).exp();
    }
    if t_k >= T_CRITICAL_K {
        return 0.0;
    }
    let theta = 1.0 - t_k / T_CRITICAL_K;
    let c = R4_N[0] * theta
        + R4_N[1] * theta.powf(1.5)
        + R4_N[2] * theta.powi(3)
        + R4_N[3] * theta.powf(3.5)
        + R4_N[4] * theta.powi(4)
        + R4_N[5] * theta.powf(7.5);
    P_CRITICAL_PA * ((T_CRITICAL_K / t_k) * c).exp()
}

/// 습공기 실기체 증강계수 `f`.
///
/// 저압에서는 1에 가깝고 압력이 오를수록 커진다. 영하 온도는 0°C로 본다.
/// 결과는 [0.95, 1.15]로 제한한다.
pub fn enhancement_factor(t_c: f64, p_bara: f64) -> f64 {
    let t_k = to_kelvin(t_c.max(0.0));
    let p_pa = bara_to_pa(p_bara);
    let factor = p_pa * (EF_A + EF_B * t_k + EF_C * t_k.powi(2))
        + (EF_D + EF_E * t_k + EF_F * t_k.powi(2));
    factor.clamp(EF_MIN, EF_MAX)
}

/// 증강계수를 반영한 실제 포화 수증기압 [Pa].
pub fn enhanced_saturation_pressure(t_c: f64, p_bara: f64) -> f64 {
    enhancement_factor(t_c, p_bara) * saturation_vapor_pressure(t_c)
}

/// 포화압력(Pa)으로부터 포화온도(°C)를 이분법으로 역산한다.
///
/// 탐색 구간은 0.01~373°C로 고정하고 최대 50회 반복한다.
pub fn saturation_temp_from_pressure(p_pa: f64) -> CalcResult<f64> {
    if !(p_pa > 0.0) {
        return Err(CalcError::InvalidInput(format!(
            "포화온도 역산용 압력은 양수여야 합니다 ({p_pa} Pa)"
        )));
    }
    let mut low = SAT_TEMP_LOW_C;
    let mut high = SAT_TEMP_HIGH_C;
    let mut mid = 0.5 * (low + high);
    for _ in 0..SAT_TEMP_ITERATIONS {
        mid = 0.5 * (low + high);
        if saturation_vapor_pressure(mid) > p_pa {
            high = mid;
        } else {
            low = mid;
        }
        if high - low < SAT_TEMP_TOLERANCE_C {
            mid = 0.5 * (low + high);
            break;
        }
    }
    Ok(mid)
}

/// 주어진 온도·압력에서 물리적으로 가능한 최대 상대습도 [%].
///
/// 포화압이 전압보다 낮으면 100%까지 가능하므로 `None`을 반환한다.
pub fn max_relative_humidity(t_c: f64, p_bara: f64) -> Option<f64> {
    let p_abs = bara_to_pa(p_bara);
    let p_sat = saturation_vapor_pressure(t_c);
    (p_sat > p_abs).then(|| p_abs / p_sat * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enhancement_factor_hits_lower_clamp_at_atmospheric() {
        // 회귀식 자체는 대기압·상온에서 0.95 아래로 내려가므로 하한값이 된다.
        let f = enhancement_factor(20.0, 1.01325);
        assert!((f - EF_MIN).abs() < 1e-12, "f={f}");
    }

    #[test]
    fn enhancement_factor_is_clamped() {
        assert!(enhancement_factor(20.0, 1.0e6) >= EF_MIN);
        assert!(enhancement_factor(20.0, 1.0e6) <= EF_MAX);
    }

    #[test]
    fn above_critical_has_no_saturation_pressure() {
        assert_eq!(saturation_vapor_pressure(380.0), 0.0);
    }

    #[test]
    fn non_positive_pressure_is_rejected() {
        assert!(saturation_temp_from_pressure(0.0).is_err());
        assert!(saturation_temp_from_pressure(-5.0).is_err());
    }
}
