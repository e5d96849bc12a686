use serde::Serialize;

use super::saturation::enhanced_saturation_pressure;
use crate::constants::{MOLAR_MASS_RATIO, R_AIR_DRY, R_VAPOR};
use crate::units::{bara_to_pa, to_kelvin};

/// 건공기가 사실상 없을 때 돌려주는 습도비 대체값.
pub const HUMIDITY_RATIO_ALL_VAPOR: f64 = 10.0;
/// 수증기 분압이 무시할 수준일 때의 이슬점 대체값 [°C].
pub const DEW_POINT_NEGLIGIBLE_C: f64 = -100.0;

const DEW_POINT_LOW_C: f64 = -100.0;
const DEW_POINT_ITERATIONS: usize = 10;
const NEGLIGIBLE_VAPOR_PRESSURE_PA: f64 = 1.0;

/// 건구온도·상대습도·압력으로 계산한 습공기 상태 요약.
#[derive(Debug, Clone, Serialize)]
pub struct HumidAirState {
    /// 상대습도 [%]
    pub relative_humidity_pct: f64,
    /// 습도비 [kg수증기/kg건공기]
    pub humidity_ratio: f64,
    /// 수증기 분압 [Pa]
    pub vapor_pressure_pa: f64,
    /// 이슬점 [°C]
    pub dew_point_c: f64,
    /// 습공기 밀도 [kg/m³]
    pub density_kg_m3: f64,
    /// 비엔탈피 [kJ/kg 건공기]
    pub enthalpy_kj_kg: f64,
}

/// 습공기 상태를 한 번에 계산한다.
pub fn humid_air_state(p_bara: f64, t_c: f64, rh_pct: f64) -> HumidAirState {
    let w = humidity_ratio(p_bara, t_c, rh_pct);
    HumidAirState {
        relative_humidity_pct: rh_pct,
        humidity_ratio: w,
        vapor_pressure_pa: vapor_pressure(p_bara, w),
        dew_point_c: dew_point(t_c, rh_pct, p_bara),
        density_kg_m3: air_density(p_bara, t_c, rh_pct),
        enthalpy_kj_kg: air_enthalpy(t_c, w),
    }
}

// (전압, 수증기 분압) [Pa]. 과포화가 되면 분압을 전압의 99.9%로 묶는다.
fn partial_pressures(p_bara: f64, t_c: f64, rh_pct: f64) -> (f64, f64) {
    let p_abs = bara_to_pa(p_bara);
    let mut p_vapor = (rh_pct / 100.0) * enhanced_saturation_pressure(t_c, p_bara);
    if p_vapor >= p_abs {
        p_vapor = p_abs * 0.999;
    }
    (p_abs, p_vapor)
}

/// 습도비 W [kg/kg 건공기].
///
/// `W = 0.62198 * Pv / (P - Pv)`, 건공기 분압이 0 이하이면 10을 반환한다.
pub fn humidity_ratio(p_bara: f64, t_c: f64, rh_pct: f64) -> f64 {
    let (p_abs, p_vapor) = partial_pressures(p_bara, t_c, rh_pct);
    let p_dry_air = p_abs - p_vapor;
    if p_dry_air <= 0.0 {
        return HUMIDITY_RATIO_ALL_VAPOR;
    }
    MOLAR_MASS_RATIO * (p_vapor / p_dry_air)
}

/// 습공기 압축계수 Z. 제2 비리얼계수를 몰분율로 혼합(Kay 규칙)한다.
pub fn compressibility_factor(t_c: f64, p_bara: f64, w: f64) -> f64 {
    let t_k = to_kelvin(t_c);
    let p_pa = bara_to_pa(p_bara);
    let b_dry_air = (0.3344 - 364.2 / t_k - 7.58e4 / t_k.powi(2)) * 1e-5;
    let b_vapor = (-0.198 - 1928.0 / t_k) * 1e-5;
    let x_vapor = w / (MOLAR_MASS_RATIO + w);
    let x_dry_air = 1.0 - x_vapor;
    let b_mix = x_dry_air * b_dry_air + x_vapor * b_vapor;
    1.0 + (b_mix * p_pa) / ((R_AIR_DRY * x_dry_air + R_VAPOR * x_vapor) * t_k)
}

/// 습공기 밀도 [kg/m³].
///
/// 압축계수와 혼합 기체상수로 실기체 밀도를 구하고, 계산이 퇴화하면
/// 건공기/수증기 이상기체 분밀도의 합으로 대신한다.
pub fn air_density(p_bara: f64, t_c: f64, rh_pct: f64) -> f64 {
    let t_k = to_kelvin(t_c);
    let (p_abs, p_vapor) = partial_pressures(p_bara, t_c, rh_pct);
    let p_dry_air = (p_abs - p_vapor).max(0.0);
    let w = if p_dry_air <= 0.0 {
        HUMIDITY_RATIO_ALL_VAPOR
    } else {
        MOLAR_MASS_RATIO * (p_vapor / p_dry_air)
    };
    let r_moist = (R_AIR_DRY + w * R_VAPOR) / (1.0 + w);
    let z = compressibility_factor(t_c, p_bara, w);
    if z == 0.0 || r_moist == 0.0 || t_k == 0.0 {
        return p_dry_air / (R_AIR_DRY * t_k) + p_vapor / (R_VAPOR * t_k);
    }
    p_abs / (z * r_moist * t_k)
}

/// 건공기 비엔탈피 [kJ/kg], 0°C 기준 (NIST 회귀식).
pub fn dry_air_enthalpy(t_c: f64) -> f64 {
    1.00315 * t_c + 0.0001306 * t_c.powi(2) - 4.6545e-8 * t_c.powi(3) + 1.6368e-11 * t_c.powi(4)
}

/// 포화 수증기 비엔탈피 [kJ/kg], 0°C 기준. 온도는 0~370°C로 제한한다.
pub fn vapor_enthalpy(t_c: f64) -> f64 {
    let t = t_c.clamp(0.0, 370.0);
    2500.8 + 1.8325 * t - 0.000551 * t.powi(2) + 3.205e-6 * t.powi(3) - 7.58e-9 * t.powi(4)
}

/// 습공기 비엔탈피 [kJ/kg 건공기]. 음수나 NaN 습도비는 0으로 본다.
pub fn air_enthalpy(t_c: f64, w: f64) -> f64 {
    let w = if w.is_nan() || w < 0.0 { 0.0 } else { w };
    dry_air_enthalpy(t_c) + w * vapor_enthalpy(t_c)
}

/// 이슬점 [°C].
///
/// [-100, T] 구간 이분법 10회. 수증기 분압이 1 Pa 미만이면 -100을,
/// 이미 포화 상태면 입력 온도를 그대로 반환한다.
pub fn dew_point(t_c: f64, rh_pct: f64, p_bara: f64) -> f64 {
    let rh = rh_pct.clamp(0.1, 100.0);
    let p_vapor = (rh / 100.0) * enhanced_saturation_pressure(t_c, p_bara);
    if p_vapor < NEGLIGIBLE_VAPOR_PRESSURE_PA {
        return DEW_POINT_NEGLIGIBLE_C;
    }
    let mut low = DEW_POINT_LOW_C;
    let mut high = t_c;
    if p_vapor >= enhanced_saturation_pressure(high, p_bara) {
        return t_c;
    }
    let mut guess = t_c / 2.0;
    for _ in 0..DEW_POINT_ITERATIONS {
        guess = 0.5 * (low + high);
        if enhanced_saturation_pressure(guess, p_bara) - p_vapor > 0.0 {
            high = guess;
        } else {
            low = guess;
        }
    }
    guess
}

/// 습도비로부터 수증기 분압 [Pa]을 역산한다.
pub fn vapor_pressure(p_bara: f64, w: f64) -> f64 {
    let p_total = bara_to_pa(p_bara);
    let w = w.max(0.0);
    (w * p_total) / (MOLAR_MASS_RATIO + w)
}

/// 수증기 분압을 증강 포화압 대비 상대습도 [%]로 환산한다. 0~100%로 제한.
pub fn relative_humidity_from_vapor_pressure(p_vapor_pa: f64, t_c: f64, p_bara: f64) -> f64 {
    let p_sat_real = enhanced_saturation_pressure(t_c, p_bara);
    if p_sat_real > 0.0 {
        (p_vapor_pa / p_sat_real * 100.0).clamp(0.0, 100.0)
    } else {
        0.0
    }
}
