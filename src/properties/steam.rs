use serde::Serialize;

use super::saturation::{saturation_temp_from_pressure, saturation_vapor_pressure};
use crate::constants::{CP_SUPERHEATED_STEAM, CP_WATER, LATENT_HEAT_0C, R_VAPOR};
use crate::error::{CalcError, CalcResult};
use crate::units::{pa_to_bara, to_kelvin};

/// 과열 외삽 상한 온도 [°C]
const SUPERHEAT_CAP_C: f64 = 373.0;

/// 온도 기준 포화 증기 특성.
#[derive(Debug, Clone, Serialize)]
pub struct SaturatedSteamState {
    /// 포화 온도(°C)
    pub temperature_c: f64,
    /// 포화 압력(Pa)
    pub pressure_pa: f64,
    /// 포화 압력(bar abs)
    pub pressure_bara: f64,
    /// 포화수(액) 비엔탈피(kJ/kg), `CP_WATER * T` 근사
    pub liquid_enthalpy_kj_kg: f64,
    /// 증발잠열(kJ/kg)
    pub latent_heat_kj_kg: f64,
    /// 포화 증기 비엔탈피(kJ/kg)
    pub vapor_enthalpy_kj_kg: f64,
    /// 포화 증기 밀도(kg/m³), 이상기체 근사
    pub vapor_density_kg_m3: f64,
}

/// 포화 온도(°C)로부터 포화 증기 특성을 계산한다.
pub fn saturated_steam_state(t_c: f64) -> CalcResult<SaturatedSteamState> {
    let pressure_pa = saturation_vapor_pressure(t_c);
    if !(pressure_pa > 0.0) {
        return Err(CalcError::OutOfRange(format!(
            "{t_c:.2}°C 에서 포화 압력을 구할 수 없습니다 (0.01~373.9°C)"
        )));
    }
    let latent = steam_latent_heat(t_c);
    Ok(SaturatedSteamState {
        temperature_c: t_c,
        pressure_pa,
        pressure_bara: pa_to_bara(pressure_pa),
        liquid_enthalpy_kj_kg: CP_WATER * t_c,
        latent_heat_kj_kg: latent,
        vapor_enthalpy_kj_kg: CP_WATER * t_c + latent,
        vapor_density_kg_m3: vapor_density(t_c, pressure_pa),
    })
}

/// 증발잠열 [kJ/kg]. 0°C 이하는 2501, 374°C 이상은 0.
pub fn steam_latent_heat(t_c: f64) -> f64 {
    if t_c <= 0.0 {
        return LATENT_HEAT_0C;
    }
    if t_c >= 374.0 {
        return 0.0;
    }
    (2501.6 - 2.369 * t_c + 0.0018 * t_c.powi(2) - 0.000004 * t_c.powi(3)).max(0.0)
}

/// 포화 증기 비엔탈피 [kJ/kg] = 현열(물) + 잠열.
pub fn saturated_steam_enthalpy(t_c: f64) -> f64 {
    CP_WATER * t_c + steam_latent_heat(t_c)
}

/// 등엔트로피 압축 후 출구 비엔탈피 [kJ/kg].
///
/// 이상기체 관계 `T_out = T_in * r^((γ-1)/γ)`로 온도 상승을 구하고
/// 과열 증기 근사 비열(2.0 kJ/kg·K)로 엔탈피 상승으로 환산한다.
pub fn isentropic_outlet_enthalpy(h_in: f64, t_in_k: f64, compression_ratio: f64, gamma: f64) -> f64 {
    let t_out_k = t_in_k * compression_ratio.powf((gamma - 1.0) / gamma);
    h_in + CP_SUPERHEATED_STEAM * (t_out_k - t_in_k)
}

/// 압력 P(Pa)에서 비엔탈피 h(kJ/kg)를 갖는 증기의 온도 [°C].
///
/// 포화 증기 엔탈피 이하이면 습증기/포화로 보고 포화온도를 반환하고,
/// 그 이상이면 근사 비열로 과열도를 선형 외삽한다(최대 373°C).
pub fn steam_temp_from_enthalpy(h_kj_kg: f64, p_pa: f64) -> CalcResult<f64> {
    let t_sat = saturation_temp_from_pressure(p_pa)?;
    let h_sat = saturated_steam_enthalpy(t_sat);
    if h_kj_kg <= h_sat {
        return Ok(t_sat);
    }
    Ok((t_sat + (h_kj_kg - h_sat) / CP_SUPERHEATED_STEAM).min(SUPERHEAT_CAP_C))
}

/// 이상기체로 본 수증기 밀도 [kg/m³].
pub fn vapor_density(t_c: f64, p_pa: f64) -> f64 {
    p_pa / (R_VAPOR * to_kelvin(t_c))
}
