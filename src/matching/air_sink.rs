//! 공기 열수요(건조·가습 공정)의 부가 지표.

use serde::Serialize;

use crate::constants::{CP_WATER, SECONDS_PER_HOUR};
use crate::error::{CalcError, CalcResult};
use crate::load_flow::LoadResult;
use crate::medium::AirStream;
use crate::properties::{
    humidity_ratio, relative_humidity_from_vapor_pressure, vapor_enthalpy, vapor_pressure,
};

/// 출구 상대습도 표시값. 목표 RH가 주어졌으면 그 값을, 아니면 단순 가열 후 RH를 담는다.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "basis", content = "value_pct", rename_all = "snake_case")]
pub enum OutletRelativeHumidity {
    /// 사용자가 지정한 출구 목표 RH [%]
    Target(f64),
    /// 가습 없이 가열만 했을 때의 RH [%]
    PostHeating(f64),
}

impl OutletRelativeHumidity {
    pub fn value_pct(self) -> f64 {
        match self {
            OutletRelativeHumidity::Target(v) | OutletRelativeHumidity::PostHeating(v) => v,
        }
    }
}

/// 공기 열수요 부가 지표. 계산 실패 시 모든 필드가 `None`이다.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct AirSinkExtras {
    /// 출구 온도에서 포화까지 흡수할 수 있는 최대 수분량 [kg/h]
    pub max_humidification_kg_h: Option<f64>,
    /// 출구 상대습도 [%]
    pub outlet_relative_humidity: Option<OutletRelativeHumidity>,
    /// 공급 열량을 모두 증발에 썼을 때의 증발 능력 [kg/h]
    pub evaporation_capacity_kg_h: Option<f64>,
    /// 두 수분량 중 작은 쪽을 더했을 때의 출구 RH [%]
    pub relative_humidity_after_humidification_pct: Option<f64>,
}

/// 최종 열수요 부하와 응축 열량으로 부가 지표를 계산한다.
pub(crate) fn compute_air_sink_extras(
    air: &AirStream,
    sink_load: &LoadResult,
    q_hot_kw: f64,
) -> CalcResult<AirSinkExtras> {
    let dry_air = sink_load.dry_air_mass_flow_kg_s;
    if !(dry_air > 0.0) {
        return Err(CalcError::InvalidInput(format!(
            "열수요 건공기 질량유량이 유효하지 않습니다 ({dry_air} kg/s)"
        )));
    }
    let p = air.pressure_bara;
    let w_in = humidity_ratio(p, air.temp_in_c, air.relative_humidity_pct);
    let w_out_sat = humidity_ratio(p, air.temp_out_c, 100.0);

    let max_humidification = (dry_air * (w_out_sat - w_in) * SECONDS_PER_HOUR).max(0.0);

    let outlet_rh = match air.target_relative_humidity_pct {
        Some(target) => OutletRelativeHumidity::Target(target),
        None => OutletRelativeHumidity::PostHeating(relative_humidity_from_vapor_pressure(
            vapor_pressure(p, w_in),
            air.temp_out_c,
            p,
        )),
    };

    // 출구 온도 기준 증발잠열 근사
    let latent_out = vapor_enthalpy(air.temp_out_c) - CP_WATER * air.temp_out_c;
    let evaporation_capacity = if latent_out > 0.0 {
        (q_hot_kw / latent_out * SECONDS_PER_HOUR).max(0.0)
    } else {
        0.0
    };

    let water_added_kg_s = max_humidification.min(evaporation_capacity) / SECONDS_PER_HOUR;
    let w_after = w_in + water_added_kg_s / dry_air;
    let rh_after =
        relative_humidity_from_vapor_pressure(vapor_pressure(p, w_after), air.temp_out_c, p);

    Ok(AirSinkExtras {
        max_humidification_kg_h: Some(max_humidification),
        outlet_relative_humidity: Some(outlet_rh),
        evaporation_capacity_kg_h: Some(evaporation_capacity),
        relative_humidity_after_humidification_pct: Some(rh_after),
    })
}
