//! 유량 ↔ 열부하 환산 (물, 습공기, 포화 증기).

use serde::Serialize;
use tracing::warn;

use crate::constants::{CP_WATER, SECONDS_PER_HOUR};
use crate::error::{CalcError, CalcResult};
use crate::medium::{AirStream, MediumSpec, Side, SteamStream, WaterStream};
use crate::properties::{
    air_density, air_enthalpy, dew_point, dry_air_enthalpy, humidity_ratio, steam_latent_heat,
};
use crate::units::{Flow, FlowUnit};

const SNAP_TOLERANCE: f64 = 1e-6;

/// 한쪽 흐름의 열부하 계산 결과.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LoadResult {
    /// 건공기 질량유량 [kg/s]. 물/증기는 해당 매체의 질량유량.
    pub dry_air_mass_flow_kg_s: f64,
    /// 전열 부하 [kW]
    pub total_load_kw: f64,
    /// 현열 부하 [kW]
    pub sensible_load_kw: f64,
    /// 잠열 부하 [kW]
    pub latent_load_kw: f64,
    /// 가습(+)/제습(-) 수량 [kg/h]
    pub water_mass_delta_kg_h: f64,
}

fn snap(value: f64) -> f64 {
    if value.abs() < SNAP_TOLERANCE {
        0.0
    } else {
        value
    }
}

// 물/증기: 1 m³/h = 1 t/h 로 본다.
fn liquid_mass_flow_kg_s(flow: Flow) -> f64 {
    match flow.unit {
        FlowUnit::TonnePerHour | FlowUnit::CubicMeterPerHour => flow.value * 1000.0 / SECONDS_PER_HOUR,
        FlowUnit::LitrePerMinute => flow.value / 60.0,
    }
}

fn water_delta_t(water: &WaterStream, side: Side) -> f64 {
    match side {
        Side::Source => water.temp_in_c - water.temp_out_c,
        Side::Sink => water.temp_out_c - water.temp_in_c,
    }
}

// 보충수를 포화 증기로 만드는 데 드는 (현열, 잠열) [kJ/kg]
fn steam_enthalpy_rise(steam: &SteamStream) -> (f64, f64) {
    (
        CP_WATER * (steam.steam_temp_c - steam.makeup_water_temp_c),
        steam_latent_heat(steam.steam_temp_c),
    )
}

/// 습공기 처리 과정의 입출구 상태.
#[derive(Debug, Clone, Copy)]
struct AirProcess {
    w_in: f64,
    w_out: f64,
    /// 흐름 방향 기준 전엔탈피 변화 [kJ/kg 건공기]
    delta_h: f64,
    /// 입구 습공기 밀도 [kg/m³]
    density_in: f64,
}

fn air_process(air: &AirStream, side: Side) -> AirProcess {
    let w_in = humidity_ratio(air.pressure_bara, air.temp_in_c, air.relative_humidity_pct);
    let h_in = air_enthalpy(air.temp_in_c, w_in);
    let w_out = match side {
        Side::Source => {
            let dew = dew_point(air.temp_in_c, air.relative_humidity_pct, air.pressure_bara);
            if air.temp_out_c < dew {
                // 냉각 제습: 출구는 출구 온도에서 포화
                humidity_ratio(air.pressure_bara, air.temp_out_c, 100.0)
            } else {
                w_in
            }
        }
        Side::Sink => match air.target_relative_humidity_pct {
            Some(target) if air.temp_out_c > air.temp_in_c => {
                humidity_ratio(air.pressure_bara, air.temp_out_c, target)
            }
            _ => w_in,
        },
    };
    let h_out = air_enthalpy(air.temp_out_c, w_out);
    let delta_h = match side {
        Side::Source => h_in - h_out,
        Side::Sink => h_out - h_in,
    };
    AirProcess {
        w_in,
        w_out,
        delta_h,
        density_in: air_density(air.pressure_bara, air.temp_in_c, air.relative_humidity_pct),
    }
}

/// 알려진 유량으로부터 열부하를 계산한다.
pub fn load_from_flow(spec: &MediumSpec, flow: Flow, side: Side) -> CalcResult<LoadResult> {
    if !flow.unit.accepted_by(spec.kind()) {
        return Err(CalcError::InvalidUnit {
            unit: flow.unit.as_str().to_string(),
            medium: format!("{side} {}, m³/h 또는 L/min 사용", spec.kind()),
        });
    }
    match spec {
        MediumSpec::Water(water) => {
            let mass = liquid_mass_flow_kg_s(flow);
            let load = snap(mass * CP_WATER * water_delta_t(water, side).abs());
            Ok(LoadResult {
                dry_air_mass_flow_kg_s: mass,
                total_load_kw: load,
                sensible_load_kw: load,
                latent_load_kw: 0.0,
                water_mass_delta_kg_h: 0.0,
            })
        }
        MediumSpec::Air(air) => {
            let process = air_process(air, side);
            // t/h 는 위에서 걸러졌다
            let volume_m3_h = match flow.unit {
                FlowUnit::LitrePerMinute => flow.value * 60.0 / 1000.0,
                _ => flow.value,
            };
            let moist_mass = volume_m3_h * process.density_in / SECONDS_PER_HOUR;
            let dry_air = moist_mass / (1.0 + process.w_in);
            let total = snap(dry_air * process.delta_h);
            // 현열은 건공기분만 본다 (수분 변화 무시)
            let sensible = snap(
                dry_air * (dry_air_enthalpy(air.temp_out_c) - dry_air_enthalpy(air.temp_in_c)).abs(),
            );
            let latent = snap(total - sensible);
            if latent < 0.0 && total > 0.0 {
                warn!(
                    side = %side,
                    latent_kw = latent,
                    "음의 잠열 부하: 가열 중 강한 제습이 일어나는 조건"
                );
            }
            Ok(LoadResult {
                dry_air_mass_flow_kg_s: dry_air,
                total_load_kw: total,
                sensible_load_kw: sensible,
                latent_load_kw: latent,
                water_mass_delta_kg_h: snap(
                    dry_air * (process.w_out - process.w_in) * SECONDS_PER_HOUR,
                ),
            })
        }
        MediumSpec::Steam(steam) => {
            let mass = liquid_mass_flow_kg_s(flow);
            let (sensible, latent) = steam_enthalpy_rise(steam);
            Ok(LoadResult {
                dry_air_mass_flow_kg_s: mass,
                total_load_kw: snap(mass * (sensible + latent)),
                sensible_load_kw: snap(mass * sensible),
                latent_load_kw: snap(mass * latent),
                water_mass_delta_kg_h: 0.0,
            })
        }
    }
}

/// 열부하로부터 필요한 유량을 역산한다.
///
/// 물/증기는 t/h, 공기는 입구 조건 기준 m³/h로 반환한다.
pub fn flow_from_load(spec: &MediumSpec, load_kw: f64, side: Side) -> CalcResult<Flow> {
    if !(load_kw > 0.0) {
        return Err(CalcError::InvalidLoad(load_kw));
    }
    match spec {
        MediumSpec::Water(water) => {
            let delta_t = water_delta_t(water, side);
            if delta_t <= 0.0 {
                return Err(CalcError::ZeroDelta(format!("{side} 물 온도차 {delta_t:.3} K")));
            }
            let mass = load_kw / (CP_WATER * delta_t);
            Ok(Flow::tonnes_per_hour(mass * SECONDS_PER_HOUR / 1000.0))
        }
        MediumSpec::Air(air) => {
            let process = air_process(air, side);
            // 열수요 쪽은 가열 중 강한 제습으로 건공기 현열이 음수여도 전엔탈피가 양수이면 허용
            if process.delta_h <= 0.0 {
                return Err(CalcError::ZeroDelta(format!(
                    "{side} 공기 전엔탈피차 {:.4} kJ/kg",
                    process.delta_h
                )));
            }
            let dry_air = load_kw / process.delta_h;
            let moist_mass = dry_air * (1.0 + process.w_in);
            Ok(Flow::cubic_meters_per_hour(
                moist_mass * SECONDS_PER_HOUR / process.density_in,
            ))
        }
        MediumSpec::Steam(steam) => {
            let (sensible, latent) = steam_enthalpy_rise(steam);
            let delta_h = sensible + latent;
            if delta_h <= 0.0 {
                return Err(CalcError::ZeroDelta(format!(
                    "{side} 증기 총 엔탈피 상승 {delta_h:.3} kJ/kg"
                )));
            }
            let mass = load_kw / delta_h;
            Ok(Flow::tonnes_per_hour(mass * SECONDS_PER_HOUR / 1000.0))
        }
    }
}
