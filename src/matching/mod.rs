//! 히트펌프 열원·열수요 매칭 계산.
//!
//! 추정 증발/응축 온도로 카르노 COP를 구하고, 효율비(또는 사용자 COP)로 실제 COP를
//! 정한 뒤 Q_hot = Q_cold + W 에너지 수지로 모르는 쪽 유량을 역산한다.

pub mod air_sink;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::efficiency::EfficiencySpec;
use crate::error::{CalcError, CalcResult};
use crate::load_flow::{flow_from_load, load_from_flow, LoadResult};
use crate::medium::{KnownQuantity, MediumSpec, Side};
use crate::units::{to_kelvin, Flow};

pub use air_sink::{AirSinkExtras, OutletRelativeHumidity};

/// 열교환기 접근 온도차 [°C].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApproachTemperatures {
    /// 열원 출구와 증발온도 사이 (물/공기 열수요의 응축 측에도 적용)
    pub evaporator_c: f64,
    /// 증기 열수요의 포화온도와 응축온도 사이
    pub steam_condenser_c: f64,
}

impl Default for ApproachTemperatures {
    fn default() -> Self {
        Self {
            evaporator_c: 3.0,
            steam_condenser_c: 5.0,
        }
    }
}

/// 매칭 계산 입력.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRequest {
    pub source: MediumSpec,
    pub sink: MediumSpec,
    /// 이미 알고 있는 쪽과 입력 방식
    pub known: KnownQuantity,
    pub efficiency: EfficiencySpec,
    pub approach: ApproachTemperatures,
    /// 입력 검증 단계에서 넘어온 경고
    pub warnings: Vec<String>,
}

/// 매칭 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub feasible: bool,
    /// 증발기 흡열량 [kW]
    pub q_cold_kw: f64,
    /// 응축기 방열량 [kW]
    pub q_hot_kw: f64,
    /// 압축기 소요 동력 [kW]
    pub w_kw: f64,
    pub cop_actual: f64,
    pub cop_carnot_max: f64,
    /// 카르노 대비 효율비
    pub eta_actual: f64,
    /// 추정 증발온도 [°C]
    pub evaporating_temp_c: f64,
    /// 추정 응축온도 [°C]
    pub condensing_temp_c: f64,
    pub source_flow: Flow,
    pub sink_flow: Flow,
    pub source_load: LoadResult,
    pub sink_load: LoadResult,
    /// 공기 열수요일 때만 채워진다
    pub air_sink_extras: Option<AirSinkExtras>,
    pub warnings: Vec<String>,
}

/// 증발/응축 추정 온도 [°C].
pub fn estimate_cycle_temperatures(
    source: &MediumSpec,
    sink: &MediumSpec,
    approach: &ApproachTemperatures,
) -> (f64, f64) {
    let evaporating = source.outlet_temp_c() - approach.evaporator_c;
    let condensing = match sink {
        MediumSpec::Steam(steam) => steam.steam_temp_c + approach.steam_condenser_c,
        _ => sink.outlet_temp_c() + approach.evaporator_c,
    };
    (evaporating, condensing)
}

/// 카르노 COP(난방 기준) = T_cond / (T_cond - T_evap). 온도는 °C로 받는다.
pub fn carnot_cop(evaporating_c: f64, condensing_c: f64) -> CalcResult<f64> {
    let t_evap_k = to_kelvin(evaporating_c);
    let t_cond_k = to_kelvin(condensing_c);
    if t_evap_k >= t_cond_k {
        return Err(CalcError::ThermodynamicallyImpossible {
            evaporating_c,
            condensing_c,
        });
    }
    Ok(t_cond_k / (t_cond_k - t_evap_k))
}

/// 열원/열수요 매칭을 계산한다.
pub fn solve_match(req: &MatchRequest) -> CalcResult<MatchResult> {
    if matches!(req.source, MediumSpec::Steam(_)) {
        return Err(CalcError::UnsupportedMedium(
            "증기 열원은 MVR 모드(증기 열수요)에서만 지원합니다".into(),
        ));
    }

    let (evaporating_c, condensing_c) =
        estimate_cycle_temperatures(&req.source, &req.sink, &req.approach);
    let cop_carnot = carnot_cop(evaporating_c, condensing_c)?;
    let resolved = req.efficiency.resolve(cop_carnot)?;
    let cop = resolved.cop;
    debug!(
        evaporating_c,
        condensing_c, cop_carnot, cop, eta = resolved.eta, "사이클 온도와 COP 추정"
    );

    let (q_cold, q_hot, w, source_flow, sink_flow) = match req.known {
        KnownQuantity::SourceFlow(flow) => {
            let q_cold = load_from_flow(&req.source, flow, Side::Source)?.total_load_kw;
            if !(q_cold > 0.0) {
                return Err(CalcError::InvalidLoad(q_cold));
            }
            let w = q_cold / (cop - 1.0);
            let q_hot = q_cold + w;
            let sink_flow = flow_from_load(&req.sink, q_hot, Side::Sink)?;
            (q_cold, q_hot, w, flow, sink_flow)
        }
        KnownQuantity::SourceLoad(q_cold) => {
            let w = q_cold / (cop - 1.0);
            let q_hot = q_cold + w;
            let source_flow = flow_from_load(&req.source, q_cold, Side::Source)?;
            let sink_flow = flow_from_load(&req.sink, q_hot, Side::Sink)?;
            (q_cold, q_hot, w, source_flow, sink_flow)
        }
        KnownQuantity::SinkFlow(flow) => {
            let q_hot = load_from_flow(&req.sink, flow, Side::Sink)?.total_load_kw;
            if !(q_hot > 0.0) {
                return Err(CalcError::InvalidLoad(q_hot));
            }
            let w = q_hot / cop;
            let q_cold = q_hot - w;
            let source_flow = flow_from_load(&req.source, q_cold, Side::Source)?;
            (q_cold, q_hot, w, source_flow, flow)
        }
        KnownQuantity::SinkLoad(q_hot) => {
            let w = q_hot / cop;
            let q_cold = q_hot - w;
            let source_flow = flow_from_load(&req.source, q_cold, Side::Source)?;
            let sink_flow = flow_from_load(&req.sink, q_hot, Side::Sink)?;
            (q_cold, q_hot, w, source_flow, sink_flow)
        }
    };
    debug!(known = ?req.known.side(), q_cold, q_hot, w, "에너지 수지");

    // 최종 유량으로 양쪽 부하를 다시 계산해 현열/잠열 분리를 얻는다.
    let source_load = load_from_flow(&req.source, source_flow, Side::Source)?;
    let sink_load = load_from_flow(&req.sink, sink_flow, Side::Sink)?;

    let mut warnings = req.warnings.clone();
    let air_sink_extras = match &req.sink {
        MediumSpec::Air(air) => Some(
            match air_sink::compute_air_sink_extras(air, &sink_load, q_hot) {
                Ok(extras) => extras,
                Err(err) => {
                    warn!(error = %err, "공기 열수요 부가 지표 계산 실패");
                    warnings.push(format!("공기 열수요 부가 지표를 계산하지 못했습니다: {err}"));
                    AirSinkExtras::default()
                }
            },
        ),
        _ => None,
    };

    Ok(MatchResult {
        feasible: true,
        q_cold_kw: q_cold,
        q_hot_kw: q_hot,
        w_kw: w,
        cop_actual: cop,
        cop_carnot_max: cop_carnot,
        eta_actual: resolved.eta,
        evaporating_temp_c: evaporating_c,
        condensing_temp_c: condensing_c,
        source_flow,
        sink_flow,
        source_load,
        sink_load,
        air_sink_extras,
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::medium::{SteamStream, WaterStream};

    #[test]
    fn steam_sink_uses_steam_approach() {
        let source = MediumSpec::Water(WaterStream {
            temp_in_c: 60.0,
            temp_out_c: 50.0,
        });
        let sink = MediumSpec::Steam(SteamStream {
            steam_temp_c: 120.0,
            makeup_water_temp_c: 20.0,
        });
        let (evap, cond) = estimate_cycle_temperatures(&source, &sink, &ApproachTemperatures::default());
        assert_eq!(evap, 47.0);
        assert_eq!(cond, 125.0);
    }

    #[test]
    fn equal_temperatures_are_impossible() {
        let err = carnot_cop(40.0, 40.0).unwrap_err();
        assert!(matches!(err, CalcError::ThermodynamicallyImpossible { .. }));
    }
}
