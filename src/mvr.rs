//! MVR(기계식 증기 재압축) 계산.
//!
//! 포화 증기를 압축해 더 높은 포화 압력의 증기로 공급하는 경우를 다룬다.
//! 압축 후 과열분은 보충수 분무(감온)로 포화 상태까지 되돌린다고 본다.

use serde::Serialize;
use tracing::{debug, info};

use crate::constants::{CP_WATER, GAMMA_STEAM, SECONDS_PER_HOUR};
use crate::efficiency::EfficiencySpec;
use crate::error::{CalcError, CalcResult};
use crate::medium::KnownQuantity;
use crate::properties::{
    isentropic_outlet_enthalpy, saturated_steam_enthalpy, saturated_steam_state,
    saturation_temp_from_pressure, steam_temp_from_enthalpy, vapor_density,
};
use crate::units::{bara_to_pa, pa_to_bara, to_kelvin, Flow, FlowUnit};

/// 압축비 경고 하한
const RATIO_WARN_LOW: f64 = 1.1;
/// 압축비 경고 상한
const RATIO_WARN_HIGH: f64 = 10.0;
/// 실제 COP/카르노 비가 공칭 효율에서 벗어나면 기록하는 상대 편차
const ETA_DISCREPANCY: f64 = 0.05;

/// MVR 계산 입력.
#[derive(Debug, Clone, PartialEq)]
pub struct MvrRequest {
    /// 흡입(열원) 포화 증기 온도 [°C]
    pub source_steam_temp_c: f64,
    /// 토출(열수요) 포화 증기 온도 [°C]
    pub sink_steam_temp_c: f64,
    /// 감온 분무수 온도 [°C]
    pub makeup_water_temp_c: f64,
    /// 흡입 압력 직접 지정 [bar a]. `None`이면 흡입 온도의 포화압.
    pub source_pressure_override_bara: Option<f64>,
    pub known: KnownQuantity,
    /// 등엔트로피 효율로 쓰일 효율 입력. COP 직접 입력은 허용하지 않는다.
    pub efficiency: EfficiencySpec,
    /// 수증기 비열비
    pub gamma: f64,
    /// 입력 검증 단계에서 넘어온 경고
    pub warnings: Vec<String>,
}

impl MvrRequest {
    pub fn new(
        source_steam_temp_c: f64,
        sink_steam_temp_c: f64,
        makeup_water_temp_c: f64,
        known: KnownQuantity,
        efficiency: EfficiencySpec,
    ) -> Self {
        Self {
            source_steam_temp_c,
            sink_steam_temp_c,
            makeup_water_temp_c,
            source_pressure_override_bara: None,
            known,
            efficiency,
            gamma: GAMMA_STEAM,
            warnings: Vec::new(),
        }
    }
}

/// MVR 계산 결과.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MvrResult {
    /// 흡입 압력 [bar a]
    pub source_pressure_bara: f64,
    /// 토출 압력 [bar a]
    pub sink_pressure_bara: f64,
    pub compression_ratio: f64,
    /// 등엔트로피 압축 동력 [kW]
    pub isentropic_work_kw: f64,
    /// 실제 압축 동력 [kW]
    pub compression_work_kw: f64,
    /// 축동력 [kW]. 구동부 손실은 반영하지 않는다.
    pub shaft_power_kw: f64,
    /// 흡입 증기 잠열 기준 흡열량 [kW]
    pub q_cold_kw: f64,
    /// 공급 열량 [kW] = 흡열량 + 압축 동력
    pub q_hot_kw: f64,
    pub mvr_cop: f64,
    pub cop_carnot_max: f64,
    /// 공칭 효율(등엔트로피 효율로 사용한 값)
    pub eta_actual: f64,
    pub temp_lift_c: f64,
    /// 흡입 증기량 [t/h]
    pub steam_flow_t_h: f64,
    /// 감온 후 공급 증기량 [t/h]
    pub sink_steam_flow_t_h: f64,
    /// 감온 분무수량 [t/h]
    pub makeup_water_flow_t_h: f64,
    /// 압축기 토출 실제 온도 [°C]
    pub outlet_temp_actual_c: f64,
    /// 토출 압력의 포화온도 [°C]
    pub outlet_temp_saturated_c: f64,
    pub is_outlet_superheated: bool,
    pub warnings: Vec<String>,
}

// 증기 유량을 kg/s로. 체적 단위는 해당 상태의 증기 밀도를 쓴다.
fn steam_mass_flow_kg_s(flow: Flow, t_c: f64, p_pa: f64) -> f64 {
    match flow.unit {
        FlowUnit::TonnePerHour => flow.value * 1000.0 / SECONDS_PER_HOUR,
        FlowUnit::CubicMeterPerHour => flow.value * vapor_density(t_c, p_pa) / SECONDS_PER_HOUR,
        FlowUnit::LitrePerMinute => flow.value * 60.0 / 1000.0 * vapor_density(t_c, p_pa) / SECONDS_PER_HOUR,
    }
}

fn positive_flow(flow: Flow) -> CalcResult<Flow> {
    if flow.value > 0.0 {
        Ok(flow)
    } else {
        Err(CalcError::OutOfRange(format!("증기 유량은 양수여야 합니다 ({flow})")))
    }
}

fn positive_load(load_kw: f64) -> CalcResult<f64> {
    if load_kw > 0.0 {
        Ok(load_kw)
    } else {
        Err(CalcError::InvalidLoad(load_kw))
    }
}

/// 감온 분무비 (분무수 kg / 흡입 증기 kg).
///
/// 토출 엔탈피가 포화 증기 엔탈피보다 높을 때만 양수가 된다.
pub fn desuperheat_spray_ratio(h_out: f64, h_sat: f64, makeup_water_temp_c: f64) -> f64 {
    let h_water = CP_WATER * makeup_water_temp_c;
    let denominator = h_water - h_sat;
    if denominator >= 0.0 {
        return 0.0;
    }
    ((h_sat - h_out) / denominator).max(0.0)
}

/// MVR 성능을 계산한다.
pub fn solve_mvr(req: &MvrRequest) -> CalcResult<MvrResult> {
    let t_src = req.source_steam_temp_c;
    let t_sink = req.sink_steam_temp_c;
    if t_sink <= t_src {
        return Err(CalcError::InvalidTempOrder(format!(
            "MVR 토출 증기 온도 ({t_sink:.1}°C)는 흡입 증기 온도 ({t_src:.1}°C)보다 높아야 합니다"
        )));
    }
    if !(req.gamma > 1.0) {
        return Err(CalcError::InvalidInput(format!(
            "비열비는 1보다 커야 합니다 ({})",
            req.gamma
        )));
    }
    let source_state = saturated_steam_state(t_src)?;
    let sink_state = saturated_steam_state(t_sink)?;
    let p_src_pa = match req.source_pressure_override_bara {
        Some(p) if p > 0.0 => bara_to_pa(p),
        Some(p) => {
            return Err(CalcError::OutOfRange(format!(
                "흡입 압력은 양수여야 합니다 ({p} bar a)"
            )))
        }
        None => source_state.pressure_pa,
    };
    let p_sink_pa = sink_state.pressure_pa;

    let mut warnings = req.warnings.clone();
    let ratio = p_sink_pa / p_src_pa;
    if ratio < RATIO_WARN_LOW {
        warnings.push(format!("압축비 {ratio:.2} 가 매우 낮습니다 (< {RATIO_WARN_LOW})"));
    } else if ratio > RATIO_WARN_HIGH {
        warnings.push(format!(
            "압축비 {ratio:.2} 가 단단 압축 범위를 넘습니다 (> {RATIO_WARN_HIGH})"
        ));
    }

    let h_in = source_state.vapor_enthalpy_kj_kg;
    let h_isentropic = isentropic_outlet_enthalpy(h_in, to_kelvin(t_src), ratio, req.gamma);
    let w_ideal = h_isentropic - h_in;
    if w_ideal < 0.0 {
        return Err(CalcError::NegativeWork(w_ideal));
    }
    let eta_is = req.efficiency.isentropic_efficiency()?;
    let w_actual = w_ideal / eta_is;
    let latent_src = source_state.latent_heat_kj_kg;

    let h_out = h_in + w_actual;
    let t_sat_out = saturation_temp_from_pressure(p_sink_pa)?;
    let h_sat_out = saturated_steam_enthalpy(t_sat_out);
    let t_out = steam_temp_from_enthalpy(h_out, p_sink_pa)?;
    let superheated = h_out > h_sat_out;
    let spray_ratio = desuperheat_spray_ratio(h_out, h_sat_out, req.makeup_water_temp_c);
    debug!(ratio, w_ideal, w_actual, h_out, t_out, spray_ratio, "MVR 압축 상태");

    let m_src = match req.known {
        KnownQuantity::SourceFlow(flow) => {
            steam_mass_flow_kg_s(positive_flow(flow)?, t_src, p_src_pa)
        }
        KnownQuantity::SourceLoad(q) => positive_load(q)? / latent_src,
        KnownQuantity::SinkFlow(flow) => {
            steam_mass_flow_kg_s(positive_flow(flow)?, t_sink, p_sink_pa) / (1.0 + spray_ratio)
        }
        KnownQuantity::SinkLoad(q) => positive_load(q)? / (latent_src + w_actual),
    };

    let q_cold = m_src * latent_src;
    let compression_work = m_src * w_actual;
    let q_hot = q_cold + compression_work;
    let cop = q_hot / compression_work;

    let t_src_k = to_kelvin(t_src);
    let t_sink_k = to_kelvin(t_sink);
    let cop_carnot = t_sink_k / (t_sink_k - t_src_k);
    let eta_from_cop = cop / cop_carnot;
    if ((eta_from_cop - eta_is) / eta_is).abs() > ETA_DISCREPANCY {
        info!(
            eta_nominal = eta_is,
            eta_from_cop,
            "MVR 실제 COP/카르노 비가 공칭 효율과 다릅니다 (등엔트로피 효율과 열역학 완전도는 다른 양)"
        );
    }
    if cop > cop_carnot {
        warnings.push(format!(
            "MVR COP {cop:.2} 가 카르노 COP {cop_carnot:.2} 를 넘습니다. 압축비/효율 입력을 확인하세요"
        ));
    }

    let to_t_h = |kg_s: f64| kg_s * SECONDS_PER_HOUR / 1000.0;
    Ok(MvrResult {
        source_pressure_bara: pa_to_bara(p_src_pa),
        sink_pressure_bara: sink_state.pressure_bara,
        compression_ratio: ratio,
        isentropic_work_kw: m_src * w_ideal,
        compression_work_kw: compression_work,
        shaft_power_kw: compression_work,
        q_cold_kw: q_cold,
        q_hot_kw: q_hot,
        mvr_cop: cop,
        cop_carnot_max: cop_carnot,
        eta_actual: eta_is,
        temp_lift_c: t_sink - t_src,
        steam_flow_t_h: to_t_h(m_src),
        sink_steam_flow_t_h: to_t_h(m_src * (1.0 + spray_ratio)),
        makeup_water_flow_t_h: to_t_h(m_src * spray_ratio),
        outlet_temp_actual_c: t_out,
        outlet_temp_saturated_c: t_sat_out,
        is_outlet_superheated: superheated,
        warnings,
    })
}
