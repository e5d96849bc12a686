//! 계산 결과를 터미널용 텍스트 보고서로 만든다.

use crate::load_flow::LoadResult;
use crate::matching::{MatchRequest, MatchResult, OutletRelativeHumidity};
use crate::medium::{MediumSpec, Side};
use crate::mvr::MvrResult;
use crate::properties::{saturation_vapor_pressure, HumidAirState, SaturatedSteamState};
use crate::units::pa_to_bara;

// 한 줄씩 모은 보고서를 하나의 문자열로 합친다.
fn lines(out: Vec<String>) -> String {
    let mut text = out.join("\n");
    text.push('\n');
    text
}

fn num(value: f64, decimals: usize) -> String {
    format!("{value:.decimals$}")
}

fn opt(value: Option<f64>, decimals: usize, suffix: &str) -> String {
    match value {
        Some(v) => format!("{} {suffix}", num(v, decimals)),
        None => "N/A".into(),
    }
}

fn push_warnings(out: &mut Vec<String>, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    out.push("\n[경고]".into());
    for w in warnings {
        out.push(format!("  * {w}"));
    }
}

fn push_side(out: &mut Vec<String>, side: Side, spec: &MediumSpec, load: &LoadResult, d: usize) {
    out.push(format!("\n-- {side} ({}) --", spec.kind()));
    out.push(format!("  전열 부하        : {} kW", num(load.total_load_kw, d)));
    match spec {
        MediumSpec::Air(_) => {
            out.push(format!("  현열 부하        : {} kW", num(load.sensible_load_kw, d)));
            out.push(format!("  잠열 부하        : {} kW", num(load.latent_load_kw, d)));
            out.push(format!("  수분 변화        : {} kg/h", num(load.water_mass_delta_kg_h, d)));
            out.push(format!("  건공기 유량      : {} kg/s", num(load.dry_air_mass_flow_kg_s, d + 1)));
        }
        MediumSpec::Steam(steam) => {
            let p_bara = pa_to_bara(saturation_vapor_pressure(steam.steam_temp_c));
            out.push(format!("  보충수 가열(현열): {} kW", num(load.sensible_load_kw, d)));
            out.push(format!("  증발(잠열)       : {} kW", num(load.latent_load_kw, d)));
            out.push(format!("  포화 압력        : {} bar a", num(p_bara, d + 1)));
        }
        MediumSpec::Water(_) => {}
    }
}

/// 히트펌프 매칭 결과 보고서.
pub fn format_match_report(req: &MatchRequest, res: &MatchResult, decimals: usize) -> String {
    let d = decimals;
    let mut out = Vec::new();
    out.push("=== 히트펌프 매칭 결과 ===".into());
    out.push(format!(
        "판정             : {}",
        if res.feasible { "매칭 가능" } else { "매칭 불가" }
    ));
    out.push(format!("효율 입력        : {}", req.efficiency));
    out.push(format!(
        "추정 증발/응축   : {} / {} °C",
        num(res.evaporating_temp_c, 1),
        num(res.condensing_temp_c, 1)
    ));
    out.push(format!("Q_cold (흡열)    : {} kW", num(res.q_cold_kw, d)));
    out.push(format!("Q_hot  (방열)    : {} kW", num(res.q_hot_kw, d)));
    out.push(format!("W (압축 동력)    : {} kW", num(res.w_kw, d)));
    out.push(format!("COP (실제)       : {}", num(res.cop_actual, d)));
    out.push(format!("COP (카르노)     : {}", num(res.cop_carnot_max, d)));
    out.push(format!("효율비 η         : {}", num(res.eta_actual, 3)));
    out.push(format!("열원 유량        : {}", res.source_flow));
    out.push(format!("열수요 유량      : {}", res.sink_flow));

    push_side(&mut out, Side::Source, &req.source, &res.source_load, d);
    push_side(&mut out, Side::Sink, &req.sink, &res.sink_load, d);

    if let Some(extras) = &res.air_sink_extras {
        out.push("\n-- 공기 열수요 가습/건조 지표 --".into());
        out.push(format!(
            "  최대 흡습 가능량  : {}",
            opt(extras.max_humidification_kg_h, d, "kg/h")
        ));
        let rh_line = match extras.outlet_relative_humidity {
            Some(OutletRelativeHumidity::Target(v)) => format!("{} % (목표)", num(v, 1)),
            Some(OutletRelativeHumidity::PostHeating(v)) => format!("{} % (가열만)", num(v, 1)),
            None => "N/A".into(),
        };
        out.push(format!("  출구 RH           : {rh_line}"));
        out.push(format!(
            "  열량 기준 증발능력: {}",
            opt(extras.evaporation_capacity_kg_h, d, "kg/h")
        ));
        out.push(format!(
            "  가습 후 RH        : {}",
            opt(extras.relative_humidity_after_humidification_pct, 1, "%")
        ));
    }
    push_warnings(&mut out, &res.warnings);
    lines(out)
}

/// MVR 결과 보고서.
pub fn format_mvr_report(res: &MvrResult, decimals: usize) -> String {
    let d = decimals;
    let mut out = Vec::new();
    out.push("=== MVR 계산 결과 ===".into());
    out.push(format!(
        "흡입/토출 압력   : {} / {} bar a",
        num(res.source_pressure_bara, d + 1),
        num(res.sink_pressure_bara, d + 1)
    ));
    out.push(format!("압축비           : {}", num(res.compression_ratio, d)));
    out.push(format!("온도 상승        : {} °C", num(res.temp_lift_c, 1)));
    out.push(format!("등엔트로피 동력  : {} kW", num(res.isentropic_work_kw, d)));
    out.push(format!("실제 압축 동력   : {} kW", num(res.compression_work_kw, d)));
    out.push(format!("축동력           : {} kW", num(res.shaft_power_kw, d)));
    out.push(format!("흡열량 Q_cold    : {} kW", num(res.q_cold_kw, d)));
    out.push(format!("공급열 Q_hot     : {} kW", num(res.q_hot_kw, d)));
    out.push(format!("MVR COP          : {}", num(res.mvr_cop, d)));
    out.push(format!("COP (카르노)     : {}", num(res.cop_carnot_max, d)));
    out.push(format!("효율 η (공칭)    : {}", num(res.eta_actual, 3)));
    out.push(format!("흡입 증기량      : {} t/h", num(res.steam_flow_t_h, d + 1)));
    out.push(format!("공급 증기량      : {} t/h", num(res.sink_steam_flow_t_h, d + 1)));
    out.push(format!("감온 분무수량    : {} t/h", num(res.makeup_water_flow_t_h, d + 1)));
    out.push(format!(
        "토출 온도        : {} °C (포화 {} °C, {})",
        num(res.outlet_temp_actual_c, 1),
        num(res.outlet_temp_saturated_c, 1),
        if res.is_outlet_superheated { "과열" } else { "포화/습증기" }
    ));
    push_warnings(&mut out, &res.warnings);
    lines(out)
}

/// 습공기 상태 출력.
pub fn format_air_state(state: &HumidAirState, decimals: usize) -> String {
    let d = decimals;
    lines(vec![
        format!("습도비           : {} kg/kg", num(state.humidity_ratio, 5)),
        format!("이슬점           : {} °C", num(state.dew_point_c, d)),
        format!("밀도             : {} kg/m³", num(state.density_kg_m3, 4)),
        format!("비엔탈피         : {} kJ/kg", num(state.enthalpy_kj_kg, d)),
    ])
}

/// 포화 증기 상태 출력.
pub fn format_steam_state(state: &SaturatedSteamState, decimals: usize) -> String {
    let d = decimals;
    lines(vec![
        format!("포화 압력        : {} bar a", num(state.pressure_bara, d + 2)),
        format!("증발잠열         : {} kJ/kg", num(state.latent_heat_kj_kg, d)),
        format!("포화 증기 엔탈피 : {} kJ/kg", num(state.vapor_enthalpy_kj_kg, d)),
        format!("증기 밀도        : {} kg/m³", num(state.vapor_density_kg_m3, 4)),
    ])
}
