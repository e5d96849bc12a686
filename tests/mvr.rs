use approx::assert_relative_eq;
use heat_pump_matching_toolbox::efficiency::{EfficiencySpec, TypicalEfficiency};
use heat_pump_matching_toolbox::error::{CalcError, ErrorKind};
use heat_pump_matching_toolbox::medium::KnownQuantity;
use heat_pump_matching_toolbox::mvr::{solve_mvr, MvrRequest, MvrResult};
use heat_pump_matching_toolbox::properties::steam_latent_heat;
use heat_pump_matching_toolbox::units::{Flow, FlowUnit};

fn reference_request(known: KnownQuantity) -> MvrRequest {
    MvrRequest::new(100.0, 120.0, 20.0, known, EfficiencySpec::CustomRatio(0.7))
}

fn assert_balanced(res: &MvrResult) {
    let residual = res.q_hot_kw - res.q_cold_kw - res.compression_work_kw;
    assert!(residual.abs() <= 1e-9 * res.q_hot_kw, "residual={residual}");
}

#[test]
fn recompressing_100c_to_120c() {
    let res = solve_mvr(&reference_request(KnownQuantity::SourceFlow(Flow::tonnes_per_hour(10.0)))).unwrap();
    assert_relative_eq!(res.compression_ratio, 1.94, max_relative = 0.02);
    assert!(res.mvr_cop > 0.5 * res.cop_carnot_max, "cop={} carnot={}", res.mvr_cop, res.cop_carnot_max);
    assert!(res.mvr_cop < res.cop_carnot_max);
    assert!(res.makeup_water_flow_t_h >= 0.0);
    assert!(res.is_outlet_superheated);
    assert!(res.outlet_temp_actual_c > res.outlet_temp_saturated_c);
    assert_eq!(res.temp_lift_c, 20.0);
    assert_eq!(res.eta_actual, 0.7);
    assert_relative_eq!(res.steam_flow_t_h, 10.0, max_relative = 1e-12);
    assert_relative_eq!(
        res.sink_steam_flow_t_h,
        res.steam_flow_t_h + res.makeup_water_flow_t_h,
        max_relative = 1e-12
    );
    assert_relative_eq!(res.isentropic_work_kw, 0.7 * res.compression_work_kw, max_relative = 1e-12);
    assert_eq!(res.shaft_power_kw, res.compression_work_kw);
    assert_balanced(&res);
    assert!(res.warnings.is_empty(), "{:?}", res.warnings);
}

#[test]
fn sink_flow_basis_includes_spray_water() {
    let by_source = solve_mvr(&reference_request(KnownQuantity::SourceFlow(Flow::tonnes_per_hour(10.0)))).unwrap();
    let by_sink = solve_mvr(&reference_request(KnownQuantity::SinkFlow(Flow::tonnes_per_hour(
        by_source.sink_steam_flow_t_h,
    ))))
    .unwrap();
    assert_relative_eq!(by_sink.steam_flow_t_h, 10.0, max_relative = 1e-9);
    assert_balanced(&by_sink);
}

#[test]
fn load_bases() {
    let q = 5000.0;
    let by_source = solve_mvr(&reference_request(KnownQuantity::SourceLoad(q))).unwrap();
    assert_relative_eq!(by_source.q_cold_kw, q, max_relative = 1e-12);
    assert_relative_eq!(
        by_source.steam_flow_t_h,
        q / steam_latent_heat(100.0) * 3.6,
        max_relative = 1e-12
    );
    let by_sink = solve_mvr(&reference_request(KnownQuantity::SinkLoad(q))).unwrap();
    assert_relative_eq!(by_sink.q_hot_kw, q, max_relative = 1e-9);
    assert_balanced(&by_sink);
}

#[test]
fn volumetric_source_flow_uses_vapor_density() {
    // 100°C 포화 증기 밀도 ≈ 0.59 kg/m³
    let res = solve_mvr(&reference_request(KnownQuantity::SourceFlow(Flow::new(
        10_000.0,
        FlowUnit::CubicMeterPerHour,
    ))))
    .unwrap();
    assert!(res.steam_flow_t_h > 5.5 && res.steam_flow_t_h < 6.2, "{}", res.steam_flow_t_h);
}

#[test]
fn sink_must_be_hotter() {
    let req = MvrRequest::new(
        120.0,
        100.0,
        20.0,
        KnownQuantity::SourceLoad(100.0),
        EfficiencySpec::default(),
    );
    let err = solve_mvr(&req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidTempOrder);
}

#[test]
fn absolute_cop_is_not_an_isentropic_efficiency() {
    let req = MvrRequest::new(
        100.0,
        120.0,
        20.0,
        KnownQuantity::SourceLoad(100.0),
        EfficiencySpec::CustomCop(5.0),
    );
    let err = solve_mvr(&req).unwrap_err();
    assert!(matches!(err, CalcError::InvalidEfficiency(_)));
}

#[test]
fn small_lift_warns_about_ratio() {
    let req = MvrRequest::new(
        100.0,
        101.0,
        20.0,
        KnownQuantity::SourceLoad(1000.0),
        EfficiencySpec::Typical(TypicalEfficiency::Advanced),
    );
    let res = solve_mvr(&req).unwrap();
    assert!(res.compression_ratio < 1.1);
    assert!(res.warnings.iter().any(|w| w.contains("압축비")));
}

#[test]
fn suction_pressure_override_raises_ratio() {
    let mut req = reference_request(KnownQuantity::SourceLoad(1000.0));
    req.source_pressure_override_bara = Some(0.9);
    let res = solve_mvr(&req).unwrap();
    assert_relative_eq!(res.source_pressure_bara, 0.9, max_relative = 1e-12);
    assert!(res.compression_ratio > 2.1);
}

#[test]
fn override_above_discharge_gives_negative_work() {
    let mut req = reference_request(KnownQuantity::SourceLoad(1000.0));
    req.source_pressure_override_bara = Some(3.0);
    let err = solve_mvr(&req).unwrap_err();
    assert!(matches!(err, CalcError::NegativeWork(w) if w < 0.0));
}

#[test]
fn large_lift_warns_about_single_stage_ratio() {
    let req = MvrRequest::new(
        20.0,
        120.0,
        15.0,
        KnownQuantity::SourceLoad(1000.0),
        EfficiencySpec::CustomRatio(0.7),
    );
    let res = solve_mvr(&req).unwrap();
    assert!(res.compression_ratio > 10.0, "ratio={}", res.compression_ratio);
    assert!(res.warnings.iter().any(|w| w.contains("> 10")), "{:?}", res.warnings);
    assert_balanced(&res);
}

#[test]
fn efficiency_discrepancy_is_informational() {
    // 등엔트로피 효율 0.9 에서 COP/카르노 비는 약 0.82 로 5% 넘게 벌어진다.
    let req = MvrRequest::new(
        100.0,
        120.0,
        20.0,
        KnownQuantity::SourceLoad(1000.0),
        EfficiencySpec::CustomRatio(0.9),
    );
    let res = solve_mvr(&req).unwrap();
    let eta_from_cop = res.mvr_cop / res.cop_carnot_max;
    assert!((eta_from_cop - 0.9).abs() / 0.9 > 0.05, "eta_from_cop={eta_from_cop}");
    assert_eq!(res.eta_actual, 0.9);
    assert!(res.warnings.is_empty(), "{:?}", res.warnings);
}
