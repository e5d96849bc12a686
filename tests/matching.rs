use approx::assert_relative_eq;
use heat_pump_matching_toolbox::efficiency::{EfficiencySpec, TypicalEfficiency};
use heat_pump_matching_toolbox::error::{CalcError, ErrorKind};
use heat_pump_matching_toolbox::matching::{
    solve_match, ApproachTemperatures, MatchRequest, MatchResult, OutletRelativeHumidity,
};
use heat_pump_matching_toolbox::medium::{
    AirStream, KnownQuantity, MediumSpec, SteamStream, WaterStream,
};
use heat_pump_matching_toolbox::units::{Flow, FlowUnit};
use proptest::prelude::*;

fn water(t_in: f64, t_out: f64) -> MediumSpec {
    MediumSpec::Water(WaterStream {
        temp_in_c: t_in,
        temp_out_c: t_out,
    })
}

fn request(source: MediumSpec, sink: MediumSpec, known: KnownQuantity) -> MatchRequest {
    MatchRequest {
        source,
        sink,
        known,
        efficiency: EfficiencySpec::Typical(TypicalEfficiency::Typical),
        approach: ApproachTemperatures::default(),
        warnings: Vec::new(),
    }
}

fn assert_balanced(res: &MatchResult) {
    assert!(res.feasible);
    let residual = (res.q_hot_kw - res.q_cold_kw - res.w_kw).abs();
    assert!(residual <= 1e-6 * res.q_hot_kw, "residual={residual}");
    assert!(res.cop_actual > 1.0 && res.cop_actual < res.cop_carnot_max);
    assert_relative_eq!(res.cop_actual, res.q_hot_kw / res.w_kw, max_relative = 1e-9);
}

#[test]
fn water_to_water_reference_case() {
    let req = request(
        water(30.0, 25.0),
        water(50.0, 70.0),
        KnownQuantity::SourceFlow(Flow::tonnes_per_hour(100.0)),
    );
    let res = solve_match(&req).unwrap();
    assert_balanced(&res);
    assert_relative_eq!(res.q_cold_kw, 580.6, max_relative = 1e-3);
    assert_relative_eq!(res.cop_carnot_max, 6.79, max_relative = 2e-3);
    assert_relative_eq!(res.cop_actual, 3.73, max_relative = 2e-3);
    assert_relative_eq!(res.eta_actual, 0.55, max_relative = 1e-12);
    // 열수요 유량은 Q_hot / (cp·ΔT)
    let expected_sink = res.q_hot_kw / (4.18 * 20.0) * 3.6;
    assert_relative_eq!(res.sink_flow.value, expected_sink, max_relative = 1e-9);
    assert_relative_eq!(res.sink_load.total_load_kw, res.q_hot_kw, max_relative = 1e-9);
    assert!(res.air_sink_extras.is_none());
}

#[test]
fn air_source_by_load_condenses_moisture() {
    // 20°C/60% 공기를 5°C까지 냉각하면 이슬점(약 12°C) 아래라 응축수가 생긴다.
    let source = MediumSpec::Air(AirStream {
        temp_in_c: 20.0,
        temp_out_c: 5.0,
        pressure_bara: 1.013,
        relative_humidity_pct: 60.0,
        target_relative_humidity_pct: None,
    });
    let res = solve_match(&request(source, water(40.0, 50.0), KnownQuantity::SourceLoad(50.0))).unwrap();
    assert_balanced(&res);
    assert_relative_eq!(res.q_cold_kw, 50.0, max_relative = 1e-12);
    assert_eq!(res.source_flow.unit, FlowUnit::CubicMeterPerHour);
    assert_relative_eq!(res.source_load.total_load_kw, 50.0, max_relative = 1e-9);
    assert!(res.source_load.latent_load_kw > 0.0, "latent={}", res.source_load.latent_load_kw);
    assert!(
        res.source_load.water_mass_delta_kg_h < 0.0,
        "water={}",
        res.source_load.water_mass_delta_kg_h
    );
}

#[test]
fn custom_cop_back_derives_efficiency() {
    let mut req = request(water(30.0, 25.0), water(50.0, 70.0), KnownQuantity::SinkLoad(1000.0));
    req.efficiency = EfficiencySpec::CustomCop(4.0);
    let res = solve_match(&req).unwrap();
    assert_balanced(&res);
    assert_eq!(res.cop_actual, 4.0);
    assert_relative_eq!(res.w_kw, 250.0, max_relative = 1e-12);
    assert_relative_eq!(res.eta_actual, 4.0 / res.cop_carnot_max, max_relative = 1e-12);
}

#[test]
fn cop_above_carnot_is_rejected() {
    let mut req = request(water(30.0, 25.0), water(50.0, 70.0), KnownQuantity::SinkLoad(1000.0));
    req.efficiency = EfficiencySpec::CustomCop(7.5);
    let err = solve_match(&req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InfeasibleCop);
}

#[test]
fn source_hotter_than_sink_is_impossible() {
    let req = request(water(80.0, 70.0), water(40.0, 60.0), KnownQuantity::SourceLoad(100.0));
    let err = solve_match(&req).unwrap_err();
    assert!(matches!(
        err,
        CalcError::ThermodynamicallyImpossible { evaporating_c, condensing_c }
            if evaporating_c == 67.0 && condensing_c == 63.0
    ));
}

#[test]
fn steam_source_needs_mvr_mode() {
    let steam = MediumSpec::Steam(SteamStream {
        steam_temp_c: 100.0,
        makeup_water_temp_c: 20.0,
    });
    let req = request(steam, water(50.0, 70.0), KnownQuantity::SourceLoad(100.0));
    let err = solve_match(&req).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedMedium);
}

#[test]
fn steam_sink_flow_from_heat_output() {
    let sink = MediumSpec::Steam(SteamStream {
        steam_temp_c: 120.0,
        makeup_water_temp_c: 20.0,
    });
    let req = request(water(90.0, 80.0), sink, KnownQuantity::SinkLoad(1000.0));
    let res = solve_match(&req).unwrap();
    assert_balanced(&res);
    assert_eq!(res.condensing_temp_c, 125.0);
    assert_eq!(res.sink_flow.unit, FlowUnit::TonnePerHour);
    let per_kg = 4.18 * 100.0 + res.sink_load.latent_load_kw / (res.sink_flow.value / 3.6);
    assert_relative_eq!(res.sink_flow.value, 1000.0 / per_kg * 3.6, max_relative = 1e-9);
}

#[test]
fn air_sink_reports_humidification_potential() {
    let sink = MediumSpec::Air(AirStream {
        temp_in_c: 20.0,
        temp_out_c: 60.0,
        pressure_bara: 1.01325,
        relative_humidity_pct: 50.0,
        target_relative_humidity_pct: None,
    });
    let req = request(water(30.0, 25.0), sink, KnownQuantity::SourceLoad(200.0));
    let res = solve_match(&req).unwrap();
    assert_balanced(&res);
    let extras = res.air_sink_extras.expect("air sink extras");
    let potential = extras.max_humidification_kg_h.unwrap();
    let capacity = extras.evaporation_capacity_kg_h.unwrap();
    assert!(potential > 0.0 && capacity > 0.0);
    let post_heating = match extras.outlet_relative_humidity.unwrap() {
        OutletRelativeHumidity::PostHeating(v) => v,
        other => panic!("expected post-heating RH, got {other:?}"),
    };
    assert!(post_heating < 50.0);
    let after = extras.relative_humidity_after_humidification_pct.unwrap();
    assert!(after >= post_heating && after <= 100.0);
}

#[test]
fn air_sink_target_rh_is_reported_as_target() {
    let sink = MediumSpec::Air(AirStream {
        temp_in_c: 20.0,
        temp_out_c: 60.0,
        pressure_bara: 1.01325,
        relative_humidity_pct: 50.0,
        target_relative_humidity_pct: Some(25.0),
    });
    let req = request(
        water(30.0, 25.0),
        sink,
        KnownQuantity::SinkFlow(Flow::cubic_meters_per_hour(8000.0)),
    );
    let res = solve_match(&req).unwrap();
    assert_balanced(&res);
    let extras = res.air_sink_extras.unwrap();
    assert_eq!(extras.outlet_relative_humidity, Some(OutletRelativeHumidity::Target(25.0)));
    assert!(res.sink_load.water_mass_delta_kg_h > 0.0);
}

#[test]
fn warnings_pass_through() {
    let mut req = request(water(30.0, 25.0), water(50.0, 70.0), KnownQuantity::SourceLoad(100.0));
    req.warnings.push("입력 RH 조정".into());
    let res = solve_match(&req).unwrap();
    assert_eq!(res.warnings, vec!["입력 RH 조정".to_string()]);
}

fn known_case(index: u8, amount: f64) -> KnownQuantity {
    match index % 4 {
        0 => KnownQuantity::SourceFlow(Flow::tonnes_per_hour(amount)),
        1 => KnownQuantity::SourceLoad(amount * 10.0),
        2 => KnownQuantity::SinkFlow(Flow::new(amount * 100.0, FlowUnit::LitrePerMinute)),
        _ => KnownQuantity::SinkLoad(amount * 10.0),
    }
}

proptest! {
    #[test]
    fn feasible_results_balance_energy(
        case in 0u8..4,
        amount in 1.0f64..200.0,
        source_out in 5.0f64..40.0,
        lift in 15.0f64..60.0,
        eta in 0.3f64..0.7,
    ) {
        let mut req = request(
            water(source_out + 5.0, source_out),
            water(source_out + lift - 10.0, source_out + lift),
            known_case(case, amount),
        );
        req.efficiency = EfficiencySpec::CustomRatio(eta);
        let res = solve_match(&req).unwrap();
        let residual = (res.q_hot_kw - res.q_cold_kw - res.w_kw).abs();
        prop_assert!(residual <= 1e-6 * res.q_hot_kw);
        prop_assert!(res.cop_actual > 1.0 && res.cop_actual < res.cop_carnot_max);
        prop_assert!((res.source_load.total_load_kw - res.q_cold_kw).abs() <= 1e-6 * res.q_cold_kw);
        prop_assert!((res.sink_load.total_load_kw - res.q_hot_kw).abs() <= 1e-6 * res.q_hot_kw);
    }
}
