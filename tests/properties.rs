//! 습공기·증기 물성 회귀 테스트.
use approx::assert_relative_eq;
use heat_pump_matching_toolbox::error::CalcError;
use heat_pump_matching_toolbox::properties::{
    air_enthalpy, dew_point, humidity_ratio, saturated_steam_state, saturation_temp_from_pressure,
    saturation_vapor_pressure, steam_latent_heat, vapor_pressure,
};
use proptest::prelude::*;

const ATM_BARA: f64 = 1.01325;

#[test]
fn saturation_pressure_at_normal_boiling_point() {
    assert_relative_eq!(saturation_vapor_pressure(100.0), 101_325.0, max_relative = 0.005);
}

#[test]
fn saturation_pressure_matches_seuif97() {
    for t in [10.0, 50.0, 100.0, 150.0, 200.0, 250.0, 300.0, 350.0] {
        let reference_pa = seuif97::tx(t, 1.0, seuif97::OP) * 1.0e6;
        let p = saturation_vapor_pressure(t);
        assert_relative_eq!(p, reference_pa, max_relative = 0.002);
    }
}

#[test]
fn ice_line_and_critical_point() {
    // 빙점 아래는 Magnus 식
    assert_relative_eq!(saturation_vapor_pressure(0.0), 611.21, max_relative = 1e-9);
    assert!(saturation_vapor_pressure(-20.0) < 150.0);
    assert_eq!(saturation_vapor_pressure(374.0), 0.0);
}

#[test]
fn saturation_temperature_inverts_pressure() {
    for t in [5.0, 60.0, 120.0, 180.0] {
        let back = saturation_temp_from_pressure(saturation_vapor_pressure(t)).unwrap();
        assert!((back - t).abs() < 0.02, "t={t} back={back}");
    }
}

#[test]
fn saturation_temperature_rejects_vacuum() {
    let err = saturation_temp_from_pressure(0.0).unwrap_err();
    assert!(matches!(err, CalcError::InvalidInput(_)));
}

#[test]
fn humid_air_reference_state() {
    // 20°C, 50%, 1 atm: W ≈ 0.0069~0.0073 kg/kg, h ≈ 37~39 kJ/kg
    let w = humidity_ratio(ATM_BARA, 20.0, 50.0);
    assert!(w > 0.0068 && w < 0.0074, "w={w}");
    let h = air_enthalpy(20.0, w);
    assert!(h > 37.0 && h < 39.0, "h={h}");
    // 분압 역산은 습도비 계산과 일관적이어야 한다.
    let pv = vapor_pressure(ATM_BARA, w);
    assert_relative_eq!(pv, 0.5 * 0.95 * saturation_vapor_pressure(20.0), max_relative = 1e-9);
}

#[test]
fn steam_state_at_120c() {
    let s = saturated_steam_state(120.0).unwrap();
    assert_relative_eq!(s.pressure_bara, 1.985, max_relative = 0.005);
    assert_relative_eq!(s.latent_heat_kj_kg, steam_latent_heat(120.0));
    assert!(s.vapor_density_kg_m3 > 1.0 && s.vapor_density_kg_m3 < 1.2);
}

proptest! {
    #[test]
    fn saturation_pressure_is_increasing(t in -50.0f64..350.0, dt in 0.5f64..20.0) {
        prop_assert!(saturation_vapor_pressure(t + dt) > saturation_vapor_pressure(t));
    }

    #[test]
    fn dew_point_is_consistent(t in 0.0f64..60.0, rh in 5.0f64..100.0) {
        let dp = dew_point(t, rh, ATM_BARA);
        prop_assert!(dp <= t);
        let w_dew = humidity_ratio(ATM_BARA, dp, 100.0);
        let w = humidity_ratio(ATM_BARA, t, rh);
        prop_assert!((w_dew - w).abs() / w < 0.02, "w_dew={} w={}", w_dew, w);
    }
}
