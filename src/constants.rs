//! 물성 계산 전반에서 공유하는 상수.

/// 물(액상) 비열 [kJ/kg·K]
pub const CP_WATER: f64 = 4.18;
/// 건공기 기체상수 [J/kg·K]
pub const R_AIR_DRY: f64 = 287.058;
/// 수증기 기체상수 [J/kg·K]
pub const R_VAPOR: f64 = 461.52;
/// 수증기/건공기 분자량비
pub const MOLAR_MASS_RATIO: f64 = 0.62198;
/// 과열 증기 근사 정압비열 [kJ/kg·K]
pub const CP_SUPERHEATED_STEAM: f64 = 2.0;
/// 증기의 유효 비열비
pub const GAMMA_STEAM: f64 = 1.33;
/// 섭씨 → 켈빈 오프셋
pub const KELVIN_OFFSET: f64 = 273.15;
/// bar → Pa
pub const PA_PER_BAR: f64 = 100_000.0;
/// 물의 임계온도 [K]
pub const T_CRITICAL_K: f64 = 647.096;
/// 물의 임계압력 [Pa]
pub const P_CRITICAL_PA: f64 = 22.064e6;
/// 0°C 기준 증발잠열 상한 [kJ/kg]
pub const LATENT_HEAT_0C: f64 = 2501.0;
/// 초 → 시간 환산
pub const SECONDS_PER_HOUR: f64 = 3600.0;
