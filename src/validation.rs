//! 케이스 입력 검증과 정규화.
//!
//! TOML 케이스 파일은 모든 필드가 선택적인 원시 레코드로 읽은 뒤 여기서 한 번에
//! 검사한다. 오류는 첫 번째에서 멈추지 않고 모두 모아서 돌려준다.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::efficiency::{EfficiencySpec, TypicalEfficiency};
use crate::error::ErrorKind;
use crate::matching::{ApproachTemperatures, MatchRequest};
use crate::medium::{AirStream, KnownQuantity, MediumKind, MediumSpec, Side, SteamStream, WaterStream};
use crate::mvr::MvrRequest;
use crate::properties::max_relative_humidity;
use crate::units::{Flow, FlowUnit};

const TEMP_RANGE_C: (f64, f64) = (-100.0, 300.0);
const AIR_PRESSURE_RANGE_BARA: (f64, f64) = (0.1, 20.0);
const STEAM_TEMP_RANGE_C: (f64, f64) = (1.0, 250.0);
const MAKEUP_TEMP_RANGE_C: (f64, f64) = (-20.0, 100.0);
const SUCTION_PRESSURE_RANGE_BARA: (f64, f64) = (0.01, 40.0);
const CUSTOM_ETA_RANGE: (f64, f64) = (0.01, 0.99);
const APPROACH_RANGE_C: (f64, f64) = (0.0, 50.0);
const CUSTOM_COP_MIN: f64 = 1.01;

/// 케이스 파일 한쪽(열원 또는 열수요)의 원시 입력.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMedium {
    /// "water" | "air" | "steam"
    pub medium: Option<String>,
    pub temp_in: Option<f64>,
    pub temp_out: Option<f64>,
    /// 공기 절대압 [bar a]
    pub pressure: Option<f64>,
    /// 공기 입구 상대습도 [%]
    pub rh: Option<f64>,
    /// 공기 열수요 출구 목표 상대습도 [%]
    pub target_rh: Option<f64>,
    pub steam_temp: Option<f64>,
    pub makeup_water_temp: Option<f64>,
    /// MVR 흡입 압력 직접 지정 [bar a]
    pub pressure_override: Option<f64>,
    pub flow: Option<f64>,
    pub flow_unit: Option<String>,
    /// 열부하 [kW]
    pub load: Option<f64>,
}

/// 효율 원시 입력. 셋 중 하나만 지정한다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawEfficiency {
    /// "conservative" | "typical" | "advanced"
    pub bucket: Option<String>,
    pub ratio: Option<f64>,
    pub cop: Option<f64>,
}

/// 접근 온도차 원시 입력. 빈 값은 설정 파일 값을 쓴다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawApproach {
    pub evaporator_c: Option<f64>,
    pub steam_condenser_c: Option<f64>,
}

/// TOML 케이스 파일 전체.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawCase {
    /// "heat_pump" | "mvr". 비우면 양쪽이 모두 증기일 때 MVR로 본다.
    pub mode: Option<String>,
    /// 유량 또는 부하를 아는 쪽: "source" | "sink"
    pub known_side: Option<String>,
    pub source: RawMedium,
    pub sink: RawMedium,
    pub efficiency: RawEfficiency,
    pub approach: RawApproach,
    /// MVR 수증기 비열비
    pub gamma: Option<f64>,
}

/// 필드 하나에 대한 검증 오류.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub kind: ErrorKind,
    pub message: String,
}

/// 검증 단계에서 모인 오류 목록.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// 해당 필드에 특정 종류의 오류가 있는지.
    pub fn has(&self, field: &str, kind: ErrorKind) -> bool {
        self.0.iter().any(|e| e.field == field && e.kind == kind)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "  - {}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// 검증이 끝난 계산 요청.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidatedCase {
    HeatPump(MatchRequest),
    Mvr(MvrRequest),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    HeatPump,
    Mvr,
}

#[derive(Default)]
struct Collector {
    errors: Vec<FieldError>,
    warnings: Vec<String>,
}

impl Collector {
    fn error(&mut self, field: impl Into<String>, kind: ErrorKind, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            kind,
            message: message.into(),
        });
    }

    fn required(&mut self, field: &str, value: Option<f64>) -> Option<f64> {
        match value {
            Some(v) if v.is_finite() => Some(v),
            Some(v) => {
                self.error(field, ErrorKind::OutOfRange, format!("유한한 숫자가 아닙니다 ({v})"));
                None
            }
            None => {
                self.error(field, ErrorKind::MissingInput, "값이 필요합니다");
                None
            }
        }
    }

    fn ranged(&mut self, field: &str, value: Option<f64>, (min, max): (f64, f64)) -> Option<f64> {
        let v = self.required(field, value)?;
        if v < min || v > max {
            self.error(
                field,
                ErrorKind::OutOfRange,
                format!("{v} 는 허용 범위 [{min}, {max}] 밖입니다"),
            );
            return None;
        }
        Some(v)
    }

    fn positive(&mut self, field: &str, value: f64) -> Option<f64> {
        if value.is_finite() && value > 0.0 {
            Some(value)
        } else {
            self.error(field, ErrorKind::OutOfRange, format!("양수여야 합니다 ({value})"));
            None
        }
    }

    /// 물리적 최대 상대습도를 넘는 RH는 경고 후 최대값으로 낮춘다.
    ///
    /// 온도나 압력이 검증을 통과하지 못했으면 부호만 확인한다.
    fn relative_humidity(&mut self, field: &str, rh: f64, state: Option<(f64, f64)>) -> Option<f64> {
        if !rh.is_finite() || rh < 0.0 {
            self.error(field, ErrorKind::OutOfRange, format!("상대습도는 0 이상이어야 합니다 ({rh})"));
            return None;
        }
        let Some((t_c, p_bara)) = state else {
            return Some(rh);
        };
        let max = max_relative_humidity(t_c, p_bara).unwrap_or(100.0);
        if rh > max {
            self.warnings.push(format!(
                "{field}: {t_c:.1}°C, {p_bara:.3} bar a 에서 가능한 최대 상대습도는 {max:.1}% 입니다. 입력 {rh:.1}% 를 {max:.1}% 로 낮춰 계산합니다"
            ));
            return Some(max);
        }
        Some(rh)
    }
}

fn parse_mode(raw: &RawCase, c: &mut Collector) -> Option<Mode> {
    match raw.mode.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        Some(m) if m == "heat_pump" || m == "heatpump" || m == "hp" => Some(Mode::HeatPump),
        Some(m) if m == "mvr" => Some(Mode::Mvr),
        Some(m) => {
            c.error("mode", ErrorKind::InvalidInput, format!("알 수 없는 모드: {m}"));
            None
        }
        None => {
            let both_steam = [&raw.source, &raw.sink].iter().all(|side| {
                side.medium.as_deref().and_then(MediumKind::parse) == Some(MediumKind::Steam)
            });
            Some(if both_steam { Mode::Mvr } else { Mode::HeatPump })
        }
    }
}

fn parse_known_side(raw: &RawCase, c: &mut Collector) -> Option<Side> {
    match raw.known_side.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        Some(s) if s == "source" => Some(Side::Source),
        Some(s) if s == "sink" => Some(Side::Sink),
        Some(s) => {
            c.error("known_side", ErrorKind::InvalidInput, format!("source 또는 sink 여야 합니다 ({s})"));
            None
        }
        None => {
            c.error("known_side", ErrorKind::MissingInput, "유량/부하를 아는 쪽(source|sink)이 필요합니다");
            None
        }
    }
}

fn side_prefix(side: Side) -> &'static str {
    match side {
        Side::Source => "source",
        Side::Sink => "sink",
    }
}

fn parse_medium_kind(raw: &RawMedium, prefix: &str, c: &mut Collector) -> Option<MediumKind> {
    let field = format!("{prefix}.medium");
    match raw.medium.as_deref() {
        Some(name) => {
            let kind = MediumKind::parse(name);
            if kind.is_none() {
                c.error(field, ErrorKind::UnsupportedMedium, format!("알 수 없는 매체: {name}"));
            }
            kind
        }
        None => {
            c.error(field, ErrorKind::MissingInput, "매체 종류가 필요합니다");
            None
        }
    }
}

fn parse_side(raw: &RawMedium, side: Side, mode: Mode, c: &mut Collector) -> Option<MediumSpec> {
    let prefix = side_prefix(side);
    let kind = parse_medium_kind(raw, prefix, c)?;
    let f = |name: &str| format!("{prefix}.{name}");
    match kind {
        MediumKind::Water | MediumKind::Air => {
            if mode == Mode::Mvr {
                c.error(f("medium"), ErrorKind::UnsupportedMedium, "MVR 모드는 증기만 지원합니다");
                return None;
            }
            let t_in = c.ranged(&f("temp_in"), raw.temp_in, TEMP_RANGE_C);
            let t_out = c.ranged(&f("temp_out"), raw.temp_out, TEMP_RANGE_C);
            let mut ordered = true;
            if let (Some(t_in), Some(t_out)) = (t_in, t_out) {
                ordered = match side {
                    Side::Source => t_in > t_out,
                    Side::Sink => t_in < t_out,
                };
                if !ordered {
                    let expected = match side {
                        Side::Source => "입구 > 출구",
                        Side::Sink => "입구 < 출구",
                    };
                    c.error(
                        f("temp_out"),
                        ErrorKind::InvalidTempOrder,
                        format!("{side}는 {expected} 이어야 합니다 ({t_in} → {t_out}°C)"),
                    );
                }
            }
            if kind == MediumKind::Water {
                return match (t_in, t_out) {
                    (Some(t_in), Some(t_out)) if ordered => Some(MediumSpec::Water(WaterStream {
                        temp_in_c: t_in,
                        temp_out_c: t_out,
                    })),
                    _ => None,
                };
            }

            // 공기 항목은 온도 오류와 관계없이 모두 검사한다.
            let p = c.ranged(&f("pressure"), raw.pressure, AIR_PRESSURE_RANGE_BARA);
            let rh = c
                .required(&f("rh"), raw.rh)
                .and_then(|rh| c.relative_humidity(&f("rh"), rh, t_in.zip(p)));
            let target = match (side, raw.target_rh) {
                (Side::Sink, Some(target)) => c
                    .relative_humidity(&f("target_rh"), target, t_out.zip(p))
                    .map(Some),
                (Side::Source, Some(_)) => {
                    c.warnings.push("source.target_rh: 열원 공기에는 목표 RH를 쓰지 않습니다".into());
                    Some(None)
                }
                (_, None) => Some(None),
            };
            match (t_in, t_out, p, rh, target) {
                (Some(t_in), Some(t_out), Some(p), Some(rh), Some(target)) if ordered => {
                    Some(MediumSpec::Air(AirStream {
                        temp_in_c: t_in,
                        temp_out_c: t_out,
                        pressure_bara: p,
                        relative_humidity_pct: rh,
                        target_relative_humidity_pct: target,
                    }))
                }
                _ => None,
            }
        }
        MediumKind::Steam => {
            if mode == Mode::HeatPump && side == Side::Source {
                c.error(
                    f("medium"),
                    ErrorKind::UnsupportedMedium,
                    "증기 열원은 MVR 모드(증기 → 증기)에서만 지원합니다",
                );
                return None;
            }
            let steam_temp = c.ranged(&f("steam_temp"), raw.steam_temp, STEAM_TEMP_RANGE_C);
            let makeup = match side {
                Side::Sink => {
                    let makeup =
                        c.ranged(&f("makeup_water_temp"), raw.makeup_water_temp, MAKEUP_TEMP_RANGE_C);
                    match (makeup, steam_temp) {
                        (Some(makeup), Some(steam_temp)) if makeup >= steam_temp => {
                            c.error(
                                f("makeup_water_temp"),
                                ErrorKind::InvalidTempOrder,
                                format!("보충수 온도 ({makeup}°C)는 증기 온도 ({steam_temp}°C)보다 낮아야 합니다"),
                            );
                            None
                        }
                        _ => makeup,
                    }
                }
                // 흡입 증기에는 보충수가 없다
                Side::Source => steam_temp,
            };
            Some(MediumSpec::Steam(SteamStream {
                steam_temp_c: steam_temp?,
                makeup_water_temp_c: makeup?,
            }))
        }
    }
}

fn parse_known(raw: &RawMedium, side: Side, kind: Option<MediumKind>, c: &mut Collector) -> Option<KnownQuantity> {
    let prefix = side_prefix(side);
    match (raw.flow, raw.load) {
        (Some(_), Some(_)) => {
            c.error(
                format!("{prefix}.flow"),
                ErrorKind::InvalidInput,
                "유량과 부하 중 하나만 입력하세요",
            );
            None
        }
        (None, None) => {
            c.error(
                format!("{prefix}.flow"),
                ErrorKind::MissingInput,
                format!("{side} 유량 또는 부하가 필요합니다"),
            );
            None
        }
        (Some(value), None) => {
            let value = c.positive(&format!("{prefix}.flow"), value);
            let unit_field = format!("{prefix}.flow_unit");
            let unit = match raw.flow_unit.as_deref() {
                None => {
                    c.error(unit_field, ErrorKind::MissingInput, "유량 단위가 필요합니다");
                    None
                }
                Some(s) => {
                    let parsed = match kind {
                        Some(kind) => FlowUnit::parse_for(s, kind).ok(),
                        None => FlowUnit::parse(s),
                    };
                    if parsed.is_none() {
                        c.error(
                            unit_field,
                            ErrorKind::InvalidUnit,
                            format!("'{s}' 는 이 매체에 쓸 수 없는 유량 단위입니다 (t/h, L/min, m³/h)"),
                        );
                    }
                    parsed
                }
            };
            let flow = Flow::new(value?, unit?);
            Some(match side {
                Side::Source => KnownQuantity::SourceFlow(flow),
                Side::Sink => KnownQuantity::SinkFlow(flow),
            })
        }
        (None, Some(load)) => {
            let load = c.positive(&format!("{prefix}.load"), load)?;
            Some(match side {
                Side::Source => KnownQuantity::SourceLoad(load),
                Side::Sink => KnownQuantity::SinkLoad(load),
            })
        }
    }
}

fn parse_efficiency(raw: &RawEfficiency, mode: Mode, cfg: &Config, c: &mut Collector) -> Option<EfficiencySpec> {
    let given = [raw.bucket.is_some(), raw.ratio.is_some(), raw.cop.is_some()]
        .iter()
        .filter(|g| **g)
        .count();
    if given > 1 {
        c.error(
            "efficiency",
            ErrorKind::InvalidEfficiency,
            "bucket, ratio, cop 중 하나만 지정하세요",
        );
        return None;
    }
    if let Some(name) = raw.bucket.as_deref() {
        let bucket = TypicalEfficiency::parse(name);
        if bucket.is_none() {
            c.error(
                "efficiency.bucket",
                ErrorKind::InvalidEfficiency,
                format!("알 수 없는 효율 구간: {name} (conservative | typical | advanced)"),
            );
        }
        return bucket.map(EfficiencySpec::Typical);
    }
    if let Some(eta) = raw.ratio {
        return c
            .ranged("efficiency.ratio", Some(eta), CUSTOM_ETA_RANGE)
            .map(EfficiencySpec::CustomRatio);
    }
    if let Some(cop) = raw.cop {
        if mode == Mode::Mvr {
            c.error(
                "efficiency.cop",
                ErrorKind::InvalidEfficiency,
                "MVR 계산에는 COP 대신 효율비(등엔트로피 효율)를 입력하세요",
            );
            return None;
        }
        if !(cop >= CUSTOM_COP_MIN) {
            c.error(
                "efficiency.cop",
                ErrorKind::OutOfRange,
                format!("사용자 COP는 {CUSTOM_COP_MIN} 이상이어야 합니다 ({cop})"),
            );
            return None;
        }
        return Some(EfficiencySpec::CustomCop(cop));
    }
    Some(EfficiencySpec::Typical(cfg.efficiency.default_bucket))
}

fn parse_approach(raw: &RawApproach, cfg: &Config, c: &mut Collector) -> Option<ApproachTemperatures> {
    let evaporator_c = match raw.evaporator_c {
        Some(v) => c.ranged("approach.evaporator_c", Some(v), APPROACH_RANGE_C),
        None => Some(cfg.approach.evaporator_c),
    };
    let steam_condenser_c = match raw.steam_condenser_c {
        Some(v) => c.ranged("approach.steam_condenser_c", Some(v), APPROACH_RANGE_C),
        None => Some(cfg.approach.steam_condenser_c),
    };
    Some(ApproachTemperatures {
        evaporator_c: evaporator_c?,
        steam_condenser_c: steam_condenser_c?,
    })
}

/// 원시 케이스를 검증해 솔버 요청으로 바꾼다. 설정 값은 케이스에서 비운 항목에만 쓰인다.
pub fn validate_case(raw: &RawCase, cfg: &Config) -> Result<ValidatedCase, ValidationErrors> {
    let mut c = Collector::default();
    let mode = parse_mode(raw, &mut c);
    let known_side = parse_known_side(raw, &mut c);
    let mode_or_default = mode.unwrap_or(Mode::HeatPump);

    let source = parse_side(&raw.source, Side::Source, mode_or_default, &mut c);
    let sink = parse_side(&raw.sink, Side::Sink, mode_or_default, &mut c);
    let known = known_side.and_then(|side| {
        let (raw_side, spec) = match side {
            Side::Source => (&raw.source, source),
            Side::Sink => (&raw.sink, sink),
        };
        let kind = spec
            .map(|s| s.kind())
            .or_else(|| raw_side.medium.as_deref().and_then(MediumKind::parse));
        parse_known(raw_side, side, kind, &mut c)
    });
    let efficiency = parse_efficiency(&raw.efficiency, mode_or_default, cfg, &mut c);

    let case = match mode_or_default {
        Mode::HeatPump => {
            let approach = parse_approach(&raw.approach, cfg, &mut c);
            match (source, sink, known, efficiency, approach) {
                (Some(source), Some(sink), Some(known), Some(efficiency), Some(approach)) => {
                    Some(ValidatedCase::HeatPump(MatchRequest {
                        source,
                        sink,
                        known,
                        efficiency,
                        approach,
                        warnings: Vec::new(),
                    }))
                }
                _ => None,
            }
        }
        Mode::Mvr => {
            let gamma = match raw.gamma {
                Some(g) => c.ranged("gamma", Some(g), (1.01, 1.67)),
                None => Some(cfg.mvr.gamma),
            };
            let pressure_override = match raw.source.pressure_override {
                Some(p) => c
                    .ranged("source.pressure_override", Some(p), SUCTION_PRESSURE_RANGE_BARA)
                    .map(Some),
                None => Some(None),
            };
            let mut lift_ok = true;
            if let (Some(MediumSpec::Steam(src)), Some(MediumSpec::Steam(dst))) = (source, sink) {
                if dst.steam_temp_c <= src.steam_temp_c {
                    c.error(
                        "sink.steam_temp",
                        ErrorKind::InvalidTempOrder,
                        format!(
                            "토출 증기 온도 ({}°C)는 흡입 증기 온도 ({}°C)보다 높아야 합니다",
                            dst.steam_temp_c, src.steam_temp_c
                        ),
                    );
                    lift_ok = false;
                }
            }
            match (source, sink, known, efficiency, gamma, pressure_override) {
                (
                    Some(MediumSpec::Steam(src)),
                    Some(MediumSpec::Steam(dst)),
                    Some(known),
                    Some(efficiency),
                    Some(gamma),
                    Some(pressure_override),
                ) if lift_ok => Some(ValidatedCase::Mvr(MvrRequest {
                    source_steam_temp_c: src.steam_temp_c,
                    sink_steam_temp_c: dst.steam_temp_c,
                    makeup_water_temp_c: dst.makeup_water_temp_c,
                    source_pressure_override_bara: pressure_override,
                    known,
                    efficiency,
                    gamma,
                    warnings: Vec::new(),
                })),
                _ => None,
            }
        }
    };

    if !c.errors.is_empty() {
        return Err(ValidationErrors(c.errors));
    }
    match case {
        Some(ValidatedCase::HeatPump(mut req)) => {
            req.warnings = c.warnings;
            Ok(ValidatedCase::HeatPump(req))
        }
        Some(ValidatedCase::Mvr(mut req)) => {
            req.warnings = c.warnings;
            Ok(ValidatedCase::Mvr(req))
        }
        None => Err(ValidationErrors(vec![FieldError {
            field: "case".into(),
            kind: ErrorKind::InvalidInput,
            message: "케이스를 해석할 수 없습니다".into(),
        }])),
    }
}
