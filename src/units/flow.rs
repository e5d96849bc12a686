use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};
use crate::medium::MediumKind;

/// 유량 단위. 입력 문자열은 `t/h`, `L/min`, `m³/h`(또는 `m3/h`)만 허용한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowUnit {
    /// 질량 유량 [t/h]
    #[serde(rename = "t/h")]
    TonnePerHour,
    /// 체적 유량 [L/min]
    #[serde(rename = "L/min")]
    LitrePerMinute,
    /// 체적 유량 [m³/h]
    #[serde(rename = "m³/h", alias = "m3/h")]
    CubicMeterPerHour,
}

impl FlowUnit {
    /// 화면/보고서 표기 문자열.
    pub fn as_str(self) -> &'static str {
        match self {
            FlowUnit::TonnePerHour => "t/h",
            FlowUnit::LitrePerMinute => "L/min",
            FlowUnit::CubicMeterPerHour => "m³/h",
        }
    }

    /// 단위 문자열을 해석한다. 매체와 무관하게 문자열만 본다.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "t/h" => Some(FlowUnit::TonnePerHour),
            "L/min" => Some(FlowUnit::LitrePerMinute),
            "m³/h" | "m3/h" => Some(FlowUnit::CubicMeterPerHour),
            _ => None,
        }
    }

    /// 해당 매체가 이 단위를 받을 수 있는지 여부. 공기는 t/h를 쓰지 않는다.
    pub fn accepted_by(self, medium: MediumKind) -> bool {
        !(medium == MediumKind::Air && self == FlowUnit::TonnePerHour)
    }

    /// 매체별로 검사하며 단위 문자열을 해석한다.
    pub fn parse_for(s: &str, medium: MediumKind) -> CalcResult<Self> {
        match FlowUnit::parse(s) {
            Some(unit) if unit.accepted_by(medium) => Ok(unit),
            _ => Err(CalcError::InvalidUnit {
                unit: s.to_string(),
                medium: medium.to_string(),
            }),
        }
    }
}

impl fmt::Display for FlowUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 단위가 붙은 유량 값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Flow {
    pub value: f64,
    pub unit: FlowUnit,
}

impl Flow {
    pub fn new(value: f64, unit: FlowUnit) -> Self {
        Self { value, unit }
    }

    pub fn tonnes_per_hour(value: f64) -> Self {
        Self::new(value, FlowUnit::TonnePerHour)
    }

    pub fn cubic_meters_per_hour(value: f64) -> Self {
        Self::new(value, FlowUnit::CubicMeterPerHour)
    }
}

impl fmt::Display for Flow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2} {}", self.value, self.unit)
    }
}

/// 입력 위젯용 유량 단위 환산.
///
/// 물/증기는 1 t/h = 1 m³/h(밀도 1000 kg/m³)로 보고, 공기는 t/h를 거부한다.
pub fn convert_flow(
    value: f64,
    from: FlowUnit,
    to: FlowUnit,
    medium: MediumKind,
) -> CalcResult<f64> {
    for unit in [from, to] {
        if !unit.accepted_by(medium) {
            return Err(CalcError::InvalidUnit {
                unit: unit.as_str().to_string(),
                medium: medium.to_string(),
            });
        }
    }
    if from == to {
        return Ok(value);
    }
    // m³/h 기준으로 환산
    let m3_per_h = match from {
        FlowUnit::TonnePerHour | FlowUnit::CubicMeterPerHour => value,
        FlowUnit::LitrePerMinute => value * 60.0 / 1000.0,
    };
    Ok(match to {
        FlowUnit::TonnePerHour | FlowUnit::CubicMeterPerHour => m3_per_h,
        FlowUnit::LitrePerMinute => m3_per_h * 1000.0 / 60.0,
    })
}
