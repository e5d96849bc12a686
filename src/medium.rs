use std::fmt;

use serde::{Deserialize, Serialize};

use crate::units::Flow;

/// 열원/열수요 매체 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediumKind {
    Water,
    Air,
    Steam,
}

impl MediumKind {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "water" => Some(MediumKind::Water),
            "air" => Some(MediumKind::Air),
            "steam" => Some(MediumKind::Steam),
            _ => None,
        }
    }
}

impl fmt::Display for MediumKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MediumKind::Water => "water",
            MediumKind::Air => "air",
            MediumKind::Steam => "steam",
        })
    }
}

/// 열원(냉각되는 쪽)인지 열수요(가열되는 쪽)인지.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Source,
    Sink,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Side::Source => "열원",
            Side::Sink => "열수요",
        })
    }
}

/// 물 흐름 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterStream {
    /// 입구 온도 [°C]
    pub temp_in_c: f64,
    /// 출구 온도 [°C]
    pub temp_out_c: f64,
}

/// 습공기 흐름 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirStream {
    /// 입구 건구온도 [°C]
    pub temp_in_c: f64,
    /// 출구 건구온도 [°C]
    pub temp_out_c: f64,
    /// 절대압 [bar a]
    pub pressure_bara: f64,
    /// 입구 상대습도 [%]
    pub relative_humidity_pct: f64,
    /// 열수요 출구 목표 상대습도 [%]. 지정 시 가열과 동시에 가습/제습한다.
    pub target_relative_humidity_pct: Option<f64>,
}

/// 포화 증기 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SteamStream {
    /// 포화 증기 온도 [°C]
    pub steam_temp_c: f64,
    /// 보충수 온도 [°C]
    pub makeup_water_temp_c: f64,
}

/// 한쪽(열원 또는 열수요)의 매체와 온도 조건.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum MediumSpec {
    Water(WaterStream),
    Air(AirStream),
    Steam(SteamStream),
}

impl MediumSpec {
    pub fn kind(&self) -> MediumKind {
        match self {
            MediumSpec::Water(_) => MediumKind::Water,
            MediumSpec::Air(_) => MediumKind::Air,
            MediumSpec::Steam(_) => MediumKind::Steam,
        }
    }

    /// 히트펌프 측에서 본 출구(열교환 후) 온도 [°C]. 증기는 포화 온도.
    pub fn outlet_temp_c(&self) -> f64 {
        match self {
            MediumSpec::Water(w) => w.temp_out_c,
            MediumSpec::Air(a) => a.temp_out_c,
            MediumSpec::Steam(s) => s.steam_temp_c,
        }
    }
}

/// 이미 알고 있는 쪽과 그 입력 방식. 네 경우를 한 번에 분기하기 위한 값.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KnownQuantity {
    /// 열원 유량을 안다
    SourceFlow(Flow),
    /// 열원 부하(kW)를 안다
    SourceLoad(f64),
    /// 열수요 유량을 안다
    SinkFlow(Flow),
    /// 열수요 부하(kW)를 안다
    SinkLoad(f64),
}

impl KnownQuantity {
    pub fn side(&self) -> Side {
        match self {
            KnownQuantity::SourceFlow(_) | KnownQuantity::SourceLoad(_) => Side::Source,
            KnownQuantity::SinkFlow(_) | KnownQuantity::SinkLoad(_) => Side::Sink,
        }
    }
}
