use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Serialize;
use thiserror::Error;

use crate::config::{Config, ConfigError, DEFAULT_CONFIG_PATH};
use crate::error::CalcError;
use crate::matching::{solve_match, MatchRequest, MatchResult};
use crate::medium::MediumKind;
use crate::mvr::{solve_mvr, MvrResult};
use crate::properties::{humid_air_state, saturated_steam_state};
use crate::ui_cli;
use crate::units::{convert_flow, FlowUnit};
use crate::validation::{validate_case, RawCase, ValidatedCase};

/// 애플리케이션 실행 중 발생 가능한 오류를 표현한다.
#[derive(Debug, Error)]
pub enum AppError {
    /// 파일 입출력 오류
    #[error("입출력 오류: {0}")]
    Io(#[from] std::io::Error),
    /// 설정 저장/로드 오류
    #[error("설정 오류: {0}")]
    Config(#[from] ConfigError),
    /// 케이스 파일 파싱 오류
    #[error("케이스 파일 파싱 오류: {0}")]
    CaseFile(#[from] toml::de::Error),
    /// JSON 출력 오류
    #[error("JSON 출력 오류: {0}")]
    Json(#[from] serde_json::Error),
    /// 검증 또는 계산 오류
    #[error("{0}")]
    Calc(#[from] CalcError),
}

/// 히트펌프/MVR 열원-열수요 매칭 계산기.
#[derive(Debug, Parser)]
#[command(name = "hp_match_cli", version, about)]
pub struct Cli {
    /// 설정 파일 경로 (없으면 기본값으로 생성)
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
    /// 텍스트 보고서 대신 JSON으로 출력
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// 케이스 파일(TOML)을 검증하고 계산한다. 모드는 파일에서 정한다.
    Run {
        /// 케이스 파일 경로
        case: PathBuf,
    },
    /// 물성값 조회
    Props {
        #[command(subcommand)]
        target: PropsTarget,
    },
    /// 유량 단위 환산
    ConvertFlow {
        value: f64,
        /// t/h | L/min | m³/h (m3/h)
        from: String,
        to: String,
        /// water | air | steam
        #[arg(long, default_value = "water")]
        medium: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum PropsTarget {
    /// 습공기 상태
    Air {
        /// 건구온도 [°C]
        #[arg(long)]
        temp: f64,
        /// 상대습도 [%]
        #[arg(long)]
        rh: f64,
        /// 절대압 [bar a]
        #[arg(long, default_value_t = 1.01325)]
        pressure: f64,
    },
    /// 포화 증기 상태
    Steam {
        /// 포화 온도 [°C]
        #[arg(long)]
        temp: f64,
    },
}

/// 계산 결과. JSON 출력 시 모드 태그와 함께 직렬화된다.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CaseOutcome {
    HeatPump {
        #[serde(skip)]
        request: MatchRequest,
        result: MatchResult,
    },
    Mvr {
        result: MvrResult,
    },
}

/// 케이스 파일을 읽는다.
pub fn load_case(path: &Path) -> Result<RawCase, AppError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// 원시 케이스를 검증하고 해당 솔버로 계산한다.
pub fn solve_case(raw: &RawCase, config: &Config) -> Result<CaseOutcome, AppError> {
    let outcome = match validate_case(raw, config).map_err(CalcError::from)? {
        ValidatedCase::HeatPump(request) => {
            let result = solve_match(&request)?;
            CaseOutcome::HeatPump { request, result }
        }
        ValidatedCase::Mvr(request) => CaseOutcome::Mvr {
            result: solve_mvr(&request)?,
        },
    };
    Ok(outcome)
}

fn render<T: Serialize>(json: bool, value: &T, text: impl FnOnce() -> String) -> Result<String, AppError> {
    if json {
        Ok(serde_json::to_string_pretty(value)?)
    } else {
        Ok(text())
    }
}

/// 파싱된 명령을 실행하고 출력할 문자열을 돌려준다.
pub fn run(cli: &Cli, config: &Config) -> Result<String, AppError> {
    let decimals = config.output.decimals;
    match &cli.command {
        Command::Run { case } => {
            let raw = load_case(case)?;
            let outcome = solve_case(&raw, config)?;
            render(cli.json, &outcome, || match &outcome {
                CaseOutcome::HeatPump { request, result } => {
                    ui_cli::format_match_report(request, result, decimals)
                }
                CaseOutcome::Mvr { result } => ui_cli::format_mvr_report(result, decimals),
            })
        }
        Command::Props { target } => match *target {
            PropsTarget::Air { temp, rh, pressure } => {
                if !(pressure > 0.0) || rh < 0.0 {
                    return Err(CalcError::OutOfRange(format!(
                        "압력은 양수, 상대습도는 0 이상이어야 합니다 (P={pressure}, RH={rh})"
                    ))
                    .into());
                }
                let state = humid_air_state(pressure, temp, rh);
                render(cli.json, &state, || ui_cli::format_air_state(&state, decimals))
            }
            PropsTarget::Steam { temp } => {
                let state = saturated_steam_state(temp)?;
                render(cli.json, &state, || ui_cli::format_steam_state(&state, decimals))
            }
        },
        Command::ConvertFlow {
            value,
            from,
            to,
            medium,
        } => {
            let kind = MediumKind::parse(medium).ok_or_else(|| {
                CalcError::UnsupportedMedium(format!("알 수 없는 매체: {medium}"))
            })?;
            let from_unit = FlowUnit::parse_for(from, kind)?;
            let to_unit = FlowUnit::parse_for(to, kind)?;
            let converted = convert_flow(*value, from_unit, to_unit, kind)?;
            render(cli.json, &converted, || {
                format!("{value} {from_unit} = {converted:.decimals$} {to_unit}")
            })
        }
    }
}
