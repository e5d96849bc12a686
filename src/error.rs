use serde::Serialize;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// 계산 코어 전반에서 사용하는 결과 타입.
pub type CalcResult<T> = Result<T, CalcError>;

/// 오류 종류. UI 계층이 메시지 문자열 대신 종류로 분기할 수 있도록 분리한다.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    MissingInput,
    OutOfRange,
    InvalidTempOrder,
    ThermodynamicallyImpossible,
    InfeasibleCop,
    InvalidLoad,
    ZeroDelta,
    InvalidUnit,
    InvalidEfficiency,
    NegativeWork,
    InvalidInput,
    UnsupportedMedium,
    Validation,
}

/// 매칭/MVR 계산 중 발생 가능한 오류.
///
/// 입력 파싱 단계의 오류는 [`ValidationErrors`]로 모아서 한 번에 보고하고,
/// 파싱 이후 솔버 단계의 오류는 첫 번째 오류에서 즉시 중단한다.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    /// 필수 입력 누락
    #[error("필수 입력이 비어 있습니다: {0}")]
    MissingInput(String),
    /// 물리적 범위를 벗어난 입력
    #[error("범위를 벗어남: {0}")]
    OutOfRange(String),
    /// 입구/출구 온도 순서 오류
    #[error("온도 순서 오류: {0}")]
    InvalidTempOrder(String),
    /// 추정 증발온도가 응축온도 이상
    #[error("열역학적으로 불가능: 추정 증발온도 ({evaporating_c:.1}°C) >= 응축온도 ({condensing_c:.1}°C)")]
    ThermodynamicallyImpossible { evaporating_c: f64, condensing_c: f64 },
    /// 실제 COP가 1 이하이거나 카르노 한계 이상
    #[error("실제 COP ({cop:.2}) 가 유효하지 않음: {reason}")]
    InfeasibleCop { cop: f64, reason: &'static str },
    /// 유량 역산에 쓰인 부하가 0 이하
    #[error("유량 역산용 부하가 유효하지 않습니다: {0:.3} kW")]
    InvalidLoad(f64),
    /// 구동 온도차/엔탈피차가 0 이하
    #[error("구동 온도차/엔탈피차가 0 이하입니다: {0}")]
    ZeroDelta(String),
    /// 매체에 맞지 않거나 알 수 없는 유량 단위
    #[error("유효하지 않은 유량 단위: {unit} ({medium})")]
    InvalidUnit { unit: String, medium: String },
    /// 효율비 또는 COP 입력 오류
    #[error("효율 입력 오류: {0}")]
    InvalidEfficiency(String),
    /// 등엔트로피 압축일이 음수
    #[error("등엔트로피 압축일이 음수입니다: {0:.3} kJ/kg")]
    NegativeWork(f64),
    /// 물성 함수에 전달된 인자가 정의역 밖
    #[error("유효하지 않은 입력: {0}")]
    InvalidInput(String),
    /// 지원하지 않는 열원/열수요 매체 조합
    #[error("지원하지 않는 매체 조합: {0}")]
    UnsupportedMedium(String),
    /// 입력 검증 단계에서 모인 오류 목록
    #[error("입력 검증 실패:\n{0}")]
    Validation(ValidationErrors),
}

impl CalcError {
    /// 오류 종류를 반환한다.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalcError::MissingInput(_) => ErrorKind::MissingInput,
            CalcError::OutOfRange(_) => ErrorKind::OutOfRange,
            CalcError::InvalidTempOrder(_) => ErrorKind::InvalidTempOrder,
            CalcError::ThermodynamicallyImpossible { .. } => ErrorKind::ThermodynamicallyImpossible,
            CalcError::InfeasibleCop { .. } => ErrorKind::InfeasibleCop,
            CalcError::InvalidLoad(_) => ErrorKind::InvalidLoad,
            CalcError::ZeroDelta(_) => ErrorKind::ZeroDelta,
            CalcError::InvalidUnit { .. } => ErrorKind::InvalidUnit,
            CalcError::InvalidEfficiency(_) => ErrorKind::InvalidEfficiency,
            CalcError::NegativeWork(_) => ErrorKind::NegativeWork,
            CalcError::InvalidInput(_) => ErrorKind::InvalidInput,
            CalcError::UnsupportedMedium(_) => ErrorKind::UnsupportedMedium,
            CalcError::Validation(_) => ErrorKind::Validation,
        }
    }
}

impl From<ValidationErrors> for CalcError {
    fn from(value: ValidationErrors) -> Self {
        CalcError::Validation(value)
    }
}
