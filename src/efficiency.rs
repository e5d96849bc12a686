use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CalcError, CalcResult};

/// 대표 열역학 완전도(카르노 대비 효율비) 구간.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypicalEfficiency {
    /// 보수적 설계 (η = 0.45)
    Conservative,
    /// 일반 산업용 (η = 0.55)
    Typical,
    /// 고효율 기기 (η = 0.65)
    Advanced,
}

impl TypicalEfficiency {
    pub fn ratio(self) -> f64 {
        match self {
            TypicalEfficiency::Conservative => 0.45,
            TypicalEfficiency::Typical => 0.55,
            TypicalEfficiency::Advanced => 0.65,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Some(TypicalEfficiency::Conservative),
            "typical" => Some(TypicalEfficiency::Typical),
            "advanced" => Some(TypicalEfficiency::Advanced),
            _ => None,
        }
    }
}

impl Default for TypicalEfficiency {
    fn default() -> Self {
        TypicalEfficiency::Typical
    }
}

/// 효율 입력 방식.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EfficiencySpec {
    /// 대표 구간 선택
    Typical(TypicalEfficiency),
    /// 사용자 지정 효율비 (0 < η < 1)
    CustomRatio(f64),
    /// 사용자 지정 절대 COP (> 1)
    CustomCop(f64),
}

impl Default for EfficiencySpec {
    fn default() -> Self {
        EfficiencySpec::Typical(TypicalEfficiency::default())
    }
}

impl fmt::Display for EfficiencySpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EfficiencySpec::Typical(bucket) => write!(f, "η = {:.2} (대표값)", bucket.ratio()),
            EfficiencySpec::CustomRatio(eta) => write!(f, "사용자 η ({eta:.2})"),
            EfficiencySpec::CustomCop(cop) => write!(f, "사용자 COP ({cop:.1})"),
        }
    }
}

/// 카르노 COP로부터 결정된 실제 COP와 효율비.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedCop {
    pub cop: f64,
    pub eta: f64,
}

impl EfficiencySpec {
    /// 카르노 COP를 받아 실제 COP와 효율비를 결정한다.
    ///
    /// 사용자 COP가 주어지면 그대로 쓰고 η = COP / COP_carnot 으로 되돌려 구한다.
    pub fn resolve(&self, cop_carnot: f64) -> CalcResult<ResolvedCop> {
        let resolved = match *self {
            EfficiencySpec::CustomCop(cop) => {
                if !(cop > 1.0) {
                    return Err(CalcError::InvalidEfficiency(format!(
                        "사용자 COP는 1보다 커야 합니다 ({cop})"
                    )));
                }
                ResolvedCop {
                    cop,
                    eta: cop / cop_carnot,
                }
            }
            _ => {
                let eta = self.ratio()?;
                ResolvedCop {
                    cop: eta * cop_carnot,
                    eta,
                }
            }
        };
        if resolved.cop <= 1.0 {
            return Err(CalcError::InfeasibleCop {
                cop: resolved.cop,
                reason: "COP <= 1, 불가능",
            });
        }
        if resolved.cop >= cop_carnot {
            return Err(CalcError::InfeasibleCop {
                cop: resolved.cop,
                reason: "카르노 한계 이상",
            });
        }
        Ok(resolved)
    }

    /// 효율비 η. 사용자 COP 입력에는 효율비가 없으므로 오류.
    pub fn ratio(&self) -> CalcResult<f64> {
        let eta = match *self {
            EfficiencySpec::Typical(bucket) => bucket.ratio(),
            EfficiencySpec::CustomRatio(eta) => eta,
            EfficiencySpec::CustomCop(_) => {
                return Err(CalcError::InvalidEfficiency(
                    "COP 직접 입력에는 효율비가 없습니다".into(),
                ))
            }
        };
        if !(eta > 0.0 && eta < 1.0) {
            return Err(CalcError::InvalidEfficiency(format!(
                "효율비는 0과 1 사이여야 합니다 ({eta})"
            )));
        }
        Ok(eta)
    }

    /// MVR 모드에서 압축기 등엔트로피 효율로 재사용할 값.
    ///
    /// 열역학 완전도와 등엔트로피 효율은 물리적으로 다른 양이지만 MVR 모드에서는
    /// 같은 입력을 그대로 쓴다. 허용 범위는 (0, 1].
    pub fn isentropic_efficiency(&self) -> CalcResult<f64> {
        let eta = match *self {
            EfficiencySpec::Typical(bucket) => bucket.ratio(),
            EfficiencySpec::CustomRatio(eta) => eta,
            EfficiencySpec::CustomCop(_) => {
                return Err(CalcError::InvalidEfficiency(
                    "MVR 계산에는 COP가 아닌 효율비(등엔트로피 효율)가 필요합니다".into(),
                ))
            }
        };
        if !(eta > 0.0 && eta <= 1.0) {
            return Err(CalcError::InvalidEfficiency(format!(
                "등엔트로피 효율은 (0, 1] 범위여야 합니다 ({eta})"
            )));
        }
        Ok(eta)
    }
}
