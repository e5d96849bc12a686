//! 히트펌프/MVR 열원-열수요 매칭 계산 로직을 라이브러리로 분리하여 CLI 외의 프런트엔드에서도 쓸 수 있게 한다.

pub mod app;
pub mod config;
pub mod constants;
pub mod efficiency;
pub mod error;
pub mod load_flow;
pub mod matching;
pub mod medium;
pub mod mvr;
pub mod properties;
pub mod ui_cli;
pub mod units;
pub mod validation;
