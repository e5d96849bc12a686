//! 습공기·증기 물성 계산 모듈 모음.
//!
//! 모든 함수는 순수 함수이며, 반복 계산은 고정 횟수 이분법으로만 수행한다.

pub mod humid_air;
pub mod saturation;
pub mod steam;

pub use humid_air::*;
pub use saturation::*;
pub use steam::*;
