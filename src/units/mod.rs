//! 단위 정의 및 변환 모듈 모음.

pub mod flow;
pub mod pressure;
pub mod temperature;

pub use flow::{convert_flow, Flow, FlowUnit};
pub use pressure::{bara_to_pa, pa_to_bara};
pub use temperature::to_kelvin;
