use crate::constants::PA_PER_BAR;

/// 절대압 bar(a)를 Pa로 변환한다.
pub fn bara_to_pa(value_bara: f64) -> f64 {
    value_bara * PA_PER_BAR
}

/// Pa를 절대압 bar(a)로 변환한다.
pub fn pa_to_bara(value_pa: f64) -> f64 {
    value_pa / PA_PER_BAR
}
