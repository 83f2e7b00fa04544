pub mod fast_math;
pub mod timer;
