//! Domain scanning: score one kernel against `f32::sin` over every bit pattern.

pub mod scanner;

pub use scanner::*;
