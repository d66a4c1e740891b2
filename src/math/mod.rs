//! Arithmetic utilities for ledger calculations.
//!
//! [`CheckedArithmetic`] lifts the checked operations of the domain
//! newtypes into `Result`s; the `wide` helpers carry multiply-then-divide
//! and square roots through 256-bit intermediates.

mod checked;
mod wide;

pub use checked::CheckedArithmetic;
pub use wide::{isqrt, mul_div, mul_div_wide, narrow, sqrt_product, widen};
