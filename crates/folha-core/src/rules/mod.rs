//! Rules for checking extracted payroll values.

pub mod amounts;
pub mod patterns;

pub use amounts::{format_brl_amount, parse_brl_amount, patronal_contribution, PATRONAL_RATE};
pub use patterns::*;
