//! Common regex patterns for payroll values.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Brazilian currency amount as printed on a holerite: 1.234,56 or 234,56
    pub static ref BRL_AMOUNT: Regex = Regex::new(
        r"^-?(?:\d{1,3}(?:\.\d{3})+|\d+),\d{2}$"
    ).unwrap();

    // Numeric employee code (the part of "code + name" that goes into `id`)
    pub static ref EMPLOYEE_CODE: Regex = Regex::new(
        r"^\d+$"
    ).unwrap();
}
