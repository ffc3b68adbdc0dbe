//! Amount handling for Brazilian-formatted payroll values.

use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

use crate::models::payroll::PLACEHOLDER;

/// Employer-side INSS rate applied to the INSS calculation base (20%).
pub const PATRONAL_RATE: Decimal = Decimal::from_parts(20, 0, 0, false, 2);

/// Parse a Brazilian-formatted amount (e.g., "1.234,56" or "234,56").
///
/// Returns `None` for the placeholder and for anything that is not a number.
pub fn parse_brl_amount(s: &str) -> Option<Decimal> {
    let trimmed = s.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER {
        return None;
    }

    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let cleaned: String = digits
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    let normalized = match (cleaned.rfind(','), cleaned.rfind('.')) {
        // Comma is the decimal separator, dots group thousands
        (Some(c), Some(d)) if c > d => cleaned.replace('.', "").replace(',', "."),
        // Dot after comma: comma groups thousands
        (Some(_), Some(_)) => cleaned.replace(',', ""),
        (Some(_), None) => cleaned.replace(',', "."),
        // Only dots: "1.234" groups thousands, "12.5" is a decimal
        (None, Some(_)) => {
            let groups: Vec<&str> = cleaned.split('.').collect();
            if groups.len() > 1 && groups[1..].iter().all(|g| g.len() == 3) {
                cleaned.replace('.', "")
            } else {
                cleaned
            }
        }
        (None, None) => cleaned,
    };

    let value = Decimal::from_str(&normalized).ok()?;
    Some(if negative { -value } else { value })
}

/// Format amount in Brazilian style (1.234,56).
pub fn format_brl_amount(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let s = format!("{:.2}", rounded.abs());
    let (integer_part, decimal_part) = s.split_once('.').unwrap_or((s.as_str(), "00"));

    let chars: Vec<char> = integer_part.chars().collect();
    let mut formatted = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        formatted.push('-');
    }

    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            formatted.push('.');
        }
        formatted.push(*c);
    }

    format!("{},{}", formatted, decimal_part)
}

/// Employer INSS contribution for a calculation base, rounded to cents.
pub fn patronal_contribution(base: Decimal) -> Decimal {
    (base * PATRONAL_RATE).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}
