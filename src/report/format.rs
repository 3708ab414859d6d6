use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Dollar amount with thousands separators and cents, e.g. `-$1,234.50`.
pub(crate) fn format_amount(val: Decimal) -> String {
    let fixed = format!("{:.2}", val.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if val < Decimal::ZERO { "-" } else { "" };
    format!("{sign}${grouped}.{cents}")
}

pub(crate) fn format_percent(val: Decimal) -> String {
    format!("{val:.1}%")
}

/// Cut a goal name to `max` characters, marking the cut with `…`.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some(_) if max == 0 => String::new(),
        Some(_) => {
            let kept: String = s.chars().take(max - 1).collect();
            format!("{kept}…")
        }
    }
}

/// Text progress bar for a percentage, clamped to 0..=100.
pub(crate) fn progress_bar(percent: Decimal, width: usize) -> String {
    let clamped = percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(width) / Decimal::ONE_HUNDRED)
        .floor()
        .to_usize()
        .unwrap_or(0)
        .min(width);
    let empty = width - filled;
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

#[cfg(test)]
#[path = "format_tests.rs"]
mod tests;
