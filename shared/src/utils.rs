//! # Shared Utility Functions
//!
//! Display helpers for monetary amounts and percentages, used by any front-end
//! that renders the DTOs.
//!
//! ```rust
//! use shared::utils::{format_currency, format_percentage};
//!
//! assert_eq!(format_currency(1234.5), "$1,234.50");
//! assert_eq!(format_currency(-20.0), "-$20.00");
//! assert_eq!(format_percentage(83.333, 1), "83.3%");
//! ```

/// Format an amount as US dollars with thousands separators and two decimals.
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let dollars = cents / 100;
    let remainder = cents % 100;

    let digits = dollars.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, remainder)
}

/// Format a percentage with the given number of decimals.
pub fn format_percentage(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value)
}
