use api_types::transaction::TransactionType;
use ratatui::{style::Style, text::Span};

use crate::ui::theme::Theme;

/// Groups thousands and keeps cents only when there are any:
/// `12500.0` is `12,500`, `-3.5` is `-3.50`.
#[must_use]
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }
    let cents = (value.abs() * 100.0).round() as u64;
    let (whole, frac) = (cents / 100, cents % 100);

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    if frac == 0 {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac:02}")
    }
}

/// Short axis label, e.g. `1.2k`.
#[must_use]
pub fn compact(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{value:.0}")
    }
}

/// Income in green with `+`, expenses in red with `-`.
#[must_use]
pub fn styled_amount(amount: f64, kind: TransactionType, theme: &Theme) -> Span<'static> {
    let (color, prefix) = match kind {
        TransactionType::Income => (theme.positive, "+"),
        TransactionType::Expense => (theme.negative, "-"),
    };
    Span::styled(
        format!("{prefix}{}", format_amount(amount.abs())),
        Style::default().fg(color),
    )
}

/// Colour of a signed value: green above zero, red below.
#[must_use]
pub fn signed_style(value: f64, theme: &Theme) -> Style {
    let color = if value > 0.0 {
        theme.positive
    } else if value < 0.0 {
        theme.negative
    } else {
        theme.text
    };
    Style::default().fg(color)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amounts_group_thousands() {
        assert_eq!(format_amount(0.0), "0");
        assert_eq!(format_amount(999.0), "999");
        assert_eq!(format_amount(12_500.0), "12,500");
        assert_eq!(format_amount(1_234_567.891), "1,234,567.89");
        assert_eq!(format_amount(-3.5), "-3.50");
        assert_eq!(format_amount(f64::NAN), "-");
    }

    #[test]
    fn compact_axis_labels() {
        assert_eq!(compact(950.0), "950");
        assert_eq!(compact(1_240.0), "1.2k");
        assert_eq!(compact(-2_500_000.0), "-2.5M");
    }

    #[test]
    fn sign_follows_transaction_type() {
        let theme = Theme::default();
        assert_eq!(styled_amount(12.0, TransactionType::Income, &theme).content, "+12");
        assert_eq!(styled_amount(12.0, TransactionType::Expense, &theme).content, "-12");
    }
}
