//! Symbol and profit extraction from rendered table text.
//!
//! The page renders token names like `PEPE24h` and profit cells like
//! `+$1,500+150%`. Both are parsed leniently: text that does not match the
//! expected shape still yields a value instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;

/// Letters followed by a time window suffix such as `24h` or `7d`.
static SYMBOL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Za-z]+)[0-9]+[hd]").expect("valid symbol pattern"));

/// Signed dollar amount immediately followed by a signed percentage.
static PROFIT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([+-]?\$[0-9,.]+)([+-][0-9]+\.?[0-9]*%)").expect("valid profit pattern")
});

/// Cash amount and ROI parsed from one profit cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProfitFigure {
    /// The cell carried both an amount and a percentage.
    Matched { cash_amount: f64, roi: f64 },
    /// Anything else: the whole cell read as a number, ROI treated as zero.
    Fallback { cash_amount: f64 },
}

impl ProfitFigure {
    pub fn cash_amount(&self) -> f64 {
        match *self {
            Self::Matched { cash_amount, .. } | Self::Fallback { cash_amount } => cash_amount,
        }
    }

    pub fn roi(&self) -> f64 {
        match *self {
            Self::Matched { roi, .. } => roi,
            Self::Fallback { .. } => 0.0,
        }
    }

    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched { .. })
    }
}

/// Short token symbol from a table name cell.
///
/// Returns the letters in front of the first `<digits>h` / `<digits>d`
/// suffix, or the name unchanged when there is none.
pub fn extract_symbol(name: &str) -> String {
    SYMBOL_PATTERN
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map_or_else(|| name.to_string(), |m| m.as_str().to_string())
}

/// Parse a profit cell into cash amount and ROI.
///
/// Thousands separators and the `$` sign are dropped before parsing. A
/// value with no leading number becomes NaN.
pub fn extract_profit(text: &str) -> ProfitFigure {
    if let Some(caps) = PROFIT_PATTERN.captures(text) {
        let cash = strip_currency(&caps[1]);
        let roi = caps[2].trim_end_matches('%');
        return ProfitFigure::Matched {
            cash_amount: parse_leading_float(&cash),
            roi: parse_leading_float(roi),
        };
    }

    ProfitFigure::Fallback {
        cash_amount: parse_leading_float(&strip_currency(text)),
    }
}

fn strip_currency(text: &str) -> String {
    text.chars().filter(|c| !matches!(c, '$' | ',')).collect()
}

/// Parse the longest decimal number at the start of `text`.
///
/// Leading whitespace and a sign are accepted; trailing garbage is ignored.
/// Returns NaN when no digits are found.
pub fn parse_leading_float(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first().copied(), Some(b'+' | b'-')) {
        end += 1;
    }

    let rest = &text[end..];
    if rest.starts_with("Infinity") {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end).copied(), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end).copied(), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
