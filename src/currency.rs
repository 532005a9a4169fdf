// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Amount entry and display per currency.
//!
//! [`format_input`] runs on every keystroke of an amount field: it must keep
//! an in-progress decimal entry such as `"12,"` intact while still producing
//! the numeric value that gets stored.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::WalletError;
use crate::models::Currency;

/// Longest integer part accepted from free-form input; the keystroke
/// formatter drops extra digits and [`typed_integer_digits`] lets callers
/// refuse them instead.
pub const MAX_INTEGER_DIGITS: usize = 15;

/// Smallest amount that no longer fits in [`MAX_INTEGER_DIGITS`]. Stored
/// amounts stay below it so every one of them formats and re-parses intact.
pub fn amount_ceiling() -> Decimal {
    Decimal::from(10u64.pow(MAX_INTEGER_DIGITS as u32))
}

/// Which separator convention amount text uses.
///
/// `Legacy` treats comma as the decimal mark and period as grouping for both
/// EUR and USD, which is wrong for USD. `Locale` uses each currency's own
/// convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeparatorScheme {
    #[default]
    Locale,
    Legacy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Separators {
    pub decimal: char,
    pub group: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormattedAmount {
    pub display: String,
    pub value: Decimal,
}

impl FormattedAmount {
    fn empty() -> Self {
        FormattedAmount {
            display: String::new(),
            value: Decimal::ZERO,
        }
    }
}

pub fn separators(currency: Currency, scheme: SeparatorScheme) -> Separators {
    match (currency, scheme) {
        (Currency::Usd, SeparatorScheme::Locale) => Separators {
            decimal: '.',
            group: ',',
        },
        _ => Separators {
            decimal: ',',
            group: '.',
        },
    }
}

pub fn format_input(raw: &str, currency: Currency, scheme: SeparatorScheme) -> FormattedAmount {
    let seps = separators(currency, scheme);
    if currency.decimals() == 0 {
        format_whole(raw, seps.group)
    } else {
        format_fractional(raw, seps)
    }
}

/// Like [`format_input`] but takes a raw currency code. Unknown codes pass
/// the text through untouched and take the leading number as the value.
pub fn format_input_code(raw: &str, code: &str, scheme: SeparatorScheme) -> FormattedAmount {
    match code.parse::<Currency>() {
        Ok(ccy) => format_input(raw, ccy, scheme),
        Err(_) => {
            log::debug!("no formatter for currency '{}', passing input through", code);
            FormattedAmount {
                display: raw.to_string(),
                value: leading_number(raw),
            }
        }
    }
}

/// Render a stored value the way [`format_input`] would display it, so the
/// text re-parses to the same value.
pub fn format_value(value: Decimal, currency: Currency, scheme: SeparatorScheme) -> String {
    let seps = separators(currency, scheme);
    let places = currency.decimals();
    let rounded = value.abs().round_dp(places);
    let text = format!("{:.*}", places as usize, rounded);
    match text.split_once('.') {
        Some((int, frac)) => format!("{}{}{}", group_digits(int, seps.group), seps.decimal, frac),
        None => group_digits(&text, seps.group),
    }
}

/// Signed, symbol-prefixed amount for listings, e.g. `-€1.234,50`.
pub fn format_money(value: Decimal, currency: Currency, scheme: SeparatorScheme) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!(
        "{}{}{}",
        sign,
        currency.symbol(),
        format_value(value, currency, scheme)
    )
}

/// Significant integer digits in typed text, before any truncation.
pub fn typed_integer_digits(raw: &str, currency: Currency, scheme: SeparatorScheme) -> usize {
    let seps = separators(currency, scheme);
    let int_part = if currency.decimals() == 0 {
        raw
    } else {
        raw.split(seps.decimal).next().unwrap_or("")
    };
    let digits: String = int_part.chars().filter(|c| c.is_ascii_digit()).collect();
    digits.trim_start_matches('0').len()
}

fn format_whole(raw: &str, group: char) -> FormattedAmount {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    let digits = normalize_integer(&digits);
    if digits.is_empty() {
        return FormattedAmount::empty();
    }
    FormattedAmount {
        display: group_digits(&digits, group),
        value: integer_value(&digits),
    }
}

fn format_fractional(raw: &str, seps: Separators) -> FormattedAmount {
    let mut int_digits = String::new();
    let mut frac_digits = String::new();
    let mut seen_decimal = false;
    for c in raw.chars() {
        if c.is_ascii_digit() {
            if !seen_decimal {
                int_digits.push(c);
            } else if frac_digits.len() < 2 {
                frac_digits.push(c);
            }
        } else if c == seps.decimal {
            seen_decimal = true;
        }
    }

    let mut int_digits = normalize_integer(&int_digits);
    if int_digits.is_empty() {
        if !seen_decimal {
            return FormattedAmount::empty();
        }
        int_digits.push('0');
    }

    let mut display = group_digits(&int_digits, seps.group);
    let mut value = integer_value(&int_digits);
    if seen_decimal {
        display.push(seps.decimal);
        display.push_str(&frac_digits);
        if let Ok(frac) = frac_digits.parse::<i64>() {
            value += Decimal::new(frac, frac_digits.len() as u32);
        }
    }
    FormattedAmount { display, value }
}

/// Drop leading zeros (keeping a single `0`) and cap the length.
fn normalize_integer(digits: &str) -> String {
    if digits.is_empty() {
        return String::new();
    }
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        return "0".to_string();
    }
    trimmed.chars().take(MAX_INTEGER_DIGITS).collect()
}

fn integer_value(digits: &str) -> Decimal {
    digits.parse::<u64>().map(Decimal::from).unwrap_or(Decimal::ZERO)
}

fn group_digits(digits: &str, sep: char) -> String {
    let len = digits.chars().count();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}

/// Leading `[+-]digits[.digits][e[+-]digits]` of the text, or zero.
///
/// Follows `parseFloat` except where `Decimal` cannot represent the result:
/// anything that overflows yields zero instead of `Infinity`.
fn leading_number(raw: &str) -> Decimal {
    let s = raw.trim_start().as_bytes();
    let digits_from = |mut i: usize| {
        while i < s.len() && s[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let negative = s.first() == Some(&b'-');
    let int_start = usize::from(matches!(s.first(), Some(b'+' | b'-')));
    let int_end = digits_from(int_start);
    let (frac_start, frac_end) = if s.get(int_end) == Some(&b'.') {
        (int_end + 1, digits_from(int_end + 1))
    } else {
        (int_end, int_end)
    };
    if int_end == int_start && frac_end == frac_start {
        return Decimal::ZERO;
    }

    let mut exponent: i64 = 0;
    if matches!(s.get(frac_end), Some(b'e' | b'E')) {
        let sign_len = usize::from(matches!(s.get(frac_end + 1), Some(b'+' | b'-')));
        let exp_start = frac_end + 1 + sign_len;
        let exp_end = digits_from(exp_start);
        if exp_end > exp_start {
            let text = std::str::from_utf8(&s[frac_end + 1..exp_end]).unwrap_or("0");
            let saturated = if text.starts_with('-') { i64::MIN } else { i64::MAX };
            exponent = text.trim_start_matches('+').parse().unwrap_or(saturated);
        }
    }

    let int = std::str::from_utf8(&s[int_start..int_end]).unwrap_or("");
    let frac = std::str::from_utf8(&s[frac_start..frac_end]).unwrap_or("");
    let mantissa = format!(
        "{}{}.{}",
        if negative { "-" } else { "" },
        if int.is_empty() { "0" } else { int },
        if frac.is_empty() { "0" } else { frac }
    );
    let Ok(mut value) = Decimal::from_str(&mantissa) else {
        return Decimal::ZERO;
    };
    // Past 64 steps every non-zero mantissa has already overflowed or vanished.
    for _ in 0..exponent.unsigned_abs().min(64) {
        let next = if exponent > 0 {
            value.checked_mul(Decimal::TEN)
        } else {
            value.checked_div(Decimal::TEN)
        };
        match next {
            Some(v) => value = v,
            None => return Decimal::ZERO,
        }
    }
    value.normalize()
}

impl SeparatorScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeparatorScheme::Locale => "locale",
            SeparatorScheme::Legacy => "legacy",
        }
    }
}

impl FromStr for SeparatorScheme {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "locale" => Ok(SeparatorScheme::Locale),
            "legacy" => Ok(SeparatorScheme::Legacy),
            other => Err(WalletError::InvalidInput(format!(
                "unknown separator scheme '{}' (use locale|legacy)",
                other
            ))),
        }
    }
}

impl fmt::Display for SeparatorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
