//! Currency normalization against a static exchange-rate table
//!
//! All amounts are normalized into a single base currency (Kenyan Shilling
//! in the default configuration) before comparison. Rates are expressed as
//! "base-currency units per one unit of foreign currency", so a foreign
//! amount converts to base terms by division.

use bigdecimal::{BigDecimal, RoundingMode};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Shorthand for an exact decimal constant: `digits * 10^-scale`.
fn dec(digits: i64, scale: i64) -> BigDecimal {
    BigDecimal::new(digits.into(), scale)
}

/// Non-fatal advisory raised when normalization falls back to a 1:1 rate
/// because a currency code has no entry in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrencyWarning {
    /// The currency code, as supplied, that had no exchange rate.
    pub currency: String,
}

impl fmt::Display for CurrencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "exchange rate not found for currency: {}, used 1:1 conversion",
            self.currency
        )
    }
}

/// A normalized amount together with any advisory raised while computing it.
///
/// Warnings are returned as data rather than thrown so callers can surface,
/// count, or ignore them without disrupting a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Normalized {
    /// The amount expressed in base-currency units.
    pub amount: BigDecimal,
    /// Present when the table had no rate for the requested currency.
    pub warning: Option<CurrencyWarning>,
}

/// Errors raised when validating an exchange-rate table
#[derive(Debug, thiserror::Error)]
pub enum CurrencyError {
    #[error("Invalid exchange rate: {0}")]
    InvalidRate(String),
}

/// Static mapping from currency code to exchange rate.
///
/// Codes are case-insensitive and canonicalized to upper-case. `rate[C]`
/// answers "how much base currency equals 1 unit of C"; the base code's
/// self-rate, when present, must be exactly 1.
///
/// The table is plain configuration: build one with [`ExchangeRateTable::new`]
/// and [`insert_rate`](ExchangeRateTable::insert_rate), or start from the
/// built-in [`Default`] instance, and pass it explicitly to the engine. It
/// holds no external resources and is read-only once constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExchangeRateTable {
    base_code: String,
    /// Recognized long-form spellings of the base code, upper-cased.
    base_aliases: Vec<String>,
    /// Canonical upper-case code -> base units per one foreign unit.
    rates: HashMap<String, BigDecimal>,
}

impl ExchangeRateTable {
    /// Create an empty table with the given base currency code.
    pub fn new(base_code: impl Into<String>) -> Self {
        let base_code = base_code.into();
        let mut rates = HashMap::new();
        rates.insert(base_code.to_uppercase(), BigDecimal::from(1));
        Self {
            base_code,
            base_aliases: Vec::new(),
            rates,
        }
    }

    /// The base currency code, as originally spelled (e.g. "KSh").
    pub fn base_code(&self) -> &str {
        &self.base_code
    }

    /// Register an additional spelling that should be treated as the base
    /// currency (e.g. "KShillings" for "KSh").
    pub fn add_base_alias(&mut self, alias: impl AsRef<str>) {
        self.base_aliases.push(alias.as_ref().to_uppercase());
    }

    /// Insert or replace the rate for a currency code.
    pub fn insert_rate(&mut self, code: impl AsRef<str>, rate: BigDecimal) {
        self.rates.insert(code.as_ref().to_uppercase(), rate);
    }

    /// Look up the rate for a code, case-insensitively.
    pub fn rate(&self, code: &str) -> Option<&BigDecimal> {
        self.rates.get(&code.to_uppercase())
    }

    /// All currency codes with a configured rate, sorted.
    pub fn supported_currencies(&self) -> Vec<String> {
        let mut codes: Vec<String> = self.rates.keys().cloned().collect();
        codes.sort();
        codes
    }

    /// True when `code` denotes the base currency (the base code itself or
    /// any registered alias, compared case-insensitively).
    pub fn is_base(&self, code: &str) -> bool {
        let canonical = code.to_uppercase();
        canonical == self.base_code.to_uppercase()
            || self.base_aliases.iter().any(|a| *a == canonical)
    }

    /// Check the table invariants: the base self-rate, if present, is
    /// exactly 1, and every rate is positive.
    pub fn validate(&self) -> Result<(), CurrencyError> {
        if let Some(base_rate) = self.rates.get(&self.base_code.to_uppercase()) {
            if *base_rate != BigDecimal::from(1) {
                return Err(CurrencyError::InvalidRate(format!(
                    "base currency {} must have a self-rate of 1, got {}",
                    self.base_code, base_rate
                )));
            }
        }

        for (code, rate) in &self.rates {
            if *rate <= BigDecimal::from(0) {
                return Err(CurrencyError::InvalidRate(format!(
                    "rate for {} must be positive, got {}",
                    code, rate
                )));
            }
        }

        Ok(())
    }

    /// Convert an amount from `currency` into base-currency units.
    ///
    /// The base currency (and its aliases) passes through unchanged. An
    /// unknown code falls back to a 1:1 rate and reports a
    /// [`CurrencyWarning`] instead of failing, so reconciliation can always
    /// proceed. Deterministic; no I/O.
    pub fn normalize(&self, amount: &BigDecimal, currency: &str) -> Normalized {
        if self.is_base(currency) {
            return Normalized {
                amount: amount.clone(),
                warning: None,
            };
        }

        match self.rates.get(&currency.to_uppercase()) {
            Some(rate) => Normalized {
                // Rates are base units per foreign unit, so dividing a
                // foreign amount by its rate yields base units.
                amount: amount / rate,
                warning: None,
            },
            None => {
                tracing::warn!(
                    currency = %currency,
                    "exchange rate not found, using 1:1 conversion"
                );
                Normalized {
                    amount: amount.clone(),
                    warning: Some(CurrencyWarning {
                        currency: currency.to_string(),
                    }),
                }
            }
        }
    }

    /// Human-readable description of a currency's rate relative to the base
    /// (e.g. "1 USD = 129.87 KSh").
    pub fn rate_info(&self, code: &str) -> String {
        let Some(rate) = self.rate(code) else {
            return "Rate not available".to_string();
        };

        let canonical = code.to_uppercase();
        if *rate == BigDecimal::from(1) {
            return "Base currency".to_string();
        }

        if *rate < BigDecimal::from(1) {
            let inverse = (BigDecimal::from(1) / rate).with_scale_round(2, RoundingMode::HalfUp);
            format!("1 {} = {} {}", canonical, inverse, self.base_code)
        } else {
            let rounded = rate.with_scale_round(4, RoundingMode::HalfUp);
            format!("1 {} = {} {}", self.base_code, rounded, canonical)
        }
    }
}

/// The built-in rate table: KSh base with a static snapshot of East African
/// and major world currency rates. Swap in a custom table for anything else.
impl Default for ExchangeRateTable {
    fn default() -> Self {
        let mut table = Self::new("KSh");
        table.add_base_alias("KShillings");
        table.insert_rate("USD", dec(77, 4)); // 0.0077
        table.insert_rate("EUR", dec(74, 4)); // 0.0074
        table.insert_rate("GBP", dec(63, 4)); // 0.0063
        table.insert_rate("ZAR", dec(14, 2)); // 0.14
        table.insert_rate("UGX", dec(285, 1)); // 28.5
        table.insert_rate("TZS", dec(182, 1)); // 18.2
        table.insert_rate("RWF", dec(105, 1)); // 10.5
        table.insert_rate("ETB", dec(42, 2)); // 0.42
        table.insert_rate("NGN", dec(128, 1)); // 12.8
        table
    }
}

/// Format an amount for display with its currency symbol, thousands
/// grouping, and two decimal places.
///
/// Presentation helper for consumers of reconciliation output; the core
/// itself always passes numeric amounts plus a currency code, never
/// pre-formatted strings.
pub fn format_amount(amount: &BigDecimal, currency: &str) -> String {
    let grouped = group_thousands(&amount.with_scale_round(2, RoundingMode::HalfUp).to_string());

    match currency.to_uppercase().as_str() {
        "KSH" | "KSHILLINGS" => format!("KSh {}", grouped),
        "USD" => format!("${}", grouped),
        "EUR" => format!("\u{20ac}{}", grouped),
        "GBP" => format!("\u{a3}{}", grouped),
        _ => format!("{} {}", currency, grouped),
    }
}

/// Insert comma separators into the integer part of a plain decimal string.
fn group_thousands(plain: &str) -> String {
    let (sign, unsigned) = match plain.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", plain),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::new();
    let digits: Vec<char> = int_part.chars().collect();
    for (i, c) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }

    match frac_part {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn big(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    #[test]
    fn test_base_currency_passes_through() {
        let table = ExchangeRateTable::default();

        let n = table.normalize(&big("150.25"), "KSh");
        assert_eq!(n.amount, big("150.25"));
        assert!(n.warning.is_none());

        // Case-insensitive, and the long-form alias counts as base too.
        assert_eq!(table.normalize(&big("10"), "ksh").amount, big("10"));
        assert_eq!(table.normalize(&big("10"), "KSHILLINGS").amount, big("10"));
    }

    #[test]
    fn test_foreign_amount_divided_by_rate() {
        let table = ExchangeRateTable::default();

        // 10 USD at 0.0077 KSh-per-USD-inverse => 10 / 0.0077 ~ 1298.70 KSh
        let n = table.normalize(&big("10"), "USD");
        let diff = (&n.amount - big("1298.70")).abs();
        assert!(diff < big("0.01"), "got {}", n.amount);
        assert!(n.warning.is_none());
    }

    #[test]
    fn test_unknown_currency_falls_back_to_identity() {
        let table = ExchangeRateTable::default();

        let n = table.normalize(&big("42"), "XYZ");
        assert_eq!(n.amount, big("42"));
        assert_eq!(
            n.warning,
            Some(CurrencyWarning {
                currency: "XYZ".to_string()
            })
        );
    }

    #[test]
    fn test_negative_amounts_normalize() {
        let table = ExchangeRateTable::default();

        let n = table.normalize(&big("-5"), "ZAR");
        let diff = (&n.amount - big("-35.71")).abs();
        assert!(diff < big("0.01"), "got {}", n.amount);
    }

    #[test]
    fn test_round_trip_within_tolerance() {
        let table = ExchangeRateTable::default();

        // base -> foreign -> base is idempotent up to tolerance
        for code in table.supported_currencies() {
            let base_amount = big("1000");
            let rate = table.rate(&code).unwrap();
            let foreign = &base_amount * rate;
            let back = table.normalize(&foreign, &code);
            let diff = (&back.amount - &base_amount).abs();
            assert!(diff < big("0.01"), "{}: got {}", code, back.amount);
        }
    }

    #[test]
    fn test_validate_rejects_bad_base_rate() {
        let mut table = ExchangeRateTable::new("KSh");
        assert!(table.validate().is_ok());

        table.insert_rate("KSh", big("2"));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_rate() {
        let mut table = ExchangeRateTable::new("KSh");
        table.insert_rate("USD", big("0"));
        assert!(table.validate().is_err());
    }

    #[test]
    fn test_custom_table_is_injectable() {
        let mut table = ExchangeRateTable::new("USD");
        table.insert_rate("EUR", big("1.08"));

        let n = table.normalize(&big("108"), "eur");
        assert_eq!(n.amount, big("100"));
    }

    #[test]
    fn test_supported_currencies_sorted() {
        let table = ExchangeRateTable::default();
        let codes = table.supported_currencies();
        assert!(codes.contains(&"KSH".to_string()));
        assert!(codes.contains(&"USD".to_string()));
        let mut sorted = codes.clone();
        sorted.sort();
        assert_eq!(codes, sorted);
    }

    #[test]
    fn test_rate_info() {
        let table = ExchangeRateTable::default();
        assert_eq!(table.rate_info("KSh"), "Base currency");
        assert_eq!(table.rate_info("USD"), "1 USD = 129.87 KSh");
        assert_eq!(table.rate_info("TZS"), "1 KSh = 18.2000 TZS");
        assert_eq!(table.rate_info("XYZ"), "Rate not available");
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(&big("1234567.891"), "KSh"), "KSh 1,234,567.89");
        assert_eq!(format_amount(&big("99.9"), "USD"), "$99.90");
        assert_eq!(format_amount(&big("-1500"), "EUR"), "\u{20ac}-1,500.00");
        assert_eq!(format_amount(&big("250"), "UGX"), "UGX 250.00");
    }
}
