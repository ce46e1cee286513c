/// Currency pair normalization and validation.
///
/// Canonical pair code (used internally): six uppercase letters, "EURUSD".
///
/// Accepted input forms, case-insensitive:
/// - "EURUSD"
/// - "EUR/USD" (also "-", "_" or spaces as separators)
/// - "EURUSD=X" (provider symbol)
///
/// Provider mapping: pair code + "=X", single currency instrument: "EUR=X".
use serde::Serialize;
use std::fmt;

use crate::constants::forex::{PROVIDER_SUFFIX, REFERENCE_CURRENCY};
use crate::error::PairError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Eur,
    Gbp,
    Usd,
    Jpy,
    Chf,
    Aud,
    Cad,
    Nzd,
}

/// Static metadata about a currency's issuer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct CurrencyInfo {
    pub name: &'static str,
    pub flag: &'static str,
    pub central_bank: &'static str,
}

impl Currency {
    pub const ALL: [Currency; 8] = [
        Currency::Eur,
        Currency::Gbp,
        Currency::Usd,
        Currency::Jpy,
        Currency::Chf,
        Currency::Aud,
        Currency::Cad,
        Currency::Nzd,
    ];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Usd => "USD",
            Currency::Jpy => "JPY",
            Currency::Chf => "CHF",
            Currency::Aud => "AUD",
            Currency::Cad => "CAD",
            Currency::Nzd => "NZD",
        }
    }

    pub fn from_code(code: &str) -> Option<Currency> {
        Currency::ALL.into_iter().find(|c| c.code().eq_ignore_ascii_case(code))
    }

    pub fn info(self) -> CurrencyInfo {
        let (name, flag, central_bank) = match self {
            Currency::Eur => ("Euro", "🇪🇺", "European Central Bank"),
            Currency::Gbp => ("British Pound", "🇬🇧", "Bank of England"),
            Currency::Usd => ("US Dollar", "🇺🇸", "Federal Reserve"),
            Currency::Jpy => ("Japanese Yen", "🇯🇵", "Bank of Japan"),
            Currency::Chf => ("Swiss Franc", "🇨🇭", "Swiss National Bank"),
            Currency::Aud => ("Australian Dollar", "🇦🇺", "Reserve Bank of Australia"),
            Currency::Cad => ("Canadian Dollar", "🇨🇦", "Bank of Canada"),
            Currency::Nzd => ("New Zealand Dollar", "🇳🇿", "Reserve Bank of New Zealand"),
        };
        CurrencyInfo { name, flag, central_bank }
    }

    pub fn is_reference(self) -> bool {
        self.code() == REFERENCE_CURRENCY
    }

    /// Provider symbol for the currency's own instrument, e.g. "EUR=X"
    pub fn instrument_symbol(self) -> String {
        format!("{}{}", self.code(), PROVIDER_SUFFIX)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// The seven supported majors, in the order they are reported
pub const MAJOR_PAIRS: [(Currency, Currency); 7] = [
    (Currency::Eur, Currency::Usd),
    (Currency::Gbp, Currency::Usd),
    (Currency::Usd, Currency::Jpy),
    (Currency::Usd, Currency::Chf),
    (Currency::Aud, Currency::Usd),
    (Currency::Usd, Currency::Cad),
    (Currency::Nzd, Currency::Usd),
];

/// A validated major pair. Only obtainable through [`resolve_pair`] or [`CurrencyPair::majors`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct CurrencyPair {
    pub base: Currency,
    pub quote: Currency,
}

impl CurrencyPair {
    pub fn majors() -> impl Iterator<Item = CurrencyPair> {
        MAJOR_PAIRS
            .into_iter()
            .map(|(base, quote)| CurrencyPair { base, quote })
    }

    pub fn code(&self) -> String {
        format!("{}{}", self.base.code(), self.quote.code())
    }

    pub fn base_code(&self) -> &'static str {
        self.base.code()
    }

    pub fn quote_code(&self) -> &'static str {
        self.quote.code()
    }

    pub fn provider_symbol(&self) -> String {
        format!("{}{}", self.code(), PROVIDER_SUFFIX)
    }
}

impl fmt::Display for CurrencyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.base, self.quote)
    }
}

pub fn supported_pairs() -> Vec<String> {
    CurrencyPair::majors().map(|p| p.code()).collect()
}

/// Uppercase, drop separators and a trailing provider suffix.
pub fn normalize_pair(input: &str) -> String {
    let upper: String = input
        .to_uppercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '/' | '-' | '_'))
        .collect();

    match upper.strip_suffix(PROVIDER_SUFFIX) {
        Some(stripped) => stripped.to_string(),
        None => upper,
    }
}

pub fn resolve_pair(input: &str) -> Result<CurrencyPair, PairError> {
    let normalized = normalize_pair(input);

    if normalized.chars().count() != 6 || !normalized.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(PairError::InvalidFormat {
            input: input.to_string(),
            normalized,
        });
    }

    CurrencyPair::majors()
        .find(|p| p.code() == normalized)
        .ok_or_else(|| PairError::UnsupportedPair {
            pair: normalized,
            supported: supported_pairs().join(", "),
        })
}

/// Returns (base, quote) codes for a pair in any accepted form.
pub fn parse_pair(input: &str) -> Result<(String, String), PairError> {
    let pair = resolve_pair(input)?;
    Ok((pair.base_code().to_string(), pair.quote_code().to_string()))
}

pub fn provider_symbol(input: &str) -> Result<String, PairError> {
    resolve_pair(input).map(|p| p.provider_symbol())
}
