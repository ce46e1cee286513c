pub mod pairs;

pub use pairs::{resolve_pair, Currency, CurrencyInfo, CurrencyPair, MAJOR_PAIRS};

#[cfg(test)]
mod pairs_tests;
