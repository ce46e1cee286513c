//! Unit tests for pair normalization and validation.

#[cfg(test)]
mod pairs_tests {
    use crate::error::PairError;
    use crate::fx::pairs::*;

    // ============= Resolution Tests =============

    #[test]
    fn test_all_surface_forms_resolve_to_same_pair() {
        for pair in CurrencyPair::majors() {
            let code = pair.code();
            let (base, quote) = (pair.base_code(), pair.quote_code());
            let forms = vec![
                code.clone(),
                code.to_lowercase(),
                format!("{}/{}", base, quote),
                format!("{}/{}", base.to_lowercase(), quote),
                format!("{}=X", code),
                format!("{}=x", code.to_lowercase()),
                format!("{}/{}=X", base, quote),
                format!(" {} - {} ", base, quote),
            ];

            for form in forms {
                let resolved = resolve_pair(&form).unwrap();
                assert_eq!(resolved, pair, "form {:?}", form);
                assert_eq!(
                    parse_pair(&form).unwrap(),
                    (base.to_string(), quote.to_string())
                );
            }
        }
    }

    #[test]
    fn test_provider_symbol() {
        assert_eq!(provider_symbol("EUR/USD").unwrap(), "EURUSD=X");
        assert_eq!(provider_symbol("usdjpy=x").unwrap(), "USDJPY=X");
        assert!(provider_symbol("EURGBP").is_err());
    }

    #[test]
    fn test_base_quote_split() {
        let pair = resolve_pair("USDCAD").unwrap();
        assert_eq!(pair.base, Currency::Usd);
        assert_eq!(pair.quote, Currency::Cad);
        assert_eq!(pair.to_string(), "USDCAD");
    }

    // ============= Rejection Tests =============

    #[test]
    fn test_wrong_length_is_invalid_format() {
        for input in ["EURUS", "EURUSDX", "EUR/US", "", "EURUSDJPY"] {
            match resolve_pair(input) {
                Err(PairError::InvalidFormat { input: original, .. }) => assert_eq!(original, input),
                other => panic!("expected InvalidFormat for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_non_alphabetic_is_invalid_format() {
        assert!(matches!(
            resolve_pair("EUR1SD"),
            Err(PairError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_unlisted_pair_is_unsupported() {
        for input in ["EURGBP", "EURJPY", "ABCDEF", "USDUSD"] {
            match resolve_pair(input) {
                Err(PairError::UnsupportedPair { pair, supported }) => {
                    assert_eq!(pair, input);
                    assert!(supported.contains("EURUSD"));
                    assert!(supported.contains("NZDUSD"));
                }
                other => panic!("expected UnsupportedPair for {:?}, got {:?}", input, other),
            }
        }
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let err = resolve_pair("EURUS").unwrap_err();
        assert!(err.to_string().contains("Invalid pair format"));

        let err = resolve_pair("EURGBP").unwrap_err();
        assert!(err.to_string().contains("not a supported major pair"));
    }

    // ============= Currency Tests =============

    #[test]
    fn test_majors_never_share_base_and_quote() {
        assert_eq!(CurrencyPair::majors().count(), 7);
        for pair in CurrencyPair::majors() {
            assert_ne!(pair.base, pair.quote);
        }
    }

    #[test]
    fn test_currency_metadata() {
        let info = Currency::Jpy.info();
        assert_eq!(info.name, "Japanese Yen");
        assert_eq!(info.central_bank, "Bank of Japan");
        assert_eq!(Currency::from_code("chf"), Some(Currency::Chf));
        assert_eq!(Currency::from_code("XXX"), None);
        assert_eq!(Currency::Eur.instrument_symbol(), "EUR=X");
        assert!(Currency::Usd.is_reference());
        assert!(!Currency::Eur.is_reference());
    }

    #[test]
    fn test_normalize_pair() {
        assert_eq!(normalize_pair("eur/usd"), "EURUSD");
        assert_eq!(normalize_pair("GBPUSD=X"), "GBPUSD");
        assert_eq!(normalize_pair("aud_usd"), "AUDUSD");
    }
}
