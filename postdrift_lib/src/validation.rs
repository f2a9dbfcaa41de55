use crate::error::DriftError;

pub const MAX_TICKER_LENGTH: usize = 15;

/// Strip ASCII control characters (0x00-0x1F except space 0x20), trim whitespace,
/// and enforce a byte-length limit.
pub fn sanitize_text(input: &str, max_len: usize) -> Result<String, DriftError> {
    let sanitized: String = input
        .chars()
        .filter(|c| !c.is_ascii_control() || *c == ' ')
        .collect::<String>()
        .trim()
        .to_string();
    if sanitized.is_empty() {
        return Err(DriftError::InvalidInput("ticker is empty".to_string()));
    }
    if sanitized.len() > max_len {
        return Err(DriftError::InvalidInput(format!(
            "ticker exceeds maximum length of {} characters",
            max_len
        )));
    }
    Ok(sanitized)
}

/// Validate a ticker symbol and normalize it to uppercase.
///
/// Accepts the characters Yahoo uses in symbols: letters, digits, `.` and `-`
/// for share classes and exchange suffixes (`BRK-B`, `SHOP.TO`), `^` for
/// indices and `=` for currencies and futures.
pub fn validate_ticker(input: &str) -> Result<String, DriftError> {
    let ticker = sanitize_text(input, MAX_TICKER_LENGTH)?.to_uppercase();
    if let Some(bad) = ticker
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '=')))
    {
        return Err(DriftError::InvalidInput(format!(
            "ticker '{}' contains invalid character '{}'",
            ticker, bad
        )));
    }
    Ok(ticker)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_uppercased() {
        assert_eq!(validate_ticker("msft").unwrap(), "MSFT");
    }

    #[test]
    fn ticker_trimmed() {
        assert_eq!(validate_ticker("  nvda \n").unwrap(), "NVDA");
    }

    #[test]
    fn ticker_share_class_and_suffix() {
        assert_eq!(validate_ticker("brk-b").unwrap(), "BRK-B");
        assert_eq!(validate_ticker("shop.to").unwrap(), "SHOP.TO");
        assert_eq!(validate_ticker("^gspc").unwrap(), "^GSPC");
    }

    #[test]
    fn ticker_empty() {
        assert!(matches!(validate_ticker(""), Err(DriftError::InvalidInput(_))));
        assert!(matches!(validate_ticker("   "), Err(DriftError::InvalidInput(_))));
    }

    #[test]
    fn ticker_control_chars_stripped() {
        assert_eq!(validate_ticker("AA\u{0007}PL").unwrap(), "AAPL");
    }

    #[test]
    fn ticker_too_long() {
        assert!(validate_ticker("ABCDEFGHIJKLMNOP").is_err());
    }

    #[test]
    fn ticker_invalid_chars() {
        let err = validate_ticker("MS FT").unwrap_err();
        assert!(err.to_string().contains("invalid character"));
        assert!(validate_ticker("AAPL;DROP").is_err());
        assert!(validate_ticker("\u{00C7}AT").is_err());
    }
}
