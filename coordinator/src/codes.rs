use std::env;

/// Static allow-list of join codes.
#[derive(Debug, Clone)]
pub struct JoinCodes {
    codes: Vec<String>,
}

impl JoinCodes {
    /// Creates an allow-list from an explicit set of codes.
    pub fn new(codes: Vec<String>) -> Self {
        Self { codes }
    }

    /// Reads a comma-separated allow-list from `JOIN_CODES`, falling back to
    /// the built-in defaults when unset or empty.
    pub fn from_env() -> Self {
        env::var("JOIN_CODES")
            .ok()
            .and_then(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    /// Parses a comma-separated allow-list, trimming whitespace and skipping
    /// empty entries. Returns `None` when no codes survive.
    fn parse(raw: &str) -> Option<Self> {
        let codes: Vec<String> = raw
            .split(',')
            .map(|code| code.trim().to_string())
            .filter(|code| !code.is_empty())
            .collect();

        if codes.is_empty() { None } else { Some(Self::new(codes)) }
    }

    pub fn is_valid(&self, code: &str) -> bool {
        self.codes.iter().any(|c| c == code)
    }

    pub fn list(&self) -> &[String] {
        &self.codes
    }
}

impl Default for JoinCodes {
    fn default() -> Self {
        Self::new(vec![
            "ABC123".to_string(),
            "DEF456".to_string(),
            "GHI789".to_string(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_codes_are_valid() {
        let codes = JoinCodes::default();

        assert!(codes.is_valid("ABC123"));
        assert!(codes.is_valid("GHI789"));
        assert!(!codes.is_valid("abc123"));
        assert!(!codes.is_valid(""));
    }

    #[test]
    fn listing_preserves_order() {
        let codes = JoinCodes::new(vec!["X1".to_string(), "Y2".to_string()]);
        assert_eq!(codes.list(), ["X1", "Y2"]);
    }

    #[test]
    fn parse_trims_and_skips_empty_entries() {
        let codes = JoinCodes::parse(" X1 , ,Y2,").unwrap();
        assert_eq!(codes.list(), ["X1", "Y2"]);
    }

    #[test]
    fn parse_rejects_lists_with_no_codes() {
        assert!(JoinCodes::parse("").is_none());
        assert!(JoinCodes::parse("  , ,").is_none());
    }
}
