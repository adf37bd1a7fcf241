//! # Allowed Origins
//!
//! CORS origins allowed to call the webservice from a browser.

/// Parsed value of `PAAS_WS_ALLOWED_ORIGINS`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AllowedOrigins {
    /// No cross-origin requests are allowed
    #[default]
    Disabled,
    /// Any origin is allowed (`*`)
    Any,
    /// Only the listed origins are allowed
    List(Vec<String>),
}

impl AllowedOrigins {
    /// Parse a comma-separated list of origins; `*` anywhere allows any origin
    pub fn parse(value: &str) -> Self {
        let origins: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|origin| !origin.is_empty())
            .map(ToString::to_string)
            .collect();

        if origins.iter().any(|origin| origin == "*") {
            AllowedOrigins::Any
        } else if origins.is_empty() {
            AllowedOrigins::Disabled
        } else {
            AllowedOrigins::List(origins)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_wildcard() {
        assert_eq!(AllowedOrigins::parse("*"), AllowedOrigins::Any);
        assert_eq!(
            AllowedOrigins::parse("https://a.example, *"),
            AllowedOrigins::Any
        );
    }

    #[test]
    fn test_parse_list() {
        assert_eq!(
            AllowedOrigins::parse(" https://a.example ,https://b.example,"),
            AllowedOrigins::List(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(AllowedOrigins::parse(""), AllowedOrigins::Disabled);
        assert_eq!(AllowedOrigins::parse(" , "), AllowedOrigins::Disabled);
    }
}
