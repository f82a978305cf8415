use std::env;

lazy_static::lazy_static! {
    pub static ref MONGO_URI: String = env::var("APP_MONGO_URI").unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    pub static ref MONGO_DB: String = env::var("APP_MONGO_DB").unwrap_or_else(|_| "example".to_string());
    pub static ref SERVER_PORT: u16 = env::var("SERVER_PORT")
        .map(|port| port.parse::<u16>().expect("invalid SERVER_PORT format"))
        .unwrap_or(8000);
    pub static ref CORS_ORIGINS: Option<Vec<String>> = env_list("BACKEND_CORS_ORIGINS");
    pub static ref ALLOWED_HOSTS: Option<Vec<String>> = env_list("ALLOWED_HOSTS");
}

pub const API_TITLE: &str = "Stable Protocol v0 API";
pub const API_DESCRIPTION: &str = "This is a requirement for [stable-protocol-interface](https://github.com/money-on-chain/stable-protocol-interface)";

fn env_list(name: &str) -> Option<Vec<String>> {
    env::var(name).ok().map(|raw| parse_list(&raw))
}

/// Accepts `["a", 'b']` literals as well as plain `a,b` strings.
pub fn parse_list(raw: &str) -> Vec<String> {
    let trimmed = raw.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .unwrap_or(trimmed);

    inner
        .split(',')
        .map(|item| item.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list_literal() {
        assert_eq!(
            parse_list(r#"["http://localhost:3000", 'https://app.example.com']"#),
            vec!["http://localhost:3000", "https://app.example.com"]
        );
    }

    #[test]
    fn test_parse_list_comma_separated() {
        assert_eq!(
            parse_list("api.example.com, *.example.org"),
            vec!["api.example.com", "*.example.org"]
        );
    }

    #[test]
    fn test_parse_list_empty() {
        assert!(parse_list("[]").is_empty());
        assert!(parse_list("  ").is_empty());
    }
}
