//! Common utilities shared by the runner, scenarios and CLI

pub mod config;
pub mod error;
pub mod logging;
pub mod paths;

pub use config::{Config, Credentials};
pub use error::{Error, RequestError, Result};

/// Shorten a token for display: first 20 characters followed by `...`
pub fn truncate_token(token: &str) -> String {
    const SHOWN: usize = 20;
    match token.char_indices().nth(SHOWN) {
        Some((idx, _)) => format!("{}...", &token[..idx]),
        None => token.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_token() {
        assert_eq!(truncate_token("short"), "short");
        assert_eq!(
            truncate_token("eyJhbGciOiJIUzI1NiJ9.payload.signature"),
            "eyJhbGciOiJIUzI1NiJ9..."
        );
    }
}
