//! Provider API keys come from the environment only; they are never
//! written to config files or checkpoints.

use cafedex_core::{CafedexError, Result};

pub const APIFY_TOKEN: &str = "APIFY_TOKEN";
pub const ANTHROPIC_API_KEY: &str = "ANTHROPIC_API_KEY";
pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";

/// Reads a required credential, rejecting empty values.
pub fn require(key: &str) -> Result<String> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(CafedexError::CredentialMissing { key: key.to_string() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_names_the_key() {
        let err = require("CAFEDEX_TEST_NO_SUCH_KEY").unwrap_err();
        assert!(err.to_string().contains("CAFEDEX_TEST_NO_SUCH_KEY"));
    }
}
