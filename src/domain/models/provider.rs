use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// The three external LLM services an email can be customized through.
///
/// Providers differ only in endpoint URL, authentication header, request
/// payload, and the field path the generated text is extracted from. Those
/// details live in the corresponding `connector::adapter` implementations;
/// this enum carries the provider identity and its static metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    OpenAi,
    Google,
    Anthropic,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::OpenAi, Provider::Google, Provider::Anthropic];

    /// Stable lowercase identifier used on the command line.
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::OpenAi => "openai",
            Provider::Google => "google",
            Provider::Anthropic => "anthropic",
        }
    }

    /// Human-readable name used in messages shown to the user.
    pub fn display_name(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OpenAI",
            Provider::Google => "Google",
            Provider::Anthropic => "Anthropic",
        }
    }

    /// Environment variable the API key is read from when no key is passed
    /// explicitly.
    pub fn api_key_env(&self) -> &'static str {
        match self {
            Provider::OpenAi => "OPENAI_API_KEY",
            Provider::Google => "GOOGLE_API_KEY",
            Provider::Anthropic => "ANTHROPIC_API_KEY",
        }
    }

    /// Known models for this provider, most capable first.
    pub fn models(&self) -> &'static [&'static str] {
        match self {
            Provider::OpenAi => &["gpt-4", "gpt-3.5-turbo"],
            Provider::Google => &["gemini-pro"],
            Provider::Anthropic => &["claude-3-sonnet-20240229", "claude-3-opus-20240229"],
        }
    }

    /// Model used when the user does not pick one.
    pub fn default_model(&self) -> &'static str {
        self.models()[0]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(Provider::OpenAi),
            "google" => Ok(Provider::Google),
            "anthropic" => Ok(Provider::Anthropic),
            other => Err(DomainError::invalid_input(format!(
                "Unknown provider \"{other}\" (expected one of: openai, google, anthropic)"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip() {
        for provider in Provider::ALL {
            let parsed: Provider = provider.as_str().parse().unwrap();
            assert_eq!(parsed, provider);
        }
    }

    #[test]
    fn test_provider_parse_is_case_insensitive() {
        assert_eq!("OpenAI".parse::<Provider>().unwrap(), Provider::OpenAi);
        assert_eq!(" Anthropic ".parse::<Provider>().unwrap(), Provider::Anthropic);
    }

    #[test]
    fn test_unknown_provider_is_invalid_input() {
        let err = "mistral".parse::<Provider>().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_default_model_is_in_catalog() {
        for provider in Provider::ALL {
            assert!(provider.models().contains(&provider.default_model()));
        }
    }
}
