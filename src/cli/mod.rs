//! Terminal input helpers shared by the `customize` and `interactive`
//! commands.

use std::io::{self, BufRead, Write};
use std::path::Path;

use crate::domain::{CustomizationRequest, DomainError, Provider};

/// A multi-line field ends at a line containing only this marker.
const MULTILINE_TERMINATOR: &str = ".";

/// Resolve a field given either inline text or a file path.
///
/// The file wins when both are present; returns `None` when neither was
/// supplied so the caller can fall through to request validation.
pub fn resolve_field(
    inline: Option<String>,
    file: Option<&Path>,
) -> Result<Option<String>, DomainError> {
    if let Some(path) = file {
        return Ok(Some(std::fs::read_to_string(path)?));
    }
    Ok(inline)
}

/// Everything the interactive form collects.
pub struct FormInput {
    pub provider: Provider,
    pub model: String,
    /// `None` means the key was found in the provider's environment variable.
    pub api_key: Option<String>,
    pub request: CustomizationRequest,
}

/// Run the interactive form on stdin, mirroring the flags of the
/// `customize` command: provider, model, API key, then the three text
/// fields.
pub fn run_form() -> Result<FormInput, DomainError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();

    println!("MailTailor interactive mode.");
    println!("Multi-line fields end with a single '.' line.");
    println!();

    let provider_raw = prompt_line(
        &mut reader,
        "Provider [openai/google/anthropic] (default: openai)",
    )?;
    let provider = if provider_raw.is_empty() {
        Provider::OpenAi
    } else {
        provider_raw.parse()?
    };

    let model_raw = prompt_line(
        &mut reader,
        &format!("Model (default: {})", provider.default_model()),
    )?;
    let model = if model_raw.is_empty() {
        provider.default_model().to_string()
    } else {
        model_raw
    };

    let api_key = match std::env::var(provider.api_key_env()) {
        Ok(key) if !key.trim().is_empty() => {
            println!("Using the API key from {}", provider.api_key_env());
            None
        }
        _ => Some(prompt_line(
            &mut reader,
            &format!("{} API key", provider.display_name()),
        )?),
    };

    println!("Email template:");
    let template = read_multiline(&mut reader)?;
    println!("Recipient context:");
    let context = read_multiline(&mut reader)?;
    println!("Additional comments (optional):");
    let comments = read_multiline(&mut reader)?;

    Ok(FormInput {
        provider,
        model,
        api_key,
        request: CustomizationRequest::new(template, context).with_comments(comments),
    })
}

fn prompt_line<R: BufRead>(reader: &mut R, label: &str) -> Result<String, DomainError> {
    print!("{label}: ");
    io::stdout().flush()?;

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Read lines until the terminator line or EOF.
fn read_multiline<R: BufRead>(reader: &mut R) -> Result<String, DomainError> {
    let mut text = String::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            break;
        }
        if line.trim_end_matches(['\r', '\n']) == MULTILINE_TERMINATOR {
            break;
        }
        text.push_str(&line);
    }
    Ok(text.trim_end().to_string())
}
