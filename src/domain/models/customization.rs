use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Closing instruction appended to every prompt.
const PROMPT_INSTRUCTIONS: &str = "Please customize this email template based on the recipient \
context and any additional comments provided.\nMake sure to maintain a professional tone while \
personalizing the content.";

/// The three free-text fields a customization is built from.
///
/// Constructed fresh per invocation and discarded after use; nothing is
/// persisted. Template and recipient context are required, comments are
/// optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomizationRequest {
    template: String,
    context: String,
    comments: String,
}

impl CustomizationRequest {
    pub fn new(template: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            context: context.into(),
            comments: String::new(),
        }
    }

    pub fn with_comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = comments.into();
        self
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Check the required fields before anything is sent over the network.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.template.trim().is_empty() {
            return Err(DomainError::invalid_input("Please provide an email template"));
        }
        if self.context.trim().is_empty() {
            return Err(DomainError::invalid_input("Please provide the recipient context"));
        }
        Ok(())
    }

    /// Render the model input.
    ///
    /// A pure function of the three fields: the same inputs always produce
    /// the same prompt text, independent of provider.
    pub fn render_prompt(&self) -> String {
        format!(
            "Email Template:\n{}\n\nRecipient Context:\n{}\n\nAdditional Comments:\n{}\n\n{}",
            self.template.trim(),
            self.context.trim(),
            self.comments.trim(),
            PROMPT_INSTRUCTIONS
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_request() -> CustomizationRequest {
        CustomizationRequest::new("Dear {name}, welcome aboard.", "Alex, new backend engineer")
            .with_comments("Keep it short")
    }

    #[test]
    fn test_validate_accepts_complete_request() {
        assert!(sample_request().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_template() {
        let request = CustomizationRequest::new("   ", "Alex");
        let err = request.validate().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_validate_rejects_empty_context() {
        let request = CustomizationRequest::new("Dear {name}", "");
        let err = request.validate().unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_validate_allows_empty_comments() {
        let request = CustomizationRequest::new("Dear {name}", "Alex");
        assert!(request.validate().is_ok());
    }

    #[test]
    fn test_render_prompt_is_deterministic() {
        let a = sample_request().render_prompt();
        let b = sample_request().render_prompt();
        assert_eq!(a, b);
    }

    #[test]
    fn test_render_prompt_contains_labeled_sections() {
        let prompt = sample_request().render_prompt();
        assert!(prompt.starts_with("Email Template:\nDear {name}, welcome aboard."));
        assert!(prompt.contains("Recipient Context:\nAlex, new backend engineer"));
        assert!(prompt.contains("Additional Comments:\nKeep it short"));
        assert!(prompt.ends_with("personalizing the content."));
    }

    #[test]
    fn test_render_prompt_trims_field_whitespace() {
        let padded = CustomizationRequest::new("  Dear {name}  ", "\nAlex\n")
            .with_comments("Keep it short  ");
        assert_eq!(padded.render_prompt(), sample_request().render_prompt());
    }
}
