pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{CompletionClient, CustomizeEmailUseCase};

pub use connector::{AnthropicClient, GoogleClient, MockClient, OpenAiClient};

pub use domain::{CustomizationRequest, DomainError, Provider};
