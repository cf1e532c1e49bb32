mod anthropic_client;
mod google_client;
mod mock_client;
mod openai_client;

pub use anthropic_client::*;
pub use google_client::*;
pub use mock_client::*;
pub use openai_client::*;
