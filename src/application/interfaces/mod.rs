mod completion_client;

pub use completion_client::*;
