mod customization;
mod provider;

pub use customization::*;
pub use provider::*;
