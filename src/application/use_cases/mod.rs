mod customize_email;

pub use customize_email::*;
