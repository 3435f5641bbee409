pub mod deploy;
pub mod template;

pub use deploy::*;
pub use template::*;
