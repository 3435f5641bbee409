pub mod handlers;
pub mod middleware;

pub use handlers::*;
pub use middleware::*;
