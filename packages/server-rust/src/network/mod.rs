//! HTTP surface: configuration, handlers, middleware, and shutdown control.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::*;
pub use error::ApiError;
pub use handlers::AppState;
pub use module::{build_router, NetworkModule};
pub use shutdown::*;
