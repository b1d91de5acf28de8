//! Development server: renders content pages on demand, serves resources
//! as static files, and never writes to the generate root.

mod error;
pub mod route;
mod runtime;

pub use error::ServerError;
pub use runtime::{router, run, serve, shutdown_signal, start_blocking, AppState, SHUTDOWN_GRACE};
