//! hello-core: plaintext and JSON benchmark responders
//!
//! Serves two fixed endpoints over HTTP/1.1:
//! - `/plaintext` - `Hello, world!` as `text/plain`
//! - `/json` - `{"message":"Hello, World!"}` as `application/json`
//!
//! Every other path is a 404 with an empty body. Bodies and header values
//! are built once at startup; only the `Date` header changes, refreshed
//! once a second by a background task.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod clock;
pub mod config;
pub mod error;
pub mod payload;
pub mod response;
pub mod server;
pub mod telemetry;

// Re-exports
pub use clock::{ClockUpdater, HttpClock};
pub use config::ServerConfig;
pub use error::{Error, Result};
pub use hello_router::{Outcome, ROUTES};
pub use payload::Payload;
pub use response::{HttpResponse, Responder};
pub use server::{create_optimized_socket, handle_request, Server, ServerState};
