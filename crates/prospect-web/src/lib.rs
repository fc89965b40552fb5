//! HTTP surface for the Prospect dashboard: paginated lead queries,
//! filter vocabularies, aggregate stats, CSV export, and a live SSE
//! event stream backed by the broadcast hub.

pub mod routes;
pub mod server;

mod error;
mod state;

pub use error::{Result, WebError};
pub use server::{start_server, WebConfig};
pub use state::AppState;
