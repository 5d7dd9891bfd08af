//! Askgod REST and websocket API
pub mod access;
pub mod handlers;
pub mod metrics;
pub mod response;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::AppState;
