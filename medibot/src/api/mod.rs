mod extractors;
mod frontend;
mod health;
mod routes;
mod state;
pub mod v1;
pub mod webhook;

pub use routes::create_router;
pub use state::AppState;
