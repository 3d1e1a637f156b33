pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod routes;
pub mod sessions;
pub mod state;

pub use app::build_router;
pub use config::Config;
pub use state::AppState;
