pub mod app;
pub mod charts;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod page;
pub mod renderer;
pub mod source;
pub mod state;
pub mod stats;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use renderer::render_dashboard;
pub use state::AppState;
