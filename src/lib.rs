//! flatwiki - a small wiki that keeps each page in a `<title>.txt` file
//!
//! Pages are viewed at `/view/<title>`, edited at `/edit/<title>` and posted
//! to `/save/<title>`. Titles are restricted to ASCII letters and digits.

pub mod app;
pub mod components;
pub mod config;
pub mod errors;
pub mod handlers;
pub mod logger;
pub mod services;
pub mod title;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use app::{build_router, build_state, dispatch, serve, Route, Verb, ROUTES};
pub use config::Config;
pub use errors::{StartupError, WikiError};
pub use types::{AppState, Page, Title};
pub use services::PageStore;
pub use components::{Template, TemplateName, TemplateSet};
pub use title::extract_title;
