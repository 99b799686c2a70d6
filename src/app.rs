//! Routing table, state construction and the listener.

use std::fs;
use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, MethodRouter},
};
use log::info;
use tokio::net::TcpListener;

use crate::components::TemplateSet;
use crate::config::Config;
use crate::errors::StartupError;
use crate::handlers;
use crate::services::PageStore;
use crate::types::AppState;

/// The three page handlers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    View,
    Edit,
    Save,
}

impl Verb {
    fn method_router(self) -> MethodRouter<AppState> {
        match self {
            Verb::View => get(handlers::handle_view),
            Verb::Edit => get(handlers::handle_edit),
            Verb::Save => post(handlers::handle_save),
        }
    }
}

/// One entry of the routing table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub prefix: &'static str,
    pub verb: Verb,
}

/// Path prefixes and the handler each dispatches to, checked in order
pub const ROUTES: [Route; 3] = [
    Route { prefix: "/view/", verb: Verb::View },
    Route { prefix: "/edit/", verb: Verb::Edit },
    Route { prefix: "/save/", verb: Verb::Save },
];

/// Handler for the first route whose prefix starts `path`.
///
/// The router is built from the same table; this is the lookup over it, used
/// when reporting requests the router fell through on.
pub fn dispatch(path: &str) -> Option<Verb> {
    ROUTES
        .iter()
        .find(|route| path.starts_with(route.prefix))
        .map(|route| route.verb)
}

/// Build the router from the routing table. Unrouted paths get a 404.
pub fn build_router(state: AppState) -> Router {
    let mut router = Router::new();
    if state.front_page.is_some() {
        router = router.route("/", get(handlers::handle_root));
    }
    for route in ROUTES {
        router = router.route(&format!("{}*rest", route.prefix), route.verb.method_router());
    }
    router.fallback(handlers::handle_not_found).with_state(state)
}

/// Parse templates and prepare the data directory. Any failure is fatal.
pub fn build_state(config: &Config) -> Result<AppState, StartupError> {
    let templates = match &config.template_dir {
        Some(dir) => {
            info!("Loading templates from {:?}", dir);
            TemplateSet::load(dir)?
        }
        None => TemplateSet::builtin()?,
    };

    fs::create_dir_all(&config.data_dir).map_err(|source| StartupError::DataDir {
        path: config.data_dir.clone(),
        source,
    })?;

    Ok(AppState {
        store: Arc::new(PageStore::new(config.data_dir.clone())),
        templates: Arc::new(templates),
        front_page: config.front_page.clone(),
    })
}

/// Bind the listener and serve until the server stops
pub async fn serve(config: &Config) -> Result<(), StartupError> {
    let app = build_router(build_state(config)?);

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|source| StartupError::Bind { addr: addr.clone(), source })?;
    info!("Wiki listening on http://{}", addr);
    axum::serve(listener, app).await.map_err(StartupError::Serve)
}
