use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{Form, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
    serve,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Deserialize;
use std::{path::PathBuf, sync::Arc};
use tokio::net::TcpListener;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{debug, error, info};

use crate::catalog::{Occasion, Weather};
use crate::config::WebConfig;
use crate::constants::PENDING_REFRESH_SECS;
use crate::session::Snapshot;
use crate::stylist::Stylist;

// Shared application state
#[derive(Clone)]
pub struct AppState {
    templates: Arc<AutoReloader>,
    stylist: Arc<Stylist>,
}

impl AppState {
    pub fn new(stylist: Arc<Stylist>, web: &WebConfig) -> Self {
        Self {
            templates: Arc::new(create_minijinja_env(web.templates_dir.clone())),
            stylist,
        }
    }
}

// Minijinja Environment setup
fn create_minijinja_env(templates_dir: PathBuf) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        // Watch the templates directory for changes
        notifier.watch_path(&templates_dir, true);
        Ok(env)
    })
}

#[derive(Debug, Deserialize)]
struct OccasionForm {
    occasion: Occasion,
}

#[derive(Debug, Deserialize)]
struct WeatherForm {
    weather: Weather,
}

#[derive(Debug, Deserialize)]
struct ChatForm {
    #[serde(default)]
    text: String,
}

fn render_index(state: &AppState, snapshot: &Snapshot) -> Result<String, minijinja::Error> {
    let env = state.templates.acquire_env()?;
    let tmpl = env.get_template("index.html")?;
    let refresh_secs = snapshot.is_pending().then_some(PENDING_REFRESH_SECS);
    tmpl.render(minijinja::context! {
        title => "Stylecast",
        state => snapshot,
        refresh_secs => refresh_secs,
    })
}

async fn index_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.stylist.snapshot().await;
    match render_index(&state, &snapshot) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("Failed to get or render template: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(format!("Internal Server Error: {}", e)),
            )
                .into_response()
        }
    }
}

async fn state_handler(State(state): State<AppState>) -> Json<Snapshot> {
    Json(state.stylist.snapshot().await)
}

async fn select_occasion(State(state): State<AppState>, Form(form): Form<OccasionForm>) -> Redirect {
    state.stylist.set_occasion(form.occasion).await;
    Redirect::to("/")
}

async fn select_weather(State(state): State<AppState>, Form(form): Form<WeatherForm>) -> Redirect {
    state.stylist.set_weather(form.weather).await;
    Redirect::to("/")
}

async fn request_recommendation(State(state): State<AppState>) -> Redirect {
    // Redirect straight away; the page refreshes itself while loading.
    match state.stylist.spawn_recommendation().await {
        Ok(_task) => debug!("Recommendation request started"),
        Err(outcome) => debug!(?outcome, "Recommendation request not started"),
    }
    Redirect::to("/")
}

async fn open_chat(State(state): State<AppState>) -> Redirect {
    if state.stylist.open_chat().await {
        Redirect::to("/#latest")
    } else {
        Redirect::to("/")
    }
}

async fn close_chat(State(state): State<AppState>) -> Redirect {
    state.stylist.close_chat().await;
    Redirect::to("/")
}

async fn send_chat_message(State(state): State<AppState>, Form(form): Form<ChatForm>) -> Redirect {
    match state.stylist.spawn_chat_message(&form.text).await {
        Ok(_task) => debug!("Chat message accepted"),
        Err(outcome) => debug!(?outcome, "Chat message not sent"),
    }
    Redirect::to("/#latest")
}

/// Builds the full router. Split out from `start_web_server` so tests can
/// drive it without binding a socket.
pub fn build_router(state: AppState, web: &WebConfig) -> Router {
    // Serve static files from the configured directory
    let static_files_service = ServeDir::new(&web.static_dir).not_found_service(tower::service_fn(|_req: axum::extract::Request| async {
        Ok::<_, std::convert::Infallible>(
            (StatusCode::NOT_FOUND, Body::from("Not Found")).into_response(),
        )
    }));

    Router::new()
        .route("/", get(index_handler))
        .route("/api/state", get(state_handler))
        .route("/occasion", post(select_occasion))
        .route("/weather", post(select_weather))
        .route("/recommendation", post(request_recommendation))
        .route("/chat/open", post(open_chat))
        .route("/chat/close", post(close_chat))
        .route("/chat/messages", post(send_chat_message))
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http()) // Add request logging
}

/// Binds `host:port`. The host may be an IP or a name like `localhost`.
pub async fn bind_listener(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .context(format!("Failed to bind to address {}:{}", host, port))
}

pub async fn start_web_server(host: &str, port: u16, stylist: Arc<Stylist>, web: WebConfig) -> Result<()> {
    let state = AppState::new(stylist, &web);
    let app = build_router(state, &web);

    let listener = bind_listener(host, port).await?;
    info!("Web server listening on http://{}", listener.local_addr()?);

    // Use axum::serve to run the application
    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
