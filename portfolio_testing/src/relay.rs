//! Stand-in for the contact relay.
//!
//! Every request is recorded. Destinations starting with `fail` are answered
//! with `500 Internal Server Error`, destinations starting with `slow` are
//! answered only after [`SLOW_RESPONSE_DELAY`]. Everything else succeeds.

use std::{net::IpAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::Mutex};
use tracing::info;
use url::Url;

const FORWARD_ROUTE: &str = "/ajax/:destination";

pub const SLOW_RESPONSE_DELAY: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayedMessage {
    pub destination: String,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Requests received by the fake relay, in arrival order.
#[derive(Debug, Clone, Default)]
pub struct Inbox(Arc<Mutex<Vec<RelayedMessage>>>);

impl Inbox {
    pub async fn messages(&self) -> Vec<RelayedMessage> {
        self.0.lock().await.clone()
    }
}

pub async fn start_server(host: IpAddr, port: u16) -> anyhow::Result<()> {
    info!("Starting relay testing server on {host}:{port}");
    info!("Relay endpoint: http://{host}:{port}/ajax");
    info!(
        "Destinations starting with \"fail\" are rejected, destinations starting with \"slow\" \
         are answered after {SLOW_RESPONSE_DELAY:?}"
    );

    let listener = TcpListener::bind((host, port))
        .await
        .with_context(|| format!("Failed to bind to {host}:{port}"))?;
    axum::serve(listener, router(Inbox::default()))
        .await
        .context("Failed to start HTTP server")
}

/// Starts the server on an ephemeral local port in the background and returns
/// the relay endpoint together with the inbox.
pub async fn spawn_server() -> anyhow::Result<(Url, Inbox)> {
    let inbox = Inbox::default();
    let listener = TcpListener::bind(("127.0.0.1", 0))
        .await
        .context("Failed to bind to an ephemeral port")?;
    let addr = listener.local_addr()?;

    let app = router(inbox.clone());
    tokio::spawn(async move { axum::serve(listener, app).await });

    let endpoint: Url = format!("http://{addr}/ajax").parse()?;
    Ok((endpoint, inbox))
}

fn router(inbox: Inbox) -> Router<()> {
    Router::new()
        .route(FORWARD_ROUTE, routing::post(forward))
        .with_state(inbox)
}

#[derive(Deserialize)]
struct ForwardRequest {
    name: String,
    email: String,
    message: String,
}

#[derive(Serialize)]
struct ForwardResponse {
    success: &'static str,
    message: &'static str,
}

async fn forward(
    State(inbox): State<Inbox>,
    Path(destination): Path<String>,
    Form(ForwardRequest {
        name,
        email,
        message,
    }): Form<ForwardRequest>,
) -> Response {
    inbox.0.lock().await.push(RelayedMessage {
        destination: destination.clone(),
        name,
        email,
        message,
    });

    if destination.starts_with("fail") {
        let response = ForwardResponse {
            success: "false",
            message: "Relay rejected the submission.",
        };
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(response)).into_response();
    }

    if destination.starts_with("slow") {
        tokio::time::sleep(SLOW_RESPONSE_DELAY).await;
    }

    Json(ForwardResponse {
        success: "true",
        message: "The form was submitted successfully.",
    })
    .into_response()
}
