// Thin client for the sidecar's state API. Every call returns a `Result`;
// callers decide how loudly to fail. No timeout is set on the underlying
// client, so a stalled sidecar stalls the request that is waiting on it.
use anyhow::Context;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};

use crate::model::StateEntry;

#[derive(Clone, Debug)]
pub struct StateClient {
    http: reqwest::Client,
    base_url: String,
}

impl StateClient {
    /// `base_url` is the sidecar API root, e.g. `http://localhost:3500/v1.0`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        StateClient { http: reqwest::Client::new(), base_url }
    }

    pub fn state_url(&self) -> String {
        format!("{}/state", self.base_url)
    }

    /// Fetch the raw body stored under `key`. The upstream status and body
    /// shape are not checked; whatever the store answers is returned.
    pub async fn get_raw(&self, key: &str) -> anyhow::Result<String> {
        let url = format!("{}/{}", self.state_url(), key);
        debug!(%url, "fetching state");
        let response = self
            .http
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .with_context(|| format!("reading body of GET {url} failed"))?;
        debug!(%url, %status, len = body.len(), "state fetched");
        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Bulk-save `entries` with a single POST.
    pub async fn save(&self, entries: &[StateEntry]) -> anyhow::Result<()> {
        let url = self.state_url();
        let payload = serde_json::to_vec(entries).context("could not encode state entries")?;
        info!(%url, payload = %String::from_utf8_lossy(&payload), "posting state");

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%url, %status, %body, "state store rejected save");
            anyhow::bail!("state store answered {status} for POST {url}");
        }
        Ok(())
    }
}

#[cfg(test)]
pub mod testing {
    //! In-process stand-in for the sidecar's state API.
    use axum::{body::Bytes, extract::Extension, http::StatusCode, routing::{get, post}, Router};
    use std::sync::{Arc, Mutex};
    use tokio::net::TcpListener;

    #[derive(Clone, Default)]
    pub struct Recorded {
        pub saves: Arc<Mutex<Vec<serde_json::Value>>>,
    }

    impl Recorded {
        pub fn saves(&self) -> Vec<serde_json::Value> {
            self.saves.lock().unwrap().clone()
        }
    }

    /// Start a fake store answering `GET /v1.0/state/{key}` with `stored`
    /// and recording every `POST /v1.0/state` body. Returns the API base URL.
    pub async fn spawn_fake_store(stored: &'static str, save_status: StatusCode) -> (String, Recorded) {
        let recorded = Recorded::default();
        let app = Router::new()
            .route("/v1.0/state/{key}", get(move || async move { stored }))
            .route(
                "/v1.0/state",
                post(move |Extension(rec): Extension<Recorded>, body: Bytes| async move {
                    let value = serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null);
                    rec.saves.lock().unwrap().push(value);
                    save_status
                }),
            )
            .layer(Extension(recorded.clone()));

        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        (format!("http://{addr}/v1.0"), recorded)
    }

    /// Base URL of a port nothing is listening on.
    pub async fn unreachable_base_url() -> String {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        format!("http://{addr}/v1.0")
    }
}
