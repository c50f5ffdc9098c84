//! Access token refresh shared between concurrent requests.
//!
//! Only one refresh call is ever in flight. Callers that hit a 401 while a
//! refresh is running await the same pending exchange instead of starting
//! their own, so a second refresh can never invalidate the tokens the first
//! one just installed.

use std::sync::{Arc, Mutex, MutexGuard};

use futures::future::{BoxFuture, FutureExt, Shared};
use reqwest::{header, Client, StatusCode};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::endpoints;
use crate::auth::{Session, SessionStore};

/// Result of one refresh attempt. Every waiter receives the same value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// New tokens were written to the session store.
    Refreshed,
    /// The session holds no refresh token; no request was made.
    NoRefreshToken,
    /// The refresh endpoint answered with a non-2xx status.
    Rejected(StatusCode),
    /// The refresh endpoint could not be reached or sent an unreadable body.
    Failed(String),
}

impl RefreshOutcome {
    pub fn is_refreshed(&self) -> bool {
        matches!(self, RefreshOutcome::Refreshed)
    }
}

#[derive(Debug, Serialize)]
struct RefreshRequest<'a> {
    #[serde(rename = "refreshToken")]
    refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
struct RefreshResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "refreshToken")]
    refresh_token: Option<String>,
}

type PendingRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

struct Pending {
    generation: u64,
    outcome: PendingRefresh,
}

#[derive(Default)]
struct Slot {
    next_generation: u64,
    pending: Option<Pending>,
}

/// One settled refresh as observed by a waiter. Waiters that joined the same
/// exchange see the same `generation`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshReport {
    pub generation: u64,
    pub outcome: RefreshOutcome,
}

/// Exchanges the stored refresh token for a new token pair.
///
/// The exchange runs on its own task and resets the refresher to idle when it
/// settles, even if every caller waiting on it has gone away. The refresher
/// never clears the session on failure; deciding what a failed refresh means
/// is left to the caller.
pub struct TokenRefresher {
    client: Client,
    refresh_url: String,
    store: Arc<dyn SessionStore>,
    in_flight: Arc<Mutex<Slot>>,
}

impl TokenRefresher {
    pub fn new(client: Client, api_base: &str, store: Arc<dyn SessionStore>) -> Self {
        Self {
            client,
            refresh_url: format!("{}{}", api_base, endpoints::MEMBER_REFRESH),
            store,
            in_flight: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Refresh the token pair, joining the in-flight refresh if there is one.
    pub async fn refresh(&self) -> RefreshOutcome {
        self.refresh_tracked().await.outcome
    }

    /// Like `refresh`, but also reports which exchange produced the outcome.
    pub async fn refresh_tracked(&self) -> RefreshReport {
        let (generation, pending) = {
            let mut slot = lock(&self.in_flight);
            match slot.pending.as_ref() {
                Some(pending) => {
                    debug!(generation = pending.generation, "Joining in-flight token refresh");
                    (pending.generation, pending.outcome.clone())
                }
                None => {
                    slot.next_generation += 1;
                    let generation = slot.next_generation;
                    let outcome = self.spawn_exchange(generation);
                    slot.pending = Some(Pending {
                        generation,
                        outcome: outcome.clone(),
                    });
                    (generation, outcome)
                }
            }
        };

        RefreshReport {
            generation,
            outcome: pending.await,
        }
    }

    /// True while a refresh exchange is pending.
    pub fn is_refreshing(&self) -> bool {
        lock(&self.in_flight).pending.is_some()
    }

    fn spawn_exchange(&self, generation: u64) -> PendingRefresh {
        let client = self.client.clone();
        let url = self.refresh_url.clone();
        let store = Arc::clone(&self.store);
        let slot = Arc::clone(&self.in_flight);

        let task = tokio::spawn({
            let slot = Arc::clone(&slot);
            async move {
                let outcome = exchange(client, url, store).await;
                settle(&slot, generation);
                outcome
            }
        });

        task.map(move |joined| {
            joined.unwrap_or_else(|e| {
                warn!(error = %e, "Token refresh task aborted");
                settle(&slot, generation);
                RefreshOutcome::Failed(e.to_string())
            })
        })
        .boxed()
        .shared()
    }
}

fn lock(slot: &Mutex<Slot>) -> MutexGuard<'_, Slot> {
    slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Back to idle, unless a newer exchange already took the slot.
fn settle(slot: &Mutex<Slot>, generation: u64) {
    let mut slot = lock(slot);
    if slot
        .pending
        .as_ref()
        .is_some_and(|pending| pending.generation == generation)
    {
        slot.pending = None;
    }
}

async fn exchange(client: Client, url: String, store: Arc<dyn SessionStore>) -> RefreshOutcome {
    let Some(refresh_token) = store.get().refresh_token else {
        debug!("No refresh token stored, skipping refresh");
        return RefreshOutcome::NoRefreshToken;
    };

    info!("Refreshing access token");
    let response = match client
        .post(&url)
        .header(header::ACCEPT, "application/json")
        .json(&RefreshRequest {
            refresh_token: &refresh_token,
        })
        .send()
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "Token refresh request failed");
            return RefreshOutcome::Failed(e.to_string());
        }
    };

    let status = response.status();
    if !status.is_success() {
        warn!(status = %status, "Token refresh rejected");
        return RefreshOutcome::Rejected(status);
    }

    match response.json::<RefreshResponse>().await {
        Ok(tokens) => {
            store.set(&Session {
                access_token: Some(tokens.access_token),
                refresh_token: tokens.refresh_token,
                ..Session::default()
            });
            info!("Access token refreshed");
            RefreshOutcome::Refreshed
        }
        Err(e) => {
            warn!(error = %e, "Unreadable token refresh response");
            RefreshOutcome::Failed(e.to_string())
        }
    }
}
