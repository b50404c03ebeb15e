// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! GraphQL-over-HTTP adapter for the preference mutation gateway.
//!
//! Each save runs on its own tokio task and resolves its [`PendingResult`]
//! exactly once. Transport failures, HTTP error statuses, GraphQL errors and a
//! bare `false` reply are logged and mapped to
//! [`MutationResult::transport_failure`]; they never reach the caller as errors.
//! An object reply is decoded as a [`MutationResult`] and returned unchanged,
//! so a declined save keeps the backend's own toast.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use showpanel_core::config::PanelConfig;
use showpanel_core::gateway::{pending, MutationGateway, MutationResult, PendingResult};
use showpanel_core::Preferences;
use tokio::runtime::Handle;
use tracing::{debug, warn};

/// Mutation document sent for every save.
pub const UPDATE_PREFERENCES: &str = "mutation UpdatePreferences($preferences: PreferencesInput!) {
  updatePreferences(preferences: $preferences)
}";

/// Toast text for an accepted save.
pub const SAVED_MESSAGE: &str = "Preferences Saved";

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'static str,
    variables: UpdateVariables<'a>,
}

#[derive(Serialize)]
struct UpdateVariables<'a> {
    preferences: &'a Preferences,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    #[serde(default)]
    data: Option<UpdatePreferencesData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct UpdatePreferencesData {
    #[serde(rename = "updatePreferences", default)]
    update_preferences: Option<Value>,
}

#[derive(Deserialize)]
struct GraphQlError {
    #[serde(default)]
    message: String,
}

/// HTTP client for the backend's `updatePreferences` mutation.
#[derive(Debug, Clone)]
pub struct GraphQlGateway {
    client: reqwest::Client,
    endpoint: String,
    auth_token: Option<String>,
}

impl GraphQlGateway {
    /// Build a gateway for `endpoint` with a per-request `timeout`.
    pub fn new(
        endpoint: impl Into<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            auth_token,
        })
    }

    /// Build a gateway from panel config.
    pub fn from_config(config: &PanelConfig) -> Result<Self> {
        Self::new(
            config.endpoint.clone(),
            config.auth_token.clone(),
            config.request_timeout(),
        )
    }

    /// Endpoint URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send one mutation and interpret the response. Errors describe why the save failed.
    pub async fn update_preferences(&self, payload: &Preferences) -> Result<MutationResult> {
        let body = GraphQlRequest {
            query: UPDATE_PREFERENCES,
            variables: UpdateVariables {
                preferences: payload,
            },
        };
        let mut request = self.client.post(&self.endpoint).json(&body);
        if let Some(token) = &self.auth_token {
            request = request.bearer_auth(token);
        }
        let response = request
            .send()
            .await
            .with_context(|| format!("send updatePreferences to {}", self.endpoint))?;

        let status = response.status();
        if !status.is_success() {
            bail!("updatePreferences returned HTTP {status}");
        }
        let body: GraphQlResponse = response
            .json()
            .await
            .context("decode updatePreferences response")?;
        if let Some(err) = body.errors.first() {
            bail!("updatePreferences failed: {}", err.message);
        }
        match body.data.and_then(|d| d.update_preferences) {
            Some(Value::Bool(false)) => bail!("updatePreferences rejected the update"),
            // `{success, toast}` replies are passed through as the backend sent them.
            Some(reply @ Value::Object(_)) => {
                let result: MutationResult = serde_json::from_value(reply)
                    .context("decode updatePreferences result")?;
                if !result.success {
                    warn!(toast = ?result.toast, "backend declined preference update");
                }
                Ok(result)
            }
            _ => Ok(MutationResult::saved(SAVED_MESSAGE)),
        }
    }
}

impl MutationGateway for GraphQlGateway {
    fn save_preferences(&self, payload: Preferences) -> PendingResult {
        let Ok(handle) = Handle::try_current() else {
            warn!("no tokio runtime; preference update not sent");
            return PendingResult::ready(MutationResult::transport_failure());
        };
        let (tx, pending) = pending();
        let gateway = self.clone();
        debug!(endpoint = %gateway.endpoint, "sending updatePreferences");
        handle.spawn(async move {
            let result = match gateway.update_preferences(&payload).await {
                Ok(result) => result,
                Err(err) => {
                    let cause = format!("{err:#}");
                    warn!(error = %cause, "preference update failed");
                    MutationResult::transport_failure()
                }
            };
            tx.resolve(result);
        });
        pending
    }
}
