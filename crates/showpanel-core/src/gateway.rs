// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Mutation gateway port: sends a preference snapshot to the backend and
//! resolves exactly once with a normalized [`MutationResult`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::prefs::Preferences;
use crate::toast::{Severity, ToastMessage};

/// Toast text used for every failed save.
pub const SAVE_FAILED_MESSAGE: &str = "Failed to save preferences";

/// Normalized response of the remote "update preferences" operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct MutationResult {
    /// Whether the backend accepted the update. Missing means `false`.
    #[serde(default)]
    pub success: bool,
    /// Toast to surface, if any.
    #[serde(default)]
    pub toast: Option<ToastMessage>,
}

impl MutationResult {
    /// Successful result carrying a success toast.
    pub fn saved(message: impl Into<String>) -> Self {
        Self {
            success: true,
            toast: Some(ToastMessage::new(Severity::Success, message)),
        }
    }

    /// Fallback produced when the remote call itself fails.
    pub fn transport_failure() -> Self {
        Self {
            success: false,
            toast: Some(ToastMessage::new(Severity::Error, SAVE_FAILED_MESSAGE)),
        }
    }
}

/// Port for the remote preference update.
///
/// Implementations must not block: the payload is sent in the background and
/// the returned [`PendingResult`] resolves when the response arrives. There is
/// no cancellation and no retry.
pub trait MutationGateway {
    /// Issue one update with `payload` (an independent copy owned by the request).
    fn save_preferences(&self, payload: Preferences) -> PendingResult;
}

impl<G: MutationGateway + ?Sized> MutationGateway for std::sync::Arc<G> {
    fn save_preferences(&self, payload: Preferences) -> PendingResult {
        (**self).save_preferences(payload)
    }
}

/// Create a linked resolver/future pair for one mutation.
pub fn pending() -> (ResultSender, PendingResult) {
    let (tx, rx) = oneshot::channel();
    (ResultSender { tx }, PendingResult { rx })
}

/// Resolving half of a mutation. Consumed on use, so a result is delivered at most once.
#[derive(Debug)]
pub struct ResultSender {
    tx: oneshot::Sender<MutationResult>,
}

impl ResultSender {
    /// Deliver the result. A dropped receiver is ignored.
    pub fn resolve(self, result: MutationResult) {
        let _ = self.tx.send(result);
    }
}

/// Future side of a mutation.
///
/// If the resolver is dropped without resolving, yields
/// [`MutationResult::transport_failure`].
#[derive(Debug)]
pub struct PendingResult {
    rx: oneshot::Receiver<MutationResult>,
}

impl PendingResult {
    /// Already-resolved result.
    pub fn ready(result: MutationResult) -> Self {
        let (tx, pending) = pending();
        tx.resolve(result);
        pending
    }
}

impl Future for PendingResult {
    type Output = MutationResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|res| res.unwrap_or_else(|_| MutationResult::transport_failure()))
    }
}
