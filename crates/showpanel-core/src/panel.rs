// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Jukebox settings panel: local field state and the save workflow.
//!
//! A save is split in two so callers (and tests) control when the response
//! lands: `begin_*` raises the progress flag, captures the current show,
//! builds the new preference snapshot and issues the mutation; [`JukeboxPanel::complete`]
//! awaits the result, commits the captured snapshot if the [`CommitPolicy`]
//! allows, forwards the toast and clears the flag.
//!
//! Saves are neither debounced nor sequenced. Two saves in flight both commit
//! the snapshot captured when they were issued, so whichever completes last
//! wins.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::field::{parse_count, FieldInput, PanelField};
use crate::gateway::{MutationGateway, MutationResult, PendingResult};
use crate::prefs::{PreferenceOverlay, Preferences, Show};
use crate::progress_port::ProgressPort;
use crate::store::PreferenceStore;
use crate::toast::NotificationSink;

/// Which control started a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOrigin {
    /// Blur of the queue depth / request limit text fields.
    QueueFields,
    /// The "prevent multiple requests" switch.
    Toggle,
}

/// When a completed save is written into the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommitPolicy {
    /// Switch saves always commit; text field saves commit only on success.
    #[default]
    Observed,
    /// Every save commits only on success.
    SuccessOnly,
}

impl CommitPolicy {
    /// Whether a save from `origin` that produced `result` is committed.
    pub fn should_commit(self, origin: SaveOrigin, result: &MutationResult) -> bool {
        match (self, origin) {
            (Self::Observed, SaveOrigin::Toggle) => true,
            _ => result.success,
        }
    }
}

/// Local input rejected before anything is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The field's text is not a whole number.
    #[error("{field} must be a whole number")]
    NotANumber {
        /// Offending field.
        field: PanelField,
    },
}

/// Save workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavePhase {
    /// No save outstanding.
    Idle,
    /// At least one save awaiting its response.
    Saving {
        /// Outstanding saves.
        in_flight: usize,
    },
}

/// A save that has been issued but not completed.
///
/// Must be passed to [`JukeboxPanel::complete`]; dropping it leaves the
/// progress flag raised and the panel in [`SavePhase::Saving`].
#[derive(Debug)]
#[must_use = "pass the save to `JukeboxPanel::complete` or the panel stays in `Saving`"]
pub struct InFlightSave {
    origin: SaveOrigin,
    show: Arc<Show>,
    snapshot: Preferences,
    pending: PendingResult,
}

impl InFlightSave {
    /// Control that started the save.
    pub fn origin(&self) -> SaveOrigin {
        self.origin
    }

    /// Preferences sent to the backend (and committed on success).
    pub fn snapshot(&self) -> &Preferences {
        &self.snapshot
    }
}

/// Result of a completed save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    /// Control that started the save.
    pub origin: SaveOrigin,
    /// Whether the snapshot was written into the store.
    pub committed: bool,
    /// Backend result as received.
    pub result: MutationResult,
}

/// Jukebox settings: queue depth, request limit and "prevent multiple requests".
pub struct JukeboxPanel<G, N, P> {
    store: PreferenceStore,
    gateway: G,
    sink: N,
    progress: P,
    policy: CommitPolicy,
    depth_input: FieldInput,
    request_limit_input: FieldInput,
    in_flight: AtomicUsize,
}

impl<G, N, P> JukeboxPanel<G, N, P>
where
    G: MutationGateway,
    N: NotificationSink,
    P: ProgressPort,
{
    /// Bind a panel to `store`; text fields start from the stored values.
    pub fn new(store: PreferenceStore, gateway: G, sink: N, progress: P) -> Self {
        let prefs = store.get_preferences();
        Self {
            store,
            gateway,
            sink,
            progress,
            policy: CommitPolicy::default(),
            depth_input: FieldInput::Valid(prefs.jukebox_depth),
            request_limit_input: FieldInput::Valid(prefs.jukebox_request_limit),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Use `policy` for deciding commits.
    pub fn with_commit_policy(mut self, policy: CommitPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Active commit policy.
    pub fn commit_policy(&self) -> CommitPolicy {
        self.policy
    }

    /// Store this panel reads from and commits to.
    pub fn store(&self) -> &PreferenceStore {
        &self.store
    }

    /// Current queue depth field state.
    pub fn depth_input(&self) -> FieldInput {
        self.depth_input
    }

    /// Current request limit field state.
    pub fn request_limit_input(&self) -> FieldInput {
        self.request_limit_input
    }

    /// Switch position, bound directly to the store.
    pub fn check_if_requested(&self) -> bool {
        self.store.get_preferences().check_if_requested
    }

    /// Save workflow state.
    pub fn phase(&self) -> SavePhase {
        match self.in_flight.load(Ordering::SeqCst) {
            0 => SavePhase::Idle,
            in_flight => SavePhase::Saving { in_flight },
        }
    }

    /// Operator typed into the queue depth field.
    pub fn edit_depth(&mut self, text: &str) {
        self.depth_input = parse_count(text);
    }

    /// Operator typed into the request limit field.
    pub fn edit_request_limit(&mut self, text: &str) {
        self.request_limit_input = parse_count(text);
    }

    /// A text field lost focus: save both text field values.
    ///
    /// Rejected without side effects while either field is not a whole number.
    #[must_use = "a begun save must be completed"]
    pub fn begin_queue_save(&self) -> Result<InFlightSave, ValidationError> {
        let depth = self
            .depth_input
            .value()
            .ok_or(ValidationError::NotANumber {
                field: PanelField::JukeboxDepth,
            });
        let limit = self
            .request_limit_input
            .value()
            .ok_or(ValidationError::NotANumber {
                field: PanelField::JukeboxRequestLimit,
            });
        let (depth, limit) = match (depth, limit) {
            (Ok(depth), Ok(limit)) => (depth, limit),
            (Err(err), _) | (_, Err(err)) => {
                warn!(%err, "save skipped");
                return Err(err);
            }
        };
        Ok(self.issue(
            SaveOrigin::QueueFields,
            PreferenceOverlay {
                jukebox_depth: Some(depth),
                jukebox_request_limit: Some(limit),
                check_if_requested: None,
            },
        ))
    }

    /// The "prevent multiple requests" switch changed to `value`.
    #[must_use = "a begun save must be completed"]
    pub fn begin_toggle_save(&self, value: bool) -> InFlightSave {
        self.issue(
            SaveOrigin::Toggle,
            PreferenceOverlay {
                check_if_requested: Some(value),
                ..PreferenceOverlay::default()
            },
        )
    }

    /// Await a save's response, commit per policy, surface its toast.
    pub async fn complete(&self, save: InFlightSave) -> SaveOutcome {
        let InFlightSave {
            origin,
            show,
            snapshot,
            pending,
        } = save;
        let result = pending.await;
        let committed = self.policy.should_commit(origin, &result);
        if committed {
            info!(?origin, success = result.success, "preferences committed");
            self.store.set_show(show.with_preferences(snapshot));
        } else {
            warn!(?origin, "preferences not saved; store left unchanged");
        }
        self.sink.show_alert(result.toast.as_ref());
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
        self.progress.set_show_linear_progress(false);
        SaveOutcome {
            origin,
            committed,
            result,
        }
    }

    /// Blur handler run to completion.
    pub async fn save_queue_fields(&self) -> Result<SaveOutcome, ValidationError> {
        let save = self.begin_queue_save()?;
        Ok(self.complete(save).await)
    }

    /// Switch handler run to completion.
    pub async fn toggle_check_if_requested(&self, value: bool) -> SaveOutcome {
        let save = self.begin_toggle_save(value);
        self.complete(save).await
    }

    fn issue(&self, origin: SaveOrigin, overlay: PreferenceOverlay) -> InFlightSave {
        self.progress.set_show_linear_progress(true);
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        let show = self.store.show();
        let snapshot = show.preferences.overlay(&overlay);
        debug!(?origin, ?overlay, "issuing preference update");
        let pending = self.gateway.save_preferences(snapshot.clone());
        InFlightSave {
            origin,
            show,
            snapshot,
            pending,
        }
    }
}
