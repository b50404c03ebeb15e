// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for the show control panel (preferences,
//! save workflow, toasts, config).
//! Keeps UI/runtime adapters thin and framework-agnostic.

pub mod config;
pub mod field;
pub mod gateway;
pub mod panel;
pub mod prefs;
pub mod progress_port;
pub mod store;
pub mod toast;

pub use gateway::{MutationGateway, MutationResult, PendingResult, ResultSender};
pub use panel::{CommitPolicy, InFlightSave, JukeboxPanel, SaveOrigin, SaveOutcome, SavePhase};
pub use prefs::{PreferenceOverlay, Preferences, Show};
pub use store::PreferenceStore;
pub use toast::{NotificationSink, Severity, ToastMessage};
