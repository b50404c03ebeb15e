// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Injectable state container for the current show.
//!
//! The show is only ever replaced wholesale through [`PreferenceStore::set_show`];
//! subscribers observe each replacement through a `watch` receiver.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::prefs::{Preferences, Show};

/// Shared handle onto the current show. Clones observe the same state.
#[derive(Debug, Clone)]
pub struct PreferenceStore {
    tx: Arc<watch::Sender<Arc<Show>>>,
}

impl PreferenceStore {
    /// Create a store seeded with the show loaded at session start.
    pub fn new(show: Show) -> Self {
        let (tx, _rx) = watch::channel(Arc::new(show));
        Self { tx: Arc::new(tx) }
    }

    /// Current show snapshot.
    pub fn show(&self) -> Arc<Show> {
        Arc::clone(&self.tx.borrow())
    }

    /// Current preferences (owned copy).
    pub fn get_preferences(&self) -> Preferences {
        self.tx.borrow().preferences.clone()
    }

    /// Replace the stored show and notify subscribers. No validation is done here.
    pub fn set_show(&self, show: Show) {
        debug!(
            jukebox_depth = show.preferences.jukebox_depth,
            jukebox_request_limit = show.preferences.jukebox_request_limit,
            check_if_requested = show.preferences.check_if_requested,
            "show replaced"
        );
        self.tx.send_replace(Arc::new(show));
    }

    /// Receiver that is marked changed on every `set_show`.
    pub fn subscribe(&self) -> watch::Receiver<Arc<Show>> {
        self.tx.subscribe()
    }
}

impl Default for PreferenceStore {
    fn default() -> Self {
        Self::new(Show::default())
    }
}
