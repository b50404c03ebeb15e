// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Show and viewer-facing preference records edited by the control panel.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Viewer-facing preferences for one show.
///
/// Only the jukebox fields are modelled; every other preference the backend
/// sends is kept in `other` and written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    /// Maximum jukebox queue length (0 = unlimited).
    #[serde(default)]
    pub jukebox_depth: u32,
    /// How soon an already-queued sequence may be requested again (0 = any time).
    #[serde(default)]
    pub jukebox_request_limit: u32,
    /// Reject a viewer's second request while their first is still playing.
    #[serde(default)]
    pub check_if_requested: bool,
    /// Unmodelled preference fields.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Replacement values for a subset of the modelled preference fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PreferenceOverlay {
    /// New queue depth, if changed.
    pub jukebox_depth: Option<u32>,
    /// New request limit, if changed.
    pub jukebox_request_limit: Option<u32>,
    /// New "prevent multiple requests" flag, if changed.
    pub check_if_requested: Option<bool>,
}

impl Preferences {
    /// Build a new snapshot: a full copy of `self` with the overlay's fields applied.
    pub fn overlay(&self, overlay: &PreferenceOverlay) -> Self {
        let mut next = self.clone();
        if let Some(depth) = overlay.jukebox_depth {
            next.jukebox_depth = depth;
        }
        if let Some(limit) = overlay.jukebox_request_limit {
            next.jukebox_request_limit = limit;
        }
        if let Some(flag) = overlay.check_if_requested {
            next.check_if_requested = flag;
        }
        next
    }
}

/// One operator's show, as held by the preference store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    /// Panel-editable preferences.
    #[serde(default)]
    pub preferences: Preferences,
    /// Show fields this crate never touches.
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl Show {
    /// Copy of this show with `preferences` replaced wholesale.
    pub fn with_preferences(&self, preferences: Preferences) -> Self {
        Self {
            preferences,
            other: self.other.clone(),
        }
    }
}
