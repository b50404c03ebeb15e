// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Port trait for the host's linear progress indicator, so the save workflow
//! can show/hide it without depending on a UI crate.

/// Show/hide signal for an "in progress" indicator; purely observational.
pub trait ProgressPort {
    /// Show (`true`) or hide (`false`) the indicator.
    fn set_show_linear_progress(&self, visible: bool);
}

impl<F> ProgressPort for F
where
    F: Fn(bool),
{
    fn set_show_linear_progress(&self, visible: bool) {
        self(visible);
    }
}
