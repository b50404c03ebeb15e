// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Panel fields: numeric input parsing and per-field metadata.

use std::fmt;

/// Parsed state of a numeric text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldInput {
    /// Whole number ≥ 0.
    Valid(u32),
    /// Text that is not a whole number; never sent to the backend.
    Invalid,
}

impl FieldInput {
    /// The parsed value, if valid.
    pub fn value(self) -> Option<u32> {
        match self {
            Self::Valid(n) => Some(n),
            Self::Invalid => None,
        }
    }
}

/// Parse operator text into a count. Surrounding whitespace is ignored; signs,
/// decimals, empty text and out-of-range values are `Invalid`.
pub fn parse_count(text: &str) -> FieldInput {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return FieldInput::Invalid;
    }
    text.parse().map_or(FieldInput::Invalid, FieldInput::Valid)
}

/// Fields shown on the jukebox settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelField {
    /// Jukebox Queue Depth.
    JukeboxDepth,
    /// Jukebox Sequence Request Limit.
    JukeboxRequestLimit,
    /// Prevent Multiple Requests.
    CheckIfRequested,
}

impl PanelField {
    /// All fields, in display order.
    pub const ALL: [Self; 3] = [
        Self::JukeboxDepth,
        Self::JukeboxRequestLimit,
        Self::CheckIfRequested,
    ];

    /// Heading shown next to the field.
    pub fn label(self) -> &'static str {
        match self {
            Self::JukeboxDepth => "Jukebox Queue Depth",
            Self::JukeboxRequestLimit => "Jukebox Sequence Request Limit",
            Self::CheckIfRequested => "Prevent Multiple Requests",
        }
    }

    /// Help text shown under the heading.
    pub fn caption(self) -> &'static str {
        match self {
            Self::JukeboxDepth => {
                "Controls how many sequences can be in the Jukebox Queue (use 0 for unlimited queue depth)."
            }
            Self::JukeboxRequestLimit => {
                "Controls when a sequence can be requested if it already exists in the queue. \
                 Use 0 to allow any sequence to be requested at any time."
            }
            Self::CheckIfRequested => {
                "Prevents a viewer from requesting more than one sequence while a song is currently playing."
            }
        }
    }

    /// External documentation page for the field.
    pub fn docs_url(self) -> &'static str {
        match self {
            Self::JukeboxDepth => {
                "https://docs.remotefalcon.com/docs/docs/control-panel/remote-falcon-settings#jukebox-queue-depth"
            }
            Self::JukeboxRequestLimit => {
                "https://docs.remotefalcon.com/docs/docs/control-panel/remote-falcon-settings#jukebox-sequence-request-limit"
            }
            Self::CheckIfRequested => {
                "https://docs.remotefalcon.com/docs/docs/control-panel/remote-falcon-settings#prevent-multiple-requests"
            }
        }
    }
}

impl fmt::Display for PanelField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_count_accepts_whole_numbers() {
        assert_eq!(parse_count("0"), FieldInput::Valid(0));
        assert_eq!(parse_count(" 12 "), FieldInput::Valid(12));
    }

    #[test]
    fn parse_count_rejects_non_numeric() {
        for text in ["", "abc", "1.5", "-3", "+4", "10abc", "99999999999"] {
            assert_eq!(parse_count(text), FieldInput::Invalid, "{text:?}");
        }
    }
}
