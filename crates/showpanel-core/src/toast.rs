// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Toast notifications: the wire message, the sink port, and a TTL + dedupe queue.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use crate::config::PanelConfig;

/// Toast severity (keys the host UI's styling).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Operation completed.
    Success,
    /// Warning that may need attention.
    Warning,
    /// Error requiring user awareness.
    Error,
    /// Informational note. Unknown severities decode here.
    #[serde(other)]
    Info,
}

impl Severity {
    /// Lowercase wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

/// Toast as carried by a mutation result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToastMessage {
    /// Severity.
    pub severity: Severity,
    /// Text shown to the operator.
    pub message: String,
}

impl ToastMessage {
    /// Build a toast.
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}

/// Port for surfacing toasts to the operator. Fire-and-forget.
pub trait NotificationSink {
    /// Display `toast`; `None` shows nothing.
    fn show_alert(&self, toast: Option<&ToastMessage>);
}

impl<T: NotificationSink + ?Sized> NotificationSink for Arc<T> {
    fn show_alert(&self, toast: Option<&ToastMessage>) {
        (**self).show_alert(toast);
    }
}

/// Identifier for a toast entry.
pub type ToastId = u64;

/// Toast data stored in the service.
#[derive(Debug, Clone)]
pub struct Toast {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// Time-to-live duration.
    pub ttl: Duration,
    /// Creation time.
    pub created: Instant,
}

/// Rendering-friendly view of a toast.
#[derive(Debug, Clone)]
pub struct ToastRender {
    /// Stable identifier.
    pub id: ToastId,
    /// Severity.
    pub severity: Severity,
    /// Message text.
    pub message: String,
    /// 1.0 -> just created, 0.0 -> expired.
    pub progress: f32,
}

/// In-memory toast queue with TTL and dedupe window.
#[derive(Debug)]
pub struct ToastService {
    queue: VecDeque<Toast>,
    max: usize,
    dedupe_window: Duration,
    next_id: ToastId,
}

impl ToastService {
    /// Create a new queue with a maximum length.
    pub fn new(max: usize) -> Self {
        Self {
            queue: VecDeque::new(),
            max: max.max(1),
            dedupe_window: Duration::from_millis(500),
            next_id: 1,
        }
    }

    /// Push a toast, deduping identical recent entries (same severity/message within `dedupe_window`).
    pub fn push(&mut self, toast: &ToastMessage, ttl: Duration, now: Instant) -> ToastId {
        if let Some(existing) = self.queue.iter_mut().find(|t| {
            t.severity == toast.severity
                && t.message == toast.message
                && now.duration_since(t.created) <= self.dedupe_window
        }) {
            existing.created = now;
            existing.ttl = ttl;
            return existing.id;
        }

        let id = self.next_id;
        self.next_id += 1;
        if self.queue.len() >= self.max {
            self.queue.pop_front();
        }
        self.queue.push_back(Toast {
            id,
            severity: toast.severity,
            message: toast.message.clone(),
            ttl,
            created: now,
        });
        id
    }

    /// Drop expired toasts (call once per frame/tick).
    pub fn retain_visible(&mut self, now: Instant) {
        self.queue.retain(|t| now.duration_since(t.created) < t.ttl);
    }

    /// Return render-ready toasts with progress ratios.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        self.queue
            .iter()
            .filter(|t| now.duration_since(t.created) < t.ttl)
            .map(|t| ToastRender {
                id: t.id,
                severity: t.severity,
                message: t.message.clone(),
                progress: 1.0 - (now.duration_since(t.created).as_secs_f32() / t.ttl.as_secs_f32()),
            })
            .collect()
    }
}

/// Cloneable sink that queues toasts into a shared [`ToastService`] with a fixed TTL.
#[derive(Debug, Clone)]
pub struct SharedToasts {
    inner: Arc<Mutex<ToastService>>,
    ttl: Duration,
}

impl SharedToasts {
    /// Create a sink over a fresh queue.
    pub fn new(max: usize, ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(ToastService::new(max))),
            ttl,
        }
    }

    /// Create a sink sized and timed by the panel config.
    pub fn from_config(config: &PanelConfig) -> Self {
        Self::new(config.toast_max, config.toast_ttl())
    }

    /// Render-ready toasts at `now`, dropping expired ones.
    pub fn visible(&self, now: Instant) -> Vec<ToastRender> {
        let mut service = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        service.retain_visible(now);
        service.visible(now)
    }
}

impl NotificationSink for SharedToasts {
    fn show_alert(&self, toast: Option<&ToastMessage>) {
        let Some(toast) = toast else {
            return;
        };
        self.inner
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast, self.ttl, Instant::now());
    }
}
