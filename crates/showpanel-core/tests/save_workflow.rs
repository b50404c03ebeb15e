// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Jukebox panel save workflow against a scripted gateway whose responses the
//! test resolves in any order.

use std::sync::{Arc, Mutex};

use serde_json::json;
use showpanel_core::field::{FieldInput, PanelField};
use showpanel_core::gateway::{pending, ResultSender};
use showpanel_core::panel::ValidationError;
use showpanel_core::{
    CommitPolicy, JukeboxPanel, MutationGateway, MutationResult, NotificationSink, PendingResult,
    PreferenceStore, Preferences, SavePhase, Severity, Show, ToastMessage,
};

#[derive(Default)]
struct ScriptedGateway {
    calls: Mutex<Vec<(Preferences, Option<ResultSender>)>>,
}

impl ScriptedGateway {
    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn payload(&self, idx: usize) -> Preferences {
        self.calls.lock().unwrap()[idx].0.clone()
    }

    fn resolve(&self, idx: usize, result: MutationResult) {
        let tx = self.calls.lock().unwrap()[idx].1.take().unwrap();
        tx.resolve(result);
    }
}

impl MutationGateway for ScriptedGateway {
    fn save_preferences(&self, payload: Preferences) -> PendingResult {
        let (tx, pending) = pending();
        self.calls.lock().unwrap().push((payload, Some(tx)));
        pending
    }
}

#[derive(Default)]
struct RecordingSink(Mutex<Vec<ToastMessage>>);

impl RecordingSink {
    fn shown(&self) -> Vec<ToastMessage> {
        self.0.lock().unwrap().clone()
    }
}

impl NotificationSink for RecordingSink {
    fn show_alert(&self, toast: Option<&ToastMessage>) {
        if let Some(toast) = toast {
            self.0.lock().unwrap().push(toast.clone());
        }
    }
}

type Panel = JukeboxPanel<Arc<ScriptedGateway>, Arc<RecordingSink>, Box<dyn Fn(bool)>>;

struct Harness {
    store: PreferenceStore,
    gateway: Arc<ScriptedGateway>,
    sink: Arc<RecordingSink>,
    progress: Arc<Mutex<Vec<bool>>>,
    panel: Panel,
}

fn initial_show() -> Show {
    serde_json::from_value(json!({
        "showName": "Maple Lane Lights",
        "preferences": {
            "jukeboxDepth": 5,
            "jukeboxRequestLimit": 2,
            "checkIfRequested": false,
            "viewerControlMode": "JUKEBOX"
        }
    }))
    .unwrap()
}

fn harness() -> Harness {
    let store = PreferenceStore::new(initial_show());
    let gateway = Arc::new(ScriptedGateway::default());
    let sink = Arc::new(RecordingSink::default());
    let progress = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&progress);
    let progress_port: Box<dyn Fn(bool)> = Box::new(move |v| log.lock().unwrap().push(v));
    let panel = JukeboxPanel::new(
        store.clone(),
        Arc::clone(&gateway),
        Arc::clone(&sink),
        progress_port,
    );
    Harness {
        store,
        gateway,
        sink,
        progress,
        panel,
    }
}

fn saved() -> MutationResult {
    MutationResult {
        success: true,
        toast: Some(ToastMessage::new(Severity::Success, "Saved")),
    }
}

fn rejected() -> MutationResult {
    MutationResult {
        success: false,
        toast: Some(ToastMessage::new(Severity::Error, "Nope")),
    }
}

#[tokio::test]
async fn depth_blur_commits_value_and_keeps_other_fields() {
    for n in [0u32, 1, 10, 250, 4_000_000] {
        let mut h = harness();
        let before = h.store.show();
        h.panel.edit_depth(&n.to_string());
        let save = h.panel.begin_queue_save().unwrap();
        h.gateway.resolve(0, saved());
        let outcome = h.panel.complete(save).await;

        assert!(outcome.committed);
        let after = h.store.show();
        assert_eq!(after.preferences.jukebox_depth, n);
        assert_eq!(after.preferences.jukebox_request_limit, 2);
        assert!(!after.preferences.check_if_requested);
        assert_eq!(after.preferences.other, before.preferences.other);
        assert_eq!(after.other, before.other);
    }
}

#[tokio::test]
async fn non_numeric_input_never_reaches_gateway() {
    for text in ["abc", "", "3.5", "-1", "12x"] {
        let mut h = harness();
        let before = h.store.show();
        h.panel.edit_depth(text);
        assert_eq!(h.panel.depth_input(), FieldInput::Invalid);

        let err = h.panel.save_queue_fields().await.unwrap_err();
        assert_eq!(
            err,
            ValidationError::NotANumber {
                field: PanelField::JukeboxDepth
            }
        );
        assert_eq!(h.gateway.call_count(), 0);
        assert_eq!(*h.store.show(), *before);
        assert!(h.sink.shown().is_empty());
        assert!(h.progress.lock().unwrap().is_empty());
        assert_eq!(h.panel.phase(), SavePhase::Idle);
    }
}

#[tokio::test]
async fn invalid_request_limit_blocks_valid_depth() {
    let mut h = harness();
    h.panel.edit_depth("7");
    h.panel.edit_request_limit("lots");
    let err = h.panel.begin_queue_save().unwrap_err();
    assert_eq!(
        err,
        ValidationError::NotANumber {
            field: PanelField::JukeboxRequestLimit
        }
    );
    assert_eq!(h.gateway.call_count(), 0);

    h.panel.edit_request_limit("3");
    let save = h.panel.begin_queue_save().unwrap();
    assert_eq!(save.snapshot().jukebox_depth, 7);
    assert_eq!(save.snapshot().jukebox_request_limit, 3);
}

#[tokio::test]
async fn toggle_sends_one_call_with_full_copy() {
    let h = harness();
    let before = h.store.get_preferences();
    let save = h.panel.begin_toggle_save(true);

    assert_eq!(h.gateway.call_count(), 1);
    let sent = h.gateway.payload(0);
    assert!(sent.check_if_requested);
    assert_eq!(
        Preferences {
            check_if_requested: false,
            ..sent
        },
        before
    );

    h.gateway.resolve(0, saved());
    h.panel.complete(save).await;
    assert!(h.panel.check_if_requested());
}

#[tokio::test]
async fn failed_text_save_leaves_store_untouched() {
    let mut h = harness();
    let before = h.store.show();
    let mut rx = h.store.subscribe();
    h.panel.edit_request_limit("9");
    let save = h.panel.begin_queue_save().unwrap();
    h.gateway.resolve(0, rejected());
    let outcome = h.panel.complete(save).await;

    assert!(!outcome.committed);
    assert_eq!(*h.store.show(), *before);
    assert!(!rx.has_changed().unwrap());
    assert_eq!(h.sink.shown(), vec![ToastMessage::new(Severity::Error, "Nope")]);
    assert_eq!(*h.progress.lock().unwrap(), vec![true, false]);
    // Field keeps the uncommitted text value for a retry.
    assert_eq!(h.panel.request_limit_input(), FieldInput::Valid(9));
}

#[tokio::test]
async fn failed_toggle_commits_under_observed_policy_only() {
    let h = harness();
    let save = h.panel.begin_toggle_save(true);
    h.gateway.resolve(0, rejected());
    assert!(h.panel.complete(save).await.committed);
    assert!(h.store.get_preferences().check_if_requested);

    let h = harness();
    let panel = h.panel.with_commit_policy(CommitPolicy::SuccessOnly);
    let save = panel.begin_toggle_save(true);
    h.gateway.resolve(0, rejected());
    assert!(!panel.complete(save).await.committed);
    assert!(!h.store.get_preferences().check_if_requested);
    assert_eq!(h.sink.shown().len(), 1);
}

#[tokio::test]
async fn dropped_response_falls_back_to_failure_toast() {
    let mut h = harness();
    h.panel.edit_depth("11");
    let save = h.panel.begin_queue_save().unwrap();
    drop(h.gateway.calls.lock().unwrap()[0].1.take());
    let outcome = h.panel.complete(save).await;

    assert!(!outcome.committed);
    assert_eq!(h.store.get_preferences().jukebox_depth, 5);
    assert_eq!(
        h.sink.shown(),
        vec![MutationResult::transport_failure().toast.unwrap()]
    );
}

#[tokio::test]
async fn missing_toast_shows_nothing_but_still_commits() {
    let mut h = harness();
    h.panel.edit_depth("6");
    let save = h.panel.begin_queue_save().unwrap();
    h.gateway.resolve(
        0,
        MutationResult {
            success: true,
            toast: None,
        },
    );
    assert!(h.panel.complete(save).await.committed);
    assert_eq!(h.store.get_preferences().jukebox_depth, 6);
    assert!(h.sink.shown().is_empty());
    assert_eq!(h.panel.phase(), SavePhase::Idle);
}

#[tokio::test]
async fn unchanged_value_is_saved_every_time() {
    let h = harness();
    for expected_calls in 1..=2 {
        let save = h.panel.begin_queue_save().unwrap();
        h.gateway.resolve(expected_calls - 1, saved());
        assert!(h.panel.complete(save).await.committed);
        assert_eq!(h.gateway.call_count(), expected_calls);
        assert_eq!(h.store.get_preferences().jukebox_depth, 5);
        assert_eq!(h.store.get_preferences().jukebox_request_limit, 2);
    }
    assert_eq!(h.gateway.payload(0), h.gateway.payload(1));
}

#[tokio::test]
async fn last_completed_save_wins() {
    let mut h = harness();
    h.panel.edit_depth("7");
    let first = h.panel.begin_queue_save().unwrap();
    h.panel.edit_depth("8");
    let second = h.panel.begin_queue_save().unwrap();
    assert_eq!(h.panel.phase(), SavePhase::Saving { in_flight: 2 });

    // Second-issued resolves first.
    h.gateway.resolve(1, saved());
    h.panel.complete(second).await;
    assert_eq!(h.store.get_preferences().jukebox_depth, 8);
    assert_eq!(h.panel.phase(), SavePhase::Saving { in_flight: 1 });

    h.gateway.resolve(0, saved());
    h.panel.complete(first).await;
    assert_eq!(h.store.get_preferences().jukebox_depth, 7);
    assert_eq!(h.panel.phase(), SavePhase::Idle);
    assert_eq!(*h.progress.lock().unwrap(), vec![true, true, false, false]);
}

#[tokio::test]
async fn commit_uses_show_captured_at_issue_time() {
    let mut h = harness();
    h.panel.edit_depth("12");
    let save = h.panel.begin_queue_save().unwrap();

    // Unrelated show change lands while the save is outstanding.
    let mut other = (*h.store.show()).clone();
    other.other.insert("showName".into(), json!("Renamed"));
    h.store.set_show(other);

    h.gateway.resolve(0, saved());
    h.panel.complete(save).await;
    let show = h.store.show();
    assert_eq!(show.preferences.jukebox_depth, 12);
    assert_eq!(show.other.get("showName"), Some(&json!("Maple Lane Lights")));
}

#[tokio::test]
async fn depth_edit_end_to_end() {
    let mut h = harness();
    h.panel.edit_depth("10");
    let save = h.panel.begin_queue_save().unwrap();
    assert_eq!(*h.progress.lock().unwrap(), vec![true]);
    h.gateway.resolve(0, saved());
    let outcome = h.panel.complete(save).await;

    assert!(outcome.committed);
    let prefs = h.store.get_preferences();
    assert_eq!(prefs.jukebox_depth, 10);
    assert_eq!(prefs.jukebox_request_limit, 2);
    assert!(!prefs.check_if_requested);
    assert_eq!(h.sink.shown(), vec![ToastMessage::new(Severity::Success, "Saved")]);
    assert_eq!(*h.progress.lock().unwrap(), vec![true, false]);
}

#[tokio::test]
async fn every_begun_save_returns_panel_to_idle() {
    let h = harness();
    let toggle = h.panel.begin_toggle_save(true);
    let queue = h.panel.begin_queue_save().unwrap();
    assert_eq!(h.panel.phase(), SavePhase::Saving { in_flight: 2 });

    h.gateway.resolve(0, rejected());
    h.gateway.resolve(1, rejected());
    h.panel.complete(toggle).await;
    h.panel.complete(queue).await;

    assert_eq!(h.panel.phase(), SavePhase::Idle);
    assert_eq!(*h.progress.lock().unwrap(), vec![true, true, false, false]);
}
