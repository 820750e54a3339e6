//! Integration tests for the session facade against a mock engine.

use parking_lot::Mutex;
use proptest::prelude::*;
use std::sync::Arc;
use std::time::{Duration, Instant};
use syncbridge_codec::CodecError;
use syncbridge_engine::{
    EngineConnectionState, EngineError, EngineProgressDirection, EngineSessionState,
    EngineSyncConfig, EngineUser,
};
use syncbridge_session::{
    ConnectionCallback, ConnectionState, PartitionValue, ProgressCallback, ProgressDirection,
    ProgressMode, SessionError, SessionManager, SessionManagerConfig, SessionState, SyncScope,
    SyncUser, WaitConfig,
};
use syncbridge_testkit::prelude::*;

fn recording_progress() -> (ProgressCallback, Arc<Mutex<Vec<(u64, u64)>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ProgressCallback = Arc::new(move |t, total| sink.lock().push((t, total)));
    (callback, seen)
}

fn recording_connection() -> (
    ConnectionCallback,
    Arc<Mutex<Vec<(ConnectionState, ConnectionState)>>>,
) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let callback: ConnectionCallback = Arc::new(move |new, old| sink.lock().push((new, old)));
    (callback, seen)
}

#[test]
fn upload_progress_for_outstanding_work() {
    init_tracing();
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());
    let (callback, seen) = recording_progress();

    session
        .add_progress_notification(
            ProgressDirection::Upload,
            ProgressMode::ForCurrentlyOutstandingWork,
            &callback,
        )
        .unwrap();

    engine.emit_progress(EngineProgressDirection::Upload, 500, 1000);
    engine.emit_progress(EngineProgressDirection::Upload, 1000, 1000);
    // Outstanding work is done; the engine stops reporting.
    engine.emit_progress(EngineProgressDirection::Upload, 1000, 3000);

    assert_eq!(*seen.lock(), vec![(500, 1000), (1000, 1000)]);
    assert!(matches!(
        engine.calls()[0],
        EngineCall::RegisterProgress {
            direction: EngineProgressDirection::Upload,
            report_indefinitely: false,
            ..
        }
    ));
}

#[test]
fn progress_directions_are_separate() {
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());
    let (download, downloads) = recording_progress();
    let (upload, uploads) = recording_progress();

    session
        .add_progress_notification(
            ProgressDirection::Download,
            ProgressMode::ReportIndefinitely,
            &download,
        )
        .unwrap();
    session
        .add_progress_notification(
            ProgressDirection::Upload,
            ProgressMode::ReportIndefinitely,
            &upload,
        )
        .unwrap();

    engine.emit_progress(EngineProgressDirection::Download, 1, 4);
    engine.emit_progress(EngineProgressDirection::Upload, 2, 8);
    engine.emit_progress(EngineProgressDirection::Download, 4, 4);
    engine.emit_progress(EngineProgressDirection::Download, 4, 6);

    assert_eq!(*downloads.lock(), vec![(1, 4), (4, 4), (4, 6)]);
    assert_eq!(*uploads.lock(), vec![(2, 8)]);
}

#[test]
fn duplicate_progress_registration_is_rejected() {
    let engine = connected_engine();
    let manager = SessionManager::new();
    let session = manager.session(engine.clone());
    let (callback, _) = recording_progress();

    session
        .add_progress_notification(
            ProgressDirection::Upload,
            ProgressMode::ReportIndefinitely,
            &callback,
        )
        .unwrap();
    let err = session
        .add_progress_notification(
            ProgressDirection::Download,
            ProgressMode::ReportIndefinitely,
            &callback,
        )
        .unwrap_err();

    assert_eq!(err, SessionError::DuplicateRegistration { kind: "progress" });
    assert_eq!(manager.progress_listener_count(), 1);
    assert_eq!(engine.progress_notifier_count(), 1);
}

#[test]
fn same_callback_may_listen_to_both_kinds_of_registry() {
    let engine = connected_engine();
    let manager = SessionManager::new();
    let session = manager.session(engine.clone());
    let (progress, _) = recording_progress();
    let (connection, _) = recording_connection();

    session
        .add_progress_notification(
            ProgressDirection::Upload,
            ProgressMode::ReportIndefinitely,
            &progress,
        )
        .unwrap();
    session.add_connection_notification(&connection).unwrap();
    assert!(session.add_connection_notification(&connection).is_err());

    assert_eq!(manager.progress_listener_count(), 1);
    assert_eq!(manager.connection_listener_count(), 1);
}

#[test]
fn removal_is_idempotent_and_allows_re_adding() {
    let engine = connected_engine();
    let manager = SessionManager::new();
    let session = manager.session(engine.clone());
    let (callback, seen) = recording_progress();

    session.remove_progress_notification(&callback);
    session
        .add_progress_notification(
            ProgressDirection::Download,
            ProgressMode::ReportIndefinitely,
            &callback,
        )
        .unwrap();
    session.remove_progress_notification(&callback);
    session.remove_progress_notification(&callback);

    engine.emit_progress(EngineProgressDirection::Download, 1, 2);
    assert!(seen.lock().is_empty());

    session
        .add_progress_notification(
            ProgressDirection::Download,
            ProgressMode::ReportIndefinitely,
            &callback,
        )
        .unwrap();
    engine.emit_progress(EngineProgressDirection::Download, 2, 2);
    assert_eq!(*seen.lock(), vec![(2, 2)]);

    let releases = engine
        .calls()
        .into_iter()
        .filter(|c| matches!(c, EngineCall::UnregisterProgress(_)))
        .count();
    assert_eq!(releases, 1);
}

#[test]
fn listener_removed_through_another_facade() {
    let engine = connected_engine();
    let manager = SessionManager::new();
    let first = manager.session(engine.clone());
    let second = manager.session(engine.clone());
    let (callback, seen) = recording_connection();

    first.add_connection_notification(&callback).unwrap();
    assert_eq!(first, second);

    second.remove_connection_notification(&callback);
    engine.set_connection_state(EngineConnectionState::Disconnected);

    assert!(seen.lock().is_empty());
    assert_eq!(engine.connection_callback_count(), 0);
    assert_eq!(manager.connection_listener_count(), 0);
}

#[test]
fn connection_notifications_report_new_and_old() {
    let engine = MockEngine::shared();
    let session = SessionManager::new().session(engine.clone());
    let (callback, seen) = recording_connection();

    session.add_connection_notification(&callback).unwrap();
    engine.set_connection_state(EngineConnectionState::Connecting);
    engine.set_connection_state(EngineConnectionState::Connected);
    engine.set_connection_state(EngineConnectionState::Disconnected);

    assert_eq!(
        *seen.lock(),
        vec![
            (ConnectionState::Connecting, ConnectionState::Disconnected),
            (ConnectionState::Connected, ConnectionState::Connecting),
            (ConnectionState::Disconnected, ConnectionState::Connected),
        ]
    );
}

#[test]
fn removing_connection_listener_keeps_progress_tokens() {
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());
    let (progress, progress_seen) = recording_progress();
    let (connection, _) = recording_connection();

    session
        .add_progress_notification(
            ProgressDirection::Download,
            ProgressMode::ReportIndefinitely,
            &progress,
        )
        .unwrap();
    session.add_connection_notification(&connection).unwrap();
    let progress_tokens = engine.progress_tokens();

    session.remove_connection_notification(&connection);

    assert_eq!(engine.progress_tokens(), progress_tokens);
    assert!(!engine
        .calls()
        .iter()
        .any(|c| matches!(c, EngineCall::UnregisterProgress(_))));
    assert!(engine
        .calls()
        .iter()
        .any(|c| matches!(c, EngineCall::UnregisterConnection(_))));

    engine.emit_progress(EngineProgressDirection::Download, 3, 9);
    assert_eq!(*progress_seen.lock(), vec![(3, 9)]);
}

#[test]
fn state_accessors_project_live_engine_state() {
    let engine = MockEngine::shared();
    let session = SessionManager::new().session(engine.clone());

    assert_eq!(session.state().unwrap(), SessionState::Active);
    assert_eq!(session.connection_state().unwrap(), ConnectionState::Disconnected);

    engine.set_state(EngineSessionState::Inactive);
    engine.set_connection_state(EngineConnectionState::Connecting);
    assert_eq!(session.state().unwrap(), SessionState::Inactive);
    assert_eq!(session.connection_state().unwrap(), ConnectionState::Connecting);

    engine.set_state(EngineSessionState::WaitingForAccessToken);
    assert_eq!(session.state().unwrap(), SessionState::Active);
}

#[test]
fn unknown_engine_codes_surface_as_errors() {
    let engine = MockEngine::shared();
    let session = SessionManager::new().session(engine.clone());

    engine.set_state_code(99);
    assert_eq!(
        session.state(),
        Err(SessionError::UnrecognizedEnumValue {
            kind: "session state",
            value: 99
        })
    );
    assert!(session.is_connected().unwrap_err().is_fatal());

    engine.set_state(EngineSessionState::Active);
    engine.set_connection_state_code(17);
    assert_eq!(
        session.connection_state(),
        Err(SessionError::UnrecognizedEnumValue {
            kind: "connection state",
            value: 17
        })
    );
}

#[test]
fn is_connected_truth_table() {
    let engine = MockEngine::shared();
    let session = SessionManager::new().session(engine.clone());

    for connection in EngineConnectionState::ALL {
        for state in EngineSessionState::ALL {
            engine.set_connection_state_silently(connection);
            engine.set_state(state);
            let expected = connection == EngineConnectionState::Connected
                && matches!(state, EngineSessionState::Active | EngineSessionState::Dying);
            assert_eq!(
                session.is_connected().unwrap(),
                expected,
                "{connection:?} / {state:?}"
            );
        }
    }
}

#[test]
fn url_requires_a_resolved_value() {
    let engine = MockEngine::shared();
    let session = SessionManager::new().session(engine.clone());

    assert_eq!(session.url(), Err(SessionError::UrlUnavailable));
    engine.set_url(Some(""));
    assert_eq!(session.url(), Err(SessionError::UrlUnavailable));
    engine.set_url(Some(TEST_URL));
    assert_eq!(session.url().unwrap(), TEST_URL);
}

#[test]
fn config_decodes_partition_values() {
    let engine = partition_engine(&PartitionValue::String("team-42".into()));
    engine.set_user(EngineUser::new("abc", "api-key"));
    let session = SessionManager::new().session(engine.clone());

    let config = session.config().unwrap();
    assert_eq!(
        config.user,
        SyncUser {
            id: "abc".into(),
            provider: "api-key".into()
        }
    );
    assert_eq!(config.scope, SyncScope::Partition("team-42".into()));
    assert_eq!(session.user(), config.user);
}

#[test]
fn config_reports_flexible_sync() {
    let session = SessionManager::new().session(flexible_engine());
    let config = session.config().unwrap();
    assert!(config.is_flexible());
    assert_eq!(config.partition(), None);
}

#[test]
fn malformed_partition_is_a_decode_error() {
    let engine = MockEngine::shared();
    engine.set_config(EngineSyncConfig::partition("{\"$oid\": \"short\"}"));
    let session = SessionManager::new().session(engine.clone());

    assert_eq!(
        session.config(),
        Err(SessionError::ConfigDecode(CodecError::InvalidObjectId {
            value: "short".into()
        }))
    );
}

#[test]
fn signed_object_id_is_a_decode_error() {
    let engine = MockEngine::shared();
    engine.set_config(EngineSyncConfig::partition(
        r#"{"$oid":"+f+f+f+f+f+f+f+f+f+f+f+f"}"#,
    ));
    let session = SessionManager::new().session(engine.clone());

    assert_eq!(
        session.config(),
        Err(SessionError::ConfigDecode(CodecError::InvalidObjectId {
            value: "+f+f+f+f+f+f+f+f+f+f+f+f".into()
        }))
    );
}

#[test]
fn listener_removing_itself_from_first_report() {
    let engine = connected_engine();
    engine.report_on_register(Some((10, 10)));
    let manager = SessionManager::new();
    let session = manager.session(engine.clone());

    let me: Arc<Mutex<Option<ProgressCallback>>> = Arc::new(Mutex::new(None));
    let callback: ProgressCallback = {
        let session = session.clone();
        let me = Arc::clone(&me);
        Arc::new(move |_, _| {
            let own = me.lock().take();
            if let Some(own) = own {
                session.remove_progress_notification(&own);
            }
        })
    };
    *me.lock() = Some(Arc::clone(&callback));

    let (done_tx, done_rx) = std::sync::mpsc::channel();
    let worker = {
        let session = session.clone();
        std::thread::spawn(move || {
            let result = session.add_progress_notification(
                ProgressDirection::Upload,
                ProgressMode::ForCurrentlyOutstandingWork,
                &callback,
            );
            done_tx.send(result).unwrap();
        })
    };

    let result = done_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("add_progress_notification did not return");
    worker.join().unwrap();

    assert_eq!(result, Ok(()));
    assert_eq!(engine.progress_notifier_count(), 0);
    assert_eq!(manager.progress_listener_count(), 0);
}

#[test]
fn pause_and_resume_drive_the_engine() {
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());

    session.pause();
    assert_eq!(session.state().unwrap(), SessionState::Inactive);
    session.resume();
    assert_eq!(session.state().unwrap(), SessionState::Active);
    session.resume();
    session.reconnect();

    assert_eq!(
        engine.calls(),
        vec![
            EngineCall::LogOut,
            EngineCall::ReviveIfNeeded,
            EngineCall::ReviveIfNeeded,
            EngineCall::HandleReconnect,
        ]
    );
}

#[tokio::test]
async fn download_times_out_with_duration_in_message() {
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());

    let err = session
        .download_all_server_changes(Some(Duration::from_millis(50)))
        .await
        .unwrap_err();

    match err {
        SessionError::Timeout { message, timeout } => {
            assert!(message.contains("50"), "{message}");
            assert_eq!(message, "Downloading changes did not complete in 50 ms.");
            assert_eq!(timeout, Duration::from_millis(50));
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    // The wait gave up; the engine still owns its operation.
    assert_eq!(engine.pending_download_waits(), 1);
    assert_eq!(engine.complete_download(Ok(())), 1);
}

#[tokio::test]
async fn upload_completes_before_deadline() {
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());

    let completer = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            while engine.pending_upload_waits() == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            engine.complete_upload(Ok(()))
        })
    };

    let started = Instant::now();
    session
        .upload_all_local_changes(Some(Duration::from_secs(5)))
        .await
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(completer.await.unwrap(), 1);
}

#[tokio::test]
async fn upload_failure_is_forwarded() {
    let engine = connected_engine();
    let session = SessionManager::new().session(engine.clone());

    let completer = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            while engine.pending_upload_waits() == 0 {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
            engine.complete_upload(Err(EngineError::operation("write not permitted")))
        })
    };

    let err = session.upload_all_local_changes(None).await.unwrap_err();
    assert_eq!(
        err,
        SessionError::Engine(EngineError::operation("write not permitted"))
    );
    completer.await.unwrap();
}

#[tokio::test]
async fn manager_default_timeout_applies() {
    let config = SessionManagerConfig::new().with_upload(
        WaitConfig::upload()
            .with_default_timeout(Duration::from_millis(30))
            .with_timeout_message("upload stalled after {timeout_ms}ms"),
    );
    let session = SessionManager::with_config(config).session(connected_engine());

    let err = session.upload_all_local_changes(None).await.unwrap_err();
    assert_eq!(err.to_string(), "upload stalled after 30ms");
}

proptest! {
    #[test]
    fn progress_values_reach_callback_unchanged(
        pairs in prop::collection::vec(progress_pair_strategy(), 1..20)
    ) {
        let engine = connected_engine();
        let session = SessionManager::new().session(engine.clone());
        let (callback, seen) = recording_progress();

        session
            .add_progress_notification(
                ProgressDirection::Download,
                ProgressMode::ReportIndefinitely,
                &callback,
            )
            .unwrap();
        for (done, total) in &pairs {
            engine.emit_progress(EngineProgressDirection::Download, *done, *total);
        }

        prop_assert_eq!(&*seen.lock(), &pairs);
    }

    #[test]
    fn stored_partitions_decode_back(value in partition_value_strategy()) {
        let session = SessionManager::new().session(partition_engine(&value));
        let config = session.config().unwrap();
        prop_assert_eq!(config.partition(), Some(&value));
    }
}
