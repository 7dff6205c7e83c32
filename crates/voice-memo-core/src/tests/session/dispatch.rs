use crate::{
    NoticeLevel, Permission, ResourceUri, SessionIntent,
    tests::session::support::{ScriptedAudio, record_takes, session, session_with},
};

/// WHAT: Successful intents produce no notice
/// WHY: Notices are reserved for failures the user must see
#[tokio::test]
async fn given_valid_intents_when_dispatching_then_no_notice() {
    // Given: An idle session
    let mut session = session();

    // When: Starting, stopping and naming, each without a notice
    assert!(session.dispatch(SessionIntent::StartCapture).await.is_none());
    assert!(session.dispatch(SessionIntent::StopCapture).await.is_none());
    assert!(
        session
            .dispatch(SessionIntent::SubmitCompletedName {
                name: "Memo".to_string()
            })
            .await
            .is_none()
    );

    // Then: The take carries the submitted name
    assert_eq!(session.state().recordings()[0].name, "Memo");
}

/// WHAT: Permission denial becomes a warning asking for microphone access
/// WHY: Denial is recoverable and must be explained to the user
#[tokio::test]
async fn given_permission_denied_when_dispatching_start_then_warning_notice() {
    // Given: A user who declines microphone access
    let mut audio = ScriptedAudio::new();
    audio.permission = Permission::Denied;
    let mut session = session_with(audio);

    // When: Dispatching a capture start
    let notice = session.dispatch(SessionIntent::ToggleCapture).await;

    // Then: A warning naming the microphone
    let notice = notice.unwrap_or_else(|| unreachable!("denial must produce a notice"));
    assert_eq!(notice.level, NoticeLevel::Warning);
    assert!(notice.message.contains("microphone"));
    assert!(!session.state().is_capturing());
}

/// WHAT: Capability failures become error notices without source locations
/// WHY: Users see a readable message; the location stays in the logs
#[tokio::test]
async fn given_failing_microphone_when_dispatching_start_then_error_notice() {
    // Given: A microphone that fails to start
    let mut audio = ScriptedAudio::new();
    audio.fail_start = true;
    let mut session = session_with(audio);

    // When: Dispatching a capture start
    let notice = session.dispatch(SessionIntent::StartCapture).await;

    // Then: An error notice with a readable message only
    let notice = notice.unwrap_or_else(|| unreachable!("failure must produce a notice"));
    assert_eq!(notice.level, NoticeLevel::Error);
    assert!(notice.message.contains("microphone busy"));
    assert!(!notice.message.contains(".rs"));
}

/// WHAT: Precondition violations become warnings and never fault
/// WHY: Invalid UI sequences are defensively ignored
#[tokio::test]
async fn given_idle_session_when_dispatching_stop_then_warning_notice() {
    // Given: An idle session
    let mut session = session();

    // When: Dispatching a stop
    let notice = session.dispatch(SessionIntent::StopCapture).await;

    // Then: A warning, not an error
    assert_eq!(notice.map(|n| n.level), Some(NoticeLevel::Warning));
}

/// WHAT: A second delete through dispatch reports a warning
/// WHY: Delete is idempotent-safe at the boundary too
#[tokio::test]
async fn given_deleted_recording_when_dispatching_delete_again_then_warning() {
    // Given: One take and its delete intent
    let mut session = session();
    let uris = record_takes(&mut session, 1).await;
    let delete = SessionIntent::Delete {
        uri: uris[0].clone(),
    };

    // When: Dispatching the delete twice
    let first = session.dispatch(delete.clone()).await;
    let second = session.dispatch(delete).await;

    // Then: First succeeds, second warns
    assert!(first.is_none());
    assert_eq!(second.map(|n| n.level), Some(NoticeLevel::Warning));
    assert!(session.state().recordings().is_empty());
}

/// WHAT: Text intents update the name field and search filter
/// WHY: The presentation layer forwards every keystroke-level change as an intent
#[tokio::test]
async fn given_text_intents_when_dispatching_then_state_updated() {
    // Given: An idle session
    let mut session = session();

    // When: Dispatching name and search text
    session
        .dispatch(SessionIntent::SetNameField {
            text: "draft".to_string(),
        })
        .await;
    session
        .dispatch(SessionIntent::SetSearchText {
            text: "PM".to_string(),
        })
        .await;

    // Then: Both fields hold the text
    assert_eq!(session.state().name_field(), "draft");
    assert_eq!(session.state().search_text(), "PM");
}

/// WHAT: Edit intents rename through dispatch
/// WHY: BeginEdit and SaveEdit are the rename path of the presentation layer
#[tokio::test]
async fn given_edit_intents_when_dispatching_then_recording_renamed() {
    // Given: One take
    let mut session = session();
    let uris = record_takes(&mut session, 1).await;

    // When: Renaming it, then playing an unknown URI
    let begin = session
        .dispatch(SessionIntent::BeginEdit {
            uri: uris[0].clone(),
        })
        .await;
    let save = session
        .dispatch(SessionIntent::SaveEdit {
            name: "Bridge".to_string(),
        })
        .await;
    let missing = session
        .dispatch(SessionIntent::Play {
            uri: ResourceUri::new("file:///missing.wav"),
        })
        .await;

    // Then: Renamed, and the unknown play warns
    assert!(begin.is_none());
    assert!(save.is_none());
    assert_eq!(session.state().recordings()[0].name, "Bridge");
    assert_eq!(missing.map(|n| n.level), Some(NoticeLevel::Warning));
}
