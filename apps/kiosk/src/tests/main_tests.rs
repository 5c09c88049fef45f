use super::*;
use intake_core::workflow::SUBMITTED_MESSAGE;
use std::sync::Arc;
use storage::MemoryStore;

async fn empty_kiosk() -> Kiosk {
    let session = IntakeSession::open(Arc::new(MemoryStore::default())).await;
    Kiosk::new(session, DEFAULT_EXPORT_PREFIX, PathBuf::from("."))
}

#[tokio::test]
async fn scripted_session_submits_and_quits() {
    let script = "1\n1\n1\ndesc Ceiling tile fell\nanon\nsubmit\nhistory\nquit\nhelp\n";
    let mut out = Vec::new();
    let kiosk = run(empty_kiosk().await, script.as_bytes(), &mut out)
        .await
        .expect("run");

    assert_eq!(kiosk.session().registry().len(), 1);
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("Choose your campus:"));
    assert!(text.contains(SUBMITTED_MESSAGE));
    assert!(text.contains("#1 [Open] Baruch College"));
    assert!(!text.contains("Anywhere:"));
}

#[tokio::test]
async fn unparseable_lines_are_reported_and_input_end_stops() {
    let mut out = Vec::new();
    run(empty_kiosk().await, "jump\n".as_bytes(), &mut out)
        .await
        .expect("run");
    let text = String::from_utf8(out).expect("utf8");
    assert!(text.contains("unknown command 'jump'"));
}
