use super::*;
use crate::{registry::Criterion, seed::sample_requests, workflow::Step};
use async_trait::async_trait;
use chrono::TimeZone;
use shared::catalog::{Campus, MainCategoryId};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};
use storage::{JsonFileStore, MemoryStore};

/// Loads the sample list; the first `failing_saves` saves report a full disk.
struct FlakyStore {
    fail_load: bool,
    failing_saves: usize,
    saves: AtomicUsize,
    saved: Mutex<Option<Vec<Request>>>,
}

impl FlakyStore {
    fn new(fail_load: bool, failing_saves: usize) -> Self {
        Self {
            fail_load,
            failing_saves,
            saves: AtomicUsize::new(0),
            saved: Mutex::new(None),
        }
    }

    fn saved_status(&self, id: RequestId) -> Option<RequestStatus> {
        let saved = self.saved.lock().expect("lock");
        saved
            .as_ref()?
            .iter()
            .find(|r| r.id == id)
            .map(|r| r.status)
    }
}

#[async_trait]
impl RequestStore for FlakyStore {
    async fn load(&self) -> anyhow::Result<Vec<Request>> {
        if self.fail_load {
            anyhow::bail!("disk unplugged");
        }
        Ok(sample_requests())
    }

    async fn save(&self, requests: &[Request]) -> anyhow::Result<()> {
        let attempt = self.saves.fetch_add(1, Ordering::SeqCst);
        if attempt < self.failing_saves {
            anyhow::bail!("disk full");
        }
        *self.saved.lock().expect("lock") = Some(requests.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "flaky".into()
    }
}

fn draft(description: &str) -> NewRequestDraft {
    NewRequestDraft {
        name: "Casey".into(),
        email: "casey@csi.cuny.edu".into(),
        description: description.into(),
        ..NewRequestDraft::default()
    }
}

fn walk_to_form(session: &mut IntakeSession) {
    let workflow = session.workflow_mut();
    workflow.select_campus(Campus::StatenIsland).expect("campus");
    workflow
        .select_main_category(MainCategoryId::CampusFacilities)
        .expect("category");
    workflow.select_subcategory("Heating / Cooling").expect("sub");
}

#[tokio::test]
async fn load_failure_starts_empty() {
    let session = IntakeSession::open(Arc::new(FlakyStore::new(true, 0))).await;
    assert!(session.registry().is_empty());
}

#[tokio::test]
async fn submit_writes_the_full_list_through() {
    let store = Arc::new(MemoryStore::with_requests(sample_requests()));
    let mut session = IntakeSession::open(store.clone()).await;
    walk_to_form(&mut session);

    let request = session.submit(&draft("Radiator stuck on")).await.expect("submit");
    assert_eq!(request.id, RequestId(5));

    let stored = store.load().await.expect("load");
    assert_eq!(stored.len(), 5);
    assert_eq!(stored[0], request);
}

#[tokio::test]
async fn invalid_submit_does_not_touch_the_store() {
    let store = Arc::new(FlakyStore::new(false, 0));
    let mut session = IntakeSession::open(store.clone()).await;
    walk_to_form(&mut session);

    let err = session.submit(&draft("  ")).await.expect_err("invalid");
    assert!(err.validation_messages().is_some());
    assert_eq!(session.registry().len(), 4);
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn save_failure_is_reported_but_change_is_kept() {
    let mut session = IntakeSession::open(Arc::new(FlakyStore::new(false, usize::MAX))).await;
    let err = session
        .set_status(RequestId(2), RequestStatus::InProgress)
        .await
        .expect_err("save fails");
    assert!(matches!(err, SessionError::Storage(_)));
    assert!(err.to_string().contains("disk full"));
    assert_eq!(
        session.registry().get(RequestId(2)).map(|r| r.status),
        Some(RequestStatus::InProgress)
    );
}

#[tokio::test]
async fn unchanged_status_and_repeat_cancel_skip_the_store() {
    let store = Arc::new(FlakyStore::new(false, 0));
    let mut session = IntakeSession::open(store.clone()).await;

    session
        .set_status(RequestId(1), RequestStatus::Open)
        .await
        .expect("same status");
    assert_eq!(store.saves.load(Ordering::SeqCst), 0);

    session.cancel(RequestId(1)).await.expect("cancel");
    let again = session.cancel(RequestId(1)).await.expect("cancel again");
    assert_eq!(again, CancelOutcome::AlreadyCancelled);
    assert_eq!(store.saves.load(Ordering::SeqCst), 1);

    let err = session.cancel(RequestId(404)).await.expect_err("missing");
    assert!(matches!(err, SessionError::Registry(RegistryError::NotFound(_))));
}

#[tokio::test]
async fn direct_submission_validates_classification_and_form() {
    let mut session = IntakeSession::open(Arc::new(MemoryStore::default())).await;
    let classification = Classification {
        campus: Campus::Guttman,
        main_category: MainCategoryId::TechAccess,
        sub_category: "Plumbing".into(),
    };
    let err = session
        .submit_classified(&classification, &draft("Printer jam"))
        .await
        .expect_err("mismatched subcategory");
    assert_eq!(err.validation_messages().map(|m| m.len()), Some(1));

    let classification =
        Classification::new(Campus::Guttman, MainCategoryId::TechAccess, "Computer Labs")
            .expect("triple");
    let request = session
        .submit_classified(&classification, &draft("Printer jam"))
        .await
        .expect("submit");
    assert_eq!(request.id, RequestId(1));
    assert_eq!(session.workflow().step(), Step::SelectCampus);
}

#[tokio::test]
async fn seeding_only_happens_once() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("requests.json");
    let mut session = IntakeSession::open(Arc::new(JsonFileStore::new(&path))).await;
    assert!(session.seed_if_empty(sample_requests()).await.expect("seed"));
    assert!(!session.seed_if_empty(sample_requests()).await.expect("seed"));

    let reopened = IntakeSession::open(Arc::new(JsonFileStore::new(&path))).await;
    let ids: Vec<_> = reopened.registry().requests().iter().map(|r| r.id.0).collect();
    assert_eq!(ids, vec![1, 2, 3, 4]);
}

#[tokio::test]
async fn export_applies_the_filter() {
    let session = IntakeSession::open(Arc::new(MemoryStore::with_requests(sample_requests()))).await;
    let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

    let open = RequestFilter {
        status: Criterion::Only(RequestStatus::Open),
        ..RequestFilter::default()
    };
    let export = session
        .export(&open, "campus", at)
        .expect("export")
        .expect("rows");
    assert_eq!(export.row_count, 2);
    assert_eq!(export.file_name, "campus-20250102-030405.csv");

    let none = RequestFilter {
        search: "no such words".into(),
        ..RequestFilter::default()
    };
    assert!(session.export(&none, "campus", at).expect("export").is_none());
}

#[tokio::test]
async fn retry_after_failed_save_writes_the_change() {
    let store = Arc::new(FlakyStore::new(false, 1));
    let mut session = IntakeSession::open(store.clone()).await;

    let err = session.cancel(RequestId(1)).await.expect_err("first save fails");
    assert!(matches!(err, SessionError::Storage(_)));
    assert!(session.has_unsaved_changes());
    assert_eq!(store.saved_status(RequestId(1)), None);

    let retry = session.cancel(RequestId(1)).await.expect("retry saves");
    assert_eq!(retry, CancelOutcome::AlreadyCancelled);
    assert!(!session.has_unsaved_changes());
    assert_eq!(
        store.saved_status(RequestId(1)),
        Some(RequestStatus::Cancelled)
    );

    session.cancel(RequestId(1)).await.expect("nothing to do");
    assert_eq!(store.saves.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn unchanged_status_flushes_a_pending_save() {
    let store = Arc::new(FlakyStore::new(false, 1));
    let mut session = IntakeSession::open(store.clone()).await;

    session
        .set_status(RequestId(3), RequestStatus::Resolved)
        .await
        .expect_err("first save fails");
    let change = session
        .set_status(RequestId(3), RequestStatus::Resolved)
        .await
        .expect("retry saves");
    assert!(!change.changed());
    assert_eq!(
        store.saved_status(RequestId(3)),
        Some(RequestStatus::Resolved)
    );
}

#[tokio::test]
async fn unreadable_store_is_never_seeded_over() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("requests.json");
    let original = r#"[{"id": 7, "campus": "Nowhere"}]"#;
    std::fs::write(&path, original).expect("write");

    let mut session = IntakeSession::open(Arc::new(JsonFileStore::new(&path))).await;
    assert!(session.load_failed());
    assert!(session.registry().is_empty());

    assert!(!session.seed_if_empty(sample_requests()).await.expect("seed"));
    assert!(session.registry().is_empty());
    assert_eq!(std::fs::read_to_string(&path).expect("read"), original);
}
