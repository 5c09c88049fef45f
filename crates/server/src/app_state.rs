use intake_core::IntakeSession;
use tokio::sync::Mutex;

/// One session for the whole process; the mutex queues requests in arrival order.
pub(crate) struct AppState {
    pub(crate) session: Mutex<IntakeSession>,
    pub(crate) export_prefix: String,
}

impl AppState {
    pub(crate) fn new(session: IntakeSession, export_prefix: impl Into<String>) -> Self {
        Self {
            session: Mutex::new(session),
            export_prefix: export_prefix.into(),
        }
    }
}
