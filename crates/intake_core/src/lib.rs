//! Request intake: the submission workflow, the request registry and the
//! delimited export, wired together by [`IntakeSession`].

pub mod export;
pub mod registry;
pub mod seed;
pub mod session;
pub mod validation;
pub mod workflow;

pub use export::{CsvExport, ExportError, ExportRow};
pub use registry::{
    CancelOutcome, Criterion, Registry, RegistryError, RequestFilter, StatusChange,
};
pub use session::{IntakeSession, SessionError};
pub use validation::{ValidatedSubmission, ValidationErrors};
pub use workflow::{Step, SubmitError, WorkflowController, WorkflowError};
