//! Step-by-step submission flow: campus, category, subcategory, form.
//!
//! The controller owns only the in-progress selection and form. Rejected
//! events return an error and leave every field exactly as it was.

use std::fmt;

use shared::{
    catalog::{Campus, MainCategoryId},
    domain::{Classification, NewRequestDraft, Request},
};
use thiserror::Error;

use crate::{
    registry::{Registry, RegistryError},
    validation::{validate_submission, ValidationErrors},
};

pub const SUBMITTED_MESSAGE: &str = "Your request has been submitted and added to history.";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Step {
    #[default]
    SelectCampus,
    SelectMain,
    SelectSub,
    FillForm,
    History,
}

impl Step {
    pub fn as_str(self) -> &'static str {
        match self {
            Step::SelectCampus => "selectCampus",
            Step::SelectMain => "selectMain",
            Step::SelectSub => "selectSub",
            Step::FillForm => "fillForm",
            Step::History => "history",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("'{event}' is not available from {step}")]
    InvalidTransition { step: Step, event: &'static str },
    #[error("choose a campus first")]
    CampusNotSelected,
    #[error("choose a category first")]
    CategoryNotSelected,
    #[error("'{subcategory}' is not listed under {category}")]
    UnknownSubcategory {
        category: MainCategoryId,
        subcategory: String,
    },
}

#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Workflow(#[from] WorkflowError),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl SubmitError {
    /// Field messages for the form, when the failure was a validation one.
    pub fn validation_messages(&self) -> Option<&[String]> {
        match self {
            SubmitError::Validation(errors) => Some(errors.messages()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowController {
    step: Step,
    selected_campus: Option<Campus>,
    selected_main: Option<MainCategoryId>,
    selected_sub: Option<&'static str>,
    message: Option<String>,
    form: NewRequestDraft,
}

impl WorkflowController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn selected_campus(&self) -> Option<Campus> {
        self.selected_campus
    }

    pub fn selected_main_category(&self) -> Option<MainCategoryId> {
        self.selected_main
    }

    pub fn selected_subcategory(&self) -> Option<&'static str> {
        self.selected_sub
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn form(&self) -> &NewRequestDraft {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut NewRequestDraft {
        &mut self.form
    }

    /// The full triple, once all three choices are made.
    pub fn classification(&self) -> Option<Classification> {
        Some(Classification {
            campus: self.selected_campus?,
            main_category: self.selected_main?,
            sub_category: self.selected_sub?.to_string(),
        })
    }

    pub fn select_campus(&mut self, campus: Campus) -> Result<(), WorkflowError> {
        self.expect_step(&[Step::SelectCampus], "selectCampus")?;
        self.selected_campus = Some(campus);
        self.selected_main = None;
        self.selected_sub = None;
        self.message = None;
        self.step = Step::SelectMain;
        Ok(())
    }

    pub fn select_main_category(&mut self, id: MainCategoryId) -> Result<(), WorkflowError> {
        self.expect_step(&[Step::SelectMain], "selectMainCategory")?;
        if self.selected_campus.is_none() {
            return Err(WorkflowError::CampusNotSelected);
        }
        self.selected_main = Some(id);
        self.selected_sub = None;
        self.message = None;
        self.step = Step::SelectSub;
        Ok(())
    }

    pub fn select_subcategory(&mut self, subcategory: &str) -> Result<(), WorkflowError> {
        self.expect_step(&[Step::SelectSub], "selectSubcategory")?;
        let category = self.selected_main.ok_or(WorkflowError::CategoryNotSelected)?;
        let canonical = category
            .subcategory(subcategory)
            .map_err(|_| WorkflowError::UnknownSubcategory {
                category,
                subcategory: subcategory.to_string(),
            })?;
        self.selected_sub = Some(canonical);
        self.form = NewRequestDraft::default();
        self.message = None;
        self.step = Step::FillForm;
        Ok(())
    }

    pub fn go_back_to_main(&mut self) -> Result<(), WorkflowError> {
        self.expect_step(&[Step::SelectSub, Step::FillForm], "goBackToMain")?;
        self.step = Step::SelectMain;
        Ok(())
    }

    pub fn go_back_to_sub(&mut self) -> Result<(), WorkflowError> {
        self.expect_step(&[Step::FillForm], "goBackToSub")?;
        self.step = Step::SelectSub;
        Ok(())
    }

    pub fn go_home(&mut self) {
        self.step = Step::SelectCampus;
        self.selected_campus = None;
        self.selected_main = None;
        self.selected_sub = None;
        self.message = None;
    }

    /// Entering history never discards the in-progress selection.
    pub fn open_history(&mut self) {
        self.step = Step::History;
        self.message = None;
    }

    /// Validates `draft` against the current selection and, on success,
    /// records it in `registry` as a new open request.
    pub fn submit(
        &mut self,
        registry: &mut Registry,
        draft: &NewRequestDraft,
    ) -> Result<Request, SubmitError> {
        self.expect_step(&[Step::FillForm], "submit")?;
        let classification = self
            .classification()
            .ok_or(WorkflowError::CategoryNotSelected)?;

        let validated = match validate_submission(&classification, draft) {
            Ok(validated) => validated,
            Err(errors) => {
                self.message = None;
                return Err(errors.into());
            }
        };

        let request = validated.into_request(registry.next_id());
        registry.insert(request.clone())?;

        self.message = Some(SUBMITTED_MESSAGE.to_string());
        self.step = Step::SelectMain;
        self.selected_main = None;
        self.selected_sub = None;
        self.form = NewRequestDraft::default();
        Ok(request)
    }

    /// Submits whatever has been typed into the controller's own form.
    pub fn submit_form(&mut self, registry: &mut Registry) -> Result<Request, SubmitError> {
        let draft = self.form.clone();
        self.submit(registry, &draft)
    }

    fn expect_step(&self, allowed: &[Step], event: &'static str) -> Result<(), WorkflowError> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(WorkflowError::InvalidTransition {
                step: self.step,
                event,
            })
        }
    }
}

#[cfg(test)]
#[path = "tests/workflow_tests.rs"]
mod tests;
