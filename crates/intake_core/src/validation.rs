//! Form checks applied before a draft may become a request.

use std::sync::LazyLock;

use regex::Regex;
use shared::domain::{
    Classification, NewRequestDraft, Request, RequestId, RequestStatus, ANONYMOUS_NAME, JUST_NOW,
};
use thiserror::Error;

pub const DESCRIPTION_REQUIRED: &str = "Please provide a description.";
pub const NAME_REQUIRED: &str = "Please share your name or mark the report as anonymous.";
pub const EMAIL_REQUIRED: &str = "Email is required for non-anonymous submissions.";
pub const EMAIL_INVALID: &str = "Please enter a valid email address.";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Every problem found in one submission, in form order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", .0.join(" "))]
pub struct ValidationErrors(Vec<String>);

impl ValidationErrors {
    pub fn messages(&self) -> &[String] {
        &self.0
    }

    pub fn into_messages(self) -> Vec<String> {
        self.0
    }

    pub fn contains(&self, message: &str) -> bool {
        self.0.iter().any(|m| m == message)
    }
}

/// A draft that passed validation, already trimmed and normalized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedSubmission {
    pub classification: Classification,
    pub name: String,
    pub is_anonymous: bool,
    pub email: Option<String>,
    pub location: Option<String>,
    pub description: String,
    pub is_priority: bool,
}

impl ValidatedSubmission {
    pub fn into_request(self, id: RequestId) -> Request {
        Request {
            id,
            campus: self.classification.campus,
            main_category: self.classification.main_category,
            sub_category: self.classification.sub_category,
            name: self.name,
            is_anonymous: self.is_anonymous,
            email: self.email,
            location: self.location,
            description: self.description,
            is_priority: self.is_priority,
            submitted_at: JUST_NOW.to_string(),
            status: RequestStatus::Open,
        }
    }
}

pub fn validate_submission(
    classification: &Classification,
    draft: &NewRequestDraft,
) -> Result<ValidatedSubmission, ValidationErrors> {
    let mut errors = Vec::new();

    if !classification.is_consistent() {
        errors.push(format!(
            "Please choose a subcategory listed under {}.",
            classification.main_category.title()
        ));
    }

    let description = draft.description.trim();
    let name = draft.name.trim();
    let email = draft.email.trim();

    if description.is_empty() {
        errors.push(DESCRIPTION_REQUIRED.to_string());
    }
    if !draft.is_anonymous {
        if name.is_empty() {
            errors.push(NAME_REQUIRED.to_string());
        }
        if email.is_empty() {
            errors.push(EMAIL_REQUIRED.to_string());
        } else if !is_valid_email(email) {
            errors.push(EMAIL_INVALID.to_string());
        }
    }

    if !errors.is_empty() {
        return Err(ValidationErrors(errors));
    }

    let location = draft.location.trim();
    Ok(ValidatedSubmission {
        classification: classification.clone(),
        name: if draft.is_anonymous {
            ANONYMOUS_NAME.to_string()
        } else {
            name.to_string()
        },
        is_anonymous: draft.is_anonymous,
        email: (!draft.is_anonymous).then(|| email.to_string()),
        location: (!location.is_empty()).then(|| location.to_string()),
        description: description.to_string(),
        is_priority: draft.is_priority,
    })
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
