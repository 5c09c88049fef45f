//! Ordered record of submitted requests, newest first.

use std::{collections::HashSet, str::FromStr};

use shared::{
    catalog::{Campus, CatalogError, MainCategoryId},
    domain::{Request, RequestId, RequestStatus},
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("request {0} not found")]
    NotFound(RequestId),
    #[error("request {0} already exists")]
    DuplicateId(RequestId),
    #[error("request {0} is cancelled and cannot change status")]
    CancelledIsTerminal(RequestId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    pub id: RequestId,
    pub previous: RequestStatus,
    pub current: RequestStatus,
}

impl StatusChange {
    pub fn changed(&self) -> bool {
        self.previous != self.current
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelOutcome {
    Cancelled { previous: RequestStatus },
    AlreadyCancelled,
}

/// One filter dimension: either anything matches or exactly one value does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Criterion<T> {
    #[default]
    All,
    Only(T),
}

impl<T: PartialEq> Criterion<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Criterion::All => true,
            Criterion::Only(wanted) => wanted == value,
        }
    }
}

impl<T> Criterion<T>
where
    T: FromStr<Err = CatalogError>,
{
    /// Absent, blank or `all` (any case) selects every value.
    pub fn parse(raw: Option<&str>) -> Result<Self, CatalogError> {
        match raw.map(str::trim) {
            None => Ok(Criterion::All),
            Some(s) if s.is_empty() || s.eq_ignore_ascii_case("all") => Ok(Criterion::All),
            Some(s) => s.parse().map(Criterion::Only),
        }
    }
}

/// Dashboard criteria. Every dimension is always present; they are ANDed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub campus: Criterion<Campus>,
    pub main_category: Criterion<MainCategoryId>,
    pub status: Criterion<RequestStatus>,
    /// Blank means no text restriction.
    pub search: String,
}

impl RequestFilter {
    pub fn matches(&self, request: &Request) -> bool {
        self.campus.matches(&request.campus)
            && self.main_category.matches(&request.main_category)
            && self.status.matches(&request.status)
            && self.matches_search(request)
    }

    fn matches_search(&self, request: &Request) -> bool {
        let term = self.search.trim();
        if term.is_empty() {
            return true;
        }

        // Newline-joined so a term cannot straddle two fields.
        let haystack = [
            request.description.as_str(),
            request.sub_category.as_str(),
            request.name.as_str(),
            request.location.as_deref().unwrap_or_default(),
        ]
        .join("\n")
        .to_lowercase();
        haystack.contains(&term.to_lowercase())
    }
}

#[derive(Debug, Clone, Default)]
pub struct Registry {
    requests: Vec<Request>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopts a previously stored sequence as-is; its order is already newest first.
    /// Records that break registry invariants are kept but logged.
    pub fn from_requests(requests: Vec<Request>) -> Self {
        for issue in integrity_issues(&requests) {
            warn!(%issue, "stored request needs attention");
        }
        Self { requests }
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn get(&self, id: RequestId) -> Option<&Request> {
        self.requests.iter().find(|r| r.id == id)
    }

    pub fn next_id(&self) -> RequestId {
        let max = self.requests.iter().map(|r| r.id.0).max().unwrap_or(0);
        RequestId(max + 1)
    }

    pub fn insert(&mut self, request: Request) -> Result<(), RegistryError> {
        if self.get(request.id).is_some() {
            return Err(RegistryError::DuplicateId(request.id));
        }
        self.requests.insert(0, request);
        Ok(())
    }

    pub fn set_status(
        &mut self,
        id: RequestId,
        status: RequestStatus,
    ) -> Result<StatusChange, RegistryError> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let previous = request.status;
        if previous.is_terminal() && status != previous {
            return Err(RegistryError::CancelledIsTerminal(id));
        }
        request.status = status;
        Ok(StatusChange {
            id,
            previous,
            current: status,
        })
    }

    pub fn cancel(&mut self, id: RequestId) -> Result<CancelOutcome, RegistryError> {
        let change = self.set_status(id, RequestStatus::Cancelled)?;
        if change.changed() {
            Ok(CancelOutcome::Cancelled {
                previous: change.previous,
            })
        } else {
            Ok(CancelOutcome::AlreadyCancelled)
        }
    }

    pub fn filter(&self, filter: &RequestFilter) -> Vec<&Request> {
        self.requests.iter().filter(|r| filter.matches(r)).collect()
    }
}

/// Duplicate ids and subcategories filed under the wrong category.
fn integrity_issues(requests: &[Request]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();
    for request in requests {
        if !seen.insert(request.id) {
            issues.push(format!(
                "request {} appears more than once; status changes reach only the first",
                request.id
            ));
        }
        if !request.classification().is_consistent() {
            issues.push(format!(
                "request {} files '{}' under {}, which does not list it",
                request.id,
                request.sub_category,
                request.main_category.title()
            ));
        }
    }
    issues
}

#[cfg(test)]
#[path = "tests/registry_tests.rs"]
mod tests;
