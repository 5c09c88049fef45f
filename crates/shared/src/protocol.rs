use serde::{Deserialize, Serialize};

use crate::{
    catalog::{Campus, MainCategoryId},
    domain::{Classification, NewRequestDraft, RequestStatus},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: MainCategoryId,
    pub title: String,
    pub description: String,
    pub subcategories: Vec<String>,
}

impl From<MainCategoryId> for CategorySummary {
    fn from(id: MainCategoryId) -> Self {
        Self {
            id,
            title: id.title().to_string(),
            description: id.description().to_string(),
            subcategories: id.subcategories().iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResponse {
    pub campuses: Vec<Campus>,
    pub categories: Vec<CategorySummary>,
    pub statuses: Vec<RequestStatus>,
}

impl CatalogResponse {
    pub fn current() -> Self {
        Self {
            campuses: Campus::ALL.to_vec(),
            categories: MainCategoryId::ALL.into_iter().map(Into::into).collect(),
            statuses: RequestStatus::ALL.to_vec(),
        }
    }
}

/// Dashboard filter as it arrives over the wire; `all` or absent means any.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestQuery {
    pub campus: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub q: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequestBody {
    #[serde(flatten)]
    pub classification: Classification,
    #[serde(flatten)]
    pub draft: NewRequestDraft,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusUpdateBody {
    pub status: RequestStatus,
}
