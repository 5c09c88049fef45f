use std::{fmt, str::FromStr};

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::catalog::{Campus, CatalogError, MainCategoryId};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(RequestId);

pub const ANONYMOUS_NAME: &str = "Anonymous";
pub const JUST_NOW: &str = "Just now";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum RequestStatus {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Resolved,
    Cancelled,
}

impl RequestStatus {
    /// Display order used by dashboards and status pickers.
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::Open,
        RequestStatus::InProgress,
        RequestStatus::Resolved,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            RequestStatus::Open => "Open",
            RequestStatus::InProgress => "In Progress",
            RequestStatus::Resolved => "Resolved",
            RequestStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(self) -> bool {
        self == RequestStatus::Cancelled
    }
}

// Goes through `FromStr` so data files holding the older spellings still load.
impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestStatus {
    type Err = CatalogError;

    // Accepts the display spelling plus the SCREAMING_SNAKE form older data files used.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '_' | '-'))
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(RequestStatus::Open),
            "inprogress" => Ok(RequestStatus::InProgress),
            "resolved" => Ok(RequestStatus::Resolved),
            "cancelled" | "canceled" => Ok(RequestStatus::Cancelled),
            _ => Err(CatalogError::UnknownStatus(s.to_string())),
        }
    }
}

/// The campus / category / subcategory triple that routes a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub campus: Campus,
    pub main_category: MainCategoryId,
    pub sub_category: String,
}

impl Classification {
    /// Builds a triple whose subcategory is known to belong to `main_category`.
    pub fn new(
        campus: Campus,
        main_category: MainCategoryId,
        sub_category: &str,
    ) -> Result<Self, CatalogError> {
        let sub_category = main_category.subcategory(sub_category)?;
        Ok(Self {
            campus,
            main_category,
            sub_category: sub_category.to_string(),
        })
    }

    pub fn is_consistent(&self) -> bool {
        self.main_category.has_subcategory(&self.sub_category)
    }
}

/// Form fields as typed by the user, before validation and normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewRequestDraft {
    pub name: String,
    pub email: String,
    pub is_anonymous: bool,
    pub location: String,
    pub description: String,
    pub is_priority: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Request {
    pub id: RequestId,
    pub campus: Campus,
    pub main_category: MainCategoryId,
    pub sub_category: String,
    pub name: String,
    pub is_anonymous: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub description: String,
    pub is_priority: bool,
    pub submitted_at: String,
    pub status: RequestStatus,
}

impl Request {
    pub fn classification(&self) -> Classification {
        Classification {
            campus: self.campus,
            main_category: self.main_category,
            sub_category: self.sub_category.clone(),
        }
    }

    /// Name to show on dashboards; anonymous submitters are never named.
    pub fn display_name(&self) -> &str {
        if self.is_anonymous {
            ANONYMOUS_NAME
        } else {
            &self.name
        }
    }
}
