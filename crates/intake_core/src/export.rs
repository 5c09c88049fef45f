//! Delimited export of request lists.
//!
//! Layout: a header row, then one row per request, every field (header and
//! ID included) wrapped in double quotes, embedded quotes doubled, rows
//! terminated by `\n`.

use chrono::{DateTime, Utc};
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use serde::{Deserialize, Serialize};
use shared::{
    catalog::{Campus, MainCategoryId},
    domain::{Request, RequestStatus},
};
use thiserror::Error;

pub const CSV_MIME_TYPE: &str = "text/csv;charset=utf-8";
pub const DEFAULT_EXPORT_PREFIX: &str = "cuny-311-requests";
pub const NOTHING_TO_EXPORT: &str = "No requests to export.";

pub const HEADERS: [&str; 11] = [
    "ID",
    "Campus",
    "Main Category",
    "Subcategory",
    "Name",
    "Email",
    "Location",
    "Description",
    "Priority",
    "Submitted At",
    "Status",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to encode CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV output: {0}")]
    Flush(String),
    #[error("CSV output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    Yes,
    No,
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

/// One exported line, in column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Campus")]
    pub campus: Campus,
    #[serde(rename = "Main Category")]
    pub main_category: MainCategoryId,
    #[serde(rename = "Subcategory")]
    pub subcategory: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Location")]
    pub location: Option<String>,
    #[serde(rename = "Description")]
    pub description: String,
    #[serde(rename = "Priority")]
    pub priority: YesNo,
    #[serde(rename = "Submitted At")]
    pub submitted_at: String,
    #[serde(rename = "Status")]
    pub status: RequestStatus,
}

impl From<&Request> for ExportRow {
    fn from(request: &Request) -> Self {
        Self {
            id: request.id.0,
            campus: request.campus,
            main_category: request.main_category,
            subcategory: request.sub_category.clone(),
            name: request.name.clone(),
            email: request.email.clone(),
            location: request.location.clone(),
            description: request.description.clone(),
            priority: request.is_priority.into(),
            submitted_at: request.submitted_at.clone(),
            status: request.status,
        }
    }
}

pub fn export_delimited<'a, I>(requests: I) -> Result<String, ExportError>
where
    I: IntoIterator<Item = &'a Request>,
{
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(HEADERS)?;
    for request in requests {
        writer.serialize(ExportRow::from(request))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Flush(error.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Reads text produced by [`export_delimited`] back into rows.
pub fn parse_delimited(text: &str) -> Result<Vec<ExportRow>, ExportError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(text.as_bytes());
    reader
        .deserialize()
        .collect::<Result<Vec<ExportRow>, _>>()
        .map_err(ExportError::from)
}

pub fn export_file_name(prefix: &str, at: DateTime<Utc>) -> String {
    format!("{prefix}-{}.csv", at.format("%Y%m%d-%H%M%S"))
}

pub fn exported_message(count: usize) -> String {
    format!("Exported {count} request(s) as CSV.")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExport {
    pub file_name: String,
    pub content: String,
    pub row_count: usize,
}

impl CsvExport {
    pub const MIME_TYPE: &'static str = CSV_MIME_TYPE;

    /// `None` when there is nothing to export; callers show [`NOTHING_TO_EXPORT`].
    pub fn build(
        requests: &[&Request],
        prefix: &str,
        at: DateTime<Utc>,
    ) -> Result<Option<Self>, ExportError> {
        if requests.is_empty() {
            return Ok(None);
        }
        Ok(Some(Self {
            file_name: export_file_name(prefix, at),
            content: export_delimited(requests.iter().copied())?,
            row_count: requests.len(),
        }))
    }

    pub fn summary(&self) -> String {
        exported_message(self.row_count)
    }
}

#[cfg(test)]
#[path = "tests/export_tests.rs"]
mod tests;
