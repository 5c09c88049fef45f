use super::*;
use intake_core::{validation::validate_submission, ValidationErrors};
use shared::{
    catalog::{Campus, MainCategoryId},
    domain::{Classification, NewRequestDraft, RequestStatus},
};

#[test]
fn query_with_all_and_blanks_matches_everything() {
    let query = RequestQuery {
        campus: Some("all".into()),
        category: Some(" ".into()),
        status: None,
        q: None,
    };
    assert_eq!(
        filter_from_query(&query).expect("filter"),
        RequestFilter::default()
    );
}

#[test]
fn query_values_accept_names_and_ids() {
    let query = RequestQuery {
        campus: Some("baruch college".into()),
        category: Some("techAccess".into()),
        status: Some("in progress".into()),
        q: Some("wifi".into()),
    };
    let filter = filter_from_query(&query).expect("filter");
    assert_eq!(filter.campus, Criterion::Only(Campus::Baruch));
    assert_eq!(filter.main_category, Criterion::Only(MainCategoryId::TechAccess));
    assert_eq!(filter.status, Criterion::Only(RequestStatus::InProgress));
    assert_eq!(filter.search, "wifi");
}

#[test]
fn unknown_status_in_query_is_rejected() {
    let query = RequestQuery {
        status: Some("Pending".into()),
        ..RequestQuery::default()
    };
    let (status, Json(error)) = catalog_error(filter_from_query(&query).expect_err("bad status"));
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.code, ErrorCode::Validation);
}

#[test]
fn registry_failures_map_to_not_found_and_conflict() {
    let (status, Json(error)) = session_error(RegistryError::NotFound(RequestId(7)).into());
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error.code, ErrorCode::NotFound);

    let (status, Json(error)) =
        session_error(RegistryError::CancelledIsTerminal(RequestId(7)).into());
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error.code, ErrorCode::Conflict);
}

#[test]
fn storage_failure_is_internal() {
    let (status, Json(error)) =
        session_error(SessionError::Storage(anyhow::anyhow!("disk full")));
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(error.code, ErrorCode::Internal);
    assert!(error.message.contains("disk full"));
}

#[test]
fn validation_messages_travel_in_details() {
    let classification = Classification::new(
        Campus::York,
        MainCategoryId::Suggestions,
        "Campus Improvement Idea",
    )
    .expect("classification");
    let errors: ValidationErrors = validate_submission(&classification, &NewRequestDraft::default())
        .expect_err("empty draft should fail");
    let (status, Json(error)) = session_error(SubmitError::Validation(errors).into());
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error.details.len(), 3);
}
