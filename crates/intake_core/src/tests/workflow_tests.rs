use super::*;
use crate::validation::{DESCRIPTION_REQUIRED, EMAIL_INVALID};
use shared::domain::{RequestId, RequestStatus};

fn at_form(campus: Campus, category: MainCategoryId, sub: &str) -> WorkflowController {
    let mut controller = WorkflowController::new();
    controller.select_campus(campus).expect("campus");
    controller.select_main_category(category).expect("category");
    controller.select_subcategory(sub).expect("subcategory");
    controller
}

fn anonymous(description: &str) -> NewRequestDraft {
    NewRequestDraft {
        is_anonymous: true,
        description: description.into(),
        ..NewRequestDraft::default()
    }
}

#[test]
fn starts_at_campus_selection_with_nothing_chosen() {
    let controller = WorkflowController::new();
    assert_eq!(controller.step(), Step::SelectCampus);
    assert_eq!(controller.selected_campus(), None);
    assert_eq!(controller.classification(), None);
    assert_eq!(controller.message(), None);
}

#[test]
fn forward_path_reaches_the_form() {
    let controller = at_form(Campus::York, MainCategoryId::TechAccess, "Computer Labs");
    assert_eq!(controller.step(), Step::FillForm);
    let triple = controller.classification().expect("triple");
    assert_eq!(triple.campus, Campus::York);
    assert_eq!(triple.main_category, MainCategoryId::TechAccess);
    assert_eq!(triple.sub_category, "Computer Labs");
}

#[test]
fn every_valid_triple_submits_and_echoes_its_classification() {
    let mut registry = Registry::new();
    for (n, campus) in Campus::ALL.iter().copied().enumerate() {
        let category = MainCategoryId::ALL[n % MainCategoryId::ALL.len()];
        for sub in category.subcategories() {
            let mut controller = at_form(campus, category, sub);
            let request = controller
                .submit(&mut registry, &anonymous("Something needs attention"))
                .expect("submit");
            assert_eq!(request.campus, campus);
            assert_eq!(request.main_category, category);
            assert_eq!(request.sub_category, *sub);
            assert_eq!(request.status, RequestStatus::Open);
            assert_eq!(request.submitted_at, "Just now");
        }
    }
}

#[test]
fn selecting_a_subcategory_from_another_category_is_rejected() {
    let mut controller = WorkflowController::new();
    controller.select_campus(Campus::Hunter).expect("campus");
    controller
        .select_main_category(MainCategoryId::SafetyConduct)
        .expect("category");
    let err = controller
        .select_subcategory("Plumbing")
        .expect_err("foreign subcategory");
    assert!(matches!(err, WorkflowError::UnknownSubcategory { .. }));
    assert_eq!(controller.step(), Step::SelectSub);
    assert_eq!(controller.selected_subcategory(), None);
}

#[test]
fn events_out_of_order_leave_state_untouched() {
    let mut controller = WorkflowController::new();
    let err = controller
        .select_main_category(MainCategoryId::CampusLife)
        .expect_err("no campus yet");
    assert!(matches!(err, WorkflowError::InvalidTransition { step: Step::SelectCampus, .. }));
    assert!(controller.go_back_to_main().is_err());
    assert!(controller.go_back_to_sub().is_err());
    assert_eq!(controller.step(), Step::SelectCampus);
    assert_eq!(controller.selected_main_category(), None);

    let mut registry = Registry::new();
    let err = controller
        .submit(&mut registry, &anonymous("x"))
        .expect_err("not on form");
    assert!(matches!(err, SubmitError::Workflow(_)));
    assert!(registry.is_empty());
}

#[test]
fn selecting_a_campus_clears_later_choices() {
    let mut controller = at_form(Campus::Hunter, MainCategoryId::CampusLife, "Housing / Dorms");
    controller.go_home();
    controller.select_campus(Campus::Lehman).expect("campus");
    assert_eq!(controller.step(), Step::SelectMain);
    assert_eq!(controller.selected_campus(), Some(Campus::Lehman));
    assert_eq!(controller.selected_main_category(), None);
    assert_eq!(controller.selected_subcategory(), None);
}

#[test]
fn back_navigation_keeps_earlier_selections() {
    let mut controller = at_form(Campus::Queens, MainCategoryId::CampusLife, "Dining Services");
    controller.go_back_to_sub().expect("back to sub");
    assert_eq!(controller.step(), Step::SelectSub);
    assert_eq!(controller.selected_campus(), Some(Campus::Queens));
    assert_eq!(controller.selected_main_category(), Some(MainCategoryId::CampusLife));

    controller.go_back_to_main().expect("back to main");
    assert_eq!(controller.step(), Step::SelectMain);
    assert_eq!(controller.selected_campus(), Some(Campus::Queens));
}

#[test]
fn choosing_a_subcategory_resets_the_form() {
    let mut controller = at_form(Campus::Queens, MainCategoryId::CampusLife, "Dining Services");
    controller.form_mut().description = "half typed".into();
    controller.go_back_to_sub().expect("back");
    controller
        .select_subcategory("Housing / Dorms")
        .expect("subcategory");
    assert_eq!(controller.form(), &NewRequestDraft::default());
}

#[test]
fn history_preserves_selection_and_home_clears_it() {
    let mut controller = at_form(Campus::Baruch, MainCategoryId::TechAccess, "WiFi / Network");
    controller.open_history();
    assert_eq!(controller.step(), Step::History);
    assert_eq!(
        controller.classification().map(|c| c.sub_category),
        Some("WiFi / Network".to_string())
    );

    controller.go_home();
    assert_eq!(controller.step(), Step::SelectCampus);
    assert_eq!(controller.classification(), None);
    assert_eq!(controller.message(), None);
}

#[test]
fn successful_submit_keeps_campus_and_returns_to_categories() {
    let mut registry = Registry::new();
    let mut controller = at_form(Campus::Hunter, MainCategoryId::CampusFacilities, "Plumbing");
    let request = controller
        .submit(&mut registry, &anonymous("Leak"))
        .expect("submit");

    assert_eq!(registry.requests()[0], request);
    assert_eq!(controller.step(), Step::SelectMain);
    assert_eq!(controller.selected_campus(), Some(Campus::Hunter));
    assert_eq!(controller.selected_main_category(), None);
    assert_eq!(controller.selected_subcategory(), None);
    assert_eq!(controller.message(), Some(SUBMITTED_MESSAGE));

    controller
        .select_main_category(MainCategoryId::TechAccess)
        .expect("category");
    assert_eq!(controller.message(), None);
}

#[test]
fn invalid_submit_stays_on_form_and_leaves_registry_alone() {
    let mut registry = Registry::new();
    let mut controller = at_form(Campus::Hunter, MainCategoryId::CampusFacilities, "Plumbing");

    let err = controller
        .submit(&mut registry, &anonymous("   "))
        .expect_err("blank description");
    let messages = err.validation_messages().expect("validation");
    assert!(messages.iter().any(|m| m == DESCRIPTION_REQUIRED));
    assert_eq!(controller.step(), Step::FillForm);
    assert_eq!(controller.message(), None);
    assert!(registry.is_empty());

    let bad_email = NewRequestDraft {
        name: "Ana".into(),
        email: "not-an-email".into(),
        description: "Leak".into(),
        ..NewRequestDraft::default()
    };
    let err = controller
        .submit(&mut registry, &bad_email)
        .expect_err("bad email");
    assert_eq!(err.validation_messages(), Some(&[EMAIL_INVALID.to_string()][..]));
}

#[test]
fn submit_form_uses_the_controller_fields() {
    let mut registry = Registry::new();
    let mut controller = at_form(Campus::Hostos, MainCategoryId::Suggestions, "Dining / Food Options");
    {
        let form = controller.form_mut();
        form.name = "Sam".into();
        form.email = "sam@hostos.cuny.edu".into();
        form.description = "More vegetarian options".into();
        form.is_priority = true;
    }
    let request = controller.submit_form(&mut registry).expect("submit");
    assert_eq!(request.name, "Sam");
    assert!(request.is_priority);
    assert_eq!(controller.form(), &NewRequestDraft::default());
}

#[test]
fn ids_keep_growing_after_history_and_restart() {
    let mut registry = Registry::from_requests(crate::seed::sample_requests());
    let mut controller = at_form(Campus::Hunter, MainCategoryId::CampusFacilities, "Plumbing");
    controller.open_history();
    controller.go_home();

    controller.select_campus(Campus::Hunter).expect("campus");
    controller
        .select_main_category(MainCategoryId::CampusFacilities)
        .expect("category");
    controller.select_subcategory("Restrooms").expect("sub");
    let first = controller
        .submit(&mut registry, &anonymous("No soap"))
        .expect("submit");
    assert_eq!(first.id, RequestId(5));

    controller
        .select_main_category(MainCategoryId::CampusFacilities)
        .expect("category");
    controller.select_subcategory("Restrooms").expect("sub");
    let second = controller
        .submit(&mut registry, &anonymous("Still no soap"))
        .expect("submit");
    assert!(second.id > first.id);
}
