use shared::{
    catalog::{Campus, MainCategoryId},
    domain::{Request, RequestId, RequestStatus, ANONYMOUS_NAME},
};

/// Starter records for a fresh data file, newest first (id 1 is the most recent).
pub fn sample_requests() -> Vec<Request> {
    [
        (
            1,
            Campus::Hunter,
            MainCategoryId::CampusFacilities,
            "Plumbing",
            "Water leak in North Building – 5th floor hallway",
            Some("North Building, 5th floor"),
            "2 hours ago",
            RequestStatus::Open,
        ),
        (
            2,
            Campus::Ccny,
            MainCategoryId::CampusFacilities,
            "Accessibility / Elevators",
            "Broken elevator in Library Building",
            Some("Library Building"),
            "Resolved yesterday",
            RequestStatus::Resolved,
        ),
        (
            3,
            Campus::Baruch,
            MainCategoryId::TechAccess,
            "WiFi / Network",
            "Slow WiFi in student lounge",
            None,
            "Submitted 1 day ago",
            RequestStatus::InProgress,
        ),
        (
            4,
            Campus::Brooklyn,
            MainCategoryId::SafetyConduct,
            "Security / Public Safety",
            "Outdoor lighting not working near main entrance",
            Some("Main entrance"),
            "Submitted 3 days ago",
            RequestStatus::Open,
        ),
    ]
    .into_iter()
    .map(
        |(id, campus, main_category, sub_category, description, location, submitted_at, status)| {
            Request {
                id: RequestId(id),
                campus,
                main_category,
                sub_category: sub_category.to_string(),
                name: ANONYMOUS_NAME.to_string(),
                is_anonymous: true,
                email: None,
                location: location.map(str::to_string),
                description: description.to_string(),
                is_priority: false,
                submitted_at: submitted_at.to_string(),
                status,
            }
        },
    )
    .collect()
}
