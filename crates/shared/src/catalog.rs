//! Fixed reference data: member campuses and the two-level category tree.
//!
//! Everything here is closed at build time. Text coming from a form, a query
//! string or a CLI flag is parsed with [`FromStr`] and rejected when it does
//! not name a known value.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("unknown campus: {0}")]
    UnknownCampus(String),
    #[error("unknown category: {0}")]
    UnknownCategory(String),
    #[error("unknown status: {0}")]
    UnknownStatus(String),
    #[error("subcategory '{subcategory}' does not belong to {category}")]
    SubcategoryMismatch {
        category: MainCategoryId,
        subcategory: String,
    },
}

macro_rules! campuses {
    ($($variant:ident => $name:literal,)+) => {
        /// A member institution eligible to receive requests.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum Campus {
            $(
                #[serde(rename = $name)]
                $variant,
            )+
        }

        impl Campus {
            pub const ALL: &'static [Campus] = &[$(Campus::$variant,)+];

            pub fn name(self) -> &'static str {
                match self {
                    $(Campus::$variant => $name,)+
                }
            }
        }
    };
}

campuses! {
    Baruch => "Baruch College",
    Bmcc => "Borough of Manhattan Community College (BMCC)",
    BronxCc => "Bronx Community College",
    Brooklyn => "Brooklyn College",
    Ccny => "City College of New York (CCNY)",
    StatenIsland => "College of Staten Island (CSI)",
    GraduateCenter => "CUNY Graduate Center",
    SchoolOfLaw => "CUNY School of Law",
    LaborAndUrbanStudies => "CUNY School of Labor and Urban Studies",
    ProfessionalStudies => "CUNY School of Professional Studies (SPS)",
    Guttman => "Guttman Community College",
    Hostos => "Hostos Community College",
    Hunter => "Hunter College",
    JohnJay => "John Jay College of Criminal Justice",
    Kingsborough => "Kingsborough Community College",
    LaGuardia => "LaGuardia Community College",
    Lehman => "Lehman College",
    MedgarEvers => "Medgar Evers College",
    CityTech => "New York City College of Technology (City Tech)",
    Queens => "Queens College",
    Queensborough => "Queensborough Community College",
    York => "York College",
    Macaulay => "Macaulay Honors College",
    Newmark => "Craig Newmark Graduate School of Journalism",
    PublicHealth => "CUNY Graduate School of Public Health & Health Policy",
    Nursing => "CUNY Graduate School of Nursing",
}

impl fmt::Display for Campus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Campus {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Campus::ALL
            .iter()
            .copied()
            .find(|campus| campus.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| CatalogError::UnknownCampus(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MainCategoryId {
    CampusFacilities,
    TechAccess,
    SafetyConduct,
    CampusLife,
    Suggestions,
}

impl MainCategoryId {
    pub const ALL: [MainCategoryId; 5] = [
        MainCategoryId::CampusFacilities,
        MainCategoryId::TechAccess,
        MainCategoryId::SafetyConduct,
        MainCategoryId::CampusLife,
        MainCategoryId::Suggestions,
    ];

    /// Wire id, as stored in request records and exports.
    pub fn id(self) -> &'static str {
        match self {
            MainCategoryId::CampusFacilities => "campusFacilities",
            MainCategoryId::TechAccess => "techAccess",
            MainCategoryId::SafetyConduct => "safetyConduct",
            MainCategoryId::CampusLife => "campusLife",
            MainCategoryId::Suggestions => "suggestions",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            MainCategoryId::CampusFacilities => "Campus & Facilities",
            MainCategoryId::TechAccess => "Technology & Access",
            MainCategoryId::SafetyConduct => "Safety & Conduct",
            MainCategoryId::CampusLife => "Campus Life & Services",
            MainCategoryId::Suggestions => "Suggestions & Concerns",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            MainCategoryId::CampusFacilities => {
                "Leaks, heating/cooling, broken fixtures, pests, construction, grounds, restrooms."
            }
            MainCategoryId::TechAccess => {
                "WiFi, portals, computer labs, classroom tech, accounts, ID card access."
            }
            MainCategoryId::SafetyConduct => {
                "Security, harassment, discrimination, noise, Title IX, threats or concerning behavior."
            }
            MainCategoryId::CampusLife => {
                "Housing, dining, student services, transportation, events, campus experience issues."
            }
            MainCategoryId::Suggestions => {
                "Share ideas or non-urgent concerns to improve your campus."
            }
        }
    }

    pub fn subcategories(self) -> &'static [&'static str] {
        match self {
            MainCategoryId::CampusFacilities => &[
                "Facilities / Maintenance",
                "Custodial / Cleaning",
                "Plumbing",
                "Heating / Cooling",
                "Restrooms",
                "Pest / Rodent Issue",
                "Construction / Renovation",
                "Grounds / Outdoors",
                "Accessibility / Elevators",
                "Emergency Power / Generators",
                "Other Facilities Issue",
            ],
            MainCategoryId::TechAccess => &[
                "WiFi / Network",
                "Computer Labs",
                "Classroom Technology",
                "Login / Portal Issue",
                "ID / Card Access",
                "Software / Licensing",
                "Digital Accessibility",
                "Other Technology Issue",
            ],
            MainCategoryId::SafetyConduct => &[
                "Security / Public Safety",
                "Noise Complaint",
                "Bullying / Harassment (Non-Sexual)",
                "Discrimination / Bias Incident",
                "Sexual Misconduct / Harassment (Title IX)",
                "Stalking / Threatening Behavior",
                "Mental Health Crisis Concern",
                "Other Safety / Conduct Concern",
            ],
            MainCategoryId::CampusLife => &[
                "Housing / Dorms",
                "Dining Services",
                "Transportation / Parking",
                "Student Services / Advising",
                "Events / Campus Culture",
                "Mental Health & Wellness Support",
                "Financial Aid / Bursar",
                "Career Services / Internships",
                "Other Campus Life Issue",
            ],
            MainCategoryId::Suggestions => &[
                "Campus Improvement Idea",
                "Academic / Classroom Experience",
                "Accessibility Improvement",
                "Dining / Food Options",
                "Sustainability / Green Campus",
                "Mental Health & Wellness Resources",
                "Digital Experience / Portals / Apps",
                "Campus Partnerships / Community",
                "Other Suggestion / Concern",
            ],
        }
    }

    pub fn has_subcategory(self, subcategory: &str) -> bool {
        self.subcategories().contains(&subcategory)
    }

    /// Returns the canonical spelling of `subcategory` when it belongs here.
    pub fn subcategory(self, subcategory: &str) -> Result<&'static str, CatalogError> {
        self.subcategories()
            .iter()
            .copied()
            .find(|candidate| *candidate == subcategory)
            .ok_or_else(|| CatalogError::SubcategoryMismatch {
                category: self,
                subcategory: subcategory.to_string(),
            })
    }
}

impl fmt::Display for MainCategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for MainCategoryId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        MainCategoryId::ALL
            .into_iter()
            .find(|category| {
                category.id().eq_ignore_ascii_case(wanted)
                    || category.title().eq_ignore_ascii_case(wanted)
            })
            .ok_or_else(|| CatalogError::UnknownCategory(s.to_string()))
    }
}
