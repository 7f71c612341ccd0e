//! Form data model — roles, field identifiers, and the aggregate form state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The roles a prospective user can sign up as.
///
/// Exactly one may be selected; "no role yet" is `Option::None` on the
/// form, never a default variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleId {
    Landowner,
    Investor,
    SalesAdvisor,
    Analyst,
    ProjectManager,
    GovernanceLead,
    Administrator,
}

impl RoleId {
    /// All selectable roles, in display order.
    pub const ALL: [RoleId; 7] = [
        RoleId::Landowner,
        RoleId::Investor,
        RoleId::SalesAdvisor,
        RoleId::Analyst,
        RoleId::ProjectManager,
        RoleId::GovernanceLead,
        RoleId::Administrator,
    ];
}

impl std::fmt::Display for RoleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Landowner => "landowner",
            Self::Investor => "investor",
            Self::SalesAdvisor => "sales_advisor",
            Self::Analyst => "analyst",
            Self::ProjectManager => "project_manager",
            Self::GovernanceLead => "governance_lead",
            Self::Administrator => "administrator",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for RoleId {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "landowner" => Ok(Self::Landowner),
            "investor" => Ok(Self::Investor),
            "sales_advisor" => Ok(Self::SalesAdvisor),
            "analyst" => Ok(Self::Analyst),
            "project_manager" => Ok(Self::ProjectManager),
            "governance_lead" => Ok(Self::GovernanceLead),
            "administrator" => Ok(Self::Administrator),
            other => Err(format!("Unknown role: {other}")),
        }
    }
}

/// Closed set of form field identifiers.
///
/// Validation errors are keyed by this enum rather than free-form strings,
/// so an unknown field name cannot appear in the error map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Role,
    FirstName,
    LastName,
    Email,
    Password,
    ConfirmPassword,
    Phone,
    CompanyName,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Role => "role",
            Self::FirstName => "first_name",
            Self::LastName => "last_name",
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirm_password",
            Self::Phone => "phone",
            Self::CompanyName => "company_name",
        };
        write!(f, "{s}")
    }
}

/// Per-field validation messages. Absence of a key means the field is valid.
pub type ValidationErrors = BTreeMap<Field, String>;

/// Aggregate onboarding form, filled incrementally across steps.
///
/// Owned exclusively by the step controller; everything else sees clones
/// inside snapshots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FormState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleId>,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub phone: String,
    pub company_name: String,
}

impl FormState {
    /// Apply a single field edit.
    ///
    /// Role values are parsed; an unparsable role clears the selection
    /// rather than keeping a stale one.
    pub fn set(&mut self, field: Field, value: &str) {
        match field {
            Field::Role => {
                self.role = match value.parse::<RoleId>() {
                    Ok(role) => Some(role),
                    Err(_) if value.is_empty() => None,
                    Err(e) => {
                        tracing::warn!("Rejected role value: {e}");
                        None
                    }
                };
            }
            Field::FirstName => self.first_name = value.to_string(),
            Field::LastName => self.last_name = value.to_string(),
            Field::Email => self.email = value.to_string(),
            Field::Password => self.password = value.to_string(),
            Field::ConfirmPassword => self.confirm_password = value.to_string(),
            Field::Phone => self.phone = value.to_string(),
            Field::CompanyName => self.company_name = value.to_string(),
        }
    }
}
