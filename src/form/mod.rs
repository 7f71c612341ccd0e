//! Form state, field validation, and password strength scoring.

pub mod model;
pub mod strength;
pub mod validator;

pub use model::{Field, FormState, RoleId, ValidationErrors};
pub use strength::PasswordStrength;
pub use validator::validate_step;
