use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateRoleRequest {
    /// One of `admin`, `owner`, `staff`.
    #[validate(length(min = 1, message = "Role is required"))]
    pub role: String,
}
