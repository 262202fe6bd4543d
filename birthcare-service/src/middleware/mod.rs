pub mod auth;
pub mod subscription;

pub use auth::{admin_middleware, auth_middleware, AuthContext, Claims, TokenVerifier};
pub use subscription::{subscription_gate_middleware, PLANS_REDIRECT, REMAINING_HEADER};
