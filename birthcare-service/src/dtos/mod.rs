pub mod admissions;
pub mod applications;
pub mod billing;
pub mod subscriptions;
pub mod users;
