//! Domain models for birthcare-service.

mod admission;
mod application;
mod bill;
mod facility;
mod line_item;
mod patient;
mod payment;
mod plan;
mod service_item;
mod statement;
mod subscription;
mod user;

pub use admission::{Admission, CreateAdmission};
pub use application::{
    ApplicationDocument, ApplicationStatus, DocumentKind, DocumentUpload, FacilityApplication,
    RegisterApplication,
};
pub use bill::{Bill, BillStatus};
pub use facility::{CreateFacility, Facility};
pub use line_item::{ChargeDraft, LineItem, NewCharge};
pub use patient::Patient;
pub use payment::{Payment, PaymentMethod, RecordPayment};
pub use plan::{CreatePlan, SubscriptionPlan};
pub use service_item::ServiceItem;
pub use statement::{StatementBill, StatementHistory, StatementOfAccount};
pub use subscription::{Subscription, SubscriptionStatus};
pub use user::{Role, User};
