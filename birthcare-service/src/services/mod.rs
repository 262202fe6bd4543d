//! Service layer for birthcare-service.

pub mod accrual;
pub mod database;
pub mod gate;
pub mod ledger;
pub mod metrics;
pub mod review;
pub mod scheduler;
pub mod storage;

pub use accrual::RoomChargeAccrual;
pub use database::Database;
pub use gate::SubscriptionGate;
pub use ledger::BillingLedger;
pub use metrics::{get_metrics, init_metrics};
pub use review::ApplicationReview;
pub use scheduler::JobScheduler;
pub use storage::{LocalStorage, Storage};
