//! BirthCare facility backend: billing ledger, subscription gate and the
//! facility application review workflow.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;
