//! Daily room-charge accrual.
//!
//! For every admission occupying a room on a given day, appends one
//! room-charge line item through the ledger's open-bill path. A partial
//! unique index on (admission_id, accrued_on) plus a pre-check keeps the job
//! idempotent: rerunning a day accrues nothing twice.

use crate::models::NewCharge;
use crate::services::database::Database;
use crate::services::ledger::BillingLedger;
use crate::services::metrics::ACCRUED_CHARGES_TOTAL;
use birthcare_core::error::AppError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{info, instrument, warn};

/// Scheduled job appending daily room charges.
#[derive(Clone)]
pub struct RoomChargeAccrual {
    db: Database,
    ledger: BillingLedger,
}

impl RoomChargeAccrual {
    pub fn new(db: Database, ledger: BillingLedger) -> Self {
        Self { db, ledger }
    }

    /// Accrue room charges for `day`. Returns how many were appended. One
    /// admission failing does not abort the rest of the run.
    #[instrument(skip(self))]
    pub async fn accrue_room_charges(&self, day: NaiveDate) -> Result<u64, AppError> {
        let admissions = self.db.list_admissions_active_on(day).await?;

        let mut accrued = 0u64;
        for admission in admissions {
            match self.accrue_one(&admission, day).await {
                Ok(true) => accrued += 1,
                Ok(false) => {}
                Err(e) => {
                    warn!(
                        admission_id = %admission.admission_id,
                        error = %e,
                        "Failed to accrue room charge"
                    );
                }
            }
        }

        if accrued > 0 {
            ACCRUED_CHARGES_TOTAL.inc_by(accrued);
        }

        info!(day = %day, accrued = accrued, "Room-charge accrual finished");

        Ok(accrued)
    }

    async fn accrue_one(
        &self,
        admission: &crate::models::Admission,
        day: NaiveDate,
    ) -> Result<bool, AppError> {
        if self
            .db
            .has_accrued_charge(admission.admission_id, day)
            .await?
        {
            return Ok(false);
        }

        if admission.daily_rate <= Decimal::ZERO {
            return Ok(false);
        }

        let charge = NewCharge {
            service_item_id: None,
            description: format!("Room charge - {} ({})", admission.room_name, day),
            quantity: 1,
            unit_price: admission.daily_rate,
            admission_id: Some(admission.admission_id),
            accrued_on: Some(day),
        };

        self.ledger
            .append_charges(admission.patient_id, admission.facility_id, vec![charge])
            .await?;

        Ok(true)
    }
}
