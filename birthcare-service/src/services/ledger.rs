//! Billing ledger: the sole writer of bill totals.
//!
//! Every mutation runs in a transaction holding a `SELECT ... FOR UPDATE`
//! lock on the bill row, so concurrent charges and payments against one bill
//! serialize. Derived fields (subtotal, total, paid, balance) are recomputed
//! from line items and payments inside that transaction; nothing increments
//! them in place.

use crate::models::{
    Bill, BillStatus, ChargeDraft, NewCharge, Payment, RecordPayment, StatementBill,
    StatementOfAccount,
};
use crate::services::database::Database;
use crate::services::metrics::{
    BILLS_TOTAL, DB_QUERY_DURATION, PAYMENTS_TOTAL, PAYMENT_AMOUNT_TOTAL,
};
use birthcare_core::error::AppError;
use chrono::{NaiveDate, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::{Postgres, Transaction};
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Recomputed monetary state of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BillTotals {
    subtotal: Decimal,
    total: Decimal,
    paid: Decimal,
    balance: Decimal,
}

/// total = subtotal + tax - discount; balance = total - paid.
fn compute_totals(subtotal: Decimal, tax: Decimal, discount: Decimal, paid: Decimal) -> BillTotals {
    let total = subtotal + tax - discount;
    BillTotals {
        subtotal,
        total,
        paid,
        balance: total - paid,
    }
}

/// Status after money moved: settled when nothing is outstanding, partially
/// paid while some is, otherwise whatever the bill already was. A bill never
/// leaves draft or sent until a payment lands.
fn status_after_payment(current: &str, totals: &BillTotals) -> BillStatus {
    if totals.balance <= Decimal::ZERO {
        BillStatus::Paid
    } else if totals.paid > Decimal::ZERO {
        BillStatus::PartiallyPaid
    } else {
        BillStatus::from_string(current)
    }
}

/// `"PHP 600.00"` style rendering for caller-facing messages.
fn format_amount(currency: &str, amount: Decimal) -> String {
    format!("{} {:.2}", currency, amount)
}

/// Domain service for the billing ledger.
#[derive(Clone)]
pub struct BillingLedger {
    db: Database,
}

impl BillingLedger {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Append charges to the patient's open bill at the facility, creating a
    /// draft bill when none is open. Returns the bill with recomputed totals.
    #[instrument(skip(self, drafts), fields(patient_id = %patient_id, facility_id = %facility_id, charge_count = drafts.len()))]
    pub async fn add_charges(
        &self,
        patient_id: Uuid,
        facility_id: Uuid,
        drafts: Vec<ChargeDraft>,
    ) -> Result<Bill, AppError> {
        if drafts.is_empty() {
            return Err(AppError::Validation(anyhow::anyhow!(
                "At least one charge is required"
            )));
        }

        let patient = self
            .db
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient {} not found", patient_id)))?;
        if patient.facility_id != facility_id {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Patient {} does not belong to facility {}",
                patient_id,
                facility_id
            )));
        }

        let mut items = Vec::with_capacity(drafts.len());
        for draft in drafts {
            items.push(self.resolve_draft(facility_id, draft).await?);
        }

        self.append_charges(patient_id, facility_id, items).await
    }

    /// Resolve one draft against the charge catalog and check its bounds.
    async fn resolve_draft(
        &self,
        facility_id: Uuid,
        draft: ChargeDraft,
    ) -> Result<NewCharge, AppError> {
        let catalog_item = match draft.service_item_id {
            Some(id) => {
                let item = self.db.get_service_item(id).await?.ok_or_else(|| {
                    AppError::Validation(anyhow::anyhow!("Service item {} not found", id))
                })?;
                if item.facility_id != facility_id {
                    return Err(AppError::Validation(anyhow::anyhow!(
                        "Service item {} belongs to another facility",
                        id
                    )));
                }
                if !item.active {
                    return Err(AppError::Validation(anyhow::anyhow!(
                        "Service item {} is inactive",
                        id
                    )));
                }
                Some(item)
            }
            None => None,
        };

        let description = draft
            .description
            .or_else(|| catalog_item.as_ref().map(|i| i.name.clone()))
            .ok_or_else(|| {
                AppError::Validation(anyhow::anyhow!("Charge description is required"))
            })?;
        let unit_price = draft
            .unit_price
            .or_else(|| catalog_item.as_ref().map(|i| i.unit_price))
            .ok_or_else(|| AppError::Validation(anyhow::anyhow!("Charge unit price is required")))?;

        if draft.quantity <= 0 {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Charge quantity must be positive"
            )));
        }
        if unit_price < Decimal::ZERO {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Charge unit price cannot be negative"
            )));
        }

        Ok(NewCharge {
            service_item_id: draft.service_item_id,
            description,
            quantity: draft.quantity,
            unit_price,
            admission_id: None,
            accrued_on: None,
        })
    }

    /// Append already-resolved charges. Also the entry point for the accrual
    /// job, whose items carry admission linkage. Items must satisfy the
    /// quantity/price bounds before this is called.
    #[instrument(skip(self, items), fields(patient_id = %patient_id, facility_id = %facility_id))]
    pub(crate) async fn append_charges(
        &self,
        patient_id: Uuid,
        facility_id: Uuid,
        items: Vec<NewCharge>,
    ) -> Result<Bill, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["append_charges"])
            .start_timer();

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let bill = self
            .lock_or_create_open_bill(&mut tx, patient_id, facility_id)
            .await?;

        for item in &items {
            let total_price = Decimal::from(item.quantity) * item.unit_price;
            sqlx::query(
                r#"
                INSERT INTO line_items (line_item_id, bill_id, service_item_id, description,
                    quantity, unit_price, total_price, admission_id, accrued_on)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(bill.bill_id)
            .bind(item.service_item_id)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(total_price)
            .bind(item.admission_id)
            .bind(item.accrued_on)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::DatabaseError(anyhow::anyhow!("Failed to insert line item: {}", e))
            })?;
        }

        let updated = self.recompute_bill(&mut tx, &bill, false).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        info!(
            bill_id = %updated.bill_id,
            item_count = items.len(),
            subtotal = %updated.subtotal,
            balance = %updated.balance,
            "Charges appended"
        );

        Ok(updated)
    }

    /// Record a payment against a bill. The amount must be positive and no
    /// greater than the outstanding balance; the rejection message carries
    /// the exact balance in the facility currency.
    #[instrument(skip(self, input), fields(bill_id = %input.bill_id, method = input.method.as_str()))]
    pub async fn record_payment(&self, input: RecordPayment) -> Result<(Bill, Payment), AppError> {
        if input.amount <= Decimal::ZERO {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Payment amount must be positive"
            )));
        }

        let timer = DB_QUERY_DURATION
            .with_label_values(&["record_payment"])
            .start_timer();

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let bill = self.lock_bill(&mut tx, input.bill_id).await?.ok_or_else(|| {
            AppError::NotFound(anyhow::anyhow!("Bill {} not found", input.bill_id))
        })?;

        if bill.status == "cancelled" {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Cannot record a payment on a cancelled bill"
            )));
        }

        if input.amount > bill.balance {
            let currency = self.facility_currency(&mut tx, bill.facility_id).await?;
            return Err(AppError::Validation(anyhow::anyhow!(
                "Payment of {} exceeds the outstanding balance of {}",
                format_amount(&currency, input.amount),
                format_amount(&currency, bill.balance)
            )));
        }

        let payment_date = input
            .payment_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (payment_id, bill_id, amount, method, reference,
                received_by, payment_date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING payment_id, bill_id, amount, method, reference, received_by,
                payment_date, created_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(bill.bill_id)
        .bind(input.amount)
        .bind(input.method.as_str())
        .bind(&input.reference)
        .bind(input.received_by)
        .bind(payment_date)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to insert payment: {}", e)))?;

        let updated = self.recompute_bill(&mut tx, &bill, true).await?;

        let currency = self.facility_currency(&mut tx, bill.facility_id).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        PAYMENTS_TOTAL
            .with_label_values(&[input.method.as_str()])
            .inc();
        PAYMENT_AMOUNT_TOTAL
            .with_label_values(&[currency.as_str()])
            .inc_by(input.amount.to_f64().unwrap_or(0.0));
        if updated.status == "paid" {
            BILLS_TOTAL.with_label_values(&["paid"]).inc();
        }

        info!(
            bill_id = %updated.bill_id,
            payment_id = %payment.payment_id,
            amount = %payment.amount,
            balance = %updated.balance,
            status = %updated.status,
            "Payment recorded"
        );

        Ok((updated, payment))
    }

    /// Issue a draft bill: draft -> sent, optionally finalizing due date, tax
    /// and discount. `None` keeps the stored value; pass an explicit zero to
    /// clear a previously set amount. Conflict from any other state.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn issue_bill(
        &self,
        bill_id: Uuid,
        due_date: Option<NaiveDate>,
        tax: Option<Decimal>,
        discount: Option<Decimal>,
    ) -> Result<Bill, AppError> {
        if tax.is_some_and(|t| t < Decimal::ZERO) || discount.is_some_and(|d| d < Decimal::ZERO) {
            return Err(AppError::Validation(anyhow::anyhow!(
                "Tax and discount cannot be negative"
            )));
        }

        let timer = DB_QUERY_DURATION.with_label_values(&["issue_bill"]).start_timer();

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let bill = self
            .lock_bill(&mut tx, bill_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill {} not found", bill_id)))?;

        if bill.status != "draft" {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Only draft bills can be issued; bill {} is {}",
                bill_id,
                bill.status
            )));
        }

        let issued = sqlx::query_as::<_, Bill>(
            r#"
            UPDATE bills
            SET status = 'sent', due_date = COALESCE($2, due_date),
                tax = COALESCE($3, tax), discount = COALESCE($4, discount)
            WHERE bill_id = $1
            RETURNING bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            "#,
        )
        .bind(bill_id)
        .bind(due_date)
        .bind(tax)
        .bind(discount)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to issue bill: {}", e)))?;

        // Recompute with the finalized tax and discount applied.
        let updated = self.recompute_bill(&mut tx, &issued, false).await?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        BILLS_TOTAL.with_label_values(&["issued"]).inc();

        info!(bill_id = %updated.bill_id, total = %updated.total, "Bill issued");

        Ok(updated)
    }

    /// Cancel a bill: draft, sent or partially paid -> cancelled (terminal).
    /// Conflict from paid or cancelled.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn cancel_bill(&self, bill_id: Uuid) -> Result<Bill, AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["cancel_bill"]).start_timer();

        let mut tx = self.db.pool().begin().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to begin transaction: {}", e))
        })?;

        let bill = self
            .lock_bill(&mut tx, bill_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Bill {} not found", bill_id)))?;

        if !matches!(bill.status.as_str(), "draft" | "sent" | "partially_paid") {
            return Err(AppError::Conflict(anyhow::anyhow!(
                "Cannot cancel a {} bill",
                bill.status
            )));
        }

        let cancelled = sqlx::query_as::<_, Bill>(
            r#"
            UPDATE bills SET status = 'cancelled', updated_utc = NOW()
            WHERE bill_id = $1
            RETURNING bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            "#,
        )
        .bind(bill_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to cancel bill: {}", e)))?;

        tx.commit().await.map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to commit transaction: {}", e))
        })?;

        timer.observe_duration();

        BILLS_TOTAL.with_label_values(&["cancelled"]).inc();

        info!(bill_id = %cancelled.bill_id, "Bill cancelled");

        Ok(cancelled)
    }

    /// Build the statement of account for a patient: the single open bill
    /// itemized as current activity, closed bills aggregated as history.
    /// This struct is what the PDF renderer consumes.
    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn statement_of_account(
        &self,
        patient_id: Uuid,
    ) -> Result<StatementOfAccount, AppError> {
        let patient = self
            .db
            .get_patient(patient_id)
            .await?
            .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("Patient {} not found", patient_id)))?;
        let facility = self
            .db
            .get_facility(patient.facility_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(anyhow::anyhow!("Facility {} not found", patient.facility_id))
            })?;

        let history = self.db.closed_bill_history(patient_id).await?;
        let open = self.db.get_open_bill(patient_id, patient.facility_id).await?;

        let statement = match open {
            Some(bill) => {
                let line_items = self.db.get_line_items(bill.bill_id).await?;
                let payments = self.db.get_payments(bill.bill_id).await?;
                let today = Utc::now().date_naive();
                let status = bill.effective_status(today);
                StatementOfAccount {
                    patient_id,
                    patient_name: patient.full_name(),
                    facility_id: facility.facility_id,
                    facility_name: facility.name,
                    generated_utc: Utc::now(),
                    current_charges: bill.total,
                    current_paid: bill.paid,
                    current_balance: bill.balance,
                    status: status.display().to_string(),
                    active_bill: Some(StatementBill {
                        bill_id: bill.bill_id,
                        status: status.as_str().to_string(),
                        due_date: bill.due_date,
                        line_items,
                        payments,
                    }),
                    history,
                }
            }
            None => StatementOfAccount {
                patient_id,
                patient_name: patient.full_name(),
                facility_id: facility.facility_id,
                facility_name: facility.name,
                generated_utc: Utc::now(),
                active_bill: None,
                current_charges: Decimal::ZERO,
                current_paid: Decimal::ZERO,
                current_balance: Decimal::ZERO,
                status: BillStatus::Paid.display().to_string(),
                history,
            },
        };

        Ok(statement)
    }

    /// Lock the bill row for the duration of the transaction.
    async fn lock_bill(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bill_id: Uuid,
    ) -> Result<Option<Bill>, AppError> {
        sqlx::query_as::<_, Bill>(
            r#"
            SELECT bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            FROM bills
            WHERE bill_id = $1
            FOR UPDATE
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock bill: {}", e)))
    }

    /// Lock the patient's open bill, creating a fresh draft when none exists.
    async fn lock_or_create_open_bill(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        patient_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Bill, AppError> {
        let open = sqlx::query_as::<_, Bill>(
            r#"
            SELECT bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            FROM bills
            WHERE patient_id = $1 AND facility_id = $2 AND status NOT IN ('paid', 'cancelled')
            ORDER BY created_utc DESC
            LIMIT 1
            FOR UPDATE
            "#,
        )
        .bind(patient_id)
        .bind(facility_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to lock open bill: {}", e)))?;

        if let Some(bill) = open {
            return Ok(bill);
        }

        let bill = sqlx::query_as::<_, Bill>(
            r#"
            INSERT INTO bills (bill_id, patient_id, facility_id)
            VALUES ($1, $2, $3)
            RETURNING bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(patient_id)
        .bind(facility_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create bill: {}", e)))?;

        BILLS_TOTAL.with_label_values(&["created"]).inc();

        info!(bill_id = %bill.bill_id, patient_id = %patient_id, "Draft bill opened");

        Ok(bill)
    }

    /// Recompute every derived field from the line items and payments and
    /// write the bill back. When `apply_payment_rule` is set the stored
    /// status follows the payment rule; charges and issuance leave it alone.
    async fn recompute_bill(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        bill: &Bill,
        apply_payment_rule: bool,
    ) -> Result<Bill, AppError> {
        let subtotal: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total_price), 0) FROM line_items WHERE bill_id = $1",
        )
        .bind(bill.bill_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum line items: {}", e)))?;

        let paid: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM payments WHERE bill_id = $1",
        )
        .bind(bill.bill_id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to sum payments: {}", e)))?;

        let totals = compute_totals(subtotal, bill.tax, bill.discount, paid);
        let status = if apply_payment_rule {
            status_after_payment(&bill.status, &totals)
        } else {
            BillStatus::from_string(&bill.status)
        };

        sqlx::query_as::<_, Bill>(
            r#"
            UPDATE bills
            SET subtotal = $2, total = $3, paid = $4, balance = $5, status = $6,
                updated_utc = NOW()
            WHERE bill_id = $1
            RETURNING bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            "#,
        )
        .bind(bill.bill_id)
        .bind(totals.subtotal)
        .bind(totals.total)
        .bind(totals.paid)
        .bind(totals.balance)
        .bind(status.as_str())
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update totals: {}", e)))
    }

    async fn facility_currency(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        facility_id: Uuid,
    ) -> Result<String, AppError> {
        let currency: Option<String> =
            sqlx::query_scalar("SELECT currency FROM facilities WHERE facility_id = $1")
                .bind(facility_id)
                .fetch_optional(&mut **tx)
                .await
                .map_err(|e| {
                    AppError::DatabaseError(anyhow::anyhow!("Failed to get currency: {}", e))
                })?;
        if currency.is_none() {
            warn!(facility_id = %facility_id, "Bill references a missing facility");
        }
        Ok(currency.unwrap_or_else(|| "PHP".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    #[test]
    fn totals_follow_subtotal_tax_discount_paid() {
        let totals = compute_totals(dec(100_000), dec(12_000), dec(2_000), dec(40_000));
        assert_eq!(totals.subtotal, dec(100_000));
        assert_eq!(totals.total, dec(110_000));
        assert_eq!(totals.paid, dec(40_000));
        assert_eq!(totals.balance, dec(70_000));
    }

    #[test]
    fn totals_with_no_activity_are_zero() {
        let totals = compute_totals(Decimal::ZERO, Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(totals.total, Decimal::ZERO);
        assert_eq!(totals.balance, Decimal::ZERO);
    }

    #[test]
    fn full_payment_settles_the_bill() {
        let totals = compute_totals(dec(100_000), Decimal::ZERO, Decimal::ZERO, dec(100_000));
        assert_eq!(status_after_payment("sent", &totals), BillStatus::Paid);
    }

    #[test]
    fn partial_payment_marks_partially_paid() {
        let totals = compute_totals(dec(100_000), Decimal::ZERO, Decimal::ZERO, dec(40_000));
        assert_eq!(
            status_after_payment("sent", &totals),
            BillStatus::PartiallyPaid
        );
        assert_eq!(
            status_after_payment("draft", &totals),
            BillStatus::PartiallyPaid
        );
    }

    #[test]
    fn no_payment_leaves_status_unchanged() {
        let totals = compute_totals(dec(100_000), Decimal::ZERO, Decimal::ZERO, Decimal::ZERO);
        assert_eq!(status_after_payment("draft", &totals), BillStatus::Draft);
        assert_eq!(status_after_payment("sent", &totals), BillStatus::Sent);
    }

    #[test]
    fn discounted_bill_settles_at_discounted_total() {
        // 1000 charged, 100 discount: 900 settles it.
        let totals = compute_totals(dec(100_000), Decimal::ZERO, dec(10_000), dec(90_000));
        assert_eq!(totals.balance, Decimal::ZERO);
        assert_eq!(status_after_payment("partially_paid", &totals), BillStatus::Paid);
    }

    #[test]
    fn amounts_format_with_currency_and_two_decimals() {
        assert_eq!(format_amount("PHP", dec(60_000)), "PHP 600.00");
        assert_eq!(format_amount("PHP", dec(123)), "PHP 1.23");
        assert_eq!(format_amount("USD", Decimal::ZERO), "USD 0.00");
        assert_eq!(format_amount("PHP", Decimal::new(5, 1)), "PHP 0.50");
    }
}
