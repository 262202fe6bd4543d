//! Database service for birthcare-service.
//!
//! Owns the connection pool and the queries shared across domain services.
//! Multi-step mutations (charges, payments, activation, review decisions)
//! live with their domain service and run in transactions on this pool.

use crate::models::{
    Admission, ApplicationDocument, ApplicationStatus, Bill, CreateAdmission, CreatePlan,
    Facility, FacilityApplication, LineItem, Patient, Payment, ServiceItem, StatementHistory,
    Subscription, SubscriptionPlan, User,
};
use crate::services::metrics::DB_QUERY_DURATION;
use birthcare_core::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    #[instrument(skip(database_url), fields(service = "birthcare-service"))]
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests connect with their own options).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Check database health.
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Health check failed: {}", e)))?;
        Ok(())
    }

    /// Run database migrations.
    #[instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<(), AppError> {
        info!("Running database migrations");
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        info!("Database migrations completed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // User Operations
    // -------------------------------------------------------------------------

    /// Get a user by ID.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["get_user"]).start_timer();

        let user = sqlx::query_as::<_, User>(
            "SELECT user_id, email, display_name, role, created_utc FROM users WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get user: {}", e)))?;

        timer.observe_duration();

        Ok(user)
    }

    /// List users, newest first (admin surface).
    #[instrument(skip(self))]
    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["list_users"]).start_timer();

        let users = sqlx::query_as::<_, User>(
            "SELECT user_id, email, display_name, role, created_utc FROM users ORDER BY created_utc DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list users: {}", e)))?;

        timer.observe_duration();

        Ok(users)
    }

    /// Set a user's role (admin surface; the role string is validated at ingress).
    #[instrument(skip(self), fields(user_id = %user_id, role = role))]
    pub async fn update_user_role(&self, user_id: Uuid, role: &str) -> Result<User, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["update_user_role"])
            .start_timer();

        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users SET role = $2
            WHERE user_id = $1
            RETURNING user_id, email, display_name, role, created_utc
            "#,
        )
        .bind(user_id)
        .bind(role)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to update role: {}", e)))?
        .ok_or_else(|| AppError::NotFound(anyhow::anyhow!("User {} not found", user_id)))?;

        timer.observe_duration();

        info!(user_id = %user.user_id, role = %user.role, "User role updated");

        Ok(user)
    }

    // -------------------------------------------------------------------------
    // Facility / Patient Operations
    // -------------------------------------------------------------------------

    /// Get a facility by ID.
    #[instrument(skip(self), fields(facility_id = %facility_id))]
    pub async fn get_facility(&self, facility_id: Uuid) -> Result<Option<Facility>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_facility"])
            .start_timer();

        let facility = sqlx::query_as::<_, Facility>(
            r#"
            SELECT facility_id, owner_id, name, address, currency, created_utc
            FROM facilities
            WHERE facility_id = $1
            "#,
        )
        .bind(facility_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get facility: {}", e)))?;

        timer.observe_duration();

        Ok(facility)
    }

    /// List the facilities an owner holds.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn get_facilities_by_owner(&self, owner_id: Uuid) -> Result<Vec<Facility>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_facilities_by_owner"])
            .start_timer();

        let facilities = sqlx::query_as::<_, Facility>(
            r#"
            SELECT facility_id, owner_id, name, address, currency, created_utc
            FROM facilities
            WHERE owner_id = $1
            ORDER BY created_utc
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list facilities: {}", e))
        })?;

        timer.observe_duration();

        Ok(facilities)
    }

    /// Get a patient by ID.
    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn get_patient(&self, patient_id: Uuid) -> Result<Option<Patient>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_patient"])
            .start_timer();

        let patient = sqlx::query_as::<_, Patient>(
            r#"
            SELECT patient_id, facility_id, first_name, last_name, created_utc
            FROM patients
            WHERE patient_id = $1
            "#,
        )
        .bind(patient_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get patient: {}", e)))?;

        timer.observe_duration();

        Ok(patient)
    }

    /// Get a catalog item by ID.
    #[instrument(skip(self), fields(service_item_id = %service_item_id))]
    pub async fn get_service_item(
        &self,
        service_item_id: Uuid,
    ) -> Result<Option<ServiceItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_service_item"])
            .start_timer();

        let item = sqlx::query_as::<_, ServiceItem>(
            r#"
            SELECT service_item_id, facility_id, name, unit_price, active, created_utc
            FROM service_items
            WHERE service_item_id = $1
            "#,
        )
        .bind(service_item_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get service item: {}", e)))?;

        timer.observe_duration();

        Ok(item)
    }

    // -------------------------------------------------------------------------
    // Bill Operations (reads; mutations live on BillingLedger)
    // -------------------------------------------------------------------------

    /// Get a bill by ID.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn get_bill(&self, bill_id: Uuid) -> Result<Option<Bill>, AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["get_bill"]).start_timer();

        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            FROM bills
            WHERE bill_id = $1
            "#,
        )
        .bind(bill_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get bill: {}", e)))?;

        timer.observe_duration();

        Ok(bill)
    }

    /// Get the patient's most recent open bill at a facility. Open means the
    /// stored status is neither paid nor cancelled.
    #[instrument(skip(self), fields(patient_id = %patient_id, facility_id = %facility_id))]
    pub async fn get_open_bill(
        &self,
        patient_id: Uuid,
        facility_id: Uuid,
    ) -> Result<Option<Bill>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_open_bill"])
            .start_timer();

        let bill = sqlx::query_as::<_, Bill>(
            r#"
            SELECT bill_id, patient_id, facility_id, status, subtotal, tax, discount,
                total, paid, balance, due_date, created_utc, updated_utc
            FROM bills
            WHERE patient_id = $1 AND facility_id = $2 AND status NOT IN ('paid', 'cancelled')
            ORDER BY created_utc DESC
            LIMIT 1
            "#,
        )
        .bind(patient_id)
        .bind(facility_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get open bill: {}", e)))?;

        timer.observe_duration();

        Ok(bill)
    }

    /// Get the line items of a bill, oldest first.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn get_line_items(&self, bill_id: Uuid) -> Result<Vec<LineItem>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_line_items"])
            .start_timer();

        let items = sqlx::query_as::<_, LineItem>(
            r#"
            SELECT line_item_id, bill_id, service_item_id, description, quantity,
                unit_price, total_price, admission_id, accrued_on, created_utc
            FROM line_items
            WHERE bill_id = $1
            ORDER BY created_utc, line_item_id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get line items: {}", e)))?;

        timer.observe_duration();

        Ok(items)
    }

    /// Get the payments recorded against a bill, oldest first.
    #[instrument(skip(self), fields(bill_id = %bill_id))]
    pub async fn get_payments(&self, bill_id: Uuid) -> Result<Vec<Payment>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_payments"])
            .start_timer();

        let payments = sqlx::query_as::<_, Payment>(
            r#"
            SELECT payment_id, bill_id, amount, method, reference, received_by,
                payment_date, created_utc
            FROM payments
            WHERE bill_id = $1
            ORDER BY created_utc, payment_id
            "#,
        )
        .bind(bill_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get payments: {}", e)))?;

        timer.observe_duration();

        Ok(payments)
    }

    /// Whether a room charge has already been accrued for the admission on
    /// `day`. The partial unique index enforces the same rule; this read
    /// keeps the accrual job quiet on reruns.
    #[instrument(skip(self), fields(admission_id = %admission_id))]
    pub async fn has_accrued_charge(
        &self,
        admission_id: Uuid,
        day: NaiveDate,
    ) -> Result<bool, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["has_accrued_charge"])
            .start_timer();

        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM line_items WHERE admission_id = $1 AND accrued_on = $2)",
        )
        .bind(admission_id)
        .bind(day)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to check accrued charge: {}", e))
        })?;

        timer.observe_duration();

        Ok(exists)
    }

    /// Aggregate the patient's closed bills for the statement history block.
    #[instrument(skip(self), fields(patient_id = %patient_id))]
    pub async fn closed_bill_history(
        &self,
        patient_id: Uuid,
    ) -> Result<StatementHistory, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["closed_bill_history"])
            .start_timer();

        let (paid_bills, total_billed, total_paid): (i64, Decimal, Decimal) = sqlx::query_as(
            r#"
            SELECT COUNT(*), COALESCE(SUM(total), 0), COALESCE(SUM(paid), 0)
            FROM bills
            WHERE patient_id = $1 AND status = 'paid'
            "#,
        )
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to aggregate paid bills: {}", e))
        })?;

        let cancelled_bills: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM bills WHERE patient_id = $1 AND status = 'cancelled'",
        )
        .bind(patient_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to count cancelled bills: {}", e))
        })?;

        timer.observe_duration();

        Ok(StatementHistory {
            paid_bills,
            cancelled_bills,
            total_billed,
            total_paid,
        })
    }

    // -------------------------------------------------------------------------
    // Subscription Operations
    // -------------------------------------------------------------------------

    /// The owner's active subscription at `now`, if any. Most recently
    /// created wins should the partial unique index ever admit a tie.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn get_active_subscription(
        &self,
        owner_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<Option<Subscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_active_subscription"])
            .start_timer();

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT subscription_id, owner_id, plan_id, status, starts_at, ends_at, created_utc
            FROM subscriptions
            WHERE owner_id = $1 AND status = 'active' AND ends_at > $2
            ORDER BY created_utc DESC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get active subscription: {}", e))
        })?;

        timer.observe_duration();

        Ok(subscription)
    }

    /// The owner's most recent subscription regardless of status.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn get_latest_subscription(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<Subscription>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_latest_subscription"])
            .start_timer();

        let subscription = sqlx::query_as::<_, Subscription>(
            r#"
            SELECT subscription_id, owner_id, plan_id, status, starts_at, ends_at, created_utc
            FROM subscriptions
            WHERE owner_id = $1
            ORDER BY created_utc DESC
            LIMIT 1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get latest subscription: {}", e))
        })?;

        timer.observe_duration();

        Ok(subscription)
    }

    /// Get a plan by ID.
    #[instrument(skip(self), fields(plan_id = %plan_id))]
    pub async fn get_plan(&self, plan_id: Uuid) -> Result<Option<SubscriptionPlan>, AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["get_plan"]).start_timer();

        let plan = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            SELECT plan_id, name, price, duration_days, trial, created_utc
            FROM subscription_plans
            WHERE plan_id = $1
            "#,
        )
        .bind(plan_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get plan: {}", e)))?;

        timer.observe_duration();

        Ok(plan)
    }

    /// List all plans, cheapest first.
    #[instrument(skip(self))]
    pub async fn list_plans(&self) -> Result<Vec<SubscriptionPlan>, AppError> {
        let timer = DB_QUERY_DURATION.with_label_values(&["list_plans"]).start_timer();

        let plans = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            SELECT plan_id, name, price, duration_days, trial, created_utc
            FROM subscription_plans
            ORDER BY price, created_utc
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to list plans: {}", e)))?;

        timer.observe_duration();

        Ok(plans)
    }

    /// Create a plan (admin surface).
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create_plan(&self, input: &CreatePlan) -> Result<SubscriptionPlan, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_plan"])
            .start_timer();

        let plan_id = Uuid::new_v4();
        let plan = sqlx::query_as::<_, SubscriptionPlan>(
            r#"
            INSERT INTO subscription_plans (plan_id, name, price, duration_days, trial)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING plan_id, name, price, duration_days, trial, created_utc
            "#,
        )
        .bind(plan_id)
        .bind(&input.name)
        .bind(input.price)
        .bind(input.duration_days)
        .bind(input.trial)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create plan: {}", e)))?;

        timer.observe_duration();

        info!(plan_id = %plan.plan_id, name = %plan.name, "Subscription plan created");

        Ok(plan)
    }

    // -------------------------------------------------------------------------
    // Application Operations (reads; mutations live on ApplicationReview)
    // -------------------------------------------------------------------------

    /// Get an application by ID.
    #[instrument(skip(self), fields(application_id = %application_id))]
    pub async fn get_application(
        &self,
        application_id: Uuid,
    ) -> Result<Option<FacilityApplication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_application"])
            .start_timer();

        let application = sqlx::query_as::<_, FacilityApplication>(
            r#"
            SELECT application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            FROM facility_applications
            WHERE application_id = $1
            "#,
        )
        .bind(application_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get application: {}", e)))?;

        timer.observe_duration();

        Ok(application)
    }

    /// Get the owner's application, if they have one.
    #[instrument(skip(self), fields(owner_id = %owner_id))]
    pub async fn get_application_by_owner(
        &self,
        owner_id: Uuid,
    ) -> Result<Option<FacilityApplication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_application_by_owner"])
            .start_timer();

        let application = sqlx::query_as::<_, FacilityApplication>(
            r#"
            SELECT application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            FROM facility_applications
            WHERE owner_id = $1
            "#,
        )
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to get owner application: {}", e))
        })?;

        timer.observe_duration();

        Ok(application)
    }

    /// List applications, optionally filtered by status, oldest submission first.
    #[instrument(skip(self))]
    pub async fn list_applications(
        &self,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<FacilityApplication>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_applications"])
            .start_timer();

        let status_str = status.map(|s| s.as_str().to_string());
        let applications = sqlx::query_as::<_, FacilityApplication>(
            r#"
            SELECT application_id, facility_id, owner_id, status, rejection_reason,
                submitted_utc, reviewed_utc
            FROM facility_applications
            WHERE ($1::varchar IS NULL OR status = $1)
            ORDER BY submitted_utc
            "#,
        )
        .bind(&status_str)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list applications: {}", e))
        })?;

        timer.observe_duration();

        Ok(applications)
    }

    /// Get the document bundle of an application.
    #[instrument(skip(self), fields(application_id = %application_id))]
    pub async fn get_documents(
        &self,
        application_id: Uuid,
    ) -> Result<Vec<ApplicationDocument>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_documents"])
            .start_timer();

        let documents = sqlx::query_as::<_, ApplicationDocument>(
            r#"
            SELECT document_id, application_id, kind, storage_path, content_type, uploaded_utc
            FROM application_documents
            WHERE application_id = $1
            ORDER BY kind
            "#,
        )
        .bind(application_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get documents: {}", e)))?;

        timer.observe_duration();

        Ok(documents)
    }

    // -------------------------------------------------------------------------
    // Admission Operations
    // -------------------------------------------------------------------------

    /// Admit a patient.
    #[instrument(skip(self, input), fields(patient_id = %input.patient_id, facility_id = %input.facility_id))]
    pub async fn create_admission(&self, input: &CreateAdmission) -> Result<Admission, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["create_admission"])
            .start_timer();

        let admission_id = Uuid::new_v4();
        let admission = sqlx::query_as::<_, Admission>(
            r#"
            INSERT INTO admissions (admission_id, patient_id, facility_id, room_name, daily_rate)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING admission_id, patient_id, facility_id, room_name, daily_rate,
                admitted_utc, discharged_utc
            "#,
        )
        .bind(admission_id)
        .bind(input.patient_id)
        .bind(input.facility_id)
        .bind(&input.room_name)
        .bind(input.daily_rate)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to create admission: {}", e)))?;

        timer.observe_duration();

        info!(admission_id = %admission.admission_id, "Patient admitted");

        Ok(admission)
    }

    /// Get an admission by ID.
    #[instrument(skip(self), fields(admission_id = %admission_id))]
    pub async fn get_admission(&self, admission_id: Uuid) -> Result<Option<Admission>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["get_admission"])
            .start_timer();

        let admission = sqlx::query_as::<_, Admission>(
            r#"
            SELECT admission_id, patient_id, facility_id, room_name, daily_rate,
                admitted_utc, discharged_utc
            FROM admissions
            WHERE admission_id = $1
            "#,
        )
        .bind(admission_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to get admission: {}", e)))?;

        timer.observe_duration();

        Ok(admission)
    }

    /// Discharge an admission. Conflict when already discharged.
    #[instrument(skip(self), fields(admission_id = %admission_id))]
    pub async fn discharge_admission(&self, admission_id: Uuid) -> Result<Admission, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["discharge_admission"])
            .start_timer();

        let discharged = sqlx::query_as::<_, Admission>(
            r#"
            UPDATE admissions SET discharged_utc = NOW()
            WHERE admission_id = $1 AND discharged_utc IS NULL
            RETURNING admission_id, patient_id, facility_id, room_name, daily_rate,
                admitted_utc, discharged_utc
            "#,
        )
        .bind(admission_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to discharge admission: {}", e))
        })?;

        timer.observe_duration();

        match discharged {
            Some(admission) => {
                info!(admission_id = %admission.admission_id, "Patient discharged");
                Ok(admission)
            }
            None => match self.get_admission(admission_id).await? {
                Some(_) => Err(AppError::Conflict(anyhow::anyhow!(
                    "Admission {} is already discharged",
                    admission_id
                ))),
                None => Err(AppError::NotFound(anyhow::anyhow!(
                    "Admission {} not found",
                    admission_id
                ))),
            },
        }
    }

    /// Admissions occupying a room on `day` (admitted on or before, not yet
    /// discharged before it). Feeds the daily room-charge accrual.
    #[instrument(skip(self))]
    pub async fn list_admissions_active_on(
        &self,
        day: NaiveDate,
    ) -> Result<Vec<Admission>, AppError> {
        let timer = DB_QUERY_DURATION
            .with_label_values(&["list_admissions_active_on"])
            .start_timer();

        let admissions = sqlx::query_as::<_, Admission>(
            r#"
            SELECT admission_id, patient_id, facility_id, room_name, daily_rate,
                admitted_utc, discharged_utc
            FROM admissions
            WHERE admitted_utc::date <= $1
              AND (discharged_utc IS NULL OR discharged_utc::date >= $1)
            ORDER BY admitted_utc
            "#,
        )
        .bind(day)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::DatabaseError(anyhow::anyhow!("Failed to list active admissions: {}", e))
        })?;

        timer.observe_duration();

        Ok(admissions)
    }
}
