//! Interval scheduler for the background jobs: subscription expiry sweep and
//! daily room-charge accrual.

use crate::config::SchedulerConfig;
use crate::services::accrual::RoomChargeAccrual;
use crate::services::gate::SubscriptionGate;
use chrono::Utc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub struct JobScheduler {
    config: SchedulerConfig,
    gate: SubscriptionGate,
    accrual: RoomChargeAccrual,
    shutdown_token: CancellationToken,
}

impl JobScheduler {
    pub fn new(config: SchedulerConfig, gate: SubscriptionGate, accrual: RoomChargeAccrual) -> Self {
        Self {
            config,
            gate,
            accrual,
            shutdown_token: CancellationToken::new(),
        }
    }

    /// Spawn the job loops. Each tick logs its affected-row count; a failing
    /// tick is logged and the loop keeps going.
    pub fn start(&self) {
        if !self.config.enabled {
            info!("Scheduled jobs disabled by configuration");
            return;
        }

        info!(
            sweep_interval_secs = self.config.sweep_interval_secs,
            accrual_interval_secs = self.config.accrual_interval_secs,
            "Starting scheduled jobs"
        );

        let gate = self.gate.clone();
        let sweep_shutdown = self.shutdown_token.clone();
        let sweep_interval = self.config.sweep_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(sweep_interval);
            loop {
                tokio::select! {
                    _ = sweep_shutdown.cancelled() => {
                        info!("Subscription sweep shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = gate.sweep_expired(Utc::now()).await {
                            error!(error = %e, "Subscription sweep failed");
                        }
                    }
                }
            }
        });

        let accrual = self.accrual.clone();
        let accrual_shutdown = self.shutdown_token.clone();
        let accrual_interval = self.config.accrual_interval();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(accrual_interval);
            loop {
                tokio::select! {
                    _ = accrual_shutdown.cancelled() => {
                        info!("Room-charge accrual shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        let today = Utc::now().date_naive();
                        if let Err(e) = accrual.accrue_room_charges(today).await {
                            error!(error = %e, "Room-charge accrual failed");
                        }
                    }
                }
            }
        });
    }

    pub fn shutdown(&self) {
        info!("Stopping scheduled jobs");
        self.shutdown_token.cancel();
    }
}
