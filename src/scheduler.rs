//! Cron scheduler for background jobs
//!
//! Runs the periodic full leaderboard resync. The cron expression comes
//! from config so deployments (and tests) can retune the cadence; the
//! default is hourly.

use anyhow::Result;
use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::leaderboard::Leaderboard;
use crate::services::LeaderboardService;

/// Scheduler that keeps the fast leaderboard index in sync with the
/// durable store
pub struct SyncScheduler {
    db_pool: PgPool,
    leaderboard: Leaderboard,
    scheduler: JobScheduler,
}

impl SyncScheduler {
    /// Create a new sync scheduler
    pub async fn new(db_pool: PgPool, leaderboard: Leaderboard) -> Result<Self> {
        let scheduler = JobScheduler::new().await?;

        Ok(Self {
            db_pool,
            leaderboard,
            scheduler,
        })
    }

    /// Register the resync job and start the scheduler (non-blocking)
    pub async fn start(&self, cron_expr: &str) -> Result<()> {
        let db_pool = self.db_pool.clone();
        let leaderboard = self.leaderboard.clone();

        tracing::info!("adding leaderboard resync job: {}", cron_expr);

        let job = Job::new_async(cron_expr, move |_uuid, _lock| {
            let db_pool = db_pool.clone();
            let leaderboard = leaderboard.clone();

            Box::pin(async move {
                match LeaderboardService::sync_leaderboard(&db_pool, &leaderboard).await {
                    Ok(synced) => {
                        tracing::info!("leaderboard resync job: {} users synced", synced);
                    }
                    Err(e) => {
                        tracing::error!("leaderboard resync job failed: {}", e);
                    }
                }
            })
        })?;

        self.scheduler.add(job).await?;
        self.scheduler.start().await?;
        Ok(())
    }

    /// Shutdown the scheduler gracefully
    pub async fn shutdown(&mut self) -> Result<()> {
        self.scheduler.shutdown().await?;
        Ok(())
    }
}
