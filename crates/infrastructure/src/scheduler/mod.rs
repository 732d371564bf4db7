//! Interval-based task scheduler for recurring update cycles
//!
//! Uses `tokio-cron-scheduler` repeated jobs. Each task can also run once
//! immediately when it is added, so the first cycle does not wait a full
//! interval.

use std::{
    collections::HashMap,
    future::Future,
    sync::{
        Arc,
        atomic::{AtomicBool, AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use thiserror::Error;
use tokio::sync::{Mutex as AsyncMutex, mpsc};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{debug, info, instrument, warn};

/// Shortest interval a polling task accepts
pub const MIN_TASK_INTERVAL: Duration = Duration::from_secs(1);

/// Scheduler errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Interval shorter than [`MIN_TASK_INTERVAL`]
    #[error("Invalid task interval: {0:?}")]
    InvalidInterval(Duration),

    /// A task with this name already exists
    #[error("Task already scheduled: {0}")]
    DuplicateTask(String),

    /// Scheduler failed to start
    #[error("Scheduler failed to start: {0}")]
    StartupFailed(String),

    /// Internal scheduler error
    #[error("Internal scheduler error: {0}")]
    Internal(String),
}

impl From<JobSchedulerError> for SchedulerError {
    fn from(err: JobSchedulerError) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Statistics for a scheduled task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskStats {
    /// Task name
    pub name: String,
    /// Time between runs
    pub interval: Duration,
    /// Number of successful executions
    pub success_count: u64,
    /// Number of failed executions
    pub failure_count: u64,
    /// Last execution time
    pub last_run: Option<DateTime<Utc>>,
    /// Last successful execution time
    pub last_success: Option<DateTime<Utc>>,
    /// Last failure time
    pub last_failure: Option<DateTime<Utc>>,
    /// Last error message
    pub last_error: Option<String>,
    /// Average execution duration in milliseconds
    pub avg_duration_ms: u64,
}

/// Internal task metadata
struct TaskMetadata {
    name: String,
    interval: Duration,
    success_count: AtomicU64,
    failure_count: AtomicU64,
    last_run: RwLock<Option<DateTime<Utc>>>,
    last_success: RwLock<Option<DateTime<Utc>>>,
    last_failure: RwLock<Option<DateTime<Utc>>>,
    last_error: RwLock<Option<String>>,
    total_duration_ms: AtomicU64,
}

impl TaskMetadata {
    #[allow(clippy::missing_const_for_fn)] // RwLock::new is not const in parking_lot
    fn new(name: String, interval: Duration) -> Self {
        Self {
            name,
            interval,
            success_count: AtomicU64::new(0),
            failure_count: AtomicU64::new(0),
            last_run: RwLock::new(None),
            last_success: RwLock::new(None),
            last_failure: RwLock::new(None),
            last_error: RwLock::new(None),
            total_duration_ms: AtomicU64::new(0),
        }
    }

    fn to_stats(&self) -> TaskStats {
        let success = self.success_count.load(Ordering::Relaxed);
        let failure = self.failure_count.load(Ordering::Relaxed);
        let total = success + failure;
        let avg_duration = if total > 0 {
            self.total_duration_ms.load(Ordering::Relaxed) / total
        } else {
            0
        };

        TaskStats {
            name: self.name.clone(),
            interval: self.interval,
            success_count: success,
            failure_count: failure,
            last_run: *self.last_run.read(),
            last_success: *self.last_success.read(),
            last_failure: *self.last_failure.read(),
            last_error: self.last_error.read().clone(),
            avg_duration_ms: avg_duration,
        }
    }

    fn record_success(&self, duration_ms: u64) {
        let now = Utc::now();
        self.success_count.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.last_run.write() = Some(now);
        *self.last_success.write() = Some(now);
    }

    fn record_failure(&self, error: String, duration_ms: u64) {
        let now = Utc::now();
        self.failure_count.fetch_add(1, Ordering::Relaxed);
        self.total_duration_ms
            .fetch_add(duration_ms, Ordering::Relaxed);
        *self.last_run.write() = Some(now);
        *self.last_failure.write() = Some(now);
        *self.last_error.write() = Some(error);
    }
}

/// Task completion event sent to the event channel
#[derive(Debug, Clone)]
pub struct TaskEvent {
    /// Task name
    pub task_name: String,
    /// Whether the task succeeded
    pub success: bool,
    /// Error message if failed
    pub error: Option<String>,
    /// Execution duration in milliseconds
    pub duration_ms: u64,
    /// When the task completed
    pub completed_at: DateTime<Utc>,
}

/// Scheduler configuration
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Whether to start the scheduler immediately
    pub auto_start: bool,
    /// Run each task once as soon as it is added
    pub run_immediately: bool,
    /// Task event buffer size
    pub event_buffer_size: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            auto_start: true,
            run_immediately: true,
            event_buffer_size: 100,
        }
    }
}

type TaskMap = Arc<RwLock<HashMap<String, Arc<TaskMetadata>>>>;

/// Run one execution of a task and report it
async fn execute<Fut>(name: String, tasks: TaskMap, event_tx: mpsc::Sender<TaskEvent>, task: Fut)
where
    Fut: Future<Output = Result<(), String>>,
{
    debug!(task = %name, "Starting scheduled task");
    let start = Instant::now();
    let result = task.await;
    let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
    let metadata = tasks.read().get(&name).cloned();

    let (success, error) = match result {
        Ok(()) => {
            if let Some(metadata) = &metadata {
                metadata.record_success(duration_ms);
            }
            debug!(task = %name, duration_ms, "Task completed successfully");
            (true, None)
        },
        Err(e) => {
            if let Some(metadata) = &metadata {
                metadata.record_failure(e.clone(), duration_ms);
            }
            warn!(task = %name, error = %e, duration_ms, "Task failed");
            (false, Some(e))
        },
    };

    let event = TaskEvent {
        task_name: name,
        success,
        error,
        duration_ms,
        completed_at: Utc::now(),
    };
    if event_tx.try_send(event).is_err() {
        debug!("Task event dropped, channel full or closed");
    }
}

/// Scheduler running polling tasks at fixed intervals
pub struct PollingScheduler {
    scheduler: AsyncMutex<JobScheduler>,
    tasks: TaskMap,
    running: Arc<AtomicBool>,
    run_immediately: bool,
    event_tx: mpsc::Sender<TaskEvent>,
    event_rx: Arc<RwLock<Option<mpsc::Receiver<TaskEvent>>>>,
}

impl std::fmt::Debug for PollingScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PollingScheduler")
            .field("running", &self.running.load(Ordering::Relaxed))
            .field("task_count", &self.tasks.read().len())
            .finish_non_exhaustive()
    }
}

impl PollingScheduler {
    /// Create a new scheduler
    #[instrument(skip_all)]
    pub async fn new(config: SchedulerConfig) -> Result<Self, SchedulerError> {
        let scheduler = JobScheduler::new()
            .await
            .map_err(|e| SchedulerError::StartupFailed(e.to_string()))?;
        let (event_tx, event_rx) = mpsc::channel(config.event_buffer_size);

        let instance = Self {
            scheduler: AsyncMutex::new(scheduler),
            tasks: Arc::new(RwLock::new(HashMap::new())),
            running: Arc::new(AtomicBool::new(false)),
            run_immediately: config.run_immediately,
            event_tx,
            event_rx: Arc::new(RwLock::new(Some(event_rx))),
        };

        if config.auto_start {
            instance.start().await?;
        }

        debug!("Polling scheduler initialized");
        Ok(instance)
    }

    /// Start the scheduler
    #[instrument(skip(self))]
    pub async fn start(&self) -> Result<(), SchedulerError> {
        if self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already running");
            return Ok(());
        }

        self.scheduler
            .lock()
            .await
            .start()
            .await
            .map_err(|e| SchedulerError::StartupFailed(e.to_string()))?;
        self.running.store(true, Ordering::Relaxed);
        info!("Polling scheduler started");
        Ok(())
    }

    /// Stop the scheduler gracefully
    #[instrument(skip(self))]
    pub async fn stop(&self) -> Result<(), SchedulerError> {
        if !self.running.load(Ordering::Relaxed) {
            debug!("Scheduler already stopped");
            return Ok(());
        }

        self.scheduler.lock().await.shutdown().await?;
        self.running.store(false, Ordering::Relaxed);
        info!("Polling scheduler stopped");
        Ok(())
    }

    /// Check if the scheduler is running
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    /// Take the event receiver (can only be called once)
    pub fn take_event_receiver(&self) -> Option<mpsc::Receiver<TaskEvent>> {
        self.event_rx.write().take()
    }

    /// Add a task that runs every `interval`
    ///
    /// With `run_immediately` configured, the first execution is spawned
    /// right away; later ones follow the interval.
    #[instrument(skip(self, task))]
    pub async fn add_polling_task<F, Fut>(
        &self,
        name: &str,
        interval: Duration,
        task: F,
    ) -> Result<(), SchedulerError>
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), String>> + Send + 'static,
    {
        if interval < MIN_TASK_INTERVAL {
            return Err(SchedulerError::InvalidInterval(interval));
        }
        if self.tasks.read().contains_key(name) {
            return Err(SchedulerError::DuplicateTask(name.to_string()));
        }

        let task = Arc::new(task);
        let job = {
            let name = name.to_string();
            let tasks = Arc::clone(&self.tasks);
            let event_tx = self.event_tx.clone();
            let task = Arc::clone(&task);

            Job::new_repeated_async(interval, move |_uuid, _lock| {
                let future = execute(name.clone(), Arc::clone(&tasks), event_tx.clone(), task());
                Box::pin(future)
            })?
        };

        self.scheduler.lock().await.add(job).await?;
        self.tasks.write().insert(
            name.to_string(),
            Arc::new(TaskMetadata::new(name.to_string(), interval)),
        );
        info!(task = %name, interval_secs = interval.as_secs(), "Task scheduled");

        if self.run_immediately {
            tokio::spawn(execute(
                name.to_string(),
                Arc::clone(&self.tasks),
                self.event_tx.clone(),
                task(),
            ));
        }

        Ok(())
    }

    /// Get statistics for a specific task
    #[must_use]
    pub fn task_stats(&self, name: &str) -> Option<TaskStats> {
        self.tasks.read().get(name).map(|m| m.to_stats())
    }

    /// Get statistics for all tasks
    #[must_use]
    pub fn all_stats(&self) -> Vec<TaskStats> {
        self.tasks.read().values().map(|m| m.to_stats()).collect()
    }

    /// Get the number of scheduled tasks
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.tasks.read().len()
    }
}
