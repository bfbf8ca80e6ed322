//! Timer controller - owns the single active entry for the signed-in user
//!
//! The controller is the only writer of the active-entry value. The value is
//! replaced wholesale on every confirmed transition, never mutated in place,
//! so readers and the tick task can never observe a half-applied update.
//! At most one entry per user is running at any time; the remote store is
//! the final enforcer, and the controller never issues a write that would
//! race against that constraint from this client.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde_json::{json, Value};
use tokio::sync::{broadcast, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration};
use uuid::Uuid;

use chronotrack_core::models::TimeEntry;
use chronotrack_store::{Query, StoreClient};

use super::events::TimerEvent;
use crate::activity::ActivityLogger;
use crate::error::Result;

const TIME_ENTRIES: &str = "time_entries";

pub struct TimerController {
    store: Arc<StoreClient>,
    activity: Arc<ActivityLogger>,
    user_id: RwLock<Option<Uuid>>,
    active: Arc<RwLock<Option<TimeEntry>>>,
    elapsed: Arc<AtomicU64>,
    event_tx: broadcast::Sender<TimerEvent>,
    tick_task: Mutex<Option<JoinHandle<()>>>,
}

impl TimerController {
    pub fn new(store: Arc<StoreClient>, activity: Arc<ActivityLogger>) -> Self {
        let (event_tx, _) = broadcast::channel(256);
        Self {
            store,
            activity,
            user_id: RwLock::new(None),
            active: Arc::new(RwLock::new(None)),
            elapsed: Arc::new(AtomicU64::new(0)),
            event_tx,
            tick_task: Mutex::new(None),
        }
    }

    /// Bind the controller to a signed-in user
    pub async fn bind(&self, user_id: Uuid) {
        let mut guard = self.user_id.write().await;
        *guard = Some(user_id);
    }

    /// Tear down on sign-out: cancel the tick, drop state and binding
    pub async fn reset(&self) {
        self.clear_active().await;
        let mut guard = self.user_id.write().await;
        *guard = None;
    }

    /// Subscribe to timer events
    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.event_tx.subscribe()
    }

    pub async fn is_running(&self) -> bool {
        self.active.read().await.is_some()
    }

    /// Snapshot of the active entry, if any
    pub async fn active_entry(&self) -> Option<TimeEntry> {
        self.active.read().await.clone()
    }

    /// Last recomputed elapsed display value, in whole seconds
    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    /// Start a new entry for a project. Starting while an entry is already
    /// running stops the existing entry first, so at most one entry is ever
    /// running from this client's perspective. A missing project reference
    /// or an unbound controller is a silent no-op.
    pub async fn start(
        &self,
        project_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<()> {
        let Some(user_id) = self.bound_user().await else {
            return Ok(());
        };
        let Some(project_id) = project_id else {
            tracing::debug!("Timer start ignored: no project selected");
            return Ok(());
        };

        if self.active.read().await.is_some() {
            self.stop().await?;
        }

        let description = description.unwrap_or_default();
        let body = json!({
            "user_id": user_id,
            "project_id": project_id,
            "description": description,
            "start_time": Utc::now(),
            "is_running": true,
        });

        let entry: TimeEntry = match self.store.insert(TIME_ENTRIES, &body).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Error starting timer: {}", e);
                return Err(e.into());
            }
        };

        self.activity
            .log(
                user_id,
                "started_timer",
                Some("time_entry"),
                Some(entry.id),
                json!({ "description": description }),
            )
            .await;

        let entry_id = entry.id;
        self.adopt(entry, 0).await;
        let _ = self
            .event_tx
            .send(TimerEvent::started(entry_id, project_id));
        Ok(())
    }

    /// Stop the running entry, persisting its end time and whole-second
    /// duration. No active entry is a silent no-op.
    pub async fn stop(&self) -> Result<()> {
        self.finish(true).await
    }

    /// Pause the running entry. Persists exactly the same stopped shape as
    /// `stop` but does not emit an audit record; the entry can be revived
    /// later with `resume`.
    pub async fn pause(&self) -> Result<()> {
        self.finish(false).await
    }

    async fn finish(&self, audited: bool) -> Result<()> {
        let Some(user_id) = self.bound_user().await else {
            return Ok(());
        };
        let Some(entry) = self.active.read().await.clone() else {
            return Ok(());
        };

        let now = Utc::now();
        let duration = entry.duration_until(now);
        let patch = json!({
            "end_time": now,
            "duration": duration,
            "is_running": false,
        });

        if let Err(e) = self
            .store
            .update::<TimeEntry, Value>(TIME_ENTRIES, entry.id, &patch)
            .await
        {
            tracing::error!("Error stopping timer: {}", e);
            return Err(e.into());
        }

        if audited {
            self.activity
                .log(
                    user_id,
                    "stopped_timer",
                    Some("time_entry"),
                    Some(entry.id),
                    json!({ "duration": duration }),
                )
                .await;
        }

        self.clear_active().await;
        let event = if audited {
            TimerEvent::stopped(entry.id, duration as u64)
        } else {
            TimerEvent::paused(entry.id, duration as u64)
        };
        let _ = self.event_tx.send(event);
        Ok(())
    }

    /// Revive a stopped entry: rewrite its start time to now, clear the end
    /// time and mark it running again. The elapsed display restarts at zero.
    pub async fn resume(&self, entry_id: Uuid) -> Result<()> {
        if self.bound_user().await.is_none() {
            return Ok(());
        }

        let patch = json!({
            "start_time": Utc::now(),
            "end_time": Value::Null,
            "is_running": true,
        });

        let entry: TimeEntry = match self.store.update(TIME_ENTRIES, entry_id, &patch).await {
            Ok(entry) => entry,
            Err(e) => {
                tracing::error!("Error resuming timer: {}", e);
                return Err(e.into());
            }
        };

        let entry_id = entry.id;
        self.adopt(entry, 0).await;
        let _ = self.event_tx.send(TimerEvent::resumed(entry_id));
        Ok(())
    }

    /// Reconstruct state from the remote store: adopt the user's running
    /// entry if one exists, otherwise clear to idle. Zero rows is a normal
    /// outcome, not an error.
    pub async fn refresh(&self) -> Result<()> {
        let Some(user_id) = self.bound_user().await else {
            return Ok(());
        };

        let query = Query::new()
            .eq("user_id", user_id)
            .eq("is_running", true);

        match self
            .store
            .select_one::<TimeEntry>(TIME_ENTRIES, &query)
            .await
        {
            Ok(Some(entry)) => {
                let elapsed = entry.elapsed_seconds(Utc::now());
                let entry_id = entry.id;
                self.adopt(entry, elapsed).await;
                let _ = self
                    .event_tx
                    .send(TimerEvent::refreshed(Some(entry_id), elapsed));
                Ok(())
            }
            Ok(None) => {
                self.clear_active().await;
                let _ = self.event_tx.send(TimerEvent::refreshed(None, 0));
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error fetching active entry: {}", e);
                Err(e.into())
            }
        }
    }

    async fn bound_user(&self) -> Option<Uuid> {
        *self.user_id.read().await
    }

    /// Replace the active entry wholesale and (re)start the tick loop
    async fn adopt(&self, entry: TimeEntry, elapsed: u64) {
        {
            let mut active = self.active.write().await;
            *active = Some(entry);
        }
        self.elapsed.store(elapsed, Ordering::Relaxed);
        self.start_tick().await;
    }

    async fn clear_active(&self) {
        self.cancel_tick().await;
        {
            let mut active = self.active.write().await;
            *active = None;
        }
        self.elapsed.store(0, Ordering::Relaxed);
    }

    /// Spawn the 1s recomputation loop. Elapsed time is always derived from
    /// wall clock and the persisted start timestamp, never from an
    /// incrementing counter, so missed ticks and reloads cannot drift it.
    /// At most one loop is alive; any prior loop is aborted first.
    async fn start_tick(&self) {
        let mut guard = self.tick_task.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let active = self.active.clone();
        let elapsed = self.elapsed.clone();
        let event_tx = self.event_tx.clone();

        *guard = Some(tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(1));
            loop {
                tick.tick().await;

                let Some(entry) = active.read().await.clone() else {
                    break;
                };

                let seconds = entry.elapsed_seconds(Utc::now());
                elapsed.store(seconds, Ordering::Relaxed);
                let _ = event_tx.send(TimerEvent::tick(entry.id, seconds));
            }
        }));
    }

    async fn cancel_tick(&self) {
        let mut guard = self.tick_task.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }
    }
}

impl Drop for TimerController {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.tick_task.try_lock() {
            if let Some(handle) = guard.take() {
                handle.abort();
            }
        }
    }
}
