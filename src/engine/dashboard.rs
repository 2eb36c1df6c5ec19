//! One staff dashboard: a single task that keeps a projection of the active queue
//! fresh and decides when to sound alerts.
//!
//! Three intervals drive it. The refresh interval re-reads the store and re-projects.
//! The clock interval re-evaluates countdowns of the cached projection without
//! touching the store. The alert interval emits a pulse for every alerting order
//! that is not snoozed. Order changes published by mutations trigger an early
//! refresh. Everything stops when the owning [`DashboardHandle`] is cancelled or
//! dropped.

use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::engine::queue::{list_active_queue, next_order_info, recompute_countdowns};
use crate::engine::snooze::SnoozeRegistry;
use crate::error::AppError;
use crate::models::queue::{AlertPulse, CountdownUpdate, NextOrderInfo, QueueEntry};
use crate::state::AppState;

const EVENT_BUFFER: usize = 64;
const COMMAND_BUFFER: usize = 16;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardEvent {
    Queue {
        now: NaiveDateTime,
        entries: Vec<QueueEntry>,
        next: Option<NextOrderInfo>,
    },
    Clock {
        now: NaiveDateTime,
        countdowns: Vec<CountdownUpdate>,
    },
    Alert {
        now: NaiveDateTime,
        pulse: AlertPulse,
    },
    Snoozed {
        order_id: i64,
        until: NaiveDateTime,
    },
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardCommand {
    Snooze { order_id: i64 },
    Refresh,
}

/// Owns a running session. Dropping the handle cancels the session's timers.
pub struct DashboardHandle {
    id: Uuid,
    commands: mpsc::Sender<DashboardCommand>,
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl DashboardHandle {
    pub fn spawn(state: Arc<AppState>) -> (Self, mpsc::Receiver<DashboardEvent>) {
        let id = Uuid::new_v4();
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let cancel = CancellationToken::new();

        let session = DashboardSession {
            id,
            snoozes: SnoozeRegistry::new(state.timings.snooze_window),
            state,
            entries: Vec::new(),
            events: events_tx,
            cancel: cancel.clone(),
        };
        let task = tokio::spawn(session.run(commands_rx));

        (
            Self {
                id,
                commands: commands_tx,
                cancel,
                task: Some(task),
            },
            events_rx,
        )
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn commands(&self) -> mpsc::Sender<DashboardCommand> {
        self.commands.clone()
    }

    pub async fn send(&self, command: DashboardCommand) -> Result<(), AppError> {
        self.commands
            .send(command)
            .await
            .map_err(|err| AppError::Internal(format!("dashboard session closed: {err}")))
    }

    /// Cancels the session and waits for its task to finish.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(session_id = %self.id, error = %err, "dashboard session task failed");
            }
        }
    }
}

impl Drop for DashboardHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

struct DashboardSession {
    id: Uuid,
    state: Arc<AppState>,
    snoozes: SnoozeRegistry,
    entries: Vec<QueueEntry>,
    events: mpsc::Sender<DashboardEvent>,
    cancel: CancellationToken,
}

fn ticker(period: std::time::Duration) -> Interval {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}

impl DashboardSession {
    async fn run(mut self, mut commands: mpsc::Receiver<DashboardCommand>) {
        let cancel = self.cancel.clone();
        let timings = self.state.timings;
        let mut refresh = ticker(timings.refresh);
        let mut clock = ticker(timings.clock_tick);
        let mut alerts = ticker(timings.alert_check);
        let mut changes = self.state.order_changes_tx.subscribe();

        self.state.metrics.dashboard_sessions.inc();
        info!(session_id = %self.id, "dashboard session started");

        let mut open = self.refresh().await;
        while open {
            open = tokio::select! {
                _ = cancel.cancelled() => false,
                _ = refresh.tick() => self.refresh().await,
                _ = clock.tick() => self.tick_clock().await,
                _ = alerts.tick() => self.check_alerts().await,
                change = changes.recv() => match change {
                    Ok(change) => {
                        debug!(session_id = %self.id, order_id = change.order_id, "order changed");
                        self.refresh().await
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(session_id = %self.id, skipped, "order change feed lagged");
                        self.refresh().await
                    }
                    Err(RecvError::Closed) => false,
                },
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    None => false,
                },
            };
        }

        self.state.metrics.dashboard_sessions.dec();
        info!(session_id = %self.id, "dashboard session stopped");
    }

    /// False once the receiver is gone or the session is cancelled mid-send.
    async fn emit(&self, event: DashboardEvent) -> bool {
        tokio::select! {
            sent = self.events.send(event) => sent.is_ok(),
            _ = self.cancel.cancelled() => false,
        }
    }

    async fn refresh(&mut self) -> bool {
        let now = self.state.clock.now();
        self.entries = list_active_queue(&self.state, now);
        self.snoozes.prune(&self.entries, now);

        self.emit(DashboardEvent::Queue {
            now,
            entries: self.entries.clone(),
            next: next_order_info(&self.entries),
        })
        .await
    }

    async fn tick_clock(&mut self) -> bool {
        let now = self.state.clock.now();
        recompute_countdowns(&mut self.entries, now);

        self.emit(DashboardEvent::Clock {
            now,
            countdowns: self.entries.iter().map(CountdownUpdate::from).collect(),
        })
        .await
    }

    async fn check_alerts(&mut self) -> bool {
        let now = self.state.clock.now();
        recompute_countdowns(&mut self.entries, now);

        for pulse in self.snoozes.due_alerts(&self.entries, now) {
            self.state
                .metrics
                .alert_pulses_total
                .with_label_values(&[pulse.level.as_str()])
                .inc();
            if !self.emit(DashboardEvent::Alert { now, pulse }).await {
                return false;
            }
        }
        true
    }

    async fn handle_command(&mut self, command: DashboardCommand) -> bool {
        match command {
            DashboardCommand::Refresh => self.refresh().await,
            DashboardCommand::Snooze { order_id } => {
                let now = self.state.clock.now();
                recompute_countdowns(&mut self.entries, now);

                let alerting = self
                    .entries
                    .iter()
                    .any(|entry| entry.order_id == order_id && entry.alert_level.is_alerting());
                if !alerting {
                    warn!(session_id = %self.id, order_id, "ignoring snooze for non-alerting order");
                    return true;
                }

                let until = self.snoozes.snooze(order_id, now);
                info!(session_id = %self.id, order_id, %until, "order alert snoozed");
                self.emit(DashboardEvent::Snoozed { order_id, until }).await
            }
        }
    }
}
