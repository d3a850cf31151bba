//! Background task that owns the timer engine

use tokio::{
    sync::{mpsc, oneshot, watch},
    task::JoinHandle,
};
use tracing::{debug, info, warn};

use crate::{
    engine::{
        Action, AlarmNotifier, DurationSetting, Presenter, TimerEngine, TimerError, TimerSnapshot,
    },
    scheduler::{ScheduleHandle, TokioScheduler},
};

/// Capacity of the action queue feeding the driver
const ACTION_QUEUE: usize = 32;

/// One user action together with the channel its outcome is returned on
#[derive(Debug)]
pub struct ActionRequest {
    pub action: Action,
    pub reply: oneshot::Sender<Result<TimerSnapshot, TimerError>>,
}

/// Channels connected to a running driver task
#[derive(Debug)]
pub struct EngineHandle {
    pub action_tx: mpsc::Sender<ActionRequest>,
    pub snapshot_rx: watch::Receiver<TimerSnapshot>,
    pub task: JoinHandle<()>,
}

/// Build an engine on a [`TokioScheduler`] and spawn its driver.
/// Must be called from within a tokio runtime.
pub fn spawn_engine<P, A>(initial: DurationSetting, presenter: P, alarm: A) -> EngineHandle
where
    P: Presenter + Send + 'static,
    A: AlarmNotifier + Send + 'static,
{
    let (scheduler, fired_rx) = TokioScheduler::new();
    let engine = TimerEngine::new(scheduler, presenter, alarm, initial);
    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());
    let (action_tx, action_rx) = mpsc::channel(ACTION_QUEUE);

    let task = tokio::spawn(engine_driver_task(engine, action_rx, fired_rx, snapshot_tx));

    EngineHandle {
        action_tx,
        snapshot_rx,
        task,
    }
}

/// Serialize user actions and fired schedules into the engine, one at a
/// time, publishing a fresh snapshot after each. Ends when every action
/// sender has been dropped.
pub async fn engine_driver_task<P, A>(
    mut engine: TimerEngine<TokioScheduler, P, A>,
    mut action_rx: mpsc::Receiver<ActionRequest>,
    mut fired_rx: mpsc::UnboundedReceiver<ScheduleHandle>,
    snapshot_tx: watch::Sender<TimerSnapshot>,
) where
    P: Presenter,
    A: AlarmNotifier,
{
    info!("Starting engine driver task");

    loop {
        tokio::select! {
            // Scheduler fired - tick or chained launch
            Some(handle) = fired_rx.recv() => {
                engine.on_fired(handle);
                publish(&snapshot_tx, engine.snapshot());
            }

            // User action
            request = action_rx.recv() => {
                let Some(request) = request else {
                    info!("Action channel closed, stopping engine driver");
                    break;
                };

                let name = request.action.name();
                debug!("Applying action: {}", name);
                let result = engine.apply(request.action).map(|()| engine.snapshot());
                match &result {
                    Ok(snapshot) => publish(&snapshot_tx, snapshot.clone()),
                    Err(e) => warn!("Rejected {}: {}", name, e),
                }

                if request.reply.send(result).is_err() {
                    debug!("Caller for {} went away before the reply", name);
                }
            }
        }
    }
}

fn publish(snapshot_tx: &watch::Sender<TimerSnapshot>, snapshot: TimerSnapshot) {
    snapshot_tx.send_if_modified(|current| {
        if *current == snapshot {
            false
        } else {
            *current = snapshot;
            true
        }
    });
}
