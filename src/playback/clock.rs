use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// The two repeating timers a controller runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Steps the play-head backwards while the rate is not positive
    NegativeSimulation,
    /// Keeps the play-head inside the loop range
    LoopEnforcement,
}

/// One firing of a shuttle timer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tick {
    pub kind: TimerKind,
    /// Identifies the timer instance that fired
    pub generation: u64,
    /// Rate the timer was started with
    pub rate: f64,
}

pub type TickReceiver = mpsc::UnboundedReceiver<Tick>;

struct ActiveTimer {
    generation: u64,
    task: JoinHandle<()>,
}

/// Repeating timers, at most one per kind.
///
/// Each timer runs as a tokio task that sends [`Tick`]s into a channel; the
/// owner of the [`TickReceiver`] hands them back through [`ShuttleClock::accept`],
/// which drops ticks from timers that have since been stopped or replaced.
pub struct ShuttleClock {
    sender: mpsc::UnboundedSender<Tick>,
    active: HashMap<TimerKind, ActiveTimer>,
    next_generation: u64,
}

impl ShuttleClock {
    pub fn new() -> (Self, TickReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let clock = Self {
            sender,
            active: HashMap::new(),
            next_generation: 0,
        };
        (clock, receiver)
    }

    /// Start a timer firing every `period`, replacing any timer of the same kind.
    ///
    /// The first tick arrives one period after the call. Must be called
    /// within a tokio runtime.
    pub fn start(&mut self, kind: TimerKind, period: Duration, rate: f64) {
        self.stop(kind);

        self.next_generation += 1;
        let generation = self.next_generation;
        let sender = self.sender.clone();
        let first = Instant::now() + period;

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(first, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                if sender.send(Tick { kind, generation, rate }).is_err() {
                    break;
                }
            }
        });

        debug!("Started {:?} timer #{} every {:?}", kind, generation, period);
        self.active.insert(kind, ActiveTimer { generation, task });
    }

    /// Cancel the timer of this kind, if one is running
    pub fn stop(&mut self, kind: TimerKind) {
        if let Some(timer) = self.active.remove(&kind) {
            timer.task.abort();
            debug!("Stopped {:?} timer #{}", kind, timer.generation);
        }
    }

    pub fn stop_all(&mut self) {
        self.stop(TimerKind::NegativeSimulation);
        self.stop(TimerKind::LoopEnforcement);
    }

    #[cfg(test)]
    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.active.contains_key(&kind)
    }

    /// Number of running timers
    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Whether a received tick comes from a timer that is still running
    pub fn accept(&self, tick: &Tick) -> bool {
        self.active
            .get(&tick.kind)
            .is_some_and(|timer| timer.generation == tick.generation)
    }
}

impl Drop for ShuttleClock {
    fn drop(&mut self) {
        for timer in self.active.values() {
            timer.task.abort();
        }
    }
}
