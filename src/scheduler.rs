//! Fixed-slot animation scheduler
//!
//! Holds up to `SLOTS` independent, time-bounded animation tasks. Every
//! [`AnimationScheduler::update`] reports each running task's progress to a
//! callback, in ascending slot order. The scheduler knows nothing about what
//! an animation does: the payload `A` is handed back to the caller, which
//! dispatches it against its own state.

use embassy_time::{Duration, Instant};

/// How a task behaves once its progress reaches 1.0
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// Report completion once, then free the slot
    OneShot,
    /// Report completion, then start the next cycle in place
    Continuous,
}

/// Lifecycle position of a task within the current update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// First update after the task was started
    Started,
    /// Running, progress in `0.0..1.0`
    Progress,
    /// Progress reached 1.0 on this update
    Completed,
}

/// Parameters passed to an animation callback
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationParam {
    /// Slot the task runs in
    pub slot: usize,
    /// Normalized elapsed time, `0.0..=1.0`
    pub progress: f32,
    /// Lifecycle position
    pub state: AnimationState,
}

/// Error returned when addressing a slot outside the pool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    SlotOutOfRange(usize),
}

#[derive(Debug, Clone, Copy)]
struct AnimationTask<A> {
    animation: A,
    kind: TaskKind,
    duration: Duration,
    start_time: Instant,
    started: bool,
    progress: f32,
}

/// Pool of animation slots
#[derive(Debug)]
pub struct AnimationScheduler<A: Copy, const SLOTS: usize> {
    slots: [Option<AnimationTask<A>>; SLOTS],
}

impl<A: Copy, const SLOTS: usize> Default for AnimationScheduler<A, SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Copy, const SLOTS: usize> AnimationScheduler<A, SLOTS> {
    pub const fn new() -> Self {
        Self {
            slots: [const { None }; SLOTS],
        }
    }

    /// Number of slots in the pool
    pub const fn capacity(&self) -> usize {
        SLOTS
    }

    /// Start a task, replacing whatever ran in the slot
    ///
    /// The replaced task gets no final callback.
    pub fn start(
        &mut self,
        slot: usize,
        now: Instant,
        duration: Duration,
        kind: TaskKind,
        animation: A,
    ) -> Result<(), SchedulerError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SchedulerError::SlotOutOfRange(slot))?;
        *entry = Some(AnimationTask {
            animation,
            kind,
            duration,
            start_time: now,
            started: false,
            progress: 0.0,
        });
        Ok(())
    }

    /// Stop a task early, discarding its progress
    pub fn stop(&mut self, slot: usize) -> Result<(), SchedulerError> {
        let entry = self
            .slots
            .get_mut(slot)
            .ok_or(SchedulerError::SlotOutOfRange(slot))?;
        *entry = None;
        Ok(())
    }

    /// Check if a slot holds a running task
    pub fn is_active(&self, slot: usize) -> bool {
        matches!(self.slots.get(slot), Some(Some(_)))
    }

    /// Check if any slot holds a running task
    pub fn has_active(&self) -> bool {
        self.slots.iter().any(Option::is_some)
    }

    /// Payload of the task running in a slot
    pub fn animation(&self, slot: usize) -> Option<A> {
        self.slots.get(slot).copied().flatten().map(|task| task.animation)
    }

    /// Progress of the task running in a slot, as of the last update
    pub fn progress(&self, slot: usize) -> Option<f32> {
        self.slots.get(slot).copied().flatten().map(|task| task.progress)
    }

    /// Advance every running task and invoke `callback` once per task
    ///
    /// Call this once per tick. Progress never decreases within one cycle
    /// as long as `now` does not go backwards.
    pub fn update<F>(&mut self, now: Instant, mut callback: F)
    where
        F: FnMut(A, AnimationParam),
    {
        for (slot, entry) in self.slots.iter_mut().enumerate() {
            let Some(task) = entry else {
                continue;
            };

            let elapsed = now.saturating_duration_since(task.start_time);
            let progress = progress_of(elapsed, task.duration).max(task.progress);
            let state = if progress >= 1.0 {
                AnimationState::Completed
            } else if task.started {
                AnimationState::Progress
            } else {
                AnimationState::Started
            };
            task.started = true;
            task.progress = progress;

            callback(
                task.animation,
                AnimationParam {
                    slot,
                    progress,
                    state,
                },
            );

            if state != AnimationState::Completed {
                continue;
            }
            if task.kind == TaskKind::OneShot {
                *entry = None;
                continue;
            }

            // Keep the cadence unless a whole cycle was missed
            let next_start = task.start_time + task.duration;
            task.start_time = if now.saturating_duration_since(next_start) >= task.duration {
                now
            } else {
                next_start
            };
            task.started = false;
            task.progress = 0.0;
        }
    }
}

/// Normalized progress of `elapsed` within `duration`
///
/// A zero duration completes immediately.
#[allow(clippy::cast_precision_loss)]
pub fn progress_of(elapsed: Duration, duration: Duration) -> f32 {
    let total = duration.as_micros();
    if total == 0 || elapsed.as_micros() >= total {
        return 1.0;
    }
    (elapsed.as_micros() as f32 / total as f32).clamp(0.0, 1.0)
}
