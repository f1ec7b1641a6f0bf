//! Cooperative periodic task scheduler.
//!
//! The main loop calls [`Scheduler::poll`] on every pass with the current
//! tick.  Each task is a non-blocking comparison against its own
//! `last_fired` timestamp:
//!
//! ```text
//!            now - last_fired >= period
//!   ┌──────┐ ─────────────────────────▶ ┌─────┐
//!   │ Idle │                            │ Due │
//!   └──────┘ ◀───────────────────────── └─────┘
//!              fired: last_fired = now
//! ```
//!
//! Firing resets `last_fired` to `now`, not `last_fired + period`: a pass
//! that arrives late runs each task once and then waits a full period, so
//! a stalled loop never produces a catch-up burst.  Subtraction wraps, so
//! the `u32` tick rollover is harmless.
//!
//! No threads, no timers, no blocking: the scheduler only decides what is
//! due; the caller runs the tasks in slot order.

use log::{info, trace};

// ═══════════════════════════════════════════════════════════════
//  Task types
// ═══════════════════════════════════════════════════════════════

/// The periodic jobs of the monitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskId {
    /// Read both sensors and integrate energy.
    Sample,
    /// Send both telemetry frames, then toggle the heartbeat.
    Transmit,
    /// Emit the human-readable status report.
    Report,
}

impl TaskId {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sample => "sample",
            Self::Transmit => "transmit",
            Self::Report => "report",
        }
    }
}

/// Per-task state as seen at a given tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    Idle,
    Due,
}

/// Maximum number of periodic tasks (stack-allocated).
pub const MAX_TASKS: usize = 4;

/// Tasks due on one pass, in slot order.
pub type DueTasks = heapless::Vec<TaskId, MAX_TASKS>;

/// Bookkeeping for one registered task.
#[derive(Debug, Clone, Copy)]
struct TaskEntry {
    task: TaskId,
    period_ms: u32,
    last_fired_ms: u32,
}

impl TaskEntry {
    fn state(&self, now_ms: u32) -> TaskState {
        if now_ms.wrapping_sub(self.last_fired_ms) >= self.period_ms {
            TaskState::Due
        } else {
            TaskState::Idle
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

pub struct Scheduler {
    tasks: [Option<TaskEntry>; MAX_TASKS],
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            tasks: [None; MAX_TASKS],
        }
    }

    /// Register `task` with `period_ms`, measuring its first period from
    /// `now_ms`.  Returns the slot index, or `None` if full.
    ///
    /// Slot order is execution order within a pass.
    pub fn add(&mut self, task: TaskId, period_ms: u32, now_ms: u32) -> Option<usize> {
        for (i, slot) in self.tasks.iter_mut().enumerate() {
            if slot.is_none() {
                info!(
                    "Scheduler: '{}' every {} ms at slot {}",
                    task.label(),
                    period_ms,
                    i
                );
                *slot = Some(TaskEntry {
                    task,
                    period_ms,
                    last_fired_ms: now_ms,
                });
                return Some(i);
            }
        }
        None // All slots full.
    }

    /// Re-base every task's period on `now_ms` (e.g. after startup I/O).
    pub fn restart(&mut self, now_ms: u32) {
        for entry in self.tasks.iter_mut().flatten() {
            entry.last_fired_ms = now_ms;
        }
    }

    /// State of `task` at `now_ms`, or `None` if it is not registered.
    pub fn state(&self, task: TaskId, now_ms: u32) -> Option<TaskState> {
        self.tasks
            .iter()
            .flatten()
            .find(|e| e.task == task)
            .map(|e| e.state(now_ms))
    }

    /// Collect every due task and mark it fired at `now_ms`.
    ///
    /// Each task appears at most once regardless of how many periods have
    /// elapsed since it last fired.
    pub fn poll(&mut self, now_ms: u32) -> DueTasks {
        let mut due = DueTasks::new();
        for entry in self.tasks.iter_mut().flatten() {
            if entry.state(now_ms) == TaskState::Due {
                trace!("Scheduler: '{}' fired at {} ms", entry.task.label(), now_ms);
                entry.last_fired_ms = now_ms;
                // Capacity equals the slot count.
                let _ = due.push(entry.task);
            }
        }
        due
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
