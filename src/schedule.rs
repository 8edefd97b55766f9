//! Delayed commands that can be withdrawn before they fire.

use std::collections::HashMap;
use std::time::Duration;

use slotmap::{new_key_type, SlotMap};

use crate::control::{Command, TaskKey};

new_key_type! {
    /// Unique ID of a scheduled task.
    pub struct TaskId;
}

/// A command waiting for its due time.
#[derive(Clone, Debug)]
struct Task {
    key: TaskKey,
    due: Duration,
    seq: u64,
    command: Command,
}

/// A set of pending commands, at most one per [TaskKey].
#[derive(Default)]
pub struct TaskQueue {
    tasks: SlotMap<TaskId, Task>,
    by_key: HashMap<TaskKey, TaskId>,
    seq: u64,
}

impl TaskQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Default::default()
    }

    /// Schedules `command` to fire at `due`.
    ///
    /// A task already pending under the same key is replaced.
    pub fn schedule(&mut self, key: TaskKey, due: Duration, command: Command) -> TaskId {
        if let Some(old) = self.cancel(key) {
            log::debug!("replacing pending {:?} task ({})", key, old);
        }
        let seq = self.seq;
        self.seq += 1;
        let id = self.tasks.insert(Task {
            key,
            due,
            seq,
            command,
        });
        self.by_key.insert(key, id);
        id
    }

    /// Withdraws the task pending under `key`, returning its command.
    pub fn cancel(&mut self, key: TaskKey) -> Option<Command> {
        let id = self.by_key.remove(&key)?;
        self.tasks.remove(id).map(|task| task.command)
    }

    /// Whether a task is pending under `key`.
    pub fn is_pending(&self, key: TaskKey) -> bool {
        self.by_key.contains_key(&key)
    }

    /// The earliest due time of any pending task.
    pub fn next_due(&self) -> Option<Duration> {
        self.tasks.values().map(|task| task.due).min()
    }

    /// Removes and returns every command due at or before `now`,
    /// earliest first, ties in scheduling order.
    pub fn pop_due(&mut self, now: Duration) -> Vec<Command> {
        let mut due: Vec<_> = self
            .tasks
            .iter()
            .filter(|(_, task)| task.due <= now)
            .map(|(id, task)| (task.due, task.seq, id))
            .collect();
        due.sort_unstable_by_key(|(due, seq, _)| (*due, *seq));

        due.into_iter()
            .filter_map(|(_, _, id)| self.tasks.remove(id))
            .map(|task| {
                self.by_key.remove(&task.key);
                task.command
            })
            .collect()
    }

    /// Drops every pending task, returning how many there were.
    pub fn clear(&mut self) -> usize {
        let count = self.tasks.len();
        self.tasks.clear();
        self.by_key.clear();
        count
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
