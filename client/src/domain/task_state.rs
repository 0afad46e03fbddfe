//! Observable state of asynchronous work.
//!
//! Loading spinners and error banners in any front end only need to know
//! whether a task is idle, running, finished or failed. [`TaskTracker`]
//! publishes exactly that through a `tokio::sync::watch` channel, so a view
//! layer can subscribe without the task knowing who is watching.

use std::future::Future;

use tokio::sync::watch;

/// Lifecycle of one tracked task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskState<T, E> {
    /// Nothing has run yet, or the tracker was reset.
    Idle,
    /// The task is running.
    InFlight,
    /// The task finished with a value.
    Done(T),
    /// The task finished with an error.
    Failed(E),
}

impl<T, E> TaskState<T, E> {
    /// Whether the task is running.
    pub const fn is_in_flight(&self) -> bool {
        matches!(self, Self::InFlight)
    }

    /// Whether the task reached `Done` or `Failed`.
    pub const fn is_finished(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Failed(_))
    }
}

impl<T, E> Default for TaskState<T, E> {
    fn default() -> Self {
        Self::Idle
    }
}

/// State container publishing the [`TaskState`] of the task it runs.
///
/// # Examples
/// ```
/// use client::domain::{TaskState, TaskTracker};
///
/// # tokio::runtime::Builder::new_current_thread().build().expect("runtime").block_on(async {
/// let tracker: TaskTracker<u32, String> = TaskTracker::new();
/// let value = tracker.run(async { Ok(3) }).await;
/// assert_eq!(value, Ok(3));
/// assert_eq!(tracker.state(), TaskState::Done(3));
/// # });
/// ```
#[derive(Debug)]
pub struct TaskTracker<T, E> {
    sender: watch::Sender<TaskState<T, E>>,
}

impl<T, E> TaskTracker<T, E>
where
    T: Clone,
    E: Clone,
{
    /// Create an idle tracker.
    pub fn new() -> Self {
        let (sender, _receiver) = watch::channel(TaskState::Idle);
        Self { sender }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> TaskState<T, E> {
        self.sender.borrow().clone()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<TaskState<T, E>> {
        self.sender.subscribe()
    }

    /// Run `task`, publishing `InFlight` before it starts and `Done` or
    /// `Failed` once it completes. The task's outcome is returned unchanged.
    pub async fn run<F>(&self, task: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        self.sender.send_replace(TaskState::InFlight);
        let outcome = task.await;
        let settled = match &outcome {
            Ok(value) => TaskState::Done(value.clone()),
            Err(error) => TaskState::Failed(error.clone()),
        };
        self.sender.send_replace(settled);
        outcome
    }

    /// Return to `Idle`.
    pub fn reset(&self) {
        self.sender.send_replace(TaskState::Idle);
    }
}

impl<T, E> Default for TaskTracker<T, E>
where
    T: Clone,
    E: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}
