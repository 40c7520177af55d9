//! Timed wrapper around I/O tasks polled from systems.
//!
//! Tasks are spawned on Bevy's `IoTaskPool` and polled once per frame with
//! `future::poll_once`. A [`TimedTask`] additionally carries a deadline:
//! once it passes, the task is dropped (which cancels it) and the caller
//! gets [`TaskPoll::TimedOut`] instead of waiting forever.

use std::future::Future;
use std::time::Duration;

use futures_lite::future;

/// Result of polling a [`TimedTask`]
#[derive(Debug, PartialEq, Eq)]
pub enum TaskPoll<T> {
    Pending,
    Ready(T),
    TimedOut,
    /// Already finished or timed out on an earlier poll
    Finished,
}

pub struct TimedTask<F: Future + Unpin> {
    task: Option<F>,
    deadline: Duration,
}

impl<F: Future + Unpin> TimedTask<F> {
    /// `now` and `timeout` are measured on the same clock as later polls
    /// (Bevy's `Time::elapsed`).
    pub fn new(task: F, now: Duration, timeout: Duration) -> Self {
        Self {
            task: Some(task),
            deadline: now + timeout,
        }
    }

    pub fn deadline(&self) -> Duration {
        self.deadline
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_none()
    }

    pub fn poll(&mut self, now: Duration) -> TaskPoll<F::Output> {
        let Some(task) = self.task.as_mut() else {
            return TaskPoll::Finished;
        };

        if let Some(output) = future::block_on(future::poll_once(task)) {
            self.task = None;
            return TaskPoll::Ready(output);
        }

        if now >= self.deadline {
            self.task = None;
            return TaskPoll::TimedOut;
        }

        TaskPoll::Pending
    }

    /// Drop the task without waiting for it
    pub fn cancel(&mut self) {
        self.task = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_task_completes_on_first_poll() {
        let mut task = TimedTask::new(future::ready(7), Duration::ZERO, Duration::from_secs(1));
        assert_eq!(task.poll(Duration::ZERO), TaskPoll::Ready(7));
        assert!(task.is_finished());
        assert_eq!(task.poll(Duration::ZERO), TaskPoll::Finished);
    }

    #[test]
    fn test_pending_task_times_out() {
        let start = Duration::from_secs(10);
        let mut task = TimedTask::new(future::pending::<u8>(), start, Duration::from_secs(2));

        assert_eq!(task.poll(start), TaskPoll::Pending);
        assert_eq!(task.poll(start + Duration::from_secs(1)), TaskPoll::Pending);
        assert_eq!(task.poll(start + Duration::from_secs(2)), TaskPoll::TimedOut);
        assert_eq!(task.poll(start + Duration::from_secs(3)), TaskPoll::Finished);
    }

    #[test]
    fn test_cancel_finishes_task() {
        let mut task = TimedTask::new(future::pending::<u8>(), Duration::ZERO, Duration::from_secs(1));
        task.cancel();
        assert!(task.is_finished());
        assert_eq!(task.poll(Duration::ZERO), TaskPoll::Finished);
    }
}
