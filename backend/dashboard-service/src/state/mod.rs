//! Per-page view state
//!
//! Every page walks the same lifecycle:
//!
//! ```text
//! Idle -> Loading -> Computing -> Ready -> Computing (refresh) -> Ready
//!            \           \
//!             `-> Failed  `-> Failed
//! ```
//!
//! `Failed` ends the cycle; a new page visit starts a fresh model.

pub mod feed_session;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::watch;

use crate::error::AppError;

pub use feed_session::{FeedSession, FeedSessions, FeedSnapshot, RefreshGuard};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewPhase {
    Idle,
    Loading,
    Computing,
    Ready,
    Failed,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid view transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: ViewPhase,
    pub to: ViewPhase,
}

impl From<TransitionError> for AppError {
    fn from(err: TransitionError) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Derived data for one page plus where it is in its lifecycle.
///
/// Data from the last `Ready` stays readable while a refresh is `Computing`.
#[derive(Debug, Clone)]
pub struct ViewModel<T> {
    phase: ViewPhase,
    data: Option<T>,
    failure: Option<String>,
}

impl<T> Default for ViewModel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ViewModel<T> {
    pub fn new() -> Self {
        Self {
            phase: ViewPhase::Idle,
            data: None,
            failure: None,
        }
    }

    pub fn phase(&self) -> ViewPhase {
        self.phase
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn take_data(&mut self) -> Option<T> {
        self.data.take()
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn start_loading(&mut self) -> Result<(), TransitionError> {
        self.move_to(ViewPhase::Loading, &[ViewPhase::Idle, ViewPhase::Failed])?;
        self.failure = None;
        Ok(())
    }

    pub fn start_computing(&mut self) -> Result<(), TransitionError> {
        self.move_to(ViewPhase::Computing, &[ViewPhase::Loading, ViewPhase::Ready])
    }

    pub fn finish(&mut self, data: T) -> Result<(), TransitionError> {
        self.move_to(ViewPhase::Ready, &[ViewPhase::Computing])?;
        self.data = Some(data);
        Ok(())
    }

    pub fn fail(&mut self, reason: impl Into<String>) -> Result<(), TransitionError> {
        self.move_to(ViewPhase::Failed, &[ViewPhase::Loading, ViewPhase::Computing])?;
        self.failure = Some(reason.into());
        Ok(())
    }

    /// Back out of a refresh that was abandoned; keeps whatever data was shown
    pub fn cancel(&mut self) {
        self.phase = if self.data.is_some() {
            ViewPhase::Ready
        } else {
            ViewPhase::Idle
        };
    }

    fn move_to(&mut self, to: ViewPhase, allowed_from: &[ViewPhase]) -> Result<(), TransitionError> {
        if !allowed_from.contains(&self.phase) {
            return Err(TransitionError {
                from: self.phase,
                to,
            });
        }
        self.phase = to;
        Ok(())
    }
}

/// Sender side of an abandon-on-navigation signal.
///
/// Dropping the handle abandons the work as well.
#[derive(Debug)]
pub struct AbandonHandle(watch::Sender<bool>);

/// Checked by long-running computations between upstream calls
#[derive(Debug, Clone)]
pub struct AbandonSignal(watch::Receiver<bool>);

pub fn abandon_pair() -> (AbandonHandle, AbandonSignal) {
    let (tx, rx) = watch::channel(false);
    (AbandonHandle(tx), AbandonSignal(rx))
}

impl AbandonHandle {
    pub fn abandon(&self) {
        self.0.send_replace(true);
    }
}

impl Drop for AbandonHandle {
    fn drop(&mut self) {
        self.0.send_replace(true);
    }
}

impl AbandonSignal {
    /// A signal that never fires
    pub fn never() -> Self {
        let (tx, rx) = watch::channel(false);
        drop(tx);
        Self(rx)
    }

    pub fn is_abandoned(&self) -> bool {
        *self.0.borrow()
    }
}
