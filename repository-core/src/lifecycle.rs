//! Lifecycle states of a repository instance.

use std::fmt;

/// Where a repository is in its lifecycle.
///
/// `Fresh` → `Initialized` via [`Repository::initialize`](crate::Repository::initialize);
/// either state → `Disposed` via [`Repository::dispose`](crate::Repository::dispose).
/// Nothing leaves `Disposed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleState {
    Fresh,
    Initialized,
    Disposed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Fresh => "fresh",
            LifecycleState::Initialized => "initialized",
            LifecycleState::Disposed => "disposed",
        }
    }

    /// True once no data operation may run against the instance again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LifecycleState::Disposed)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
