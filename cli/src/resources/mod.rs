//! Idempotent resource primitives (check + apply pattern).
pub mod backup;
pub mod compare;
pub mod copy;
pub mod helpers;
pub mod link;
pub mod script;

use anyhow::Result;

/// Minimal interface for resources that can be described and applied.
///
/// Resources whose "current state" is not a meaningful question (a backup
/// either has something to move or it does not) implement only this trait.
pub trait Applicable {
    /// Human-readable description of this resource.
    fn description(&self) -> String;

    /// Apply the resource change.
    ///
    /// # Errors
    ///
    /// Returns an error if the resource cannot be applied due to I/O failures,
    /// permission issues, invalid paths, or other system errors.
    fn apply(&self) -> Result<ResourceChange>;
}

/// State of a destination relative to its source.
///
/// # Examples
///
/// ```
/// use homedots::resources::ResourceState;
///
/// let missing = ResourceState::Missing;
/// let correct = ResourceState::Correct;
/// let wrong = ResourceState::Incorrect { current: "line 3 differs".into() };
/// let skip = ResourceState::Invalid { reason: "source is a directory".into() };
///
/// assert_ne!(missing, correct);
/// assert!(missing.needs_action());
/// assert!(wrong.needs_action());
/// assert!(!skip.needs_action());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Destination does not exist (or cannot be stat'ed).
    Missing,
    /// Destination exists and matches the source.
    Correct,
    /// Destination exists but differs from the source.
    Incorrect {
        /// What was found at the destination.
        current: String,
    },
    /// The source is not something that can be compared (directory, device,
    /// symlink); the destination is left alone.
    Invalid {
        /// Reason why the resource is left alone.
        reason: String,
    },
}

impl ResourceState {
    /// Whether a reconcile step must act on this resource.
    #[must_use]
    pub const fn needs_action(&self) -> bool {
        matches!(self, Self::Missing | Self::Incorrect { .. })
    }
}

/// Result of applying a resource change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceChange {
    /// Resource was created, updated or moved.
    Applied,
    /// Nothing needed to change.
    AlreadyCorrect,
}

/// Resources that can determine their own state before being applied.
pub trait Resource: Applicable {
    /// Check the current state of the resource.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    fn current_state(&self) -> Result<ResourceState>;

    /// Determine if the resource needs to be changed.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`current_state`](Self::current_state).
    fn needs_change(&self) -> Result<bool> {
        Ok(self.current_state()?.needs_action())
    }
}
