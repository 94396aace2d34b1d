//! Error types for store operations.

use crate::handle::Construct;
use crate::locator::Locator;
use thiserror::Error;

/// Errors raised when an operation would violate a TMDM identity constraint.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The item identifier already belongs to a different, non-mergeable construct.
    #[error("item identifier {locator} is already used by {owner}")]
    IdentityConflict {
        /// Offending item identifier.
        locator: Locator,
        /// Construct that owns the identifier.
        owner: Construct,
    },
    /// The topic already reifies another construct.
    #[error("topic already reifies {reified}")]
    ReifierConflict {
        /// Construct currently reified by the topic.
        reified: Construct,
    },
    /// Both topics reify different constructs.
    #[error("cannot merge topics reifying {left} and {right}")]
    MergeConflict {
        /// Construct reified by the surviving topic.
        left: Construct,
        /// Construct reified by the absorbed topic.
        right: Construct,
    },
}
