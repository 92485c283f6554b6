//! Error types for CSAR catalog extraction.
//!
//! The error system follows two principles:
//! 1. **Strongly-typed errors** for precise handling in code
//! 2. **Messages written for the person reading the diagnostic**, naming the
//!    archive entry or node type involved
//!
//! Entry points on [`crate::session::CsarSession`] return
//! [`anyhow::Result`], so callers that only need a diagnostic can bubble the
//! error up with `?`, while callers that branch on a failure mode downcast:
//!
//! ```rust
//! use csar_catalog::CsarError;
//!
//! fn is_cycle(err: &anyhow::Error) -> bool {
//!     matches!(err.downcast_ref::<CsarError>(), Some(CsarError::NestingCycle { .. }))
//! }
//! ```

use thiserror::Error;

/// The error type for all CSAR catalog extraction failures.
///
/// # Error Categories
///
/// - **Document decoding**: [`DocumentDecode`] - a classified service
///   template could not be decoded. Fatal to the session; archive content is
///   static, so the failure is not retried.
/// - **Nested-component expansion**: [`NestingCycle`], [`EmptyQueue`] -
///   composition-queue protocol violations during recursive expansion.
/// - **Archive lookup**: [`EntryNotFound`] - a caller asked for a path the
///   archive does not contain. Not expected during catalog building, since
///   every path iterated comes from the archive's own entry listing.
///
/// [`DocumentDecode`]: CsarError::DocumentDecode
/// [`NestingCycle`]: CsarError::NestingCycle
/// [`EmptyQueue`]: CsarError::EmptyQueue
/// [`EntryNotFound`]: CsarError::EntryNotFound
#[derive(Error, Debug)]
pub enum CsarError {
    /// A service template's bytes could not be decoded into a YAML mapping.
    ///
    /// Raised only for entries classified as service templates; opaque
    /// artifacts are never decoded. Absence of individual sections inside a
    /// well-formed document is normal and never produces this error.
    #[error("Failed to decode service template '{path}': {reason}")]
    DocumentDecode {
        /// Archive path of the undecodable document
        path: String,
        /// Underlying YAML parser diagnostic
        reason: String,
    },

    /// A nested component closed a cycle during recursive expansion.
    ///
    /// Raised when a type name is enqueued on the composition queue while an
    /// occurrence of the same name is still pending, meaning the component
    /// nests into itself, directly or through intermediates.
    #[error("Nesting cycle detected in component '{component}': type '{type_name}' is already pending expansion")]
    NestingCycle {
        /// Name of the top-level component being expanded
        component: String,
        /// The type whose re-enqueue closed the cycle
        type_name: String,
    },

    /// The composition queue was dequeued more times than it was enqueued.
    ///
    /// This is a caller error in the expansion protocol: every dequeue must
    /// be paired with an earlier successful enqueue.
    #[error("Composition queue is empty; dequeue must follow a successful enqueue")]
    EmptyQueue,

    /// An archive lookup named a path that does not exist.
    #[error("Archive entry '{path}' not found")]
    EntryNotFound {
        /// The requested archive path
        path: String,
    },
}
