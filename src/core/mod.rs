//! Core types shared across the extraction engine.
//!
//! Currently this is the error taxonomy: every failure mode of catalog
//! extraction and nested-component expansion is an explicit [`CsarError`]
//! variant, propagated unmodified to the caller of the entry point that
//! triggered it. The engine never swallows one of these internally, and
//! there is no partial-catalog recovery: a decode failure anywhere
//! invalidates the whole session's catalog.

pub mod error;

pub use error::CsarError;
