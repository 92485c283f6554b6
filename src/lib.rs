//! CSAR node-type catalog extraction and substitution resolution.
//!
//! A CSAR (Cloud Service Archive) is a packaged service description: a set of
//! named byte entries, each either a TOSCA service template (YAML) or an
//! opaque artifact. This crate walks every service template in an archive,
//! builds a unified catalog of node-type definitions, including types that
//! are not declared locally but are pulled in from the shared global
//! substitution library, marks which types are nested composite components,
//! and detects cyclic nesting before a downstream builder recurses into it
//! unboundedly.
//!
//! # Architecture Overview
//!
//! Extraction is session-based: a [`CsarSession`] owns one immutable
//! [`CsarArchive`] snapshot plus all per-session caches, and produces the
//! catalog in a single synchronous pass:
//!
//! 1. Every service template (except the global substitution library files)
//!    is decoded and scanned: external substitution-mapping declarations
//!    become catalog entries, and the node types referenced by node templates
//!    are collected into a "used types" set.
//! 2. The global substitution library contributes `derived_from` links for
//!    existing entries, then imports any library type that is used by a node
//!    template but not yet in the catalog.
//! 3. The nesting marker flags which substitution-mapping entries in the main
//!    template are user-defined composite components requiring recursive
//!    expansion.
//!
//! The caller then drives recursive expansion of nested components through
//! the session's [`CompositionQueue`], which rejects a second pending
//! occurrence of the same type name as a nesting cycle.
//!
//! # Core Modules
//!
//! - [`archive`] - Read-only archive view with path classification
//! - [`catalog`] - [`NodeTypeInfo`] and the catalog-building passes
//! - [`config`] - Artifact folder configuration for metadata lookups
//! - [`core`] - Error taxonomy ([`CsarError`])
//! - [`document`] - YAML attribute-tree decoding and TOSCA section accessors
//! - [`queue`] - Cycle-detecting FIFO of pending composite components
//! - [`session`] - [`CsarSession`], the extraction entry point
//!
//! # Example
//!
//! ```rust
//! use csar_catalog::{CsarArchive, CsarSession, FolderTypeConfig};
//!
//! let main = r#"
//! topology_template:
//!   node_templates:
//!     firewall_0:
//!       type: vendor.nodes.Firewall
//! "#;
//! let library = r#"
//! node_types:
//!   vendor.nodes.Firewall:
//!     derived_from: tosca.nodes.Root
//! "#;
//! let archive = CsarArchive::new([
//!     ("Definitions/MainServiceTemplate.yaml".to_string(), main.into()),
//!     (
//!         "Definitions/GlobalSubstitutionTypesServiceTemplate.yaml".to_string(),
//!         library.into(),
//!     ),
//! ]);
//!
//! let mut session = CsarSession::new(
//!     archive,
//!     "my-service",
//!     "Definitions/MainServiceTemplate.yaml",
//!     FolderTypeConfig::default(),
//! )?;
//! let catalog = session.extract_node_type_catalog()?;
//!
//! let firewall = &catalog["vendor.nodes.Firewall"];
//! assert!(firewall.is_nested);
//! assert_eq!(firewall.derived_from, vec!["tosca.nodes.Root"]);
//! # anyhow::Ok(())
//! ```

// Core functionality modules
pub mod constants;
pub mod core;
pub mod session;

// Archive and document access
pub mod archive;
pub mod document;

// Catalog construction
pub mod catalog;
pub mod config;
pub mod queue;

pub use archive::CsarArchive;
pub use catalog::{NodeTypeCatalog, NodeTypeInfo, mark_nested_components};
pub use config::{ArtifactType, FolderTypeConfig};
pub use core::CsarError;
pub use document::{SectionShape, ToscaTag};
pub use queue::CompositionQueue;
pub use session::CsarSession;
