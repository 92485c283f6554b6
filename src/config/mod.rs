//! Artifact folder configuration.
//!
//! Hosts package informational artifacts (software information, VES event
//! registrations, performance dictionaries) under configurable folders inside
//! the archive. The engine only needs this to answer "where would artifacts
//! of this type live", for the optional metadata-folder lookup on
//! [`crate::session::CsarSession`]. The configuration is an explicit value
//! handed to the session constructor, never ambient global state, so two
//! sessions can run with different folder layouts side by side.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Categories of informational artifacts with a configured folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactType {
    /// Software version information for the packaged component
    SoftwareInformation,
    /// VES event registration documents
    VesEvents,
    /// Performance measurement dictionaries
    PmDictionary,
}

/// Mapping from artifact type to the archive folder that carries it.
///
/// [`FolderTypeConfig::default`] reflects the conventional package layout;
/// hosts with a different layout build their own mapping with
/// [`with_folder`](Self::with_folder) or deserialize one from a
/// configuration document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderTypeConfig {
    folders: HashMap<ArtifactType, String>,
}

impl FolderTypeConfig {
    /// An empty configuration with no folders mapped.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            folders: HashMap::new(),
        }
    }

    /// Add or replace the folder for one artifact type.
    #[must_use]
    pub fn with_folder(mut self, artifact_type: ArtifactType, folder: impl Into<String>) -> Self {
        self.folders.insert(artifact_type, folder.into());
        self
    }

    /// The configured folder path for `artifact_type`, if any.
    #[must_use]
    pub fn folder_path(&self, artifact_type: ArtifactType) -> Option<&str> {
        self.folders.get(&artifact_type).map(String::as_str)
    }
}

impl Default for FolderTypeConfig {
    fn default() -> Self {
        Self::empty()
            .with_folder(
                ArtifactType::SoftwareInformation,
                "Artifacts/Informational/SW_INFORMATION",
            )
            .with_folder(ArtifactType::VesEvents, "Artifacts/Deployment/VES_EVENTS")
            .with_folder(ArtifactType::PmDictionary, "Artifacts/Deployment/PM_DICTIONARY")
    }
}
