//! Extraction session: the owner of one catalog-building run.
//!
//! A [`CsarSession`] binds together everything with session lifetime: the
//! immutable [`CsarArchive`] snapshot, the decoded main service template,
//! the memoized per-path document cache, the lazily-merged data-type map,
//! the created-node bookkeeping a downstream builder consults, and the
//! [`CompositionQueue`] used to drive recursive expansion of nested
//! components. Sessions are single-threaded and synchronous; independent
//! sessions share nothing, so a host may process several archives in
//! parallel without coordination.

use crate::archive::CsarArchive;
use crate::catalog::{self, NodeTypeCatalog};
use crate::config::{ArtifactType, FolderTypeConfig};
use crate::core::CsarError;
use crate::document::{self, ToscaTag};
use crate::queue::CompositionQueue;
use anyhow::{Context, Result};
use serde_yaml::{Mapping, Value};
use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// One node-type extraction session over an immutable archive snapshot.
///
/// Construct with [`CsarSession::new`], then call
/// [`extract_node_type_catalog`](Self::extract_node_type_catalog) to build
/// the catalog. The caller drives recursive expansion of nested components
/// through [`enqueue_pending`](Self::enqueue_pending) /
/// [`dequeue_pending`](Self::dequeue_pending), consulting
/// [`data_types`](Self::data_types) and the catalog as needed.
#[derive(Debug)]
pub struct CsarSession {
    archive: CsarArchive,
    component_name: String,
    main_template_path: String,
    main_template: Mapping,
    folder_config: FolderTypeConfig,
    global_substitutes: Vec<String>,
    decoded: HashMap<String, Mapping>,
    data_types: Option<HashMap<String, Value>>,
    queue: CompositionQueue,
    created_nodes: HashMap<String, String>,
    is_update: bool,
}

impl CsarSession {
    /// Open a session over `archive`.
    ///
    /// `component_name` is the top-level component being onboarded; it only
    /// appears in diagnostics. The main template at `main_template_path` is
    /// decoded eagerly, since nothing in the session is usable without it.
    ///
    /// # Errors
    ///
    /// Fails when the main template is missing from the archive
    /// ([`CsarError::EntryNotFound`]) or cannot be decoded
    /// ([`CsarError::DocumentDecode`]).
    pub fn new(
        archive: CsarArchive,
        component_name: impl Into<String>,
        main_template_path: impl Into<String>,
        folder_config: FolderTypeConfig,
    ) -> Result<Self> {
        let component_name = component_name.into();
        let main_template_path = main_template_path.into();
        let main_template = {
            let bytes = archive.bytes_of(&main_template_path)?;
            document::decode_template(&main_template_path, bytes)?
        };
        let global_substitutes = archive.global_substitute_paths();
        // seed the cache so extraction never re-decodes the main template
        let mut decoded = HashMap::new();
        decoded.insert(main_template_path.clone(), main_template.clone());
        debug!(
            component = %component_name,
            main_template = %main_template_path,
            global_substitutes = global_substitutes.len(),
            "opened extraction session"
        );
        Ok(Self {
            archive,
            component_name,
            main_template_path,
            main_template,
            folder_config,
            global_substitutes,
            decoded,
            data_types: None,
            queue: CompositionQueue::new(),
            created_nodes: HashMap::new(),
            is_update: false,
        })
    }

    /// The archive this session operates on.
    #[must_use]
    pub fn archive(&self) -> &CsarArchive {
        &self.archive
    }

    /// Name of the component being onboarded.
    #[must_use]
    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Archive path of the main service template.
    #[must_use]
    pub fn main_template_path(&self) -> &str {
        &self.main_template_path
    }

    /// The decoded main service template.
    #[must_use]
    pub fn main_template(&self) -> &Mapping {
        &self.main_template
    }

    /// Whether this session represents an update of an existing component
    /// rather than a first-time creation. Pure bookkeeping for the
    /// downstream builder.
    #[must_use]
    pub fn is_update(&self) -> bool {
        self.is_update
    }

    /// Mark the session as a create or an update.
    pub fn set_update(&mut self, is_update: bool) {
        self.is_update = is_update;
    }

    /// Build the node-type catalog for this archive.
    ///
    /// Scans every service template outside the global substitution library,
    /// then enriches the catalog from the library (derived-from links first,
    /// then imports of used-but-undefined types), and finally marks nested
    /// composite components against the main template. Running this twice on
    /// the same session yields structurally equal catalogs.
    ///
    /// # Errors
    ///
    /// Fails when any classified service template cannot be decoded; there
    /// is no partial-catalog recovery.
    pub fn extract_node_type_catalog(&mut self) -> Result<NodeTypeCatalog> {
        let mut catalog = NodeTypeCatalog::new();
        let mut used = HashSet::new();

        let local_templates: Vec<String> = self
            .archive
            .list_entries()
            .filter(|path| {
                self.archive.is_service_template(path) && !self.archive.is_global_substitute(path)
            })
            .map(str::to_string)
            .collect();
        for path in &local_templates {
            let template = self
                .decoded_template(path)
                .with_context(|| format!("while scanning service template '{path}'"))?;
            catalog::collect_substitution_mapping(&mut catalog, path, template);
            catalog::collect_used_node_types(template, &mut used);
        }

        if !self.global_substitutes.is_empty() {
            // derived-from must complete before imports examine catalog
            // membership, so substitution-mapping entries are already present
            let library_paths = self.global_substitutes.clone();
            for path in &library_paths {
                let template = self.decoded_template(path)?;
                catalog::apply_derived_from(&mut catalog, template);
            }
            for path in &library_paths {
                let template = self.decoded_template(path)?;
                catalog::import_global_types(&mut catalog, &used, path, template);
            }
        }

        catalog::mark_nested_components(&self.main_template, &mut catalog);
        debug!(
            component = %self.component_name,
            node_types = catalog.len(),
            "extracted node-type catalog"
        );
        Ok(catalog)
    }

    /// Data-type definitions merged from every global substitution document
    /// and the main template, main-template entries applied last so they
    /// override library entries of the same name. Computed once and cached
    /// for the session's lifetime.
    ///
    /// # Errors
    ///
    /// Fails on the first call when a global substitution document cannot be
    /// decoded.
    pub fn data_types(&mut self) -> Result<&HashMap<String, Value>> {
        let merged = match self.data_types.take() {
            Some(cached) => cached,
            None => self.merge_data_types()?,
        };
        Ok(self.data_types.insert(merged))
    }

    fn merge_data_types(&mut self) -> Result<HashMap<String, Value>> {
        let mut merged = HashMap::new();
        let library_paths = self.global_substitutes.clone();
        for path in &library_paths {
            let template = self.decoded_template(path)?;
            collect_data_types(template, &mut merged);
        }
        collect_data_types(&self.main_template, &mut merged);
        debug!(data_types = merged.len(), "merged data-type definitions");
        Ok(merged)
    }

    /// Queue `type_name` for recursive expansion.
    ///
    /// # Errors
    ///
    /// Returns [`CsarError::NestingCycle`] when `type_name` is already
    /// pending, meaning the component nests into itself.
    pub fn enqueue_pending(&mut self, type_name: impl Into<String>) -> Result<(), CsarError> {
        self.queue.enqueue(&self.component_name, type_name)
    }

    /// Remove and return the oldest type name pending expansion.
    ///
    /// # Errors
    ///
    /// Returns [`CsarError::EmptyQueue`] when nothing is pending.
    pub fn dequeue_pending(&mut self) -> Result<String, CsarError> {
        self.queue.dequeue()
    }

    /// Whether `type_name` is currently queued for expansion.
    #[must_use]
    pub fn is_pending(&self, type_name: &str) -> bool {
        self.queue.contains(type_name)
    }

    /// Record that the downstream builder created a resource named
    /// `resource_name` for `type_name`, so later expansions reuse it instead
    /// of rebuilding.
    pub fn register_created_node(
        &mut self,
        type_name: impl Into<String>,
        resource_name: impl Into<String>,
    ) {
        self.created_nodes.insert(type_name.into(), resource_name.into());
    }

    /// Resource name previously registered for `type_name`, if any.
    #[must_use]
    pub fn created_node_name(&self, type_name: &str) -> Option<&str> {
        self.created_nodes.get(type_name).map(String::as_str)
    }

    /// All created-node registrations, keyed by type name.
    #[must_use]
    pub fn created_nodes(&self) -> &HashMap<String, String> {
        &self.created_nodes
    }

    /// First archive path under the folder configured for software
    /// information artifacts, if both the configuration entry and such an
    /// entry exist.
    #[must_use]
    pub fn software_information_path(&self) -> Option<&str> {
        if self.archive.is_empty() {
            return None;
        }
        let folder = self.folder_config.folder_path(ArtifactType::SoftwareInformation)?;
        self.archive.first_path_under(folder)
    }

    /// Decoded service template at `path`, decoding on first access and
    /// serving the session cache afterwards.
    fn decoded_template(&mut self, path: &str) -> Result<&Mapping, CsarError> {
        match self.decoded.entry(path.to_string()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let bytes = self.archive.bytes_of(path)?;
                let template = document::decode_template(path, bytes)?;
                Ok(entry.insert(template))
            }
        }
    }
}

fn collect_data_types(template: &Mapping, merged: &mut HashMap<String, Value>) {
    let Some(data_types) = document::mapping_section(template, ToscaTag::DataTypes) else {
        return;
    };
    for (name, definition) in data_types {
        if let Some(name) = name.as_str() {
            merged.insert(name.to_string(), definition.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN_PATH: &str = "Definitions/MainServiceTemplate.yaml";
    const GLOBAL_PATH: &str = "Definitions/GlobalSubstitutionTypesServiceTemplate.yaml";

    fn archive(entries: &[(&str, &str)]) -> CsarArchive {
        CsarArchive::new(
            entries
                .iter()
                .map(|(path, content)| (path.to_string(), content.as_bytes().to_vec())),
        )
    }

    fn session(entries: &[(&str, &str)]) -> CsarSession {
        CsarSession::new(archive(entries), "test-vf", MAIN_PATH, FolderTypeConfig::default())
            .unwrap()
    }

    #[test]
    fn missing_main_template_fails() {
        let err = CsarSession::new(
            archive(&[("Artifacts/readme.txt", "hi")]),
            "test-vf",
            MAIN_PATH,
            FolderTypeConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CsarError>(),
            Some(CsarError::EntryNotFound { .. })
        ));
    }

    #[test]
    fn undecodable_main_template_fails() {
        let err = CsarSession::new(
            archive(&[(MAIN_PATH, "a: [unclosed")]),
            "test-vf",
            MAIN_PATH,
            FolderTypeConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CsarError>(),
            Some(CsarError::DocumentDecode { .. })
        ));
    }

    #[test]
    fn undecodable_secondary_template_aborts_extraction() {
        let mut session = session(&[
            (MAIN_PATH, "topology_template: {}\n"),
            ("Definitions/broken.yaml", "a: [unclosed"),
        ]);
        let err = session.extract_node_type_catalog().unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CsarError>(),
            Some(CsarError::DocumentDecode { path, .. }) if path == "Definitions/broken.yaml"
        ));
    }

    #[test]
    fn opaque_artifacts_are_never_decoded() {
        let mut session = session(&[
            (MAIN_PATH, "topology_template: {}\n"),
            ("Artifacts/blob.bin", "\u{1}\u{2}not yaml ["),
        ]);
        assert!(session.extract_node_type_catalog().is_ok());
    }

    #[test]
    fn main_template_is_decoded_once_and_served_from_the_cache() {
        let mut session = session(&[(MAIN_PATH, "topology_template: {}\n")]);
        // construction seeds the cache with the eagerly decoded main template
        assert!(session.decoded.contains_key(MAIN_PATH));
        let cached = session.decoded_template(MAIN_PATH).unwrap().clone();
        assert_eq!(&cached, session.main_template());
    }

    #[test]
    fn data_types_are_cached_after_first_merge() {
        let mut session = session(&[
            (MAIN_PATH, "data_types:\n  vendor.data.Port:\n    x: 2\n"),
            (GLOBAL_PATH, "data_types:\n  vendor.data.Port:\n    x: 1\n"),
        ]);
        let first = session.data_types().unwrap().clone();
        let second = session.data_types().unwrap().clone();
        assert_eq!(first, second);
        let port = first["vendor.data.Port"].as_mapping().unwrap();
        assert_eq!(port.get("x").and_then(Value::as_i64), Some(2));
    }

    #[test]
    fn created_node_bookkeeping_round_trips() {
        let mut session = session(&[(MAIN_PATH, "topology_template: {}\n")]);
        assert_eq!(session.created_node_name("vendor.nodes.Firewall"), None);
        session.register_created_node("vendor.nodes.Firewall", "firewall-vf");
        assert_eq!(session.created_node_name("vendor.nodes.Firewall"), Some("firewall-vf"));
        assert_eq!(session.created_nodes().len(), 1);
    }

    #[test]
    fn update_flag_defaults_to_create() {
        let mut session = session(&[(MAIN_PATH, "topology_template: {}\n")]);
        assert!(!session.is_update());
        session.set_update(true);
        assert!(session.is_update());
    }

    #[test]
    fn software_information_path_uses_configured_folder() {
        let session = session(&[
            (MAIN_PATH, "topology_template: {}\n"),
            ("Artifacts/Informational/SW_INFORMATION/versions.yaml", ""),
        ]);
        assert_eq!(
            session.software_information_path(),
            Some("Artifacts/Informational/SW_INFORMATION/versions.yaml")
        );
    }

    #[test]
    fn software_information_path_absent_when_unconfigured() {
        let session = CsarSession::new(
            archive(&[
                (MAIN_PATH, "topology_template: {}\n"),
                ("Artifacts/Informational/SW_INFORMATION/versions.yaml", ""),
            ]),
            "test-vf",
            MAIN_PATH,
            FolderTypeConfig::empty(),
        )
        .unwrap();
        assert_eq!(session.software_information_path(), None);
    }
}
