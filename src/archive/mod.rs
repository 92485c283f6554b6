//! Read-only view over a packaged service-description archive.
//!
//! A [`CsarArchive`] is an immutable mapping from entry path to byte content,
//! constructed once per extraction session. Decompression is the caller's
//! concern; this crate only consumes the already-extracted entries.
//! Classification of an entry is derived purely from its path string: a
//! pattern match decides "is this a service template", and an exact-name set
//! (two reserved file names) decides "is this part of the global
//! substitution library".

use crate::constants;
use crate::core::CsarError;
use std::collections::BTreeMap;

/// Immutable path-to-bytes view of one CSAR snapshot.
///
/// Entries are held in a `BTreeMap`, so iteration order is deterministic
/// across runs; catalog extraction is idempotent for a fixed archive.
#[derive(Debug, Clone, Default)]
pub struct CsarArchive {
    entries: BTreeMap<String, Vec<u8>>,
}

impl CsarArchive {
    /// Build an archive view from `(path, bytes)` pairs.
    #[must_use]
    pub fn new(entries: impl IntoIterator<Item = (String, Vec<u8>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Number of entries in the archive.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the archive holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `path` names an entry.
    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// All entry paths, in deterministic (lexicographic) order.
    pub fn list_entries(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Byte content of the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`CsarError::EntryNotFound`] when the archive has no such
    /// entry.
    pub fn bytes_of(&self, path: &str) -> Result<&[u8], CsarError> {
        self.entries
            .get(path)
            .map(Vec::as_slice)
            .ok_or_else(|| CsarError::EntryNotFound {
                path: path.to_string(),
            })
    }

    /// Whether `path` is classified as a service template document.
    #[must_use]
    pub fn is_service_template(&self, path: &str) -> bool {
        constants::is_service_template_path(path)
    }

    /// Whether `path` is one of the reserved global substitution library
    /// files.
    #[must_use]
    pub fn is_global_substitute(&self, path: &str) -> bool {
        constants::is_global_substitute_path(path)
    }

    /// Paths of the global substitution library files present in this
    /// archive, in deterministic order.
    #[must_use]
    pub fn global_substitute_paths(&self) -> Vec<String> {
        self.list_entries()
            .filter(|path| self.is_service_template(path) && self.is_global_substitute(path))
            .map(str::to_string)
            .collect()
    }

    /// First entry path (in deterministic order) that starts with `prefix`,
    /// used to locate configured metadata folders.
    #[must_use]
    pub fn first_path_under(&self, prefix: &str) -> Option<&str> {
        self.list_entries().find(|path| path.starts_with(prefix))
    }
}
