//! Well-known CSAR path conventions and TOSCA namespace markers.
//!
//! These values describe the fixed layout of a packaged service description:
//! where service templates live, which reserved file names carry the global
//! substitution library, and how user-authored node-type namespaces are
//! distinguished from library namespaces. Defining them centrally keeps the
//! classification rules in one discoverable place.

use regex::Regex;
use std::sync::LazyLock;

/// Directory prefix under which all service templates are packaged.
pub const DEFINITIONS_PATH: &str = "Definitions/";

/// Pattern a path must fully match to be classified as a service template.
///
/// Matches any `.yml`/`.yaml` file directly under [`DEFINITIONS_PATH`].
/// Artifacts and metadata files elsewhere in the archive never match.
pub const SERVICE_TEMPLATE_PATH_PATTERN: &str = r"^Definitions/[^/]+\.ya?ml$";

/// Reserved path of the global substitution types service template.
pub const GLOBAL_SUBSTITUTION_TYPES_SERVICE_TEMPLATE: &str =
    "Definitions/GlobalSubstitutionTypesServiceTemplate.yaml";

/// Reserved path of the abstract substitute global types service template.
pub const ABSTRACT_SUBSTITUTE_GLOBAL_TYPES_SERVICE_TEMPLATE: &str =
    "Definitions/AbstractSubstituteGlobalTypesServiceTemplate.yaml";

/// Namespace marker carried by user-defined (package-local) node types.
///
/// Only substitution-mapping types whose name contains this marker are
/// treated as recursively expandable composite components; types from
/// library namespaces stay leaf types even when structurally similar.
pub const USER_DEFINED_RESOURCE_NAMESPACE_PREFIX: &str = "org.openecomp.resource.";

static SERVICE_TEMPLATE_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(SERVICE_TEMPLATE_PATH_PATTERN).expect("service template path pattern is valid")
});

/// Whether `path` names a service template document.
#[must_use]
pub fn is_service_template_path(path: &str) -> bool {
    SERVICE_TEMPLATE_PATH_RE.is_match(path)
}

/// Whether `path` names one of the reserved global substitution library
/// files. Comparison is case-insensitive, matching how archives produced by
/// different packagers spell the reserved names.
#[must_use]
pub fn is_global_substitute_path(path: &str) -> bool {
    path.eq_ignore_ascii_case(GLOBAL_SUBSTITUTION_TYPES_SERVICE_TEMPLATE)
        || path.eq_ignore_ascii_case(ABSTRACT_SUBSTITUTE_GLOBAL_TYPES_SERVICE_TEMPLATE)
}
