//! Node-type catalog construction.
//!
//! The catalog maps node-type name to [`NodeTypeInfo`] and is built in
//! ordered passes over the archive's service templates:
//!
//! 1. **Local scan** - every non-library service template contributes an
//!    entry for its substitution mapping when the mapped type is not also
//!    defined locally in the same document, and the node types referenced by
//!    its node template instances feed a session-wide "used types" set.
//! 2. **Derived-from pass** - node-type definitions in the global
//!    substitution library attach their declared parent to entries already
//!    in the catalog.
//! 3. **Global import pass** - library definitions that are used by node
//!    templates but still missing from the catalog are imported, each with a
//!    scoped template narrowed to that single type.
//! 4. **Nesting marker** - substitution-mapping entries instantiated by the
//!    main template and carrying the user-defined namespace marker are
//!    flagged as nested composite components.
//!
//! Pass order is load-bearing: the import pass's "not yet in catalog" check
//! must see every substitution-mapping entry from the local scan, so
//! substitution-mapping entries always win over library imports of the same
//! name.

use crate::constants::USER_DEFINED_RESOURCE_NAMESPACE_PREFIX;
use crate::document::{self, ToscaTag};
use serde_yaml::{Mapping, Value};
use std::collections::{HashMap, HashSet};
use tracing::{debug, trace};

#[cfg(test)]
mod tests;

/// One resolved node type: the catalog's unit of truth.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeTypeInfo {
    /// Node-type name; unique key within the catalog.
    pub type_name: String,
    /// True when this entry originates from a document's
    /// substitution-mapping declaration rather than a plain type definition.
    pub is_substitution_mapping: bool,
    /// True when the type is a composite component that must itself be
    /// expanded recursively.
    pub is_nested: bool,
    /// Archive path of the originating service template.
    pub template_path: String,
    /// Reduced service template carrying only what downstream processing of
    /// this one type needs. For substitution-mapping entries this is the
    /// full originating document; for imported library types the `node_types`
    /// section is narrowed to the single definition.
    pub scoped_template: Mapping,
    /// Declared parent types. Resolution attaches at most one, but the
    /// shape stays a sequence for forward compatibility.
    pub derived_from: Vec<String>,
}

/// Catalog of node types keyed by type name.
pub type NodeTypeCatalog = HashMap<String, NodeTypeInfo>;

/// Local scan (pass 1) for one non-library service template: register an
/// external substitution mapping, if any.
///
/// A document that both defines and substitutes the same type is
/// self-contained, not an external reference, and produces no entry.
pub(crate) fn collect_substitution_mapping(
    catalog: &mut NodeTypeCatalog,
    path: &str,
    template: &Mapping,
) {
    let Some(substitution) = document::mapping_section(template, ToscaTag::SubstitutionMappings)
    else {
        return;
    };
    let Some(type_name) = document::string_entry(substitution, ToscaTag::NodeType) else {
        return;
    };
    if node_types_defined_in(template).contains(type_name) {
        trace!(path, type_name, "substituted type is defined locally, skipping");
        return;
    }
    debug!(path, type_name, "registering substitution-mapping node type");
    catalog.insert(
        type_name.to_string(),
        NodeTypeInfo {
            type_name: type_name.to_string(),
            is_substitution_mapping: true,
            is_nested: false,
            template_path: path.to_string(),
            scoped_template: template.clone(),
            derived_from: Vec::new(),
        },
    );
}

/// Collect the node-type names referenced by `template`'s node template
/// instances into `used` (pass 1).
pub(crate) fn collect_used_node_types(template: &Mapping, used: &mut HashSet<String>) {
    let Some(node_templates) = document::mapping_section(template, ToscaTag::NodeTemplates) else {
        return;
    };
    for (_, instance) in node_templates {
        if let Some(instance) = instance.as_mapping()
            && let Some(type_name) = document::string_entry(instance, ToscaTag::Type)
        {
            used.insert(type_name.to_string());
        }
    }
}

/// Node-type names defined in `template`'s own `node_types` section.
pub(crate) fn node_types_defined_in(template: &Mapping) -> HashSet<String> {
    let mut defined = HashSet::new();
    if let Some(node_types) = document::mapping_section(template, ToscaTag::NodeTypes) {
        for (name, _) in node_types {
            if let Some(name) = name.as_str() {
                defined.insert(name.to_string());
            }
        }
    }
    defined
}

/// Derived-from pass (pass 2) for one global substitution document: attach
/// declared parents to catalog entries that already exist. Definitions not
/// in the catalog are left untouched here.
pub(crate) fn apply_derived_from(catalog: &mut NodeTypeCatalog, template: &Mapping) {
    let Some(node_types) = document::mapping_section(template, ToscaTag::NodeTypes) else {
        return;
    };
    for (name, definition) in node_types {
        let Some(name) = name.as_str() else { continue };
        let Some(definition) = definition.as_mapping() else {
            continue;
        };
        if let Some(parent) = document::string_entry(definition, ToscaTag::DerivedFrom)
            && let Some(info) = catalog.get_mut(name)
        {
            debug!(type_name = name, parent, "attaching derived-from parent");
            info.derived_from = vec![parent.to_string()];
        }
    }
}

/// Global import pass (pass 3) for one global substitution document at
/// `path`: import every definition that node templates use but the catalog
/// does not yet contain.
///
/// Imported entries are created nested (library composites are expanded by
/// definition) and carry a scoped template so a later expansion step
/// receives a minimal self-describing document instead of the whole library.
pub(crate) fn import_global_types(
    catalog: &mut NodeTypeCatalog,
    used: &HashSet<String>,
    path: &str,
    template: &Mapping,
) {
    let Some(node_types) = document::mapping_section(template, ToscaTag::NodeTypes) else {
        return;
    };
    for (name, definition) in node_types {
        let Some(name) = name.as_str() else { continue };
        if catalog.contains_key(name) || !used.contains(name) {
            continue;
        }
        debug!(path, type_name = name, "importing node type from global substitution library");
        let derived_from = definition
            .as_mapping()
            .and_then(|definition| document::string_entry(definition, ToscaTag::DerivedFrom))
            .map(|parent| vec![parent.to_string()])
            .unwrap_or_default();
        catalog.insert(
            name.to_string(),
            NodeTypeInfo {
                type_name: name.to_string(),
                is_substitution_mapping: false,
                is_nested: true,
                template_path: path.to_string(),
                scoped_template: scoped_template_for(name, template),
                derived_from,
            },
        );
    }
}

/// Copy of `template` with its `node_types` section narrowed to the single
/// definition of `type_name`; every other section carries through unchanged.
pub(crate) fn scoped_template_for(type_name: &str, template: &Mapping) -> Mapping {
    let mut narrowed = Mapping::new();
    if let Some(node_types) = document::mapping_section(template, ToscaTag::NodeTypes)
        && let Some(definition) = node_types.get(type_name)
    {
        narrowed.insert(Value::String(type_name.to_string()), definition.clone());
    }
    let mut scoped = template.clone();
    scoped.insert(
        Value::String(ToscaTag::NodeTypes.element_name().to_string()),
        Value::Mapping(narrowed),
    );
    scoped
}

/// Nesting marker: flag catalog entries instantiated by `template`'s node
/// templates as nested composite components.
///
/// Only substitution-mapping entries whose type name carries the
/// user-defined namespace marker are flipped; library-provided types stay
/// leaf types even when a node template references them. Callers driving
/// recursive expansion also apply this to the scoped template of each nested
/// component they descend into.
pub fn mark_nested_components(template: &Mapping, catalog: &mut NodeTypeCatalog) {
    let Some(node_templates) = document::mapping_section(template, ToscaTag::NodeTemplates) else {
        return;
    };
    for (_, instance) in node_templates {
        let Some(instance) = instance.as_mapping() else {
            continue;
        };
        let Some(type_name) = document::string_entry(instance, ToscaTag::Type) else {
            continue;
        };
        if let Some(info) = catalog.get_mut(type_name)
            && info.is_substitution_mapping
            && type_name.contains(USER_DEFINED_RESOURCE_NAMESPACE_PREFIX)
        {
            debug!(type_name, "marking substitution-mapping type as nested component");
            info.is_nested = true;
        }
    }
}
