//! Service-template document decoding and section access.
//!
//! A service template is a YAML document whose decoded form is a generic
//! attribute tree: `serde_yaml`'s tagged `Value` (scalar, sequence, or
//! mapping). This module turns raw archive bytes into that tree and gives the
//! catalog passes typed, shape-checked access to the handful of sections the
//! engine reads. Section absence is always tolerated and reported as `None`;
//! only a document that cannot be decoded at all is an error, and that error
//! is fatal to the extraction session.
//!
//! Section lookup is recursive: `node_templates` lives under
//! `topology_template`, so [`find_section`] walks nested mappings (and
//! mappings inside sequences) and returns the first element whose key and
//! shape both match.

use crate::core::CsarError;
use serde_yaml::{Mapping, Value};

/// Element names of the TOSCA sections and fields this engine reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToscaTag {
    /// `node_templates` - instances declared by a topology template
    NodeTemplates,
    /// `node_types` - type definitions local to a document
    NodeTypes,
    /// `substitution_mappings` - binds a document as a type implementation
    SubstitutionMappings,
    /// `node_type` - the type named by a substitution mapping
    NodeType,
    /// `data_types` - data-type definitions
    DataTypes,
    /// `derived_from` - single-parent inheritance declaration
    DerivedFrom,
    /// `type` - the declared type of a node template instance
    Type,
}

impl ToscaTag {
    /// The spelling of this element inside a service template document.
    #[must_use]
    pub const fn element_name(self) -> &'static str {
        match self {
            Self::NodeTemplates => "node_templates",
            Self::NodeTypes => "node_types",
            Self::SubstitutionMappings => "substitution_mappings",
            Self::NodeType => "node_type",
            Self::DataTypes => "data_types",
            Self::DerivedFrom => "derived_from",
            Self::Type => "type",
        }
    }
}

/// Expected shape of a section value.
///
/// The catalog passes only ever request [`Map`]-shaped sections; the other
/// shapes exist so lookups state their expectation explicitly instead of
/// casting.
///
/// [`Map`]: SectionShape::Map
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionShape {
    /// A YAML mapping
    Map,
    /// A YAML sequence
    Sequence,
    /// A YAML scalar (string, number, boolean, or null)
    Scalar,
}

impl SectionShape {
    fn matches(self, value: &Value) -> bool {
        match self {
            Self::Map => value.is_mapping(),
            Self::Sequence => value.is_sequence(),
            Self::Scalar => !value.is_mapping() && !value.is_sequence(),
        }
    }
}

/// Decode one archive entry's bytes into a service-template mapping.
///
/// # Errors
///
/// Returns [`CsarError::DocumentDecode`] when the bytes are not valid YAML
/// or the document root is not a mapping. Both mean the entry was classified
/// as a service template but cannot be processed as one, which aborts the
/// extraction session.
pub fn decode_template(path: &str, bytes: &[u8]) -> Result<Mapping, CsarError> {
    let value: Value = serde_yaml::from_slice(bytes).map_err(|err| CsarError::DocumentDecode {
        path: path.to_string(),
        reason: err.to_string(),
    })?;
    match value {
        Value::Mapping(mapping) => Ok(mapping),
        other => Err(CsarError::DocumentDecode {
            path: path.to_string(),
            reason: format!("expected a mapping at the document root, found {}", shape_name(&other)),
        }),
    }
}

fn shape_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Find the first element named `tag` with the expected `shape`, searching
/// `tree` depth-first through nested mappings and sequences.
///
/// Returns `None` both when the element is absent and when an element of
/// that name exists only with a different shape. Never fails: absence of a
/// section is a normal condition for every caller in this engine.
#[must_use]
pub fn find_section<'a>(tree: &'a Mapping, tag: ToscaTag, shape: SectionShape) -> Option<&'a Value> {
    for (key, value) in tree {
        if key.as_str() == Some(tag.element_name()) && shape.matches(value) {
            return Some(value);
        }
        match value {
            Value::Mapping(inner) => {
                if let Some(found) = find_section(inner, tag, shape) {
                    return Some(found);
                }
            }
            Value::Sequence(items) => {
                for item in items {
                    if let Value::Mapping(inner) = item
                        && let Some(found) = find_section(inner, tag, shape)
                    {
                        return Some(found);
                    }
                }
            }
            _ => {}
        }
    }
    None
}

/// [`find_section`] specialized to mapping-shaped sections.
#[must_use]
pub fn mapping_section<'a>(tree: &'a Mapping, tag: ToscaTag) -> Option<&'a Mapping> {
    match find_section(tree, tag, SectionShape::Map)? {
        Value::Mapping(mapping) => Some(mapping),
        _ => None,
    }
}

/// Direct (non-recursive) string-valued entry of `map`, e.g. the `type` of a
/// node template or the `derived_from` of a node-type definition.
#[must_use]
pub fn string_entry<'a>(map: &'a Mapping, tag: ToscaTag) -> Option<&'a str> {
    map.get(tag.element_name())?.as_str()
}
