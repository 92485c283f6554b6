#[cfg(test)]
mod catalog_tests {
    use super::super::*;
    use crate::document::decode_template;
    use serde_yaml::Mapping;
    use std::collections::{HashMap, HashSet};

    fn template(yaml: &str) -> Mapping {
        decode_template("Definitions/test.yaml", yaml.as_bytes()).unwrap()
    }

    fn substitution_entry(type_name: &str) -> NodeTypeInfo {
        NodeTypeInfo {
            type_name: type_name.to_string(),
            is_substitution_mapping: true,
            is_nested: false,
            template_path: "Definitions/nested.yaml".to_string(),
            scoped_template: Mapping::new(),
            derived_from: Vec::new(),
        }
    }

    #[test]
    fn external_substitution_mapping_is_registered() {
        let template = template(
            r#"
substitution_mappings:
  node_type: org.openecomp.resource.vf.Firewall
"#,
        );
        let mut catalog = HashMap::new();
        collect_substitution_mapping(&mut catalog, "Definitions/nested.yaml", &template);

        let info = &catalog["org.openecomp.resource.vf.Firewall"];
        assert!(info.is_substitution_mapping);
        assert!(!info.is_nested);
        assert_eq!(info.template_path, "Definitions/nested.yaml");
        assert_eq!(info.scoped_template, template);
        assert!(info.derived_from.is_empty());
    }

    #[test]
    fn self_contained_substitution_is_skipped() {
        // defines and substitutes the same type: not an external reference
        let template = template(
            r#"
substitution_mappings:
  node_type: org.openecomp.resource.vf.Firewall
node_types:
  org.openecomp.resource.vf.Firewall:
    derived_from: tosca.nodes.Root
"#,
        );
        let mut catalog = HashMap::new();
        collect_substitution_mapping(&mut catalog, "Definitions/self.yaml", &template);
        assert!(catalog.is_empty());
    }

    #[test]
    fn substitution_without_node_type_is_ignored() {
        let template = template("substitution_mappings: {}\n");
        let mut catalog = HashMap::new();
        collect_substitution_mapping(&mut catalog, "Definitions/empty.yaml", &template);
        assert!(catalog.is_empty());
    }

    #[test]
    fn used_types_come_from_node_template_instances() {
        let template = template(
            r#"
topology_template:
  node_templates:
    fw_0:
      type: vendor.nodes.Firewall
    lb_0:
      type: vendor.nodes.LoadBalancer
    untyped: {}
"#,
        );
        let mut used = HashSet::new();
        collect_used_node_types(&template, &mut used);
        assert_eq!(used.len(), 2);
        assert!(used.contains("vendor.nodes.Firewall"));
        assert!(used.contains("vendor.nodes.LoadBalancer"));
    }

    #[test]
    fn derived_from_attaches_only_to_existing_entries() {
        let library = template(
            r#"
node_types:
  org.openecomp.resource.vf.Firewall:
    derived_from: tosca.nodes.Root
  vendor.nodes.Unrelated:
    derived_from: tosca.nodes.Root
"#,
        );
        let mut catalog = HashMap::new();
        catalog.insert(
            "org.openecomp.resource.vf.Firewall".to_string(),
            substitution_entry("org.openecomp.resource.vf.Firewall"),
        );
        apply_derived_from(&mut catalog, &library);

        let info = &catalog["org.openecomp.resource.vf.Firewall"];
        assert_eq!(info.derived_from, vec!["tosca.nodes.Root"]);
        assert!(info.is_substitution_mapping);
        // untouched definitions do not create entries
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn import_requires_use_and_absence() {
        let library = template(
            r#"
data_types:
  vendor.data.Port: {}
node_types:
  vendor.nodes.Firewall:
    derived_from: tosca.nodes.Root
  vendor.nodes.Unused:
    derived_from: tosca.nodes.Root
  vendor.nodes.AlreadyPresent:
    derived_from: tosca.nodes.Root
"#,
        );
        let mut catalog = HashMap::new();
        catalog.insert(
            "vendor.nodes.AlreadyPresent".to_string(),
            substitution_entry("vendor.nodes.AlreadyPresent"),
        );
        let used: HashSet<String> =
            ["vendor.nodes.Firewall", "vendor.nodes.AlreadyPresent"]
                .into_iter()
                .map(str::to_string)
                .collect();
        import_global_types(&mut catalog, &used, "Definitions/global.yaml", &library);

        assert_eq!(catalog.len(), 2);
        let info = &catalog["vendor.nodes.Firewall"];
        assert!(!info.is_substitution_mapping);
        assert!(info.is_nested);
        assert_eq!(info.derived_from, vec!["tosca.nodes.Root"]);
        assert_eq!(info.template_path, "Definitions/global.yaml");
        // substitution-mapping entry wins over the library definition
        assert!(catalog["vendor.nodes.AlreadyPresent"].is_substitution_mapping);
    }

    #[test]
    fn scoped_template_narrows_node_types_and_keeps_the_rest() {
        let library = template(
            r#"
data_types:
  vendor.data.Port: {}
node_types:
  vendor.nodes.Firewall:
    derived_from: tosca.nodes.Root
  vendor.nodes.Other:
    derived_from: tosca.nodes.Root
"#,
        );
        let scoped = scoped_template_for("vendor.nodes.Firewall", &library);

        let node_types = scoped.get("node_types").unwrap().as_mapping().unwrap();
        assert_eq!(node_types.len(), 1);
        assert!(node_types.get("vendor.nodes.Firewall").is_some());
        // unrelated sections carry through unchanged
        assert!(scoped.get("data_types").is_some());
    }

    #[test]
    fn nesting_marker_flips_user_defined_substitutions_only() {
        let main = template(
            r#"
topology_template:
  node_templates:
    vf_0:
      type: org.openecomp.resource.vf.Firewall
    lib_0:
      type: tosca.nodes.library.Thing
"#,
        );
        let mut catalog = HashMap::new();
        catalog.insert(
            "org.openecomp.resource.vf.Firewall".to_string(),
            substitution_entry("org.openecomp.resource.vf.Firewall"),
        );
        catalog.insert(
            "tosca.nodes.library.Thing".to_string(),
            substitution_entry("tosca.nodes.library.Thing"),
        );
        mark_nested_components(&main, &mut catalog);

        assert!(catalog["org.openecomp.resource.vf.Firewall"].is_nested);
        // no user-defined namespace marker: stays a leaf type
        assert!(!catalog["tosca.nodes.library.Thing"].is_nested);
    }

    #[test]
    fn nesting_marker_ignores_imported_entries() {
        let main = template(
            r#"
topology_template:
  node_templates:
    fw_0:
      type: org.openecomp.resource.vf.Imported
"#,
        );
        let mut catalog = HashMap::new();
        let mut imported = substitution_entry("org.openecomp.resource.vf.Imported");
        imported.is_substitution_mapping = false;
        imported.is_nested = true;
        catalog.insert("org.openecomp.resource.vf.Imported".to_string(), imported.clone());
        mark_nested_components(&main, &mut catalog);

        // not a substitution-mapping entry: marker leaves it exactly as built
        assert_eq!(catalog["org.openecomp.resource.vf.Imported"], imported);
    }

    #[test]
    fn nesting_marker_tolerates_missing_node_templates() {
        let main = template("tosca_definitions_version: tosca_simple_yaml_1_1\n");
        let mut catalog = HashMap::new();
        catalog.insert(
            "org.openecomp.resource.vf.Firewall".to_string(),
            substitution_entry("org.openecomp.resource.vf.Firewall"),
        );
        mark_nested_components(&main, &mut catalog);
        assert!(!catalog["org.openecomp.resource.vf.Firewall"].is_nested);
    }
}
