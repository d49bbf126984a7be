//! Kind-specific API group rewrite rules

use k8s_openapi::api::rbac::v1::{ClusterRole, Role};
use k8s_openapi::Resource;
use serde_yaml::Value;

use crate::document::{mapping_child_mut, sequence_child_mut, set_text, ClassificationKey};

/// apiVersion of the legacy CustomResourceDefinition API
pub const CRD_API_VERSION: &str = "apiextensions.k8s.io/v1beta1";

/// Kind of a CustomResourceDefinition
pub const CRD_KIND: &str = "CustomResourceDefinition";

/// The rule applied to a single document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `metadata.name` suffix and `spec.group` of a v1beta1 CRD
    CustomResourceDefinition,
    /// `rules[].apiGroups` of a Role or ClusterRole
    Role,
    /// The group part of the document's own apiVersion
    GroupPrefix,
    /// Nothing to rewrite
    PassThrough,
}

impl Rule {
    /// Select the rule for a document. The first match wins.
    pub fn select(key: &ClassificationKey, from_api_group: &str) -> Self {
        if key.api_version == CRD_API_VERSION && key.kind == CRD_KIND {
            Rule::CustomResourceDefinition
        } else if is_rbac_role(key) {
            Rule::Role
        } else if group_version_suffix(&key.api_version, from_api_group).is_some() {
            Rule::GroupPrefix
        } else {
            Rule::PassThrough
        }
    }

    /// Short name used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Rule::CustomResourceDefinition => "crd",
            Rule::Role => "role",
            Rule::GroupPrefix => "api-version",
            Rule::PassThrough => "pass-through",
        }
    }
}

fn is_rbac_role(key: &ClassificationKey) -> bool {
    // Role and ClusterRole share the same apiVersion
    key.api_version == Role::API_VERSION
        && (key.kind == Role::KIND || key.kind == ClusterRole::KIND)
}

/// The version part of `api_version` when it lives under `group`
///
/// `"old.example.com/v1"` under `"old.example.com"` yields `"v1"`. The `/`
/// separator is required, the remainder may be empty.
pub fn group_version_suffix<'a>(api_version: &'a str, group: &str) -> Option<&'a str> {
    api_version.strip_prefix(group)?.strip_prefix('/')
}

/// Rewrite the name suffix and group of a CustomResourceDefinition
///
/// Returns whether any field changed.
pub fn rewrite_crd(document: &mut Value, from_api_group: &str, to_api_group: &str) -> bool {
    let mut changed = false;

    if let Some(metadata) = mapping_child_mut(document, "metadata") {
        let suffix = format!(".{}", from_api_group);
        let renamed = metadata
            .get("name")
            .and_then(Value::as_str)
            .and_then(|name| name.strip_suffix(suffix.as_str()))
            .map(|plural| format!("{}.{}", plural, to_api_group));
        if let Some(name) = renamed {
            set_text(metadata, "name", name);
            changed = true;
        }
    }

    if let Some(spec) = mapping_child_mut(document, "spec") {
        if spec.get("group").and_then(Value::as_str) == Some(from_api_group) {
            set_text(spec, "group", to_api_group.to_string());
            changed = true;
        }
    }

    changed
}

/// Rewrite every matching entry of `rules[].apiGroups` in a Role or ClusterRole
///
/// Returns whether any entry changed.
pub fn rewrite_role(document: &mut Value, from_api_group: &str, to_api_group: &str) -> bool {
    let Some(rules) = sequence_child_mut(document, "rules") else {
        return false;
    };

    let mut changed = false;
    for rule in rules.iter_mut() {
        let Some(api_groups) = sequence_child_mut(rule, "apiGroups") else {
            continue;
        };
        for api_group in api_groups.iter_mut() {
            if api_group.as_str() == Some(from_api_group) {
                *api_group = Value::String(to_api_group.to_string());
                changed = true;
            }
        }
    }

    changed
}

/// Move the document's own apiVersion from one group to another
///
/// Returns whether the apiVersion changed.
pub fn rewrite_api_version(
    document: &mut Value,
    from_api_group: &str,
    to_api_group: &str,
) -> bool {
    let Some(mapping) = document.as_mapping_mut() else {
        return false;
    };

    let rewritten = mapping
        .get("apiVersion")
        .and_then(Value::as_str)
        .and_then(|api_version| group_version_suffix(api_version, from_api_group))
        .map(|version| format!("{}/{}", to_api_group, version));

    match rewritten {
        Some(api_version) => {
            set_text(mapping, "apiVersion", api_version);
            true
        }
        None => false,
    }
}
