//! Resolution of `fields` / `expand` query parameters into include trees
//!
//! A read endpoint receives two comma-separated strings:
//!
//! - `fields`: scalar fields to serialize, possibly dotted to address fields
//!   of an expanded relation (`name,grades.grade`), or `all`
//! - `expand`: relations to inline, possibly dotted to expand further
//!   (`grades,grades.sections`)
//!
//! [`FieldExpansionResolver`] validates both against the [`SchemaRegistry`]
//! and produces an [`IncludeTree`], which is then applied to the stored record
//! with [`IncludeTree::project`].
//!
//! ```text
//! GET /subjects?fields=name&expand=grades
//!
//! { "name": true, "id": true, "grades": { "__all__": { "grade": true, "id": true } } }
//! ```

use crate::core::error::ExpansionError;
use crate::core::schema::{Cardinality, ID_FIELD, SchemaRegistry, TypeDescriptor};
use indexmap::IndexMap;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Field token selecting every scalar field of a type
pub const ALL_FIELDS: &str = "all";

/// Key wrapping the subtree of a collection relation
pub const ALL_ITEMS_KEY: &str = "__all__";

/// One entry of an include tree
#[derive(Debug, Clone, PartialEq)]
pub enum IncludeNode {
    /// Include this scalar as-is
    Field,
    /// Single related record, filtered by the subtree
    One(IncludeTree),
    /// Related collection, every item filtered by the subtree
    Many(IncludeTree),
}

impl IncludeNode {
    /// The nested tree of a relation entry
    pub fn subtree(&self) -> Option<&IncludeTree> {
        match self {
            IncludeNode::Field => None,
            IncludeNode::One(tree) | IncludeNode::Many(tree) => Some(tree),
        }
    }
}

/// Which fields to serialize at each nesting level
///
/// Keys keep insertion order: selected scalars, then `id`, then relations.
/// Equality ignores order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IncludeTree {
    entries: IndexMap<String, IncludeNode>,
}

impl IncludeTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_field(&mut self, name: impl Into<String>) {
        self.entries.insert(name.into(), IncludeNode::Field);
    }

    pub fn insert(&mut self, name: impl Into<String>, node: IncludeNode) {
        self.entries.insert(name.into(), node);
    }

    pub fn get(&self, name: &str) -> Option<&IncludeNode> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Included names at this level, in insertion order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IncludeNode)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keep only the parts of `value` named by this tree
    ///
    /// Keys absent from the record are skipped. A `null` relation stays `null`,
    /// and non-object values are returned unchanged.
    pub fn project(&self, value: &Value) -> Value {
        let Value::Object(record) = value else {
            return value.clone();
        };

        let mut projected = Map::new();
        for (name, node) in &self.entries {
            let Some(field) = record.get(name) else {
                continue;
            };

            let field = match (node, field) {
                (IncludeNode::Field, field) => field.clone(),
                (IncludeNode::One(tree), field) => tree.project(field),
                (IncludeNode::Many(tree), Value::Array(items)) => {
                    Value::Array(items.iter().map(|item| tree.project(item)).collect())
                }
                (IncludeNode::Many(_), other) => other.clone(),
            };
            projected.insert(name.clone(), field);
        }

        Value::Object(projected)
    }
}

impl Serialize for IncludeTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, node) in &self.entries {
            map.serialize_entry(name, node)?;
        }
        map.end()
    }
}

impl Serialize for IncludeNode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            IncludeNode::Field => serializer.serialize_bool(true),
            IncludeNode::One(tree) => tree.serialize(serializer),
            IncludeNode::Many(tree) => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry(ALL_ITEMS_KEY, tree)?;
                map.end()
            }
        }
    }
}

/// Builds include trees for the types of a registry
pub struct FieldExpansionResolver<'a> {
    registry: &'a SchemaRegistry,
}

impl<'a> FieldExpansionResolver<'a> {
    pub fn new(registry: &'a SchemaRegistry) -> Self {
        Self { registry }
    }

    /// Resolve `fields` and `expand` for the root type `type_name`
    ///
    /// # Errors
    ///
    /// Fails on the first invalid token in input order:
    /// - [`ExpansionError::InvalidField`] for an unknown scalar, or a dotted
    ///   field while nothing is expanded at that level
    /// - [`ExpansionError::InvalidExpansion`] for an unknown relation
    pub fn resolve(
        &self,
        type_name: &str,
        fields: &str,
        expand: &str,
    ) -> Result<IncludeTree, ExpansionError> {
        self.resolve_at(type_name, fields, expand, "")
    }

    /// Resolve relative to a traversal prefix such as `grades.sections`
    ///
    /// Only tokens equal to the prefix or starting with `prefix.` are
    /// considered, with the prefix stripped.
    pub fn resolve_at(
        &self,
        type_name: &str,
        fields: &str,
        expand: &str,
        prefix: &str,
    ) -> Result<IncludeTree, ExpansionError> {
        let descriptor = self.descriptor(type_name)?;
        let field_tokens = split_tokens(fields);
        let expand_tokens = split_tokens(expand);

        let tree = self.resolve_level(descriptor, &field_tokens, &expand_tokens, prefix)?;

        tracing::debug!(
            type_name,
            fields,
            expand,
            prefix,
            included = tree.len(),
            "resolved include tree"
        );

        Ok(tree)
    }

    fn descriptor(&self, type_name: &str) -> Result<&'a TypeDescriptor, ExpansionError> {
        self.registry
            .get(type_name)
            .ok_or_else(|| ExpansionError::UnknownType {
                type_name: type_name.to_string(),
            })
    }

    fn resolve_level(
        &self,
        descriptor: &TypeDescriptor,
        field_tokens: &[&str],
        expand_tokens: &[&str],
        prefix: &str,
    ) -> Result<IncludeTree, ExpansionError> {
        let fields = relative_tokens(field_tokens, prefix);
        let expansions = relative_tokens(expand_tokens, prefix);
        let scalars = descriptor.scalar_names();

        let mut tree = IncludeTree::new();

        for field in &fields {
            if *field == ALL_FIELDS {
                for name in &scalars {
                    tree.insert_field(*name);
                }
                break;
            }

            if field.contains('.') {
                // Belongs to a deeper level, validated by the recursive call
                if expansions.is_empty() {
                    return Err(invalid_field(field, &scalars));
                }
                continue;
            }

            if !descriptor.is_scalar(field) {
                return Err(invalid_field(field, &scalars));
            }
            tree.insert_field(*field);
        }

        if tree.is_empty() {
            match descriptor.default_fields() {
                Some(defaults) => defaults.iter().for_each(|name| tree.insert_field(name.as_str())),
                None => scalars.iter().for_each(|name| tree.insert_field(*name)),
            }
        }
        if descriptor.has_identifier() {
            tree.insert_field(ID_FIELD);
        }

        for expansion in &expansions {
            let relation = expansion
                .split_once('.')
                .map_or(*expansion, |(head, _)| head);

            let Some((target, cardinality)) = descriptor.relation_target(relation) else {
                return Err(ExpansionError::InvalidExpansion {
                    expansion: relation.to_string(),
                    allowed: owned(&descriptor.relation_names()),
                });
            };

            // Relation names never clash with scalars, so a hit is a resolved relation
            if tree.contains(relation) {
                continue;
            }

            let child_prefix = if prefix.is_empty() {
                relation.to_string()
            } else {
                format!("{}.{}", prefix, relation)
            };
            let subtree = self.resolve_level(
                self.descriptor(target)?,
                field_tokens,
                expand_tokens,
                &child_prefix,
            )?;

            let node = match cardinality {
                Cardinality::One => IncludeNode::One(subtree),
                Cardinality::Many => IncludeNode::Many(subtree),
            };
            tree.insert(relation, node);
        }

        Ok(tree)
    }
}

fn split_tokens(raw: &str) -> Vec<&str> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Tokens addressed to `prefix`, with `prefix.` stripped
///
/// A token equal to the prefix selects the relation itself and yields nothing
/// at the nested level.
fn relative_tokens<'t>(tokens: &[&'t str], prefix: &str) -> Vec<&'t str> {
    if prefix.is_empty() {
        return tokens.to_vec();
    }

    tokens
        .iter()
        .filter_map(|token| token.strip_prefix(prefix)?.strip_prefix('.'))
        .filter(|rest| !rest.is_empty())
        .collect()
}

fn invalid_field(field: &str, allowed: &[&str]) -> ExpansionError {
    ExpansionError::InvalidField {
        field: field.to_string(),
        allowed: owned(allowed),
    }
}

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|name| name.to_string()).collect()
}
