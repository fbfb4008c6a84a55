use serde::Serialize;

use crate::model::{FieldType, Schema, ROOT};

/// A category of schema misconfiguration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    /// The schema defines nodes but none named `root`.
    MissingRoot,
    /// A `schema` reference names a node that does not exist.
    DanglingReference,
    /// A `schema` reference on a type that never recurses.
    ReferenceIgnored,
    /// A `pattern` on a field that is not a string.
    PatternIgnored,
    /// `min` is greater than `max`, so no value can pass.
    InvertedBounds,
}

/// A problem found by [`Schema::lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchemaIssue {
    pub node: String,
    pub field: Option<String>,
    pub kind: IssueKind,
    pub message: String,
}

impl SchemaIssue {
    /// Whether validation will report this as a failure at runtime rather
    /// than silently ignoring a rule.
    pub fn is_error(&self) -> bool {
        matches!(
            self.kind,
            IssueKind::MissingRoot | IssueKind::DanglingReference
        )
    }
}

impl Schema {
    /// Report misconfigurations without validating a document.
    ///
    /// Nodes are visited in name order and fields in declaration order.
    /// An empty schema has no issues.
    pub fn lint(&self) -> Vec<SchemaIssue> {
        let mut issues = Vec::new();
        if self.is_empty() {
            return issues;
        }

        if self.root().is_none() {
            issues.push(SchemaIssue {
                node: ROOT.to_string(),
                field: None,
                kind: IssueKind::MissingRoot,
                message: format!("no `{ROOT}` node defined"),
            });
        }

        for name in self.names() {
            let Some(node) = self.get(name) else {
                continue;
            };

            for (field, rule) in node.iter() {
                let mut push = |kind: IssueKind, message: String| {
                    issues.push(SchemaIssue {
                        node: name.to_string(),
                        field: Some(field.to_string()),
                        kind,
                        message,
                    });
                };

                if let Some(target) = rule.schema.as_deref() {
                    match rule.field_type {
                        Some(field_type) if field_type.is_container() => {
                            if !self.contains(target) {
                                push(
                                    IssueKind::DanglingReference,
                                    format!("{name}.{field} references unknown schema `{target}`"),
                                );
                            }
                        }
                        _ => push(
                            IssueKind::ReferenceIgnored,
                            format!(
                                "{name}.{field} references `{target}` but is not an array or object"
                            ),
                        ),
                    }
                }

                if rule.pattern.is_some() && rule.field_type != Some(FieldType::String) {
                    push(
                        IssueKind::PatternIgnored,
                        format!("{name}.{field} has a pattern but is not a string"),
                    );
                }

                if let (Some(min), Some(max)) = (rule.min, rule.max) {
                    if min > max {
                        push(
                            IssueKind::InvertedBounds,
                            format!("{name}.{field} has min {min} greater than max {max}"),
                        );
                    }
                }
            }
        }

        issues
    }
}
