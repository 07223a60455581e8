//! Reads `cortex.yaml` documents and turns them into classifier input.

use crate::core::classifier::classify;
use crate::domain::model::{PathSegment, Reference, ScalarPosition};
use crate::utils::error::Result;
use serde::Deserialize;
use serde_yaml::{Mapping, Value};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const CORTEX_FILE_NAME: &str = "cortex.yaml";

/// Every scalar in the file, depth-first in document order. A file with
/// several `---` documents is walked document by document; paths restart at
/// each document root.
pub fn scan_document(text: &str) -> Result<Vec<ScalarPosition>> {
    let mut out = Vec::new();
    for root in documents(text)? {
        walk(&root, &mut Vec::new(), &BTreeMap::new(), &mut out);
    }
    Ok(out)
}

fn documents(text: &str) -> Result<Vec<Value>> {
    let mut roots = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        roots.push(Value::deserialize(document)?);
    }
    Ok(roots)
}

/// Classified references in the document; plain scalars are dropped.
pub fn classify_document(text: &str) -> Result<Vec<Reference>> {
    let references = scan_document(text)?
        .into_iter()
        .filter_map(|position| {
            let classification = classify(&position);
            classification.kind.is_reference().then(|| Reference {
                kind: classification.kind,
                value: classification.value,
                position,
            })
        })
        .collect();
    Ok(references)
}

/// 讀取第一份文件的 x-cortex-tag：優先使用 info 底下的值，其次才是最上層
pub fn find_cortex_tag(text: &str) -> Result<Option<String>> {
    let Some(root) = documents(text)?.into_iter().next() else {
        return Ok(None);
    };
    let Some(top) = root.as_mapping() else {
        return Ok(None);
    };

    let under_info = top
        .get("info")
        .and_then(Value::as_mapping)
        .and_then(|info| info.get("x-cortex-tag"))
        .and_then(scalar_text);
    let tag = under_info
        .filter(|t| !t.trim().is_empty())
        .or_else(|| top.get("x-cortex-tag").and_then(scalar_text))
        .filter(|t| !t.trim().is_empty());
    Ok(tag)
}

/// All `cortex.yaml` files below `root`, skipping hidden and `target` directories.
pub fn find_cortex_yaml(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| {
            entry.depth() == 0 || {
                let name = entry.file_name().to_string_lossy();
                !(entry.file_type().is_dir() && (name.starts_with('.') || name == "target"))
            }
        })
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == CORTEX_FILE_NAME)
        .map(|entry| entry.into_path())
        .collect()
}

pub fn has_cortex_yaml(root: &Path) -> bool {
    !find_cortex_yaml(root).is_empty()
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Tagged(tagged) => scalar_text(&tagged.value),
        Value::Null | Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

fn key_text(key: &Value) -> String {
    scalar_text(key).unwrap_or_else(|| "~".to_string())
}

fn scalar_siblings(mapping: &Mapping) -> BTreeMap<String, String> {
    mapping
        .iter()
        .filter_map(|(k, v)| scalar_text(v).map(|text| (key_text(k), text)))
        .collect()
}

fn walk(
    value: &Value,
    path: &mut Vec<PathSegment>,
    siblings: &BTreeMap<String, String>,
    out: &mut Vec<ScalarPosition>,
) {
    match value {
        Value::Mapping(mapping) => {
            let own_siblings = scalar_siblings(mapping);
            for (key, child) in mapping {
                path.push(PathSegment::Key(key_text(key)));
                walk(child, path, &own_siblings, out);
                path.pop();
            }
        }
        Value::Sequence(items) => {
            // list items have no sibling keys
            let none = BTreeMap::new();
            for (i, item) in items.iter().enumerate() {
                path.push(PathSegment::Index(i));
                walk(item, path, &none, out);
                path.pop();
            }
        }
        Value::Tagged(tagged) => walk(&tagged.value, path, siblings, out),
        Value::Null => {}
        scalar => {
            if let Some(text) = scalar_text(scalar) {
                out.push(ScalarPosition {
                    path: path.clone(),
                    value: text,
                    siblings: siblings.clone(),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::ReferenceKind;

    const SAMPLE: &str = r#"
openapi: 3.0.1
info:
  title: Payments
  x-cortex-tag: payments
  x-cortex-groups: backend
  x-cortex-owners:
    - type: group
      name: platform-team
      provider: CORTEX
    - type: group
      name: gh-team
      provider: GITHUB
  x-cortex-dependencies:
    - tag: billing
      method: GET
service:
  id: svc-42
team:
  id: t-1
"#;

    #[test]
    fn test_scan_reports_paths_and_siblings() {
        let positions = scan_document(SAMPLE).unwrap();
        let owner = positions
            .iter()
            .find(|p| p.path_display() == "info.x-cortex-owners[0].name")
            .unwrap();
        assert_eq!(owner.value, "platform-team");
        assert_eq!(owner.sibling("provider"), Some("CORTEX"));

        let version = positions
            .iter()
            .find(|p| p.path_display() == "openapi")
            .unwrap();
        assert_eq!(version.value, "3.0.1");
    }

    #[test]
    fn test_classify_document() {
        let references = classify_document(SAMPLE).unwrap();
        let found: Vec<(ReferenceKind, &str)> = references
            .iter()
            .map(|r| (r.kind, r.value.as_str()))
            .collect();

        assert_eq!(
            found,
            vec![
                (ReferenceKind::CrossReferenceTag, "payments"),
                (ReferenceKind::OwnerReference, "backend"),
                (ReferenceKind::OwnerReference, "platform-team"),
                (ReferenceKind::CrossReferenceTag, "billing"),
                (ReferenceKind::ServiceId, "svc-42"),
            ]
        );
    }

    #[test]
    fn test_find_cortex_tag_prefers_info() {
        assert_eq!(find_cortex_tag(SAMPLE).unwrap().as_deref(), Some("payments"));
        assert_eq!(
            find_cortex_tag("x-cortex-tag: top\n").unwrap().as_deref(),
            Some("top")
        );
        assert_eq!(
            find_cortex_tag("info:\n  x-cortex-tag: ''\nx-cortex-tag: top\n")
                .unwrap()
                .as_deref(),
            Some("top")
        );
        assert_eq!(find_cortex_tag("name: demo\n").unwrap(), None);
    }

    #[test]
    fn test_multi_document_file() {
        let text = "x-cortex-tag: first\n---\nx-cortex-tag: second\nservice:\n  id: svc-1\n";

        let references = classify_document(text).unwrap();
        let found: Vec<(ReferenceKind, &str, String)> = references
            .iter()
            .map(|r| (r.kind, r.value.as_str(), r.position.path_display()))
            .collect();
        assert_eq!(
            found,
            vec![
                (ReferenceKind::CrossReferenceTag, "first", "x-cortex-tag".to_string()),
                (ReferenceKind::CrossReferenceTag, "second", "x-cortex-tag".to_string()),
                (ReferenceKind::ServiceId, "svc-1", "service.id".to_string()),
            ]
        );

        assert_eq!(find_cortex_tag(text).unwrap().as_deref(), Some("first"));
        assert_eq!(
            find_cortex_tag("name: demo\n---\nx-cortex-tag: later\n").unwrap(),
            None
        );
    }

    #[test]
    fn test_empty_file_has_no_references() {
        assert!(classify_document("").unwrap().is_empty());
        assert_eq!(find_cortex_tag("").unwrap(), None);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        assert!(scan_document("info: [unclosed").is_err());
        assert!(scan_document("a: 1\n---\nb: [unclosed").is_err());
    }

    #[test]
    fn test_find_cortex_yaml() {
        let dir = tempfile::TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("svc/nested")).unwrap();
        std::fs::create_dir_all(dir.path().join(".git")).unwrap();
        std::fs::write(dir.path().join("svc/nested/cortex.yaml"), "name: demo").unwrap();
        std::fs::write(dir.path().join(".git/cortex.yaml"), "name: hidden").unwrap();

        let found = find_cortex_yaml(dir.path());
        assert_eq!(found, vec![dir.path().join("svc/nested/cortex.yaml")]);
        assert!(has_cortex_yaml(dir.path()));

        let empty = tempfile::TempDir::new().unwrap();
        assert!(!has_cortex_yaml(empty.path()));
    }
}
