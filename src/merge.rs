//! # Merge Engine
//!
//! This module implements the two document-merge operations the system is
//! built on:
//!
//! - [`merge_sources`] folds several source documents into one, left to
//!   right, with the later document authoritative wherever both sides
//!   define a leaf. Used at load time to combine `settings.yml`,
//!   `.secrets.yml` and any custom destination files into a single logical
//!   configuration.
//!
//! - [`reconcile`] merges a freshly compiled document over a previously
//!   persisted one. The fresh document is authoritative for *shape* (keys
//!   present, container kinds) while the persisted document is
//!   authoritative for *scalar content*, so a person's edits survive
//!   regeneration.
//!
//! Both operations merge sequences element-wise by **key match** rather than
//! by position: mapping elements pair up when they share at least one
//! key with an equal value, matched pairs merge recursively, unmatched
//! elements from either side are appended, and plain scalars deduplicate.
//! Regeneration therefore never shuffles or duplicates user-authored list
//! entries.
//!
//! Unreadable source files are the one recoverable failure in the system:
//! [`load_sources`] logs a warning and treats them as empty contributions.

use std::path::Path;

use log::{debug, warn};
use serde_yaml::{Mapping, Value as YamlValue};

use crate::codec::yaml_type_name;

/// Folds source documents left to right into one merged document.
///
/// Mapping keys recurse when both sides are mappings; sequences merge by
/// key match with the later document winning inside matched pairs;
/// everything else is replaced by the later document's value outright.
pub fn merge_sources(documents: &[YamlValue]) -> YamlValue {
    let mut merged = YamlValue::Mapping(Mapping::new());
    for document in documents {
        merge_into(&mut merged, document, "");
    }
    merged
}

/// Reads, parses and merges a set of source files.
///
/// A file that is missing, unreadable, unparsable or not a mapping at the
/// top level is skipped with a warning and contributes nothing; this is the
/// sole recoverable error category in the system.
pub fn load_sources<P: AsRef<Path>>(paths: &[P]) -> YamlValue {
    let documents: Vec<YamlValue> = paths
        .iter()
        .filter_map(|path| read_source(path.as_ref()))
        .collect();
    merge_sources(&documents)
}

/// Merges a freshly compiled document over a previously persisted one.
///
/// Iterates the fresh document's keys, so keys present only in the old
/// document are dropped (the schema changed shape and the stale data with
/// it). Matched scalar leaves keep the old value regardless of scalar kind:
/// a person's plain `5432` survives a regenerated `"int;5432"`. A change of
/// container kind means the schema was restructured, and the fresh value
/// wins. YAML `null` on the old side counts as absent.
pub fn reconcile(old: &YamlValue, new: &YamlValue) -> YamlValue {
    reconcile_value(old, new, "")
}

fn merge_into(target: &mut YamlValue, source: &YamlValue, path: &str) {
    match target {
        YamlValue::Mapping(target_map) => {
            if let YamlValue::Mapping(source_map) = source {
                for (key, value) in source_map {
                    let child = join_path(path, &key_to_string(key));

                    if let Some(existing) = target_map.get_mut(key) {
                        if existing.is_mapping() && value.is_mapping() {
                            merge_into(existing, value, &child);
                        } else if let Some(source_seq) = value.as_sequence() {
                            if let Some(target_seq) = existing.as_sequence_mut() {
                                merge_sequence(target_seq, source_seq, &child);
                            } else {
                                warn!(
                                    "Type mismatch at '{}': replacing {} with Sequence",
                                    child,
                                    yaml_type_name(existing)
                                );
                                *existing = value.clone();
                            }
                        } else {
                            if existing != value {
                                debug!("Later source wins at '{}'", child);
                            }
                            *existing = value.clone();
                        }
                    } else {
                        target_map.insert(key.clone(), value.clone());
                    }
                }
            } else {
                warn!(
                    "Type mismatch at '{}': replacing Mapping with {}",
                    path,
                    yaml_type_name(source)
                );
                *target = source.clone();
            }
        }
        YamlValue::Sequence(target_seq) => {
            if let YamlValue::Sequence(source_seq) = source {
                merge_sequence(target_seq, source_seq, path);
            } else {
                warn!(
                    "Type mismatch at '{}': replacing Sequence with {}",
                    path,
                    yaml_type_name(source)
                );
                *target = source.clone();
            }
        }
        _ => {
            *target = source.clone();
        }
    }
}

/// Later-wins keyed sequence merge used by [`merge_sources`].
fn merge_sequence(target: &mut Vec<YamlValue>, source: &[YamlValue], path: &str) {
    for item in source {
        if item.is_mapping() {
            if let Some(existing) = target.iter_mut().find(|t| shares_key(t, item)) {
                merge_into(existing, item, path);
            } else {
                target.push(item.clone());
            }
        } else if !target.contains(item) {
            target.push(item.clone());
        }
    }
}

fn reconcile_value(old: &YamlValue, new: &YamlValue, path: &str) -> YamlValue {
    match (old, new) {
        (YamlValue::Mapping(old_map), YamlValue::Mapping(new_map)) => {
            let mut result = Mapping::new();
            for (key, new_value) in new_map {
                let child = join_path(path, &key_to_string(key));
                let value = match old_map.get(key) {
                    Some(old_value) => reconcile_value(old_value, new_value, &child),
                    None => new_value.clone(),
                };
                result.insert(key.clone(), value);
            }
            YamlValue::Mapping(result)
        }
        (YamlValue::Sequence(old_seq), YamlValue::Sequence(new_seq)) => {
            YamlValue::Sequence(reconcile_sequence(old_seq, new_seq, path))
        }
        (YamlValue::Null, _) => new.clone(),
        _ => {
            if is_scalar(old) && is_scalar(new) {
                old.clone()
            } else {
                warn!(
                    "Shape changed at '{}': replacing {} with {}",
                    path,
                    yaml_type_name(old),
                    yaml_type_name(new)
                );
                new.clone()
            }
        }
    }
}

/// Old-preserving keyed sequence merge used by [`reconcile`].
///
/// Old elements keep their order; each is reconciled against the first
/// unconsumed matching new element, or carried over unchanged. New elements
/// that matched nothing are appended, with scalars deduplicated.
fn reconcile_sequence(old: &[YamlValue], new: &[YamlValue], path: &str) -> Vec<YamlValue> {
    let mut consumed = vec![false; new.len()];
    let mut result = Vec::with_capacity(old.len());

    for old_item in old {
        let matched = new
            .iter()
            .enumerate()
            .find(|(index, new_item)| !consumed[*index] && shares_key(old_item, new_item));

        match matched {
            Some((index, new_item)) => {
                consumed[index] = true;
                result.push(reconcile_value(old_item, new_item, path));
            }
            None => result.push(old_item.clone()),
        }
    }

    for (index, new_item) in new.iter().enumerate() {
        if consumed[index] {
            continue;
        }
        if new_item.is_mapping() || !result.contains(new_item) {
            result.push(new_item.clone());
        }
    }

    result
}

/// True when both values are mappings sharing at least one key with an
/// equal value. This is the pairing rule for keyed sequence merges.
fn shares_key(a: &YamlValue, b: &YamlValue) -> bool {
    match (a, b) {
        (YamlValue::Mapping(a_map), YamlValue::Mapping(b_map)) => a_map
            .iter()
            .any(|(key, value)| b_map.get(key) == Some(value)),
        _ => false,
    }
}

fn is_scalar(value: &YamlValue) -> bool {
    matches!(
        value,
        YamlValue::Bool(_) | YamlValue::Number(_) | YamlValue::String(_)
    )
}

fn key_to_string(key: &YamlValue) -> String {
    match key {
        YamlValue::String(s) => s.clone(),
        _ => format!("{:?}", key),
    }
}

fn join_path(path: &str, key: &str) -> String {
    if path.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", path, key)
    }
}

fn read_source(path: &Path) -> Option<YamlValue> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("Skipping source '{}': {}", path.display(), err);
            return None;
        }
    };

    match serde_yaml::from_str::<YamlValue>(&content) {
        Ok(YamlValue::Null) => None,
        Ok(document @ YamlValue::Mapping(_)) => Some(document),
        Ok(other) => {
            warn!(
                "Skipping source '{}': expected a mapping at the top level, found {}",
                path.display(),
                yaml_type_name(&other)
            );
            None
        }
        Err(err) => {
            warn!("Skipping source '{}': {}", path.display(), err);
            None
        }
    }
}
