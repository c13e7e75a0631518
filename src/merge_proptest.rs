//! Property-based tests for the value codec and the merge engine.
//!
//! These tests use proptest to generate random inputs and verify that
//! invariants hold for all possible inputs.

#[cfg(test)]
mod proptest_tests {
    use crate::codec::{decode, encode, ScalarKind, TypedValue};
    use crate::merge::{merge_sources, reconcile};
    use proptest::prelude::*;
    use serde_yaml::{Mapping, Value as YamlValue};

    fn scalar_kind() -> impl Strategy<Value = ScalarKind> {
        prop_oneof![
            Just(ScalarKind::Text),
            Just(ScalarKind::Int),
            Just(ScalarKind::Float),
            Just(ScalarKind::Bool),
        ]
    }

    fn yaml_scalar() -> impl Strategy<Value = YamlValue> {
        prop_oneof![
            any::<bool>().prop_map(YamlValue::Bool),
            any::<i64>().prop_map(|n| YamlValue::Number(n.into())),
            "[a-z0-9]{1,8}".prop_map(YamlValue::String),
        ]
    }

    fn yaml_mapping(
        values: impl Strategy<Value = YamlValue> + 'static,
    ) -> impl Strategy<Value = Mapping> {
        // Unique, non-empty key sets; a mapping with no keys never occurs in
        // generated documents.
        prop::collection::hash_map("[a-z]{1,6}", values, 1..4).prop_map(|entries| {
            entries
                .into_iter()
                .map(|(key, value)| (YamlValue::String(key), value))
                .collect()
        })
    }

    /// A top-level document: a mapping of scalars, sequences and nested
    /// mappings, the shape the compiler and the source files produce.
    fn yaml_document() -> impl Strategy<Value = YamlValue> {
        let value = yaml_scalar().prop_recursive(3, 24, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(YamlValue::Sequence),
                yaml_mapping(inner).prop_map(YamlValue::Mapping),
            ]
        });
        yaml_mapping(value).prop_map(YamlValue::Mapping)
    }

    fn flat_scalar_document() -> impl Strategy<Value = YamlValue> {
        yaml_mapping(yaml_scalar()).prop_map(YamlValue::Mapping)
    }

    // ============================================================================
    // codec property tests
    // ============================================================================

    proptest! {
        /// Property: an encoded text default decodes back to itself
        /// (payloads without ';' or surrounding whitespace)
        #[test]
        fn encode_decode_round_trips_text(value in "[a-zA-Z0-9_./@-]{1,24}") {
            let default = TypedValue::from(value.as_str());
            let packed = encode(ScalarKind::Text, Some(&default), None);
            let decoded = decode(&YamlValue::String(packed), false).unwrap();
            prop_assert_eq!(decoded, default);
        }

        /// Property: an encoded integer default decodes back to itself
        #[test]
        fn encode_decode_round_trips_int(value in any::<i64>()) {
            let packed = encode(ScalarKind::Int, Some(&TypedValue::Int(value)), None);
            let decoded = decode(&YamlValue::String(packed), false).unwrap();
            prop_assert_eq!(decoded, TypedValue::Int(value));
        }

        /// Property: an encoded finite float default decodes back to itself
        #[test]
        fn encode_decode_round_trips_float(value in -1.0e12..1.0e12f64) {
            let packed = encode(ScalarKind::Float, Some(&TypedValue::Float(value)), None);
            let decoded = decode(&YamlValue::String(packed), false).unwrap();
            prop_assert_eq!(decoded, TypedValue::Float(value));
        }

        /// Property: an encoded boolean default decodes back to itself
        #[test]
        fn encode_decode_round_trips_bool(value in any::<bool>()) {
            let packed = encode(ScalarKind::Bool, Some(&TypedValue::Bool(value)), None);
            let decoded = decode(&YamlValue::String(packed), false).unwrap();
            prop_assert_eq!(decoded, TypedValue::Bool(value));
        }

        /// Property: the development segment is selected only in development mode
        #[test]
        fn development_segment_selected_only_in_dev_mode(
            production in any::<i64>(),
            development in any::<i64>(),
        ) {
            let packed = encode(
                ScalarKind::Int,
                Some(&TypedValue::Int(production)),
                Some(&TypedValue::Int(development)),
            );
            let stored = YamlValue::String(packed);

            prop_assert_eq!(decode(&stored, false).unwrap(), TypedValue::Int(production));
            prop_assert_eq!(decode(&stored, true).unwrap(), TypedValue::Int(development));
        }

        /// Property: placeholders decode to a value of the declared kind
        #[test]
        fn placeholders_decode_to_declared_kind(kind in scalar_kind()) {
            let packed = encode(kind, None, None);
            let decoded = decode(&YamlValue::String(packed), false).unwrap();
            prop_assert_eq!(decoded.kind(), Some(kind));
        }
    }

    // ============================================================================
    // merge_sources property tests
    // ============================================================================

    proptest! {
        /// Property: merging a single document is the identity
        #[test]
        fn merge_single_document_is_identity(document in yaml_document()) {
            let merged = merge_sources(&[document.clone()]);
            prop_assert_eq!(merged, document);
        }

        /// Property: an empty document on the left contributes nothing
        #[test]
        fn merge_empty_left_is_identity(document in yaml_document()) {
            let empty = YamlValue::Mapping(Mapping::new());
            let merged = merge_sources(&[empty, document.clone()]);
            prop_assert_eq!(merged, document);
        }

        /// Property: every key of every input survives into the merged document
        #[test]
        fn merge_preserves_all_top_level_keys(
            left in yaml_document(),
            right in yaml_document(),
        ) {
            let merged = merge_sources(&[left.clone(), right.clone()]);
            let merged_map = merged.as_mapping().unwrap();

            for key in left.as_mapping().unwrap().keys() {
                prop_assert!(
                    merged_map.contains_key(key),
                    "key from the first document is missing after the merge"
                );
            }
            for key in right.as_mapping().unwrap().keys() {
                prop_assert!(
                    merged_map.contains_key(key),
                    "key from the second document is missing after the merge"
                );
            }
        }
    }

    // ============================================================================
    // reconcile property tests
    // ============================================================================

    proptest! {
        /// Property: reconciling a document with itself changes nothing
        #[test]
        fn reconcile_is_idempotent(document in yaml_document()) {
            let merged = reconcile(&document, &document);
            prop_assert_eq!(merged, document);
        }

        /// Property: the reconciled document has exactly the fresh document's keys
        #[test]
        fn reconcile_takes_shape_from_new(old in yaml_document(), new in yaml_document()) {
            let merged = reconcile(&old, &new);
            let merged_map = merged.as_mapping().unwrap();
            let new_map = new.as_mapping().unwrap();

            prop_assert_eq!(merged_map.len(), new_map.len());
            for key in new_map.keys() {
                prop_assert!(merged_map.contains_key(key));
            }
        }

        /// Property: scalar values present on both sides keep the old side
        #[test]
        fn reconcile_prefers_old_scalars(
            old in flat_scalar_document(),
            new in flat_scalar_document(),
        ) {
            let merged = reconcile(&old, &new);
            let merged_map = merged.as_mapping().unwrap();
            let old_map = old.as_mapping().unwrap();
            let new_map = new.as_mapping().unwrap();

            for (key, new_value) in new_map {
                let expected = old_map.get(key).unwrap_or(new_value);
                prop_assert_eq!(merged_map.get(key), Some(expected));
            }
        }
    }
}
