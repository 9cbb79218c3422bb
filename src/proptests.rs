//! Property-based tests across the parser, addressing engine, codecs, merge
//! and validator.

use std::path::Path;

use proptest::prelude::*;

use crate::access;
use crate::codec;
use crate::config::{FeedConfig, FeedFormats, MarkataConfig};
use crate::error::ConfigError;
use crate::keypath::{KeyPath, KeySegment};
use crate::merge::deep_merge;
use crate::types::Format;
use crate::validate::{self, Severity};
use crate::value::{Mapping, Value};

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z_]{0,7}"
}

// Paths whose last segment is never indexed, so padding never leaves nulls
// that TOML could not encode.
fn writable_path_strategy() -> impl Strategy<Value = KeyPath> {
    (
        prop::collection::vec((key_strategy(), prop::option::of(0i64..4)), 0..3),
        key_strategy(),
    )
        .prop_map(|(parents, leaf)| {
            let mut segments: Vec<KeySegment> = parents
                .into_iter()
                .map(|(key, index)| KeySegment { key, index })
                .collect();
            segments.push(KeySegment::new(leaf));
            KeyPath::from_segments(segments)
        })
}

fn scalar_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::Integer),
        "[a-zA-Z ]{0,12}".prop_map(Value::String),
    ]
}

fn value_strategy() -> impl Strategy<Value = Value> {
    prop_oneof![Just(Value::Null), scalar_strategy()].prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Sequence),
            prop::collection::btree_map("[a-z]{1,4}", inner, 0..4).prop_map(Value::Mapping),
        ]
    })
}

fn mapping_strategy() -> impl Strategy<Value = Mapping> {
    prop::collection::btree_map("[a-z]{1,4}", value_strategy(), 0..5)
}

fn format_strategy() -> impl Strategy<Value = Format> {
    prop_oneof![Just(Format::Toml), Just(Format::Yaml), Just(Format::Json)]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 512,
        .. ProptestConfig::default()
    })]

    // A value written at a path reads back after encode and decode.
    #[test]
    fn set_then_get_survives_every_format(
        path in writable_path_strategy(),
        value in scalar_strategy(),
        format in format_strategy(),
    ) {
        let doc = access::set(Value::mapping(), &path, value.clone()).unwrap();
        let bytes = codec::encode(format, &doc).unwrap();
        let decoded = codec::decode(format, &bytes, Path::new("prop")).unwrap();
        prop_assert_eq!(access::get(&decoded, &path).unwrap(), &value);
    }

    // Rendering a path and parsing it back gives the same segments.
    #[test]
    fn keypath_display_parses_back(path in writable_path_strategy()) {
        let reparsed = KeyPath::parse(&path.to_string()).unwrap();
        prop_assert_eq!(reparsed, path);
    }

    #[test]
    fn merge_with_itself_is_identity(m in mapping_strategy()) {
        prop_assert_eq!(deep_merge(m.clone(), m.clone()), m);
    }

    #[test]
    fn merging_the_same_overlay_twice_changes_nothing(
        base in mapping_strategy(),
        overlay in mapping_strategy(),
    ) {
        let once = deep_merge(base, overlay.clone());
        prop_assert_eq!(deep_merge(once.clone(), overlay), once);
    }

    #[test]
    fn absent_first_segment_is_not_found(
        doc in mapping_strategy(),
        path in writable_path_strategy(),
    ) {
        let first = &path.segments()[0].key;
        prop_assume!(!doc.keys().any(|k| k.eq_ignore_ascii_case(first)));
        let is_not_found = matches!(
            access::get(&Value::Mapping(doc), &path),
            Err(ConfigError::KeyNotFound(_))
        );
        prop_assert!(is_not_found);
    }

    #[test]
    fn negative_index_always_fails(
        key in key_strategy(),
        index in i64::MIN..0,
        doc in mapping_strategy(),
    ) {
        let path = KeyPath::from_segments(vec![KeySegment::indexed(key, index)]);
        let doc = Value::Mapping(doc);
        prop_assert!(access::get(&doc, &path).is_err());
        let is_out_of_range = matches!(
            access::set(doc, &path, Value::Null),
            Err(ConfigError::IndexOutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }

    #[test]
    fn write_past_end_pads_with_null(index in 0i64..16) {
        let path = KeyPath::from_segments(vec![KeySegment::indexed("list", index)]);
        let doc = access::set(Value::mapping(), &path, Value::Bool(true)).unwrap();
        let items = doc.as_mapping().unwrap()["list"].as_sequence().unwrap();
        prop_assert_eq!(items.len(), index as usize + 1);
        prop_assert!(items[..index as usize].iter().all(Value::is_null));
        prop_assert_eq!(&items[index as usize], &Value::Bool(true));
    }

    #[test]
    fn read_past_end_is_out_of_range(len in 0usize..6, extra in 0i64..6) {
        let mut doc = Mapping::new();
        doc.insert("list".into(), Value::Sequence(vec![Value::Null; len]));
        let index = len as i64 + extra;
        let path = KeyPath::from_segments(vec![KeySegment::indexed("list", index)]);
        let is_out_of_range = matches!(
            access::get(&Value::Mapping(doc), &path),
            Err(ConfigError::IndexOutOfRange { .. })
        );
        prop_assert!(is_out_of_range);
    }

    // No error ever follows a warning.
    #[test]
    fn findings_list_errors_before_warnings(
        concurrency in -2i64..2,
        no_patterns in any::<bool>(),
        feeds in prop::collection::vec(
            (prop::option::of(-2i64..2), any::<bool>()),
            0..4,
        ),
        default_orphans in -2i64..2,
    ) {
        let mut config = MarkataConfig {
            concurrency,
            feeds: feeds
                .into_iter()
                .map(|(items_per_page, rss)| FeedConfig {
                    items_per_page,
                    formats: Some(FeedFormats { rss, ..FeedFormats::default() }),
                    ..FeedConfig::default()
                })
                .collect(),
            ..MarkataConfig::default()
        };
        if no_patterns {
            config.glob.patterns.clear();
        }
        config.feed_defaults.orphan_threshold = default_orphans;

        let findings = validate::validate(&config);
        let first_warning = findings
            .iter()
            .position(|f| f.severity == Severity::Warning)
            .unwrap_or(findings.len());
        prop_assert!(findings[first_warning..].iter().all(|f| f.severity == Severity::Warning));

        let (errors, warnings) = validate::split_findings(findings.clone());
        let rejoined: Vec<_> = errors.into_iter().chain(warnings).collect();
        prop_assert_eq!(rejoined, findings);
    }
}
