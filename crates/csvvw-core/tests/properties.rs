//! Property tests for the feature emission rules.

use std::collections::BTreeSet;

use csv::StringRecord;
use proptest::prelude::*;

use csvvw_core::{ColumnRef, ResolvedConfig, RowTransformer, is_nonzero_number};

fn cell() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::sample::select(vec!["0", "0.0", "-0", "0e3", "+0"]).prop_map(String::from),
        (-1000i32..1000).prop_map(|n| n.to_string()),
        (-1.0e6f64..1.0e6).prop_map(|f| f.to_string()),
        "[a-z]{1,6}",
    ]
}

fn row() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(cell(), 1..12)
}

fn index_set() -> impl Strategy<Value = BTreeSet<usize>> {
    prop::collection::btree_set(0usize..12, 0..5)
}

/// Splits an output line into its feature tokens.
fn features(line: &str) -> Vec<&str> {
    let (_, features) = line
        .strip_suffix('\n')
        .and_then(|line| line.split_once("|n "))
        .expect("line has a namespace marker and a newline");
    features.split(' ').filter(|token| !token.is_empty()).collect()
}

/// Splits a token into key, separator and value.
fn split_token(token: &str) -> (usize, char, &str) {
    let at = token.find([':', '=']).expect("token has a separator");
    let key = token[..at].parse().expect("numeric key");
    let separator = token[at..].chars().next().unwrap();
    (key, separator, &token[at + 1..])
}

proptest! {
    #[test]
    fn emitted_features_follow_the_rules(
        cells in row(),
        nominal in index_set(),
        remove in index_set(),
    ) {
        let config = ResolvedConfig {
            label: ColumnRef::AtIndex(0),
            emit_label: true,
            nominal: nominal.clone(),
            remove: remove.clone(),
            ..ResolvedConfig::default()
        };
        let record = StringRecord::from(cells.clone());
        let line = RowTransformer::new(&config).transform(&record).unwrap();

        prop_assert!(line.ends_with('\n'));
        prop_assert_eq!(line.matches('\n').count(), 1);

        let mut emitted = BTreeSet::new();
        for token in features(&line) {
            let (key, separator, value) = split_token(token);
            prop_assert!(emitted.insert(key), "column {} emitted twice", key);
            // Separator law: one separator picked by the column kind.
            let expected = if nominal.contains(&key) { '=' } else { ':' };
            prop_assert_eq!(separator, expected);
            prop_assert_eq!(value, cells[key].as_str());
        }

        for (index, value) in cells.iter().enumerate() {
            let kept = index != 0
                && !value.is_empty()
                && !remove.contains(&index)
                && (nominal.contains(&index) || is_nonzero_number(value));
            prop_assert_eq!(emitted.contains(&index), kept, "column {} value {:?}", index, value);
        }
    }

    #[test]
    fn label_is_always_the_configured_cell(cells in row()) {
        let config = ResolvedConfig {
            label: ColumnRef::LastCell,
            emit_label: true,
            ..ResolvedConfig::default()
        };
        let record = StringRecord::from(cells.clone());
        let line = RowTransformer::new(&config).transform(&record).unwrap();

        let label = cells.last().unwrap();
        let prefix = format!("{label} |n ");
        prop_assert!(line.starts_with(&prefix));
        let last = cells.len() - 1;
        for token in features(&line) {
            prop_assert_ne!(split_token(token).0, last);
        }
    }

    #[test]
    fn zero_spellings_are_suppressed(exponent in 0u8..20, negative in any::<bool>()) {
        let sign = if negative { "-" } else { "" };
        let zero = format!("{sign}0.000e{exponent}");
        let config = ResolvedConfig {
            label: ColumnRef::AtIndex(0),
            emit_label: true,
            nominal: [2].into(),
            ..ResolvedConfig::default()
        };
        let record = StringRecord::from(vec!["1".to_string(), zero.clone(), zero.clone()]);
        let line = RowTransformer::new(&config).transform(&record).unwrap();
        prop_assert_eq!(line, format!("1 |n 2={zero} \n"));
    }
}
