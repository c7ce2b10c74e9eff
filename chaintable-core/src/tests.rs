//! Integration tests for chaintable-core

use rand::Rng;
use rand_chacha::ChaCha8Rng;

fn init_test_logger() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

fn random_key(rng: &mut ChaCha8Rng, key_space: u32) -> String {
    format!("key{}", rng.gen_range(0..key_space))
}

#[cfg(test)]
mod integration_tests {
    use super::{init_test_logger, random_key};
    use crate::{ChainedHashTable, LoadFactors, TableError};
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use std::collections::HashMap;

    /// Check the structural invariants that must hold between operations
    ///
    /// `removed` is true right after an erase that actually removed a key.
    fn assert_invariants<V>(table: &ChainedHashTable<String, V>, removed: bool) {
        let capacity = table.capacity();
        assert!(capacity >= 1);
        assert!(capacity.is_power_of_two(), "capacity {} not a power of two", capacity);

        let lf = table.load_factors();
        assert!(
            table.load_factor() <= lf.upper(),
            "load factor {} above {}",
            table.load_factor(),
            lf.upper()
        );

        // A shrink only stops short of the lower bound at capacity 1 or
        // when halving would overshoot the upper bound
        if removed && table.load_factor() < lf.lower() {
            let halved = (table.len() as f64) / ((capacity / 2).max(1) as f64);
            assert!(capacity == 1 || halved > lf.upper());
        }

        let chained: usize = table.buckets().iter().map(|b| b.len()).sum();
        assert_eq!(chained, table.len());
    }

    fn assert_matches_model(table: &ChainedHashTable<String, u64>, model: &HashMap<String, u64>) {
        assert_eq!(table.len(), model.len());

        let mut collected: Vec<(String, u64)> =
            table.iter().map(|(k, v)| (k.clone(), *v)).collect();
        let mut expected: Vec<(String, u64)> =
            model.iter().map(|(k, v)| (k.clone(), *v)).collect();
        collected.sort();
        expected.sort();
        assert_eq!(collected, expected);

        for (key, value) in model {
            assert_eq!(table.at(key.as_str()), Ok(value));
        }
    }

    #[test]
    fn test_random_operations_match_model() {
        init_test_logger();

        for seed in 0..8u64 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut table = ChainedHashTable::new();
            let mut model = HashMap::new();

            for _ in 0..2000 {
                let key = random_key(&mut rng, 300);
                if rng.gen_bool(0.6) {
                    let value: u64 = rng.gen();
                    let was_new = !model.contains_key(&key);
                    assert_eq!(table.insert(key.clone(), value), was_new);
                    model.insert(key, value);
                    assert_invariants(&table, false);
                } else {
                    let present = model.remove(&key).is_some();
                    assert_eq!(table.erase(key.as_str()), present);
                    assert!(!table.contains_key(key.as_str()));
                    assert_invariants(&table, present);
                }
            }

            assert_matches_model(&table, &model);
        }
    }

    #[test]
    fn test_custom_thresholds_random_operations() {
        let lf = LoadFactors::new(0.1, 0.9).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut table = ChainedHashTable::with_capacity_and_load_factors(4, lf);
        let mut model = HashMap::new();

        for _ in 0..3000 {
            let key = random_key(&mut rng, 1000);
            if rng.gen_bool(0.5) {
                table.insert(key.clone(), 1u64);
                model.insert(key, 1u64);
                assert_invariants(&table, false);
            } else {
                let removed = model.remove(&key);
                assert_eq!(table.remove(key.as_str()), removed);
                assert_invariants(&table, removed.is_some());
            }
        }

        assert_matches_model(&table, &model);
    }

    #[test]
    fn test_round_trip_unique_keys() {
        let mut table = ChainedHashTable::new();
        for i in 0..1000u64 {
            assert!(table.insert(format!("word{}", i), i));
        }

        assert_eq!(table.len(), 1000);
        for i in 0..1000u64 {
            assert_eq!(table.at(format!("word{}", i).as_str()), Ok(&i));
        }
        assert_eq!(table.at("word1000"), Err(TableError::KeyNotFound));
    }

    #[test]
    fn test_insert_then_erase_everything() {
        init_test_logger();
        let mut table = ChainedHashTable::new();
        for i in 0..500 {
            table.insert(format!("k{}", i), i);
        }
        let peak = table.capacity();
        assert!(peak >= 1024);

        for i in 0..500 {
            assert!(table.erase(format!("k{}", i).as_str()));
            assert_invariants(&table, true);
        }

        assert!(table.is_empty());
        assert_eq!(table.capacity(), 1);
        assert_eq!(table.iter().next(), None);
    }

    #[test]
    fn test_iteration_restartable() {
        let table: ChainedHashTable<String, u64> =
            (0..50).map(|i| (format!("k{}", i), i)).collect();

        let first: Vec<_> = table.iter().collect();
        let second: Vec<_> = table.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 50);

        // Cursor walks the same sequence
        let mut cursor = table.cursor();
        let mut walked = Vec::new();
        while let Some(pair) = cursor.get() {
            walked.push(pair);
            cursor.advance();
        }
        assert_eq!(walked, first);
    }

    #[test]
    fn test_into_iter_yields_everything() {
        let table = ChainedHashTable::from_keys_values(
            vec!["a".to_string(), "b".to_string(), "c".to_string()],
            vec![1u64, 2, 3],
        )
        .unwrap();

        let mut pairs: Vec<_> = table.into_iter().collect();
        pairs.sort();
        assert_eq!(
            pairs,
            vec![("a".to_string(), 1), ("b".to_string(), 2), ("c".to_string(), 3)]
        );
    }

    #[test]
    fn test_keyword_scoring_workflow() {
        // Bulk-load a word/points table and score a message by
        // case-insensitive substring hits
        let mut table = ChainedHashTable::new();
        for (word, points) in [("free", 3), ("Winner", 5), ("cash", 2), ("free", 4)] {
            table.insert(word.to_string(), points);
        }
        assert_eq!(table.len(), 3);

        let message = "You are a WINNER! Claim your FREE prize".to_lowercase();
        let score: i32 = table
            .iter()
            .filter(|(word, _)| message.contains(&word.to_lowercase()))
            .map(|(_, points)| *points)
            .sum();

        assert_eq!(score, 9);
    }

    #[test]
    fn test_equal_histories_produce_equal_tables() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let ops: Vec<(String, bool)> = (0..500)
            .map(|_| (random_key(&mut rng, 100), rng.gen_bool(0.7)))
            .collect();

        let build = || {
            let mut table = ChainedHashTable::new();
            for (key, insert) in &ops {
                if *insert {
                    table.insert(key.clone(), key.len());
                } else {
                    table.erase(key.as_str());
                }
            }
            table
        };

        let a = build();
        let b = build();
        assert_eq!(a, b);
        assert_eq!(a.content_digest(), b.content_digest());
    }
}
