use std::sync::Arc;
use std::sync::atomic::AtomicBool;

use crate::engine::core::column::Block;
use crate::engine::core::read::aggregate::{Field, RowSelect};
use crate::engine::core::read::sink::MemoryBudget;
use crate::engine::errors::StatsError;
use crate::engine::shard::{RunOptions, run_sharded};
use crate::logging::init_for_tests;
use crate::test_helpers::Factory;

fn options(shard_count: usize) -> RunOptions {
    RunOptions {
        shard_count,
        arena_page_size: 4,
        budget: Arc::new(MemoryBudget::unlimited()),
        stop: None,
    }
}

fn blocks() -> Vec<Block> {
    (0..12u64)
        .map(|i| {
            let paths = [format!("/a/{i}"), format!("/b/{i}"), format!("/c/{i}")];
            Factory::block()
                .with_strings("host", &["h1", "h2", "h3"])
                .with_uint64("latency", &[100 + i, 50 + (i * 7) % 11, 400 - i])
                .with_strings("path", &[&paths[0], &paths[1], &paths[2]].map(String::as_str))
                .create()
        })
        .collect()
}

fn funcs() -> Vec<RowSelect> {
    vec![
        RowSelect::row_min("latency", vec!["path".to_string()]),
        RowSelect::row_max("latency", vec!["path".to_string()]),
    ]
}

fn sorted(mut rows: Vec<Vec<Field>>) -> Vec<Vec<Field>> {
    rows.sort_by(|a, b| a[0].value.cmp(&b[0].value));
    rows
}

#[test]
fn shard_count_does_not_change_results() {
    init_for_tests();
    let blocks = blocks();
    let by = vec!["host".to_string()];
    let expected = sorted(run_sharded(funcs(), by.clone(), &blocks, &options(1)).unwrap());

    for shards in [2, 3, 5, 16] {
        let got = sorted(run_sharded(funcs(), by.clone(), &blocks, &options(shards)).unwrap());
        assert_eq!(got, expected, "shards={shards}");
    }

    assert_eq!(expected.len(), 3);
    assert_eq!(
        expected[0],
        vec![
            Field::new("host", "h1"),
            Field::new("row_min(latency, path)", r#"{"path":"/a/0"}"#),
            Field::new("row_max(latency, path)", r#"{"path":"/a/11"}"#),
        ]
    );
    assert_eq!(expected[2][1].value, r#"{"path":"/c/11"}"#);
    assert_eq!(expected[2][2].value, r#"{"path":"/c/0"}"#);
}

#[test]
fn default_shard_count_follows_thread_pool() {
    let opts = options(0);
    assert_eq!(opts.effective_shard_count(), rayon::current_num_threads().max(1));

    let blocks = blocks();
    let rows = run_sharded(funcs(), Vec::new(), &blocks, &opts).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0].value, r#"{"path":"/b/0"}"#);
}

#[test]
fn no_blocks_without_by_fields_yields_empty_group() {
    let blocks: Vec<Block> = Vec::new();
    let rows = run_sharded(funcs(), Vec::new(), &blocks, &options(4)).unwrap();
    assert_eq!(
        rows,
        vec![vec![
            Field::new("row_min(latency, path)", "{}"),
            Field::new("row_max(latency, path)", "{}"),
        ]]
    );
}

#[test]
fn memory_limit_aborts_the_query() {
    init_for_tests();
    let blocks = blocks();
    let opts = RunOptions {
        budget: Arc::new(MemoryBudget::new(64)),
        ..options(2)
    };
    let err = run_sharded(funcs(), vec!["path".to_string()], &blocks, &opts).unwrap_err();
    assert!(matches!(err, StatsError::MemoryLimitExceeded { .. }));
    assert_eq!(opts.budget.used(), 0);
}

#[test]
fn stop_flag_cancels_the_query() {
    let blocks = blocks();
    let opts = options(3).with_stop_flag(Arc::new(AtomicBool::new(true)));
    let err = run_sharded(funcs(), Vec::new(), &blocks, &opts).unwrap_err();
    assert!(matches!(err, StatsError::Cancelled));
}
