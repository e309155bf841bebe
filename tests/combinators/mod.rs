//! Map and filter combinator tests

use std::time::Duration;

use flowx::{filter, filter_parallel, map, map_parallel, Done, FlowError};
use tokio::time::sleep;

use crate::common::tokio_spawner;

#[tokio::test]
async fn test_map_strings_in_order() {
    let mapped = map(
        vec!["test", "test2", "test3"],
        |done: Done<String>, value: &'static str, index: usize| async move {
            sleep(Duration::from_millis(5)).await;
            done.ok([format!("{value}#{index}")]);
        },
    )
    .await
    .unwrap();

    assert_eq!(mapped, vec!["test#0", "test2#1", "test3#2"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_map_parallel_contains_every_result() {
    let mut mapped = map_parallel(
        1..=20u32,
        |done: Done<u32>, value: u32, _| async move { done.ok([value * value]) },
        tokio_spawner,
    )
    .await
    .unwrap();

    mapped.sort_unstable();
    assert_eq!(mapped, (1..=20).map(|v| v * v).collect::<Vec<u32>>());
}

#[tokio::test]
async fn test_map_failure_reports_element_index() {
    let err = map(
        vec![2, 4, 5, 6],
        |done: Done<i32>, value: i32, _| async move {
            if value % 2 == 1 {
                done.fail(format!("{value} is odd"));
            } else {
                done.ok([value / 2]);
            }
        },
    )
    .await
    .unwrap_err();

    match err {
        FlowError::Task { index, source } => {
            assert_eq!(index, 2);
            assert_eq!(source.to_string(), "5 is odd");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_filter_drops_rejected_elements() {
    let kept = filter(
        vec!["test1", "test2", "test3", "test4", "test5"],
        |done: Done<bool>, value: &'static str, _| async move {
            done.ok([value != "test3"]);
        },
    )
    .await
    .unwrap();

    assert_eq!(kept, vec!["test1", "test2", "test4", "test5"]);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_filter_parallel_drops_rejected_elements() {
    let mut kept = filter_parallel(
        0..50u16,
        |done: Done<bool>, value: u16, _| async move { done.ok([value % 5 == 0]) },
        tokio_spawner,
    )
    .await
    .unwrap();

    kept.sort_unstable();
    assert_eq!(kept, vec![0, 5, 10, 15, 20, 25, 30, 35, 40, 45]);
}

#[tokio::test]
async fn test_map_then_filter_pipeline() {
    let lengths = map(
        vec!["alpha", "be", "gamma", "pi"],
        |done: Done<usize>, word: &'static str, _| async move { done.ok([word.len()]) },
    )
    .await
    .unwrap();

    let long = filter(lengths, |done: Done<bool>, len: usize, _| async move {
        done.ok([len > 2]);
    })
    .await
    .unwrap();

    assert_eq!(long, vec![5, 5]);
}

#[tokio::test]
async fn test_combinators_on_empty_input() {
    let mapped = map(Vec::<u8>::new(), |done: Done<u8>, v: u8, _| async move {
        done.ok([v])
    })
    .await;
    let kept = filter(Vec::<u8>::new(), |done: Done<bool>, _: u8, _| async move {
        done.ok([true])
    })
    .await;

    assert!(mapped.unwrap_err().is_no_tasks());
    assert!(kept.unwrap_err().is_no_tasks());
}
