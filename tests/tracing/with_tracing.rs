//! Tests with tracing feature enabled

use flowx::{filter, Done, Emission, Events, TaskList};
use tracing_subscriber::{fmt, EnvFilter};

use crate::common::tokio_spawner;

fn init_subscriber() {
    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test(flavor = "multi_thread")]
async fn test_tracing_with_every_executor() {
    init_subscriber();

    let mut list = TaskList::new();
    list.add(|done: Done<i32>, _| async move { done.ok([2]) })
        .add(|done: Done<i32>, inputs: Vec<i32>| async move { done.ok([inputs[0] * 3]) });
    assert_eq!(list.run_waterfall(Vec::new()).await.unwrap(), vec![6]);

    let mut list = TaskList::new();
    list.add(|done: Done<i32>, _| async move { done.ok([1]) })
        .add(|done: Done<i32>, _| async move { done.fail("traced failure") });
    assert!(list.run_parallel(tokio_spawner).await.is_err());

    let mut list = TaskList::<()>::new();
    list.add(|_done: Done<()>, _| async move { panic!("traced panic") });
    assert!(list.run_series().await.is_err());
}

#[tokio::test]
async fn test_tracing_with_events_and_combinators() {
    init_subscriber();

    let events = Events::<u8>::new();
    events
        .on("error", |_: &Emission<u8>| Err("error handler failure".into()))
        .once("work", |_: &Emission<u8>| Err("work failure".into()));
    events.emit("work", [1]).await;
    events.emit("missing", []).await;

    let kept = filter(vec![1, 2, 3], |done: Done<bool>, value: i32, _| async move {
        done.ok([value != 2]);
    })
    .await
    .unwrap();
    assert_eq!(kept, vec![1, 3]);
}
