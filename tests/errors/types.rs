//! Tests for error inspection

use std::fmt;

use flowx::{Done, FlowError, TaskList};

#[derive(Debug, PartialEq)]
struct QuotaExceeded {
    limit: u32,
}

impl fmt::Display for QuotaExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "quota of {} exceeded", self.limit)
    }
}

impl std::error::Error for QuotaExceeded {}

#[tokio::test]
async fn test_task_failure_keeps_original_error() {
    let mut list = TaskList::new();
    list.add(|done: Done<()>, _| async move { done.fail(QuotaExceeded { limit: 5 }) });

    let err = list.run_series().await.unwrap_err();

    assert_eq!(err.index(), Some(0));
    assert_eq!(err.to_string(), "task #0 failed: quota of 5 exceeded");
    let source = err.task_failure().expect("task failure");
    assert_eq!(
        source.downcast_ref::<QuotaExceeded>(),
        Some(&QuotaExceeded { limit: 5 })
    );
    assert!(std::error::Error::source(&err).is_some());
}

#[tokio::test]
async fn test_errors_are_cloneable_for_every_handler() {
    let mut list = TaskList::new();
    list.add(|done: Done<()>, _| async move { done.fail(QuotaExceeded { limit: 1 }) });

    let (tx, rx) = std::sync::mpsc::channel();
    for _ in 0..2 {
        let tx = tx.clone();
        list.on_complete(move |result| {
            let _ = tx.send(result.clone().unwrap_err());
        });
    }

    let returned = list.run_series().await.unwrap_err();
    let delivered: Vec<FlowError> = rx.try_iter().collect();

    assert_eq!(delivered.len(), 2);
    for err in delivered {
        assert_eq!(err.to_string(), returned.to_string());
    }
}

#[test]
fn test_non_task_errors_have_no_index() {
    assert_eq!(FlowError::NoTasks.index(), None);
    assert_eq!(FlowError::WorkersLost { missing: 2 }.index(), None);
    assert!(FlowError::NoTasks.task_failure().is_none());
    assert_eq!(
        FlowError::Abandoned { index: 4 }.to_string(),
        "task #4 dropped its completion handle without reporting an outcome"
    );
}
