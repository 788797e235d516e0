use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

async fn settle() {
    for _ in 0..5 {
        tokio::task::yield_now().await;
    }
}

#[tokio::test(start_paused = true)]
async fn test_after_waits_for_delay() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let task = ScheduledTask::after("test", Duration::from_millis(100), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(99)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);

    let slot = Some(task);
    assert!(is_pending(&slot));
}

#[tokio::test(start_paused = true)]
async fn test_after_fires_after_delay() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let task = ScheduledTask::after("test", Duration::from_millis(100), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });

    tokio::time::sleep(Duration::from_millis(101)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(task.is_finished());
    assert_eq!(task.label(), "test");
}

#[tokio::test(start_paused = true)]
async fn test_drop_cancels() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let task = ScheduledTask::after("test", Duration::from_millis(10), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    task.cancel();

    tokio::time::sleep(Duration::from_millis(50)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn test_replacing_slot_restarts() {
    let fired = Arc::new(AtomicUsize::new(0));
    let mut slot: Option<ScheduledTask> = None;

    for _ in 0..3 {
        let counter = fired.clone();
        slot = Some(ScheduledTask::after("restart", Duration::from_millis(100), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        tokio::time::sleep(Duration::from_millis(60)).await;
    }
    assert!(is_pending(&slot));

    tokio::time::sleep(Duration::from_millis(50)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert!(!is_pending(&slot));
}

#[tokio::test(start_paused = true)]
async fn test_every_repeats_until_dropped() {
    let fired = Arc::new(AtomicUsize::new(0));
    let counter = fired.clone();
    let task = ScheduledTask::every(
        "interval",
        Duration::from_millis(50),
        Duration::from_millis(100),
        move || {
            counter.fetch_add(1, Ordering::SeqCst);
        },
    );

    tokio::time::sleep(Duration::from_millis(260)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 3);

    drop(task);
    tokio::time::sleep(Duration::from_millis(500)).await;
    settle().await;
    assert_eq!(fired.load(Ordering::SeqCst), 3);
}

#[test]
fn test_is_pending_empty_slot() {
    assert!(!is_pending(&None));
}
