use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use campaign_engine::PollScheduler;

const PERIOD: Duration = Duration::from_secs(5);

fn counter() -> (Arc<AtomicUsize>, impl FnMut() + Send + 'static) {
    let count = Arc::new(AtomicUsize::new(0));
    let tick_count = count.clone();
    (count, move || {
        tick_count.fetch_add(1, Ordering::SeqCst);
    })
}

#[tokio::test(start_paused = true)]
async fn ticks_once_per_period_after_the_first_period() {
    let mut scheduler = PollScheduler::new();
    let (count, on_tick) = counter();
    scheduler.schedule(PERIOD, on_tick);

    tokio::time::sleep(Duration::from_secs(4)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);

    tokio::time::sleep(Duration::from_secs(7)).await;
    assert_eq!(count.load(Ordering::SeqCst), 2);
    assert!(scheduler.is_active());
}

#[tokio::test(start_paused = true)]
async fn cancel_stops_further_ticks() {
    let mut scheduler = PollScheduler::new();
    let (count, on_tick) = counter();
    scheduler.schedule(PERIOD, on_tick);

    tokio::time::sleep(Duration::from_secs(6)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);

    scheduler.cancel();
    assert!(!scheduler.is_active());
    tokio::time::sleep(Duration::from_secs(60)).await;
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn rescheduling_replaces_the_previous_timer() {
    let mut scheduler = PollScheduler::new();
    let (first, first_tick) = counter();
    let (second, second_tick) = counter();

    scheduler.schedule(PERIOD, first_tick);
    tokio::time::sleep(Duration::from_secs(3)).await;
    scheduler.schedule(PERIOD, second_tick);
    tokio::time::sleep(Duration::from_secs(11)).await;

    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_scheduler_stops_the_timer() {
    let (count, on_tick) = counter();
    {
        let mut scheduler = PollScheduler::new();
        scheduler.schedule(PERIOD, on_tick);
    }

    tokio::time::sleep(Duration::from_secs(30)).await;
    assert_eq!(count.load(Ordering::SeqCst), 0);
}
