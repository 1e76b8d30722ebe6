use std::sync::Arc;
use std::time::Duration;

use fulfill_core::impls::MemoryEventSink;
use fulfill_core::{Coordinator, CoordinatorConfig, ItemClass, ItemId, Snapshot, WorkerId};

const PROCESSING: Duration = Duration::from_secs(10);
const POLL: Duration = Duration::from_millis(100);

fn center() -> (Coordinator, Arc<MemoryEventSink>) {
    let sink = Arc::new(MemoryEventSink::new());
    let config = CoordinatorConfig::default()
        .with_processing_time(PROCESSING)
        .with_poll_interval(POLL);
    let coord = Coordinator::new(config, sink.clone()).expect("valid config");
    (coord, sink)
}

fn ids(raw: &[u64]) -> Vec<ItemId> {
    raw.iter().copied().map(ItemId::new).collect()
}

/// Every submitted item shows up exactly once across pending, in flight and completed.
fn assert_each_item_once(snap: &Snapshot, submitted: u64) {
    let mut seen: Vec<u64> = snap
        .pending_ids()
        .into_iter()
        .chain(snap.in_flight())
        .chain(snap.completed_ids())
        .map(|id| id.get())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (1..=submitted).collect::<Vec<_>>(), "snapshot: {snap:?}");
}

#[tokio::test]
async fn standard_standard_priority_orders_priority_first() {
    let (coord, _sink) = center();
    coord.submit_standard().await;
    coord.submit_standard().await;
    coord.submit_priority().await;

    let snap = coord.snapshot().await;
    assert_eq!(snap.pending_ids(), ids(&[3, 1, 2]));
    let classes: Vec<ItemClass> = snap.pending.iter().map(|item| item.class).collect();
    assert_eq!(
        classes,
        vec![ItemClass::Priority, ItemClass::Standard, ItemClass::Standard]
    );
}

#[tokio::test]
async fn submitted_ids_are_distinct_and_increasing() {
    let (coord, _sink) = center();
    let mut issued = Vec::new();
    for i in 0..20 {
        let id = if i % 3 == 0 {
            coord.submit_priority().await
        } else {
            coord.submit_standard().await
        };
        issued.push(id.get());
    }
    assert_eq!(issued, (1..=20).collect::<Vec<_>>());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_submitters_never_share_an_id() {
    let (coord, _sink) = center();
    let mut tasks = Vec::new();
    for t in 0..8 {
        let coord = coord.clone();
        tasks.push(tokio::spawn(async move {
            let mut mine = Vec::new();
            for _ in 0..25 {
                let id = if t % 2 == 0 {
                    coord.submit_priority().await
                } else {
                    coord.submit_standard().await
                };
                mine.push(id.get());
            }
            mine
        }));
    }

    let mut all = Vec::new();
    for task in tasks {
        let mine = task.await.unwrap();
        // each submitter sees its own ids increase
        assert!(mine.windows(2).all(|w| w[0] < w[1]));
        all.extend(mine);
    }
    all.sort_unstable();
    assert_eq!(all, (1..=200).collect::<Vec<_>>());

    let snap = coord.snapshot().await;
    let first_standard = snap
        .pending
        .iter()
        .position(|item| item.class == ItemClass::Standard)
        .unwrap();
    assert!(snap.pending[first_standard..]
        .iter()
        .all(|item| item.class == ItemClass::Standard));
}

#[tokio::test(start_paused = true)]
async fn ids_are_not_reused_after_completion_or_removal() {
    let (coord, _sink) = center();
    coord.submit_standard().await;
    coord.add_worker().await.unwrap();
    tokio::time::sleep(PROCESSING + POLL).await;
    coord.remove_worker().await;

    assert_eq!(coord.submit_standard().await, ItemId::new(2));
    assert_eq!(coord.add_worker().await.unwrap(), WorkerId::new(2));
    coord.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn one_worker_completes_one_item() {
    let (coord, sink) = center();
    coord.add_worker().await.unwrap();
    coord.submit_standard().await;

    tokio::time::sleep(PROCESSING + POLL).await;

    let snap = coord.snapshot().await;
    assert_eq!(snap.completed_ids(), ids(&[1]));
    assert!(snap.pending.is_empty());
    assert_eq!(snap.workers.len(), 1);
    assert_eq!(snap.workers[0].processing, None);
    assert_eq!(
        sink.matching("Worker #1 completed Item #1 (STANDARD) - moved to COMPLETE").len(),
        1
    );
    coord.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn removal_mid_processing_returns_the_item() {
    let (coord, sink) = center();
    coord.submit_standard().await;
    coord.add_worker().await.unwrap();

    tokio::time::sleep(PROCESSING / 4).await;
    assert_eq!(coord.snapshot().await.workers[0].processing, Some(ItemId::new(1)));

    let removal = coord.remove_worker().await;
    assert!(removal.removed());
    assert_eq!(removal.worker, Some(WorkerId::new(1)));
    assert_eq!(removal.reassigned, Some(ItemId::new(1)));

    let snap = coord.snapshot().await;
    assert!(snap.workers.is_empty());
    assert_eq!(snap.pending_ids(), ids(&[1]));
    assert!(snap.completed.is_empty());
    assert_eq!(
        sink.matching("Worker #1 removed, Item #1 returned to PENDING").len(),
        1
    );

    // the interrupted worker never completes it later
    tokio::time::sleep(PROCESSING * 2).await;
    assert!(coord.snapshot().await.completed.is_empty());
    coord.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn interrupted_item_goes_ahead_of_queued_priority_items() {
    let (coord, _sink) = center();
    coord.submit_standard().await; // 1
    coord.add_worker().await.unwrap();
    tokio::time::sleep(POLL).await;

    coord.submit_priority().await; // 2
    coord.submit_priority().await; // 3
    coord.submit_standard().await; // 4

    let removal = coord.remove_worker().await;
    assert_eq!(removal.reassigned, Some(ItemId::new(1)));
    assert_eq!(coord.snapshot().await.pending_ids(), ids(&[1, 2, 3, 4]));
    coord.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn two_workers_three_items() {
    let (coord, _sink) = center();
    coord.submit_standard().await;
    coord.submit_standard().await;
    coord.submit_standard().await;
    coord.add_worker().await.unwrap();
    coord.add_worker().await.unwrap();

    tokio::time::sleep(PROCESSING + POLL).await;

    let snap = coord.snapshot().await;
    let counts = snap.counts();
    assert_eq!(counts.completed, 2);
    assert_eq!(counts.pending + counts.in_flight, 1);
    assert_eq!(snap.total_items(), 3);
    assert_each_item_once(&snap, 3);
    coord.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn every_snapshot_holds_each_item_exactly_once() {
    let (coord, _sink) = center();
    let mut submitted = 0;
    coord.add_worker().await.unwrap();
    coord.add_worker().await.unwrap();

    for round in 0..12u64 {
        if round % 2 == 0 {
            coord.submit_standard().await;
        } else {
            coord.submit_priority().await;
        }
        submitted += 1;
        match round % 4 {
            1 => {
                coord.add_worker().await.unwrap();
            }
            3 => {
                coord.remove_worker().await;
            }
            _ => {}
        }
        tokio::time::sleep(Duration::from_millis(3_700)).await;
        assert_each_item_once(&coord.snapshot().await, submitted);
    }

    coord.shutdown_and_join().await;
    let snap = coord.snapshot().await;
    assert!(snap.workers.is_empty());
    assert_each_item_once(&snap, submitted);
}

#[tokio::test(start_paused = true)]
async fn removing_from_empty_pool_is_reported() {
    let (coord, sink) = center();
    coord.add_worker().await.unwrap();
    coord.remove_worker().await;

    let removal = coord.remove_worker().await;
    assert!(!removal.removed());
    assert_eq!(removal.reassigned, None);
    assert!(coord.snapshot().await.workers.is_empty());
    assert_eq!(sink.matching("No workers to remove").len(), 1);
}

#[tokio::test(start_paused = true)]
async fn shutdown_signals_workers_then_closes_sink() {
    let (coord, sink) = center();
    coord.add_worker().await.unwrap();
    coord.add_worker().await.unwrap();
    coord.shutdown().await;

    assert!(sink.is_closed());
    let removed = sink.matching(" removed");
    assert_eq!(removed.len(), 2);
    assert!(removed[0].ends_with("Worker #2 removed"));
    assert!(removed[1].ends_with("Worker #1 removed"));

    // late lines are dropped by the closed sink
    let before = sink.lines().len();
    coord.log("after close");
    assert_eq!(sink.lines().len(), before);
}
