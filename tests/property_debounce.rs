use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use proptest::prelude::*;
use tokio::time::{sleep, Duration};

use rewatch::engine::{ActionOutcome, DebouncedAction, Debouncer};

const WINDOW_MS: u64 = 100;

struct Collect(Arc<Mutex<Vec<usize>>>);

impl DebouncedAction for Collect {
    type Job = usize;

    fn run(&mut self, job: usize) -> Pin<Box<dyn Future<Output = ActionOutcome> + Send + '_>> {
        self.0.lock().unwrap().push(job);
        Box::pin(async { ActionOutcome::Continue })
    }
}

// Gaps stay clear of the window itself so that a call never lands on the
// exact instant a deadline expires.
fn gap_strategy() -> impl Strategy<Value = u64> {
    prop_oneof![0..WINDOW_MS - 10, WINDOW_MS + 10..WINDOW_MS * 3]
}

/// A job runs iff it is the last call, or the next call came more than one
/// window later.
fn expected_runs(gaps: &[u64]) -> Vec<usize> {
    (0..gaps.len())
        .filter(|&i| i + 1 == gaps.len() || gaps[i] > WINDOW_MS)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn coalesces_calls_within_window(gaps in proptest::collection::vec(gap_strategy(), 1..12)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();

        let ran = rt.block_on(async {
            let log = Arc::new(Mutex::new(Vec::new()));
            let debouncer = Debouncer::spawn(
                Duration::from_millis(WINDOW_MS),
                Collect(Arc::clone(&log)),
            );

            for (i, gap) in gaps.iter().enumerate() {
                debouncer.call(i);
                sleep(Duration::from_millis(*gap)).await;
            }
            sleep(Duration::from_millis(WINDOW_MS * 5)).await;

            let ran = log.lock().unwrap().clone();
            ran
        });

        prop_assert_eq!(ran, expected_runs(&gaps));
    }
}
