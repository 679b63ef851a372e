//! The shared crawl frontier
//!
//! The frontier is the single source of truth for "what is pending" and
//! "what is done": a FIFO queue of admitted URLs, the visited set that
//! deduplicates work, and a counter of items that are queued or in flight.
//!
//! Termination cannot be "queue empty" -- the queue is transiently empty
//! whenever a worker is mid-fetch on a page that will enqueue more items.
//! Instead the pending counter is incremented per admission and
//! decremented once per item when its full pipeline has resolved; when it
//! reaches zero no worker can ever produce new work, so the frontier
//! closes and every blocked claimer wakes with the stop sentinel.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;
use tokio::sync::Semaphore;
use url::Url;

/// Pending queue, visited set, and in-flight counter behind one lock
///
/// The semaphore's permit count always equals the queue length, so
/// `claim` suspends exactly when the queue is empty and never pops a
/// missing item. All state mutations happen inside the mutex; the four
/// operations are indivisible with respect to each other.
pub struct Frontier {
    inner: Mutex<Inner>,
    claimable: Semaphore,
}

struct Inner {
    queue: VecDeque<Url>,
    visited: HashSet<String>,
    pending: usize,
    budget: usize,
}

impl Frontier {
    /// Creates an empty frontier with the given crawl budget
    pub fn new(budget: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                queue: VecDeque::new(),
                visited: HashSet::new(),
                pending: 0,
                budget,
            }),
            claimable: Semaphore::new(0),
        }
    }

    /// Inserts the root URL as the first pending item
    ///
    /// Called exactly once, before any worker starts.
    pub fn seed(&self, root: Url) {
        let admitted = self.try_admit(root);
        debug_assert!(admitted, "seed called twice or with a zero budget");
    }

    /// Atomically checks the visited set and the budget; on success the
    /// URL is marked visited, enqueued, and counted as pending
    ///
    /// Returns `true` iff the caller's discovery now owns this URL --
    /// exactly one admission succeeds per distinct URL, under any worker
    /// interleaving. A `false` (already seen, or budget exhausted) is a
    /// normal silent drop.
    pub fn try_admit(&self, url: Url) -> bool {
        {
            let mut inner = self.inner.lock().unwrap();

            if inner.visited.len() >= inner.budget {
                return false;
            }
            if inner.visited.contains(url.as_str()) {
                return false;
            }

            inner.visited.insert(url.as_str().to_string());
            inner.queue.push_back(url);
            inner.pending += 1;
        }

        // One permit per queued item; released outside the lock.
        self.claimable.add_permits(1);
        true
    }

    /// Removes and returns the head of the pending queue
    ///
    /// Suspends while the queue is empty; returns `None` once the
    /// frontier has closed. This is the sole suspension point for
    /// workers.
    pub async fn claim(&self) -> Option<Url> {
        match self.claimable.acquire().await {
            Ok(permit) => {
                // The permit is consumed together with its queue item.
                permit.forget();
                let mut inner = self.inner.lock().unwrap();
                let url = inner
                    .queue
                    .pop_front()
                    .expect("frontier invariant violated: permit issued with empty queue");
                Some(url)
            }
            // Closed: no more work will ever arrive.
            Err(_) => None,
        }
    }

    /// Records that a claimed item's processing has fully resolved,
    /// including all enqueue attempts it caused
    ///
    /// Must be called exactly once per admitted item, on every pipeline
    /// path (success, denial, fetch failure, budget drop). The last
    /// resolution closes the frontier and wakes all blocked claimers.
    pub fn mark_resolved(&self) {
        let now_idle = {
            let mut inner = self.inner.lock().unwrap();
            assert!(
                inner.pending > 0,
                "frontier invariant violated: mark_resolved without pending work"
            );
            inner.pending -= 1;
            inner.pending == 0
        };

        if now_idle {
            self.claimable.close();
        }
    }

    /// Whether the frontier has closed (no pending and no in-flight work)
    pub fn is_closed(&self) -> bool {
        self.claimable.is_closed()
    }

    /// Number of URLs admitted so far
    pub fn visited_len(&self) -> usize {
        self.inner.lock().unwrap().visited.len()
    }

    /// Snapshot of all admitted URLs, in no particular order
    pub fn visited(&self) -> Vec<String> {
        self.inner.lock().unwrap().visited.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_seed_then_claim() {
        let frontier = Frontier::new(10);
        frontier.seed(url("https://example.com/"));

        let claimed = frontier.claim().await;
        assert_eq!(claimed, Some(url("https://example.com/")));
        assert_eq!(frontier.visited_len(), 1);
    }

    #[tokio::test]
    async fn test_claim_is_fifo() {
        let frontier = Frontier::new(10);
        frontier.seed(url("https://example.com/a"));
        assert!(frontier.try_admit(url("https://example.com/b")));
        assert!(frontier.try_admit(url("https://example.com/c")));

        assert_eq!(frontier.claim().await, Some(url("https://example.com/a")));
        assert_eq!(frontier.claim().await, Some(url("https://example.com/b")));
        assert_eq!(frontier.claim().await, Some(url("https://example.com/c")));
    }

    #[tokio::test]
    async fn test_duplicate_admission_rejected() {
        let frontier = Frontier::new(10);
        assert!(frontier.try_admit(url("https://example.com/page")));
        assert!(!frontier.try_admit(url("https://example.com/page")));
        assert_eq!(frontier.visited_len(), 1);
    }

    #[tokio::test]
    async fn test_budget_respected() {
        let frontier = Frontier::new(2);
        assert!(frontier.try_admit(url("https://example.com/1")));
        assert!(frontier.try_admit(url("https://example.com/2")));
        assert!(!frontier.try_admit(url("https://example.com/3")));
        assert_eq!(frontier.visited_len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_admission_exactly_one_wins() {
        let frontier = Arc::new(Frontier::new(100));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let frontier = frontier.clone();
            handles.push(tokio::spawn(async move {
                frontier.try_admit(url("https://example.com/contested"))
            }));
        }

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(frontier.visited_len(), 1);
    }

    #[tokio::test]
    async fn test_last_resolution_closes_frontier() {
        let frontier = Frontier::new(10);
        frontier.seed(url("https://example.com/"));

        let claimed = frontier.claim().await.unwrap();
        assert_eq!(claimed, url("https://example.com/"));
        assert!(!frontier.is_closed());

        frontier.mark_resolved();
        assert!(frontier.is_closed());
        assert_eq!(frontier.claim().await, None);
    }

    #[tokio::test]
    async fn test_transiently_empty_queue_does_not_terminate() {
        let frontier = Frontier::new(10);
        frontier.seed(url("https://example.com/"));

        // Queue is empty while the root is "in flight"...
        let _root = frontier.claim().await.unwrap();
        assert!(!frontier.is_closed());

        // ...and the in-flight item can still produce children.
        assert!(frontier.try_admit(url("https://example.com/child")));
        frontier.mark_resolved();
        assert!(!frontier.is_closed());

        assert_eq!(
            frontier.claim().await,
            Some(url("https://example.com/child"))
        );
        frontier.mark_resolved();
        assert!(frontier.is_closed());
    }

    #[tokio::test]
    async fn test_blocked_claimer_woken_by_admission() {
        let frontier = Arc::new(Frontier::new(10));
        frontier.seed(url("https://example.com/"));
        let _root = frontier.claim().await.unwrap();

        // Claimer suspends on the now-empty queue.
        let waiter = {
            let frontier = frontier.clone();
            tokio::spawn(async move { frontier.claim().await })
        };
        tokio::task::yield_now().await;

        assert!(frontier.try_admit(url("https://example.com/late")));
        let claimed = waiter.await.unwrap();
        assert_eq!(claimed, Some(url("https://example.com/late")));
    }

    #[tokio::test]
    async fn test_close_wakes_all_blocked_claimers() {
        let frontier = Arc::new(Frontier::new(10));
        frontier.seed(url("https://example.com/"));
        let _root = frontier.claim().await.unwrap();

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let frontier = frontier.clone();
            waiters.push(tokio::spawn(async move { frontier.claim().await }));
        }
        tokio::task::yield_now().await;

        frontier.mark_resolved();

        for waiter in waiters {
            assert_eq!(waiter.await.unwrap(), None);
        }
    }

    /// Synthetic site A -> {B, C}, B -> {D}, C -> {D}: with a single
    /// claimer the claim order is A, then B and C, then D exactly once,
    /// and D is never claimed before both B and C.
    #[tokio::test]
    async fn test_bfs_level_order_with_single_claimer() {
        let frontier = Frontier::new(10);
        let (a, b, c, d) = (
            url("https://example.com/a"),
            url("https://example.com/b"),
            url("https://example.com/c"),
            url("https://example.com/d"),
        );

        frontier.seed(a.clone());

        assert_eq!(frontier.claim().await, Some(a));
        assert!(frontier.try_admit(b.clone()));
        assert!(frontier.try_admit(c.clone()));
        frontier.mark_resolved();

        assert_eq!(frontier.claim().await, Some(b));
        assert!(frontier.try_admit(d.clone()));
        frontier.mark_resolved();

        assert_eq!(frontier.claim().await, Some(c));
        // Second discovery of D collapses into the first.
        assert!(!frontier.try_admit(d.clone()));
        frontier.mark_resolved();

        assert_eq!(frontier.claim().await, Some(d));
        frontier.mark_resolved();

        assert_eq!(frontier.claim().await, None);
        assert_eq!(frontier.visited_len(), 4);
    }

    #[tokio::test]
    async fn test_resolution_after_failure_still_closes() {
        let frontier = Frontier::new(10);
        frontier.seed(url("https://example.com/ok"));
        assert!(frontier.try_admit(url("https://example.com/broken")));

        // Both items resolve -- one as a simulated fetch failure with no
        // children -- and the counter still reaches zero.
        let _first = frontier.claim().await.unwrap();
        frontier.mark_resolved();
        let _second = frontier.claim().await.unwrap();
        frontier.mark_resolved();

        assert!(frontier.is_closed());
    }
}
