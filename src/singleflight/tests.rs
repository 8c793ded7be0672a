//! Coalescer Tests
//!
//! Verifies that concurrent callers share one execution, that dropping a caller
//! never aborts or re-runs the shared call, and that results are not kept once
//! the call has resolved.

#[cfg(test)]
mod tests {
    use crate::singleflight::flight::FlightGroup;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;
    use tokio::sync::Barrier;

    #[tokio::test]
    async fn test_run_returns_function_result() {
        let group: FlightGroup<Result<String, String>> = FlightGroup::new();

        let value = group.run("key", || async { Ok("bar".to_string()) }).await;
        assert_eq!(value, Ok("bar".to_string()));

        let err = group.run("key", || async { Err("boom".to_string()) }).await;
        assert_eq!(err, Err("boom".to_string()));
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_execute_once() {
        const CALLERS: usize = 10;

        let group = Arc::new(FlightGroup::<usize>::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let barrier = Arc::new(Barrier::new(CALLERS));

        let mut handles = Vec::new();
        for _ in 0..CALLERS {
            let group = group.clone();
            let calls = calls.clone();
            let barrier = barrier.clone();
            handles.push(tokio::spawn(async move {
                barrier.wait().await;
                group
                    .run("shared", || async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                        // Keep the call open long enough for every caller to join
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        n * 100
                    })
                    .await
            }));
        }

        let results: Vec<usize> = futures::future::join_all(handles)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(results.iter().all(|&v| v == 100), "results: {:?}", results);
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_sequential_calls_execute_each_time() {
        let group: FlightGroup<usize> = FlightGroup::new();
        let calls = Arc::new(AtomicUsize::new(0));

        for expected in 1..=3 {
            let calls = calls.clone();
            let value = group
                .run("key", || async move { calls.fetch_add(1, Ordering::SeqCst) + 1 })
                .await;
            assert_eq!(value, expected);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_distinct_keys_do_not_coalesce() {
        let group: FlightGroup<String> = FlightGroup::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let (calls_a, calls_b) = (calls.clone(), calls.clone());

        let (a, b) = tokio::join!(
            group.run("a", || async move {
                calls_a.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                "a".to_string()
            }),
            group.run("b", || async move {
                calls_b.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(50)).await;
                "b".to_string()
            }),
        );

        assert_eq!(a, "a");
        assert_eq!(b, "b");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_dropped_leader_still_delivers_to_waiter() {
        let group = Arc::new(FlightGroup::<usize>::new());
        let calls = Arc::new(AtomicUsize::new(0));

        let leader = {
            let group = group.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                group
                    .run("slow", || async move {
                        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                        tokio::time::sleep(Duration::from_millis(200)).await;
                        n
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let waiter = {
            let group = group.clone();
            let calls = calls.clone();
            tokio::spawn(async move {
                group
                    .run("slow", || async move { calls.fetch_add(1, Ordering::SeqCst) + 100 })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        leader.abort();

        let value = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter should not hang")
            .unwrap();
        assert_eq!(value, 1, "waiter shares the leader's call");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(group.in_flight(), 0);
    }

    #[tokio::test]
    async fn test_dropped_lone_caller_releases_entry() {
        let group = Arc::new(FlightGroup::<&'static str>::new());
        let finished = Arc::new(AtomicUsize::new(0));

        let caller = {
            let group = group.clone();
            let finished = finished.clone();
            tokio::spawn(async move {
                group
                    .run("gone", || async move {
                        tokio::time::sleep(Duration::from_millis(50)).await;
                        finished.fetch_add(1, Ordering::SeqCst);
                        "done"
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(group.in_flight(), 1);

        caller.abort();
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(finished.load(Ordering::SeqCst), 1);
        assert_eq!(group.in_flight(), 0);

        // The next call starts fresh
        assert_eq!(group.run("gone", || async { "again" }).await, "again");
    }

    async fn explode() -> usize {
        panic!("getter blew up")
    }

    #[tokio::test]
    #[should_panic(expected = "in-flight call for boom failed")]
    async fn test_panicking_call_propagates_to_callers() {
        let group: FlightGroup<usize> = FlightGroup::new();
        group.run("boom", explode).await;
    }
}
