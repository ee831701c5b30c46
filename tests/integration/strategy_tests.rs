//! Concurrency guarantees of every strategy, checked with instrumented collaborators

use crate::support::{executor_config, jobs, workload, InstrumentedFetcher, RecordingPersister};
use link_harvest::{ErrorKind, JobId, Outcome, OutcomeCounts, Strategy};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

fn ids(outcomes: &[Outcome]) -> HashSet<JobId> {
    outcomes.iter().map(|o| o.job_id()).collect()
}

#[test]
fn test_every_strategy_returns_one_outcome_per_job() {
    for n in [0, 1, 7, 40] {
        let batch = jobs(n);
        let expected: HashSet<JobId> = batch.iter().map(|j| j.id).collect();

        for strategy in Strategy::ALL {
            let fetcher = Arc::new(InstrumentedFetcher::new(Duration::from_millis(2)));
            let persister = Arc::new(RecordingPersister::new());
            let outcomes = strategy.execute(
                &batch,
                &workload(fetcher.clone(), persister.clone()),
                &executor_config(4),
            );

            assert_eq!(outcomes.len(), n, "{} with {} jobs", strategy, n);
            assert_eq!(ids(&outcomes), expected, "{} with {} jobs", strategy, n);
            assert_eq!(fetcher.calls(), n, "{} with {} jobs", strategy, n);
            assert_eq!(persister.saved_count(), n, "{} with {} jobs", strategy, n);
        }
    }
}

#[test]
fn test_outcome_counts_identical_across_strategies() {
    let batch = jobs(12);
    let mut counts: Vec<(Strategy, OutcomeCounts)> = Vec::new();

    for strategy in Strategy::ALL {
        let fetcher = Arc::new(
            InstrumentedFetcher::new(Duration::from_millis(3))
                .failing("https://site3.example.com/page")
                .failing("https://site8.example.com/page"),
        );
        let persister = Arc::new(RecordingPersister::new().failing("/virtual/site5.html"));

        let outcomes = strategy.execute(&batch, &workload(fetcher, persister), &executor_config(3));
        counts.push((strategy, OutcomeCounts::from_outcomes(&outcomes)));
    }

    let expected = OutcomeCounts {
        success: 9,
        skipped: 0,
        failed: 3,
    };
    for (strategy, count) in counts {
        assert_eq!(count, expected, "{}", strategy);
    }
}

#[test]
fn test_bounded_pool_never_exceeds_pool_size() {
    for pool_size in [1, 3, 5] {
        let fetcher = Arc::new(InstrumentedFetcher::new(Duration::from_millis(15)));
        let persister = Arc::new(RecordingPersister::new());

        let outcomes = Strategy::BoundedPool.execute(
            &jobs(pool_size * 4),
            &workload(fetcher.clone(), persister),
            &executor_config(pool_size),
        );

        assert_eq!(outcomes.len(), pool_size * 4);
        assert!(
            fetcher.max_in_flight() <= pool_size,
            "pool of {} saw {} concurrent fetches",
            pool_size,
            fetcher.max_in_flight()
        );
        assert!(fetcher.max_in_flight() >= 1);
    }
}

#[test]
fn test_thread_per_job_runs_jobs_concurrently() {
    let fetcher = Arc::new(InstrumentedFetcher::new(Duration::from_millis(100)));
    let persister = Arc::new(RecordingPersister::new());

    let outcomes = Strategy::ThreadPerJob.execute(
        &jobs(8),
        &workload(fetcher.clone(), persister),
        &executor_config(1),
    );

    assert_eq!(outcomes.len(), 8);
    assert!(fetcher.max_in_flight() > 1);
    assert_eq!(fetcher.distinct_threads(), 8);
}

#[test]
fn test_sequential_runs_one_at_a_time() {
    let fetcher = Arc::new(InstrumentedFetcher::new(Duration::from_millis(2)));
    let persister = Arc::new(RecordingPersister::new());

    Strategy::Sequential.execute(
        &jobs(5),
        &workload(fetcher.clone(), persister),
        &executor_config(4),
    );

    assert_eq!(fetcher.max_in_flight(), 1);
    assert_eq!(fetcher.distinct_threads(), 1);
}

#[test]
fn test_cooperative_fetches_share_one_thread() {
    for strategy in [Strategy::AsyncTwoStage, Strategy::AsyncPipelined] {
        let fetcher = Arc::new(InstrumentedFetcher::new(Duration::from_millis(30)));
        let persister = Arc::new(RecordingPersister::new());

        let outcomes = strategy.execute(
            &jobs(10),
            &workload(fetcher.clone(), persister),
            &executor_config(1),
        );

        assert_eq!(outcomes.len(), 10, "{}", strategy);
        assert_eq!(fetcher.distinct_threads(), 1, "{}", strategy);
        assert!(fetcher.max_in_flight() > 1, "{} did not overlap fetches", strategy);
    }
}

#[test]
fn test_two_stage_saves_start_after_every_fetch() {
    let batch = jobs(6);
    let fetcher = Arc::new(
        InstrumentedFetcher::new(Duration::from_millis(5))
            .with_delay("https://site2.example.com/page", Duration::from_millis(120))
            .with_delay("https://site4.example.com/page", Duration::from_millis(60)),
    );
    let persister = Arc::new(RecordingPersister::new());

    let outcomes = Strategy::AsyncTwoStage.execute(
        &batch,
        &workload(fetcher.clone(), persister.clone()),
        &executor_config(1),
    );
    assert_eq!(outcomes.len(), 6);

    let last_fetch = fetcher
        .completion_times()
        .into_iter()
        .map(|(_, at)| at)
        .max()
        .unwrap();
    let first_save = persister
        .start_times()
        .into_iter()
        .map(|(_, at)| at)
        .min()
        .unwrap();

    assert!(first_save >= last_fetch);
}

#[test]
fn test_two_stage_failed_fetch_skips_save() {
    let fetcher = Arc::new(
        InstrumentedFetcher::new(Duration::from_millis(1))
            .failing("https://site0.example.com/page"),
    );
    let persister = Arc::new(RecordingPersister::new());

    let outcomes = Strategy::AsyncTwoStage.execute(
        &jobs(3),
        &workload(fetcher, persister.clone()),
        &executor_config(1),
    );

    assert_eq!(outcomes.len(), 3);
    assert_eq!(persister.calls(), 2);
}

#[test]
fn test_pipelined_saves_interleave_with_fetches() {
    let fetcher = Arc::new(
        InstrumentedFetcher::new(Duration::from_millis(5))
            .with_delay("https://site1.example.com/page", Duration::from_millis(300)),
    );
    let persister = Arc::new(RecordingPersister::new());

    Strategy::AsyncPipelined.execute(
        &jobs(3),
        &workload(fetcher.clone(), persister.clone()),
        &executor_config(1),
    );

    let slow_fetch_done = fetcher
        .completion_times()
        .into_iter()
        .find(|(url, _)| url == "https://site1.example.com/page")
        .map(|(_, at)| at)
        .unwrap();
    let fast_save_started = persister
        .start_times()
        .into_iter()
        .find(|(path, _)| path.ends_with("site0.html"))
        .map(|(_, at)| at)
        .unwrap();

    assert!(fast_save_started < slow_fetch_done);
}

#[test]
fn test_failing_fetch_does_not_affect_siblings() {
    for strategy in Strategy::ALL {
        let fetcher = Arc::new(
            InstrumentedFetcher::new(Duration::from_millis(2))
                .failing("https://site1.example.com/page"),
        );
        let persister = Arc::new(RecordingPersister::new());

        let outcomes = strategy.execute(
            &jobs(4),
            &workload(fetcher, persister.clone()),
            &executor_config(2),
        );

        for outcome in &outcomes {
            if outcome.job_id() == JobId(1) {
                assert!(
                    matches!(
                        outcome,
                        Outcome::Failed {
                            error_kind: ErrorKind::Network,
                            ..
                        }
                    ),
                    "{}: {:?}",
                    strategy,
                    outcome
                );
            } else {
                assert!(outcome.is_success(), "{}: {:?}", strategy, outcome);
            }
        }
        assert_eq!(persister.saved_count(), 3, "{}", strategy);
    }
}

#[test]
fn test_failing_save_is_io_failure() {
    for strategy in Strategy::ALL {
        let fetcher = Arc::new(InstrumentedFetcher::new(Duration::ZERO));
        let persister = Arc::new(RecordingPersister::new().failing("/virtual/site0.html"));

        let outcomes =
            strategy.execute(&jobs(2), &workload(fetcher, persister), &executor_config(2));

        let failed = outcomes.iter().find(|o| o.job_id() == JobId(0)).unwrap();
        match failed {
            Outcome::Failed {
                error_kind,
                message,
                ..
            } => {
                assert_eq!(*error_kind, ErrorKind::Io, "{}", strategy);
                assert!(message.contains("site0.html"), "{}: {}", strategy, message);
            }
            other => panic!("{}: expected failure, got {:?}", strategy, other),
        }
    }
}
