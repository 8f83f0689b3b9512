// tests/dispatcher_fake_runner.rs

use std::collections::{BTreeSet, HashMap};
use std::error::Error;
use std::num::NonZeroUsize;
use std::time::Duration;

use prun::engine::{DispatchOptions, Dispatcher, Verdict};
use prun::errors::CommandFailure;
use prun::types::CommandSpec;
use prun_test_utils::fake_runner::{FakeRunner, Script};
use prun_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn options(concurrency: usize) -> DispatchOptions {
    DispatchOptions {
        concurrency: NonZeroUsize::new(concurrency).unwrap(),
        extra_args: Vec::new(),
    }
}

fn commands(n: usize) -> Vec<CommandSpec> {
    (0..n).map(|i| CommandSpec::new(format!("job{i}"))).collect()
}

#[tokio::test]
async fn never_exceeds_concurrency_limit() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(20));
    let dispatcher = Dispatcher::new(runner.clone(), options(3));

    let summary = with_timeout(dispatcher.run(commands(10))).await;

    assert_eq!(summary.total, 10);
    assert_eq!(summary.succeeded, 10);
    assert_eq!(summary.verdict(), Verdict::Success);
    assert_eq!(runner.executed().len(), 10);
    assert_eq!(runner.max_in_flight(), 3);
    Ok(())
}

#[tokio::test]
async fn workers_keep_stable_ids_and_take_commands_in_order() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(5));
    let dispatcher = Dispatcher::new(runner.clone(), options(2));

    with_timeout(dispatcher.run(commands(6))).await;

    let executed = runner.executed();
    let programs: Vec<&str> = executed.iter().map(|(_, c)| c.program.as_str()).collect();
    assert_eq!(programs, vec!["job0", "job1", "job2", "job3", "job4", "job5"]);

    let ids: BTreeSet<usize> = executed.iter().map(|(w, _)| w.0).collect();
    assert_eq!(ids, BTreeSet::from([1, 2]));

    // Both workers are long-lived: each handles more than one command.
    let mut per_worker: HashMap<usize, usize> = HashMap::new();
    for (w, _) in &executed {
        *per_worker.entry(w.0).or_default() += 1;
    }
    assert!(per_worker.values().all(|&n| n >= 2), "{per_worker:?}");
    Ok(())
}

#[tokio::test]
async fn extra_args_are_appended_to_every_command() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::ZERO);
    let dispatcher = Dispatcher::new(
        runner.clone(),
        DispatchOptions {
            concurrency: NonZeroUsize::new(4).unwrap(),
            extra_args: vec!["--ci".to_string()],
        },
    );

    let cmds = vec![
        CommandSpec::new("make").arg("test"),
        CommandSpec::new("lint"),
    ];
    with_timeout(dispatcher.run(cmds)).await;

    let mut args: Vec<Vec<String>> = runner.executed().into_iter().map(|(_, c)| c.args).collect();
    args.sort();
    assert_eq!(args, vec![vec!["--ci".to_string()], vec!["test".to_string(), "--ci".to_string()]]);
    Ok(())
}

#[tokio::test]
async fn failures_are_counted_without_stopping_siblings() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(2))
        .script("bad", Script::Fail)
        .script("worse", Script::Fail);
    let dispatcher = Dispatcher::new(runner.clone(), options(2));

    let cmds = vec![
        CommandSpec::new("ok"),
        CommandSpec::new("bad"),
        CommandSpec::new("ok"),
        CommandSpec::new("worse"),
        CommandSpec::new("ok"),
    ];
    let summary = with_timeout(dispatcher.run(cmds)).await;

    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.verdict(), Verdict::Failed { count: 2 });
    assert_eq!(summary.exit_code(), 2);
    let failed: Vec<&str> = summary.failed.iter().map(|f| f.command.program.as_str()).collect();
    assert_eq!(failed, vec!["bad", "worse"]);
    Ok(())
}

#[tokio::test]
async fn panicking_runner_counts_as_failure() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::from_millis(2)).script("boom", Script::Panic);
    let dispatcher = Dispatcher::new(runner.clone(), options(2));

    let cmds = vec![
        CommandSpec::new("ok"),
        CommandSpec::new("boom"),
        CommandSpec::new("ok"),
        CommandSpec::new("ok"),
    ];
    let summary = with_timeout(dispatcher.run(cmds)).await;

    assert_eq!(summary.total, 4);
    assert_eq!(summary.succeeded, 3);
    assert_eq!(summary.failure_count(), 1);
    assert!(matches!(summary.failed[0].failure, CommandFailure::WorkerLost));
    assert_eq!(summary.failed[0].index, 1);
    Ok(())
}

#[tokio::test]
async fn empty_queue_finishes_immediately() -> TestResult {
    init_tracing();

    let runner = FakeRunner::new(Duration::ZERO);
    let dispatcher = Dispatcher::new(runner.clone(), options(4));

    let summary = with_timeout(dispatcher.run(Vec::new())).await;

    assert_eq!(summary.total, 0);
    assert_eq!(summary.exit_code(), 0);
    assert!(runner.executed().is_empty());
    Ok(())
}
