// tests/watch_loop.rs

use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use watcher_daemon::engine::{WatchContext, WatchLoop};
use watcher_daemon::errors::Result;
use watcher_daemon::fs::mock::MockFileSystem;
use watcher_daemon_test_utils::builders::WatchConfigBuilder;
use watcher_daemon_test_utils::fake_backend::CountingBackend;
use watcher_daemon_test_utils::{init_tracing, wait_until, with_timeout};

const FREQUENCY: Duration = Duration::from_millis(150);

fn stale_fs() -> MockFileSystem {
    let fs = MockFileSystem::new();
    let old = SystemTime::now() - Duration::from_secs(3600);
    fs.add_file("main.go", old);
    fs.add_file("pkg/util.go", old);
    fs.add_file("pkg/notes.txt", old);
    fs
}

fn context(fs: &MockFileSystem, backend: &Arc<CountingBackend>) -> Arc<WatchContext> {
    let config = WatchConfigBuilder::new(".")
        .frequency(FREQUENCY)
        .command("go build ./...")
        .build();
    context_with(config, fs, backend)
}

fn context_with(
    config: watcher_daemon::config::WatchConfig,
    fs: &MockFileSystem,
    backend: &Arc<CountingBackend>,
) -> Arc<WatchContext> {
    Arc::new(WatchContext::new(
        config,
        Arc::new(fs.clone()),
        Arc::clone(backend) as _,
    ))
}

struct RunningLoop {
    stop: oneshot::Sender<()>,
    handle: JoinHandle<Result<()>>,
}

impl RunningLoop {
    fn start(ctx: Arc<WatchContext>) -> Self {
        let (stop, stopped) = oneshot::channel::<()>();
        let shutdown = async move {
            let _ = stopped.await;
        };
        let handle = tokio::spawn(WatchLoop::new(ctx).run(shutdown));
        Self { stop, handle }
    }

    async fn shutdown(self) -> Result<()> {
        let _ = self.stop.send(());
        with_timeout(self.handle).await.unwrap()
    }
}

#[tokio::test]
async fn one_change_runs_the_command_once() {
    init_tracing();
    let fs = stale_fs();
    let backend = Arc::new(CountingBackend::new());
    let running = RunningLoop::start(context(&fs, &backend));

    // Land between two ticks so exactly one window contains the change.
    tokio::time::sleep(FREQUENCY + FREQUENCY / 2).await;
    fs.touch("pkg/util.go", SystemTime::now()).unwrap();

    let b = Arc::clone(&backend);
    assert!(
        wait_until(Duration::from_secs(2), move || b.calls() >= 1).await,
        "command never ran"
    );

    tokio::time::sleep(FREQUENCY * 3).await;
    assert_eq!(backend.calls(), 1);
    assert_eq!(backend.executed(), vec!["go build ./...".to_string()]);

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn untouched_tree_never_runs_the_command() {
    init_tracing();
    let fs = stale_fs();
    let backend = Arc::new(CountingBackend::new());
    let running = RunningLoop::start(context(&fs, &backend));

    tokio::time::sleep(FREQUENCY * 5).await;
    assert_eq!(backend.calls(), 0);

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn non_matching_extension_is_ignored() {
    init_tracing();
    let fs = stale_fs();
    let backend = Arc::new(CountingBackend::new());
    let running = RunningLoop::start(context(&fs, &backend));

    for _ in 0..8 {
        fs.touch("pkg/notes.txt", SystemTime::now()).unwrap();
        tokio::time::sleep(FREQUENCY / 2).await;
    }
    assert_eq!(backend.calls(), 0);

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn failing_command_does_not_stop_the_loop() {
    init_tracing();
    let fs = stale_fs();
    let backend = Arc::new(CountingBackend::new());
    backend.set_failing(true);
    let running = RunningLoop::start(context(&fs, &backend));

    let toucher = {
        let fs = fs.clone();
        tokio::spawn(async move {
            loop {
                fs.touch("main.go", SystemTime::now()).unwrap();
                tokio::time::sleep(FREQUENCY / 3).await;
            }
        })
    };

    let b = Arc::clone(&backend);
    let kept_going = wait_until(Duration::from_secs(3), move || b.calls() >= 3).await;
    toucher.abort();

    assert!(kept_going, "loop stopped after {} failed runs", backend.calls());
    assert!(!running.handle.is_finished());

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn shutdown_returns_promptly_with_a_busy_command() {
    init_tracing();
    let fs = stale_fs();
    let backend = Arc::new(CountingBackend::with_delay(Duration::from_secs(30)));
    let running = RunningLoop::start(context(&fs, &backend));

    tokio::time::sleep(FREQUENCY + FREQUENCY / 2).await;
    fs.touch("main.go", SystemTime::now()).unwrap();
    tokio::time::sleep(FREQUENCY * 2).await;

    running.shutdown().await.unwrap();
}

#[tokio::test]
async fn run_once_reports_the_changed_file() {
    init_tracing();
    let fs = stale_fs();
    fs.touch("pkg/util.go", SystemTime::now()).unwrap();
    let backend = Arc::new(CountingBackend::new());

    let report = with_timeout(WatchLoop::new(context(&fs, &backend)).run_once())
        .await
        .unwrap();

    assert_eq!(report.files_scanned, 2);
    let changed = report.changed.expect("a change");
    assert_eq!(changed.name, "util.go");
    assert_eq!(backend.calls(), 1);
}

#[tokio::test]
async fn run_once_without_changes_runs_nothing() {
    let fs = stale_fs();
    let backend = Arc::new(CountingBackend::new());

    let report = with_timeout(WatchLoop::new(context(&fs, &backend)).run_once())
        .await
        .unwrap();

    assert_eq!(report.files_scanned, 2);
    assert!(report.changed.is_none());
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn run_once_propagates_command_failure() {
    let fs = stale_fs();
    fs.touch("main.go", SystemTime::now()).unwrap();
    let backend = Arc::new(CountingBackend::new());
    backend.set_failing(true);

    let result = with_timeout(WatchLoop::new(context(&fs, &backend)).run_once()).await;

    assert!(result.is_err());
}

/// Timeline, with ticks every second and 200ms per file check over
/// `a.go`..`d.go`:
/// - 0.9s: `a.go` touched; cycle 1 reports it at 1.2s and the command starts.
/// - 1.95s: `d.go` touched; cycle 2 starts at 2s and would reach `d.go` at
///   2.8s, inside its window.
/// - 2.1s: the command finishes. A failure cancels cycle 2 before it gets to
///   `d.go`; cycle 3 (3s) sees `d.go` outside its window.
async fn commands_run_with_cycle_two_in_flight(failing: bool) -> usize {
    let fs = MockFileSystem::new();
    let old = SystemTime::now() - Duration::from_secs(3600);
    for name in ["a.go", "b.go", "c.go", "d.go"] {
        fs.add_file(name, old);
    }

    let backend = Arc::new(CountingBackend::with_delay(Duration::from_millis(900)));
    backend.set_failing(failing);

    let config = WatchConfigBuilder::new(".")
        .frequency(Duration::from_secs(1))
        .check_delay(Duration::from_millis(200))
        .command("go build ./...")
        .build();

    let start = Instant::now();
    let running = RunningLoop::start(context_with(config, &fs, &backend));

    sleep_until(start + Duration::from_millis(900)).await;
    fs.touch("a.go", SystemTime::now()).unwrap();

    sleep_until(start + Duration::from_millis(1950)).await;
    fs.touch("d.go", SystemTime::now()).unwrap();

    sleep_until(start + Duration::from_millis(4200)).await;
    let calls = backend.calls();

    running.shutdown().await.unwrap();
    calls
}

#[tokio::test]
async fn command_failure_cancels_the_cycle_in_flight() {
    init_tracing();
    assert_eq!(commands_run_with_cycle_two_in_flight(true).await, 1);
}

#[tokio::test]
async fn successful_command_leaves_the_cycle_in_flight_alone() {
    init_tracing();
    assert_eq!(commands_run_with_cycle_two_in_flight(false).await, 2);
}

#[tokio::test]
async fn shell_command_reaches_the_backend_unsplit() {
    let fs = stale_fs();
    fs.touch("main.go", SystemTime::now()).unwrap();
    let backend = Arc::new(CountingBackend::new());
    let config = WatchConfigBuilder::new(".")
        .frequency(FREQUENCY)
        .shell_command("go vet ./... && go build ./...")
        .build();
    assert!(config.command.is_shell());

    let report = with_timeout(WatchLoop::new(context_with(config, &fs, &backend)).run_once())
        .await
        .unwrap();

    assert!(report.changed.is_some());
    assert_eq!(backend.executed(), vec!["go vet ./... && go build ./...".to_string()]);
}
