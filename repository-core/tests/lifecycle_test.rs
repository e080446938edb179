//! Integration tests for [`repository_core::BaseRepository`].
//!
//! Uses recording hooks to observe which extension points run, in which order and how often.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use repository_core::{BaseRepository, LifecycleState, Repository, RepositoryError, StoreHooks};
use tokio::sync::Notify;

#[derive(Default)]
struct RecordingHooks {
    calls: Arc<Mutex<Vec<&'static str>>>,
    fail_database: bool,
    fail_collection: bool,
    database_entered: Option<Arc<Notify>>,
    database_gate: Option<Arc<Notify>>,
}

impl RecordingHooks {
    fn with_log(calls: Arc<Mutex<Vec<&'static str>>>) -> Self {
        Self {
            calls,
            ..Default::default()
        }
    }

    fn record(&self, call: &'static str) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl StoreHooks for RecordingHooks {
    async fn create_database_if_not_exists(&self) -> repository_core::Result<()> {
        if let Some(entered) = &self.database_entered {
            entered.notify_one();
        }
        if let Some(gate) = &self.database_gate {
            gate.notified().await;
        }
        self.record("create_database");
        if self.fail_database {
            return Err(RepositoryError::Database("database unavailable".to_string()));
        }
        Ok(())
    }

    async fn create_collection_if_not_exists(&self) -> repository_core::Result<()> {
        self.record("create_collection");
        if self.fail_collection {
            return Err(RepositoryError::Collection("creation conflict".to_string()));
        }
        Ok(())
    }

    fn dispose_managed(&self) {
        self.record("dispose_managed");
    }

    fn dispose_unmanaged(&self) {
        self.record("dispose_unmanaged");
    }
}

fn count(calls: &Arc<Mutex<Vec<&'static str>>>, name: &str) -> usize {
    calls.lock().unwrap().iter().filter(|c| **c == name).count()
}

/// **Test: Initialize runs the database hook, then the collection hook.**
///
/// **Setup:** Fresh repository with recording hooks.
/// **Action:** `initialize().await`.
/// **Expected:** Calls are `[create_database, create_collection]`; state is Initialized.
#[tokio::test]
async fn test_initialize_runs_hooks_in_order() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));

    repo.initialize().await.expect("Failed to initialize");

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["create_database", "create_collection"]
    );
    assert_eq!(repo.state(), LifecycleState::Initialized);
}

/// **Test: A second initialize does not run the hooks again.**
///
/// **Setup:** Initialized repository.
/// **Action:** `initialize().await` again.
/// **Expected:** Ok; each create hook ran once in total.
#[tokio::test]
async fn test_initialize_twice_runs_hooks_once() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));

    repo.initialize().await.expect("first initialize");
    repo.initialize().await.expect("second initialize");

    assert_eq!(count(&calls, "create_database"), 1);
    assert_eq!(count(&calls, "create_collection"), 1);
}

/// **Test: Dispose twice releases resources exactly once.**
///
/// **Setup:** Fresh repository.
/// **Action:** `dispose()` twice.
/// **Expected:** managed and unmanaged hooks each ran once, managed first; flag stays true.
#[tokio::test]
async fn test_dispose_twice_is_idempotent() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));

    repo.dispose();
    assert!(repo.is_disposed());
    repo.dispose();
    assert!(repo.is_disposed());

    assert_eq!(
        *calls.lock().unwrap(),
        vec!["dispose_managed", "dispose_unmanaged"]
    );
}

/// **Test: Dispose N times after initialize still releases once.**
#[tokio::test]
async fn test_dispose_many_times_after_initialize() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));
    repo.initialize().await.expect("initialize");

    for _ in 0..10 {
        repo.dispose();
        assert_eq!(repo.state(), LifecycleState::Disposed);
    }

    assert_eq!(count(&calls, "dispose_managed"), 1);
    assert_eq!(count(&calls, "dispose_unmanaged"), 1);
}

/// **Test: Dropping a repository disposes it, and an explicit dispose is not repeated by drop.**
#[tokio::test]
async fn test_drop_disposes_once() {
    let calls = Arc::new(Mutex::new(Vec::new()));

    {
        let _repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));
    }
    assert_eq!(count(&calls, "dispose_managed"), 1);
    assert_eq!(count(&calls, "dispose_unmanaged"), 1);

    calls.lock().unwrap().clear();
    {
        let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));
        repo.dispose();
    }
    assert_eq!(count(&calls, "dispose_managed"), 1);
    assert_eq!(count(&calls, "dispose_unmanaged"), 1);
}

/// **Test: Concurrent dispose from many threads releases once.**
///
/// **Setup:** Repository shared across 16 threads.
/// **Action:** Every thread calls `dispose()`.
/// **Expected:** Exactly one managed and one unmanaged release.
#[test]
fn test_concurrent_dispose_releases_once() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));

    std::thread::scope(|scope| {
        for _ in 0..16 {
            scope.spawn(|| repo.dispose());
        }
    });

    assert!(repo.is_disposed());
    assert_eq!(count(&calls, "dispose_managed"), 1);
    assert_eq!(count(&calls, "dispose_unmanaged"), 1);
}

/// **Test: Dispose while the database hook runs defers the release and stops initialization.**
///
/// **Setup:** Database hook blocks on a gate; initialization spawned in the background.
/// **Action:** Wait until the database hook is running, `dispose()`, then open the gate.
/// **Expected:** Dispose returns normally without releasing yet; initialize returns `Disposed`
/// without running the collection hook; the release then runs exactly once, after the database hook.
#[tokio::test]
async fn test_dispose_during_initialize_defers_release() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let entered = Arc::new(Notify::new());
    let gate = Arc::new(Notify::new());
    let hooks = RecordingHooks {
        calls: calls.clone(),
        database_entered: Some(entered.clone()),
        database_gate: Some(gate.clone()),
        ..Default::default()
    };
    let repo = Arc::new(BaseRepository::new(hooks));

    let handle = repo.spawn_initialize();
    entered.notified().await;
    repo.dispose();
    assert!(repo.is_disposed());
    assert_eq!(count(&calls, "dispose_managed"), 0);

    gate.notify_one();
    let result = handle.await.expect("join");

    assert!(matches!(result, Err(RepositoryError::Disposed)));
    assert_eq!(repo.state(), LifecycleState::Disposed);
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["create_database", "dispose_managed", "dispose_unmanaged"]
    );

    repo.dispose();
    assert_eq!(count(&calls, "dispose_managed"), 1);
}

/// **Test: A deferred release still runs when the initialization task is aborted.**
///
/// **Setup:** Database hook blocks on a gate that never opens.
/// **Action:** `dispose()` while the hook runs, then abort the initialization task.
/// **Expected:** Managed and unmanaged hooks each run once.
#[tokio::test]
async fn test_deferred_release_runs_when_initialize_is_aborted() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let entered = Arc::new(Notify::new());
    let hooks = RecordingHooks {
        calls: calls.clone(),
        database_entered: Some(entered.clone()),
        database_gate: Some(Arc::new(Notify::new())),
        ..Default::default()
    };
    let repo = Arc::new(BaseRepository::new(hooks));

    let handle = repo.spawn_initialize();
    entered.notified().await;
    repo.dispose();

    handle.abort();
    assert!(handle.await.expect_err("aborted").is_cancelled());

    assert_eq!(count(&calls, "dispose_managed"), 1);
    assert_eq!(count(&calls, "dispose_unmanaged"), 1);
}

/// **Test: Dispose before initialize ever starts releases immediately.**
#[tokio::test]
async fn test_dispose_before_initialize_releases_immediately() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = BaseRepository::new(RecordingHooks::with_log(calls.clone()));

    repo.dispose();
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["dispose_managed", "dispose_unmanaged"]
    );
    assert!(matches!(
        repo.initialize().await,
        Err(RepositoryError::Disposed)
    ));
    assert_eq!(count(&calls, "create_database"), 0);
}

/// **Test: A failing collection hook propagates out of initialize.**
///
/// **Setup:** Collection hook returns `RepositoryError::Collection`.
/// **Action:** `initialize().await`.
/// **Expected:** The same error comes back unchanged; the database hook ran first; state stays Fresh.
#[tokio::test]
async fn test_collection_hook_failure_propagates() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let hooks = RecordingHooks {
        calls: calls.clone(),
        fail_collection: true,
        ..Default::default()
    };
    let repo = BaseRepository::new(hooks);

    let err = repo.initialize().await.expect_err("should fail");

    assert!(matches!(err, RepositoryError::Collection(ref msg) if msg == "creation conflict"));
    assert_eq!(
        *calls.lock().unwrap(),
        vec!["create_database", "create_collection"]
    );
    assert_eq!(repo.state(), LifecycleState::Fresh);
}

/// **Test: A failing database hook skips the collection hook.**
#[tokio::test]
async fn test_database_hook_failure_skips_collection() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let hooks = RecordingHooks {
        calls: calls.clone(),
        fail_database: true,
        ..Default::default()
    };
    let repo = BaseRepository::new(hooks);

    let err = repo.initialize().await.expect_err("should fail");

    assert!(matches!(err, RepositoryError::Database(_)));
    assert_eq!(*calls.lock().unwrap(), vec!["create_database"]);
}

/// **Test: After a failed initialize, a later call runs both hooks again.**
#[tokio::test]
async fn test_initialize_can_be_retried_by_caller() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let hooks = RecordingHooks {
        calls: calls.clone(),
        fail_database: true,
        ..Default::default()
    };
    let repo = BaseRepository::new(hooks);
    assert!(repo.initialize().await.is_err());

    assert!(repo.initialize().await.is_err());
    assert_eq!(count(&calls, "create_database"), 2);
    assert_eq!(count(&calls, "create_collection"), 0);
}

/// **Test: Concurrent initialize calls share one run of the hooks.**
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_initialize_runs_hooks_once() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let repo = Arc::new(BaseRepository::new(RecordingHooks::with_log(calls.clone())));

    let handles: Vec<_> = (0..8).map(|_| repo.spawn_initialize()).collect();
    for handle in handles {
        handle.await.expect("join").expect("initialize");
    }

    assert_eq!(count(&calls, "create_database"), 1);
    assert_eq!(count(&calls, "create_collection"), 1);
}
