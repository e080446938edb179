//! The repository contract and its base implementation.
//!
//! [`BaseRepository`] drives a [`StoreHooks`] implementation through the lifecycle:
//! `initialize` awaits the database hook, then the collection hook; `dispose` releases
//! managed then unmanaged resources exactly once, however many times it is called.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{RepositoryError, Result};
use crate::hooks::StoreHooks;
use crate::lifecycle::LifecycleState;

/// Public contract every repository exposes.
#[async_trait]
pub trait Repository: Send + Sync {
    /// Ensures the backing store and collection exist. Must complete before the first data operation.
    async fn initialize(&self) -> Result<()>;

    /// Releases held resources. Idempotent.
    fn dispose(&self);

    /// Like [`Repository::dispose`], but awaits teardown that cannot finish synchronously.
    async fn close(&self) {
        self.dispose();
    }

    fn is_disposed(&self) -> bool;
}

#[derive(Debug, Default)]
struct Teardown {
    disposed: bool,
    init_in_flight: bool,
}

/// Lifecycle driver for a concrete store.
///
/// Dispose and initialization share one lock-protected record, so
/// - concurrent `dispose` calls release resources only once;
/// - a `dispose` that lands while the init hooks run defers the release until the
///   running hook returns, and initialization then stops with `Disposed`.
///
/// Dropping the repository disposes it.
pub struct BaseRepository<H: StoreHooks> {
    hooks: H,
    initialized: OnceCell<()>,
    teardown: Mutex<Teardown>,
}

/// Clears the in-flight mark when an init run ends, including when its future is dropped,
/// and performs a release that `dispose` deferred.
struct InitRun<'a, H: StoreHooks> {
    repo: &'a BaseRepository<H>,
}

impl<H: StoreHooks> Drop for InitRun<'_, H> {
    fn drop(&mut self) {
        let deferred = {
            let mut teardown = self.repo.teardown();
            teardown.init_in_flight = false;
            teardown.disposed
        };
        if deferred {
            self.repo.release();
        }
    }
}

impl<H: StoreHooks> BaseRepository<H> {
    pub fn new(hooks: H) -> Self {
        Self {
            hooks,
            initialized: OnceCell::new(),
            teardown: Mutex::new(Teardown::default()),
        }
    }

    pub fn hooks(&self) -> &H {
        &self.hooks
    }

    pub fn state(&self) -> LifecycleState {
        if self.teardown().disposed {
            LifecycleState::Disposed
        } else if self.initialized.initialized() {
            LifecycleState::Initialized
        } else {
            LifecycleState::Fresh
        }
    }

    /// Fails unless the repository is initialized and not yet disposed.
    pub fn ensure_ready(&self) -> Result<()> {
        match self.state() {
            LifecycleState::Initialized => Ok(()),
            LifecycleState::Fresh => Err(RepositoryError::NotInitialized),
            LifecycleState::Disposed => Err(RepositoryError::Disposed),
        }
    }

    fn teardown(&self) -> MutexGuard<'_, Teardown> {
        self.teardown.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin_init(&self) -> Result<InitRun<'_, H>> {
        let mut teardown = self.teardown();
        if teardown.disposed {
            return Err(RepositoryError::Disposed);
        }
        teardown.init_in_flight = true;
        Ok(InitRun { repo: self })
    }

    async fn run_init_hooks(&self) -> Result<()> {
        let run = self.begin_init()?;

        debug!("Creating database if not exists");
        let result = match self.hooks.create_database_if_not_exists().await {
            Ok(()) if self.is_disposed() => Err(RepositoryError::Disposed),
            Ok(()) => {
                debug!("Creating collection if not exists");
                self.hooks.create_collection_if_not_exists().await
            }
            Err(e) => Err(e),
        };

        drop(run);
        if self.is_disposed() {
            warn!("Repository disposed during initialization");
            return Err(RepositoryError::Disposed);
        }
        result?;

        info!("Repository initialized");
        Ok(())
    }

    fn release(&self) {
        debug!("Disposing managed resources");
        self.hooks.dispose_managed();
        debug!("Disposing unmanaged resources");
        self.hooks.dispose_unmanaged();

        info!("Repository disposed");
    }
}

impl<H: StoreHooks + 'static> BaseRepository<H> {
    /// Runs [`Repository::initialize`] on the tokio runtime and hands back its completion handle.
    pub fn spawn_initialize(self: &Arc<Self>) -> JoinHandle<Result<()>> {
        let repo = Arc::clone(self);
        tokio::spawn(async move { repo.initialize().await })
    }
}

#[async_trait]
impl<H: StoreHooks> Repository for BaseRepository<H> {
    async fn initialize(&self) -> Result<()> {
        if self.is_disposed() {
            warn!("Initialize called on a disposed repository");
            return Err(RepositoryError::Disposed);
        }

        self.initialized
            .get_or_try_init(|| self.run_init_hooks())
            .await?;
        Ok(())
    }

    fn dispose(&self) {
        let release_now = {
            let mut teardown = self.teardown();
            if teardown.disposed {
                return;
            }
            teardown.disposed = true;
            !teardown.init_in_flight
        };

        if release_now {
            self.release();
        } else {
            debug!("Initialization in flight; release deferred until its hook returns");
        }
    }

    async fn close(&self) {
        if self.is_disposed() {
            return;
        }
        self.hooks.shutdown().await;
        self.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.teardown().disposed
    }
}

impl<H: StoreHooks> Drop for BaseRepository<H> {
    fn drop(&mut self) {
        self.dispose();
    }
}
