//! # repository-core
//!
//! Lifecycle contract for storage-backed repositories.
//!
//! ## Modules
//!
//! - [`error`] – RepositoryError and Result
//! - [`lifecycle`] – LifecycleState (Fresh, Initialized, Disposed)
//! - [`hooks`] – StoreHooks extension points (create database / collection, dispose)
//! - [`repository`] – Repository trait and BaseRepository
//! - [`collection`] – Document and DocumentCollection data operations
//! - [`logger`] – tracing initialization
//!
//! A concrete store implements [`StoreHooks`] and is wrapped in a [`BaseRepository`].
//! Callers must await [`Repository::initialize`] before the first data operation.

pub mod collection;
pub mod error;
pub mod hooks;
pub mod lifecycle;
pub mod logger;
pub mod repository;

pub use collection::{Document, DocumentCollection};
pub use error::{RepositoryError, Result};
pub use hooks::{NoopHooks, StoreHooks};
pub use lifecycle::LifecycleState;
pub use logger::init_tracing;
pub use repository::{BaseRepository, Repository};
