//! # System Lifecycle
//!
//! Starts the object stores, wires their clients into the override lookups, and shuts
//! everything down again.
//!
//! ```rust,ignore
//! impl AppSystem {
//!     pub fn new(config: EngineConfig) -> Self {
//!         // 1. One store per kind, each in its own task
//!         let (app_store, app_client) = ObjectStore::<AppInstance>::new(config.store_buffer);
//!         let (session_store, session_client) = ObjectStore::<DevSessionInstance>::new(config.store_buffer);
//!         tokio::spawn(app_store.run());
//!         tokio::spawn(session_store.run());
//!
//!         // 2. Typed clients feed StoreLookup, which derive_children reads through
//!         ...
//!     }
//! }
//! ```
//!
//! Shutdown is channel-driven: dropping the last client closes a store's channel, the
//! store's loop ends, and [`AppSystem::shutdown`] awaits the task.

pub mod system;
pub mod tracing;

pub use system::*;
pub use self::tracing::*;
