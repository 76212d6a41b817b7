//! # appnest
//!
//! > **Derives the child app instances of a nested application.**
//!
//! A parent app declares nested apps ("acorns") and image-backed services. On every
//! reconciliation pass, [`derive_children`] turns that parent into the complete, ordered
//! list of child [`AppInstance`](model::AppInstance)s plus the image-pull credential
//! each child needs. The same parent always yields byte-identical output, which is what
//! lets the surrounding control loop diff the result against live state.
//!
//! ## 🏗️ How Configuration Flows Down
//!
//! Parent-level collections address children by prefix: `worker.db` is entry `db` as
//! seen from inside child `worker`. The [`scope`] module resolves six such collections:
//!
//! | Collection | Unprefixed parent entry | `child.X` parent entry | Child's own entry |
//! |------------|-------------------------|------------------------|-------------------|
//! | secrets, links | the default | becomes `X`, wins | kept |
//! | compute classes, memory | `""` is the default | becomes `X`, wins | kept |
//! | environment, permissions | forwarded as-is | becomes `X` | kept (environment only) |
//!
//! Secret and link resources are always qualified with the parent's public name, so
//! `db` reaches the child as `web.db`. Entries addressed to a sibling never reach another
//! child.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Engine ([`scope`], [`image`], [`labels`], [`compose`])
//! - **Role**: pure derivation. Only [`compose`] awaits, and only for override lookups.
//! - **Key items**: [`derive_children`], [`ChildSource`](compose::ChildSource),
//!   [`ScopedKey`](scope::ScopedKey), [`resolve_image`](image::resolve_image).
//!
//! ### 2. The Interface ([`clients`])
//! - **Role**: typed wrappers around the object stores, and the
//!   [`OverrideLookup`](clients::OverrideLookup) seam derivation reads through.
//!
//! ### 3. The Orchestrator ([`lifecycle`])
//! - **Role**: starts one [`appnest_store::ObjectStore`] per kind, wires the lookups,
//!   shuts down cleanly.
//! - **Key items**: [`AppSystem`](lifecycle::AppSystem),
//!   [`setup_tracing`](lifecycle::setup_tracing).
//!
//! ### 4. Plumbing ([`model`], [`config`], [`error`])
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Derive the demo parent and print the result as JSON
//! RUST_LOG=debug cargo run
//! ```
//!
//! ## Errors
//!
//! [`DeriveError::is_terminal`](error::DeriveError::is_terminal) separates configuration
//! errors, which need a spec change, from store lookup failures, which the caller retries.

pub mod clients;
pub mod compose;
pub mod config;
pub mod error;
pub mod image;
pub mod labels;
pub mod lifecycle;
pub mod model;
pub mod scope;

pub use compose::{derive_children, Derivation};
pub use config::EngineConfig;
pub use error::DeriveError;
