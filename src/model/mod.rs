//! Plain data types for parents, child declarations and derived children.
//!
//! Everything here is serde-serializable with camelCase field names and uses ordered maps,
//! so serializing the same value twice yields the same bytes.

pub mod bindings;
pub mod declaration;
pub mod dev_session;
pub mod instance;

pub use bindings::*;
pub use declaration::*;
pub use dev_session::*;
pub use instance::*;
