//! Typed wrappers around [`StoreClient`](appnest_store::StoreClient) and the lookup seam
//! derivation reads through.

pub mod app_instance_client;
pub mod dev_session_client;
pub mod lookup;

pub use app_instance_client::*;
pub use dev_session_client::*;
pub use lookup::*;
