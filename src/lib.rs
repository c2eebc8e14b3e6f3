//! MeshView Coordination Core
//!
//! The event coordination core of the MeshView 3D model viewer: a
//! synchronous publish/subscribe bus, a canonical state store, a
//! single-flight load coordinator with cooperative cancellation, and a
//! selection synchronizer reconciling the part tree and the spatial
//! picker into one canonical selection.
//!
//! Parsing, rendering, and picking are external collaborators consumed
//! through the capability traits in [`services::capabilities`]; UI
//! layers interact exclusively through [`services::ViewerHub`] and the
//! bus.
//!
//! Execution is single-threaded cooperative: components never suspend
//! mid-operation, and the only asynchronous boundary is the model
//! loader.

pub mod constants;
pub mod domain;
pub mod error;
pub mod eventing;
pub mod helpers;
pub mod services;
pub mod state;
pub mod utils;
