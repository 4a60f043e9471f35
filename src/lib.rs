//! Follow mode - keep a source view in sync with the item under the cursor
//!
//! An output view (search hits, compiler diagnostics, an outline) lists
//! items; as its cursor moves, the item under the cursor is resolved to a
//! location in a source view and both are highlighted, while input focus
//! stays on the output view.
//!
//! The core lives in [`follow`]; the editor around it is abstracted by
//! [`host::Host`]. [`model::Workspace`] and [`app::App`] are a complete
//! in-memory host with an Elm-style command loop.

pub mod app;
pub mod config;
pub mod config_paths;
pub mod follow;
pub mod host;
pub mod keymap;
pub mod messages;
pub mod model;
pub mod tracing;
pub mod update;

// Re-export commonly used types
pub use app::App;
pub use config::FollowConfig;
pub use follow::{FollowController, FollowError, Resolver, ResolverRegistry, SyncOutcome};
pub use host::{Host, Location, ViewId, ViewKind};
pub use messages::Msg;
pub use model::Workspace;
