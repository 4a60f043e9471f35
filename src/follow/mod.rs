//! Follow mode - keep a source view in step with the item under the cursor
//!
//! # Architecture
//!
//! ```text
//! host command loop
//!   ├─ pre-command  → SyncEngine::pre_command  → HighlightManager::unmark_all
//!   ├─ command
//!   └─ post-command → SyncEngine::post_command → Resolver → HighlightManager::mark
//! ```
//!
//! [`FollowController`] owns the sessions (one per followed output view), the
//! [`ResolverRegistry`] and the single [`SyncEngine`] with its two marks.
//! Only one output view receives commands at a time, so one pair of marks is
//! shared by every session.

mod engine;
mod error;
mod highlight;
mod registry;
mod session;

pub use engine::{Phase, SyncEngine, SyncOutcome};
pub use error::{FollowError, ResolveError};
pub use highlight::{Attachment, HighlightManager, Mark, MarkSet, Slot};
pub use registry::{Resolver, ResolverCatalog, ResolverRef, ResolverRegistry};
pub use session::{FollowController, ResolverChoice, Session, SessionOptions};
