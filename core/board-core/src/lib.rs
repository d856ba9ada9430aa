//! # board-core
//!
//! Reconciliation and rendering engine for the summary board: a live
//! dashboard whose backend streams full-replacement snapshots of analysis
//! findings. Each snapshot completely supersedes the previous one, so the
//! engine rebuilds the whole visible tree every time and still preserves the
//! user's expand/collapse state by keying it on content identity rather than
//! position.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. Clients can wrap with
//!   async if needed.
//! - **Not thread-safe**: All mutation happens on one event thread; clients
//!   provide their own synchronization if they need it.
//! - **Graceful degradation**: Malformed messages and missing fields degrade
//!   to "no change" or defaults, never a crash or a blanked board.
//! - **Pure view**: The rendered tree is a function of
//!   `(latest snapshot, reconciler state)` and nothing else.

pub mod engine;
pub mod error;
pub mod groups;
pub mod html;
pub mod key;
pub mod markdown;
pub mod presets;
pub mod reconciler;
pub mod view;

pub use engine::BoardEngine;
pub use error::{BoardError, Result};
pub use groups::{partition, GroupBucket};
pub use key::ItemKey;
pub use presets::{PresetBook, StatusLine};
pub use reconciler::Reconciler;
pub use view::{build_view, BoardView, ClickTarget, GroupView, ItemView};
