//! Shared types for the trainer console: wire frames, commands and events.

mod command;
mod event;
mod frame;
mod hints;
mod ids;

pub use command::*;
pub use event::*;
pub use frame::*;
pub use hints::*;
pub use ids::*;
