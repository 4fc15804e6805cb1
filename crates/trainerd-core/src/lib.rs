//! Session registry, frame routing and command dispatch for the trainer console.

mod client_state;
mod console;
mod dispatcher;
mod error;
mod presentation;
mod registry;
mod router;
mod session;
mod transport;

pub use client_state::ClientState;
pub use console::{Console, ConsoleHandle};
pub use dispatcher::{resolve_operator_command, scenario_id_from_option, CommandDispatcher, DispatchReport};
pub use error::ConsoleError;
pub use presentation::Presentation;
pub use registry::SessionRegistry;
pub use router::{Catalogs, MessageRouter, RouteOutcome};
pub use session::{DebugReadout, Session, SessionSummary, SessionView, StatusLabels};
pub use transport::{Transport, TransportEvent};

/// Result type for console operations.
pub type Result<T> = std::result::Result<T, ConsoleError>;
