//! Domain types for the supervised server.

mod boot;
mod players;
mod properties;
mod restart;
mod state;

pub use boot::BootRecord;
pub use players::{ConnectedPlayers, PlayerQuery};
pub use properties::ServerProperties;
pub use restart::{RestartTicket, TicketTarget};
pub use state::ServerState;
