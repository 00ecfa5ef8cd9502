//! Data models

pub mod serde_helpers;
pub mod ticket;
pub mod user;

pub use ticket::{Priority, Status, Ticket, TicketCreate, TicketId, TicketUpdate};
pub use user::{EngineerUser, UserCreate, UserId, UserUpdate};
