//! Database Models

// Serde helpers
pub mod serde_helpers;

// Tickets
pub mod ticket;

// Auth
pub mod user;

// Re-exports
pub use ticket::{
    GeoPoint, Severity, StatusChange, Ticket, TicketDraft, TicketId, TicketStatus,
};
pub use user::{ROLE_ADMIN, ROLE_REPORTER, ROLE_VOLUNTEER, User, UserCreate, UserId};
