//! Request sequencing.
//!
//! Every state change that triggers a fetch takes a [`Ticket`] from the
//! [`Sequencer`] for its slot. A response is only applied if it carries the
//! latest ticket, so the last request the user asked for wins regardless of
//! the order responses arrive in.

use std::fmt;

/// Identifies one issued request. Tickets from one sequencer are strictly
/// increasing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues tickets for one state slot.
#[derive(Debug, Default)]
pub struct Sequencer {
    issued: u64,
}

impl Sequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket, superseding every earlier one.
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// The most recently issued ticket, if any.
    pub fn latest(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    /// Returns true if `ticket` is the most recently issued one.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        self.latest() == Some(ticket)
    }
}
