//! Exclusive background-task slots
//!
//! Every control that starts background work owns a [`WorkerSlot`]. Work is
//! started with a [`Ticket`]; the result message carries the ticket back and
//! the UI thread asks the slot whether the result is still wanted. Nothing is
//! ever cancelled: stale results are simply dropped where they are consumed.

use tracing::debug;

/// How a slot treats a new request while earlier work is still running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// The newest request wins; results of older tickets are ignored
    Supersede,
    /// New requests are refused until the running one finishes
    Suppress,
}

/// Generation number handed to a background task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

#[derive(Debug, Clone)]
pub struct WorkerSlot {
    name: &'static str,
    policy: Policy,
    generation: u64,
    in_flight: Option<Ticket>,
}

impl WorkerSlot {
    pub fn new(name: &'static str, policy: Policy) -> Self {
        Self {
            name,
            policy,
            generation: 0,
            in_flight: None,
        }
    }

    /// Request a ticket for new work. `None` means the request is suppressed.
    pub fn begin(&mut self) -> Option<Ticket> {
        if self.policy == Policy::Suppress && self.in_flight.is_some() {
            debug!("{}: already running, request suppressed", self.name);
            return None;
        }

        self.generation += 1;
        let ticket = Ticket(self.generation);
        self.in_flight = Some(ticket);
        debug!("{}: started {:?}", self.name, ticket);
        Some(ticket)
    }

    /// Whether results for `ticket` should still reach the UI
    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.0 == self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Record that the work behind `ticket` is over. Returns whether its
    /// result is current.
    pub fn finish(&mut self, ticket: Ticket) -> bool {
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }
        let current = self.is_current(ticket);
        if !current {
            debug!("{}: dropping stale result {:?}", self.name, ticket);
        }
        current
    }

    /// Make every outstanding ticket stale without starting new work
    pub fn invalidate(&mut self) {
        self.generation += 1;
        if self.policy == Policy::Supersede {
            self.in_flight = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supersede_latest_wins() {
        let mut slot = WorkerSlot::new("lookup", Policy::Supersede);
        let first = slot.begin().unwrap();
        let second = slot.begin().unwrap();

        assert!(!slot.finish(first));
        assert!(slot.finish(second));
    }

    #[test]
    fn test_supersede_late_old_result_after_new_one() {
        let mut slot = WorkerSlot::new("lookup", Policy::Supersede);
        let first = slot.begin().unwrap();
        let second = slot.begin().unwrap();

        assert!(slot.finish(second));
        assert!(!slot.finish(first));
    }

    #[test]
    fn test_suppress_refuses_while_busy() {
        let mut slot = WorkerSlot::new("download", Policy::Suppress);
        let ticket = slot.begin().unwrap();
        assert!(slot.is_busy());
        assert!(slot.begin().is_none());

        assert!(slot.finish(ticket));
        assert!(!slot.is_busy());
        assert!(slot.begin().is_some());
    }

    #[test]
    fn test_invalidate_makes_ticket_stale() {
        let mut slot = WorkerSlot::new("lookup", Policy::Supersede);
        let ticket = slot.begin().unwrap();
        slot.invalidate();
        assert!(!slot.finish(ticket));
    }

    #[test]
    fn test_invalidate_keeps_suppress_slot_busy() {
        let mut slot = WorkerSlot::new("download", Policy::Suppress);
        let ticket = slot.begin().unwrap();
        slot.invalidate();
        assert!(slot.begin().is_none());
        assert!(!slot.finish(ticket));
        assert!(!slot.is_busy());
    }
}
