/// Position of a list request in issue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Hands out increasing tickets to list requests as they are issued.
///
/// Kept next to the rendered list, under the same lock, so issuing a ticket and recording
/// its query are one step, and so are checking a response and rendering it.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RequestSequence {
    issued: u64,
}
impl RequestSequence {
    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    pub fn latest(&self) -> Ticket {
        Ticket(self.issued)
    }

    /// Only the response to the most recently issued request may be rendered.
    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket == self.latest()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_latest_ticket_is_current() {
        let mut sequence = RequestSequence::default();
        let [a, ab, abc] = [sequence.issue(), sequence.issue(), sequence.issue()];
        assert_eq!(sequence.latest(), abc);
        assert!(a < ab && ab < abc);

        assert!(!sequence.is_latest(a));
        assert!(!sequence.is_latest(ab));
        assert!(sequence.is_latest(abc));

        let abcd = sequence.issue();
        assert!(!sequence.is_latest(abc));
        assert!(sequence.is_latest(abcd));
    }
}
