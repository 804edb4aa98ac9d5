//! Deciding which completed fetch is "current" for a view.
//!
//! Requests are never cancelled. Each fetch start takes a [`Ticket`] and
//! the view asks its [`TicketCounter`] whether the result is still worth
//! applying when it lands.

/// Sequence number handed out when a fetch starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// How a view treats results that arrive after a newer fetch started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyPolicy {
    /// Only the most recently issued ticket may apply; older results are dropped.
    #[default]
    LatestRequest,
    /// Every result applies in completion order, so the slowest one wins.
    LatestResponse,
}

#[derive(Debug, Clone, Default)]
pub struct TicketCounter {
    issued: u64,
    /// Tickets at or below this value never apply again.
    retired: u64,
    policy: ApplyPolicy,
}

impl TicketCounter {
    pub fn new(policy: ApplyPolicy) -> Self {
        Self { issued: 0, retired: 0, policy }
    }

    pub fn policy(&self) -> ApplyPolicy {
        self.policy
    }

    pub fn issue(&mut self) -> Ticket {
        self.issued += 1;
        Ticket(self.issued)
    }

    /// Stop every ticket issued so far from applying, whatever the policy.
    pub fn retire_all(&mut self) {
        self.retired = self.issued;
    }

    pub fn is_latest(&self, ticket: Ticket) -> bool {
        ticket.0 == self.issued
    }

    /// Whether a result carrying `ticket` should be applied now.
    pub fn accepts(&self, ticket: Ticket) -> bool {
        if ticket.0 <= self.retired {
            return false;
        }
        match self.policy {
            ApplyPolicy::LatestRequest => self.is_latest(ticket),
            ApplyPolicy::LatestResponse => ticket.0 <= self.issued,
        }
    }
}
