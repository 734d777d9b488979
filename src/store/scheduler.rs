use std::collections::BTreeMap;

use tokio::time::Instant;

use crate::domain::OrderStatus;

/// A status change due at some instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub order_id: String,
    pub to: OrderStatus,
}

/// Deadline queue of simulated status transitions.
///
/// Entries due at the same instant pop in insertion order.
#[derive(Debug, Default)]
pub struct StatusScheduler {
    queue: BTreeMap<(Instant, u64), Transition>,
    seq: u64,
}

impl StatusScheduler {
    pub fn schedule(&mut self, at: Instant, order_id: impl Into<String>, to: OrderStatus) {
        self.seq += 1;
        self.queue.insert((at, self.seq), Transition { order_id: order_id.into(), to });
    }

    /// Drops every pending transition for the order. Returns how many were dropped.
    pub fn cancel_order(&mut self, order_id: &str) -> usize {
        let before = self.queue.len();
        self.queue.retain(|_, t| t.order_id != order_id);
        before - self.queue.len()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.queue.keys().next().map(|(at, _)| *at)
    }

    /// Removes and returns every transition due at or before `now`, earliest first.
    pub fn pop_due(&mut self, now: Instant) -> Vec<Transition> {
        let mut due = Vec::new();
        while let Some(entry) = self.queue.first_entry() {
            if entry.key().0 > now {
                break;
            }
            due.push(entry.remove());
        }
        due
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_pops_in_deadline_order() {
        let start = Instant::now();
        let mut scheduler = StatusScheduler::default();
        scheduler.schedule(start + Duration::from_secs(9), "C1", OrderStatus::Ready);
        scheduler.schedule(start + Duration::from_secs(4), "C1", OrderStatus::Accepted);
        scheduler.schedule(start + Duration::from_secs(4), "C2", OrderStatus::Accepted);

        assert_eq!(scheduler.next_deadline(), Some(start + Duration::from_secs(4)));
        assert!(scheduler.pop_due(start).is_empty());

        let due = scheduler.pop_due(start + Duration::from_secs(5));
        let ids: Vec<&str> = due.iter().map(|t| t.order_id.as_str()).collect();
        assert_eq!(ids, vec!["C1", "C2"]);
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_only_touches_one_order() {
        let start = Instant::now();
        let mut scheduler = StatusScheduler::default();
        scheduler.schedule(start, "C1", OrderStatus::Accepted);
        scheduler.schedule(start, "C1", OrderStatus::Ready);
        scheduler.schedule(start, "C2", OrderStatus::Accepted);

        assert_eq!(scheduler.cancel_order("C1"), 2);
        assert_eq!(scheduler.cancel_order("C1"), 0);
        assert_eq!(scheduler.pop_due(start), vec![Transition { order_id: "C2".into(), to: OrderStatus::Accepted }]);
        assert!(scheduler.is_empty());
        assert_eq!(scheduler.next_deadline(), None);
    }
}
