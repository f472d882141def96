//! Player actions.
//!
//! A closed set of four actions. Each variant carries exactly the cells it
//! needs; the on-wire text form lives in `protocol::action`.

/// A single action for one player on one turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Sleep until the next day.
    Wait,

    /// Plant a seed on `target` from the tree on `source`.
    Seed { source: usize, target: usize },

    /// Grow the tree on `target` by one size.
    Grow { target: usize },

    /// Harvest the large tree on `target`.
    Complete { target: usize },
}

impl Action {
    #[inline]
    pub const fn is_wait(&self) -> bool {
        matches!(self, Action::Wait)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_wait_is_wait() {
        assert!(Action::Wait.is_wait());
        assert!(!Action::Seed { source: 3, target: 10 }.is_wait());
        assert!(!Action::Complete { target: 0 }.is_wait());
    }

    #[test]
    fn grow_and_complete_are_distinct() {
        assert_ne!(Action::Grow { target: 5 }, Action::Complete { target: 5 });
    }
}
