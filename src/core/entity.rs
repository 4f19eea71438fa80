//! Player identity with simple integer IDs

use serde::{Deserialize, Serialize};
use std::fmt;

/// Simple integer ID for players at the table
///
/// IDs are assigned 1..=N in seating order and are stable for the whole
/// match - dead players keep their seat number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(u32);

impl PlayerId {
    pub fn new(id: u32) -> Self {
        PlayerId(id)
    }

    pub fn as_u32(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_ordering_follows_seats() {
        let a = PlayerId::new(1);
        let b = PlayerId::new(7);
        assert!(a < b);
        assert_eq!(b.as_u32(), 7);
        assert_eq!(format!("{}", b), "7");
    }
}
