use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// An amount of value carried by a transaction output.
/// Amounts are whole integers so that conservation checks are exact.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct Ledgercoin(i64);

impl Ledgercoin {
    pub const fn new(amount: i64) -> Self {
        Ledgercoin(amount)
    }

    pub const fn zero() -> Self {
        Self::new(0)
    }

    pub fn value(&self) -> i64 {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns `None` if the sum does not fit into the amount.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Self)
    }
}

impl From<i64> for Ledgercoin {
    fn from(value: i64) -> Self {
        Self::new(value)
    }
}

impl From<i32> for Ledgercoin {
    fn from(value: i32) -> Self {
        Self(value as i64)
    }
}

impl Display for Ledgercoin {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} LGC", self.0)
    }
}
