use std::fmt;

use chrono::{DateTime, Local};
use serde::Serialize;

use crate::core::money::Money;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One committed balance change on an account. Entries are only
/// created by the account that owns them and never change afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LedgerEntry {
    timestamp: DateTime<Local>,
    delta: Money,
    balance: Money,
    overdraft: bool
}

impl LedgerEntry {
    pub(crate) fn new(delta: Money, balance: Money, overdraft: bool) -> LedgerEntry {
        LedgerEntry { timestamp: Local::now(), delta, balance, overdraft }
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Signed change requested by the transaction, not including any fee.
    pub fn delta(&self) -> Money {
        self.delta
    }

    /// Account balance once the transaction and any fee were applied.
    pub fn balance(&self) -> Money {
        self.balance
    }

    pub fn overdraft_applied(&self) -> bool {
        self.overdraft
    }
}

impl fmt::Display for LedgerEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.timestamp.format(TIMESTAMP_FORMAT), self.delta, self.balance)
    }
}


#[cfg(test)]
mod tests {
    use crate::core::{LedgerEntry, Money};

    use chrono::{Local, TimeZone};
    use rstest::{fixture, rstest};
    use serde_json::json;

    #[fixture]
    fn entry() -> LedgerEntry {
        let mut entry = LedgerEntry::new(Money::from_whole(-120), Money::from_whole(-25), true);
        entry.timestamp = Local.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap();
        return entry;
    }

    #[rstest]
    fn can_print(entry: LedgerEntry) {
        assert_eq!(entry.to_string(), "2021-03-04 05:06:07 -120.00 -25.00");
    }

    #[rstest]
    fn accessors(entry: LedgerEntry) {
        assert_eq!(entry.delta(), Money::from_whole(-120));
        assert_eq!(entry.balance(), Money::from_whole(-25));
        assert!(entry.overdraft_applied());
    }

    #[rstest]
    fn entry_serialize(entry: LedgerEntry) {
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["delta"], json!("-120.00"));
        assert_eq!(value["balance"], json!("-25.00"));
        assert_eq!(value["overdraft"], json!(true));
        assert!(value["timestamp"].is_string());
    }
}
