pub mod core;
pub mod interface;
pub mod config;

pub use crate::core::{Money, LedgerEntry, Account, BankAccount, Atm, Shutdown, Teller, Withdrawal};
pub use crate::core::{AtmError, AccountError, ParseMoneyError};
pub use crate::interface::TextInterface;
pub use crate::config::AtmConfig;
