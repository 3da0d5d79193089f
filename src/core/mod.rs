pub mod money;
pub mod transaction;
pub mod account;
pub mod atm;
pub mod error;

pub use money::Money;
pub use transaction::LedgerEntry;
pub use account::{Account, BankAccount};
pub use atm::{Atm, Shutdown, Teller, Withdrawal};
pub use error::{AtmError, AccountError, ParseMoneyError};
