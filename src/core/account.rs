use std::fmt;

use crate::core::error::{AccountError, AccountResult};
use crate::core::money::Money;
use crate::core::transaction::LedgerEntry;

/// Charged once, by the transaction that takes the balance below zero.
pub const OVERDRAFT_FEE: Money = Money::from_whole(5);

/// What the device needs from an account it holds.
pub trait Account {
    fn id(&self) -> &str;

    /// Exact comparison against the account's pin.
    fn authorize(&self, pin: &str) -> bool;

    /// Applies `delta` to the balance and records it. Fails with
    /// [`AccountError::Overdrawn`] when withdrawing from an account
    /// that is already negative, and with [`AccountError::BalanceOutOfRange`]
    /// when the new balance cannot be represented; a failed call changes nothing.
    fn transaction(&mut self, delta: Money) -> AccountResult<LedgerEntry>;

    fn balance(&self) -> Money;

    /// Entries in the order they were committed.
    fn history(&self) -> &[LedgerEntry];
}

pub struct BankAccount {
    id: String,
    pin: String,
    balance: Money,
    history: Vec<LedgerEntry>
}

impl BankAccount {
    pub fn new(id: impl Into<String>, pin: impl Into<String>, balance: Money) -> BankAccount {
        BankAccount { id: id.into(), pin: pin.into(), balance, history: Vec::new() }
    }
}

impl Account for BankAccount {
    fn id(&self) -> &str {
        &self.id
    }

    fn authorize(&self, pin: &str) -> bool {
        self.pin == pin
    }

    fn transaction(&mut self, delta: Money) -> AccountResult<LedgerEntry> {
        if delta.is_negative() && self.balance.is_negative() {
            return Err(AccountError::Overdrawn);
        }

        let mut balance = self.balance.checked_add(delta)
            .ok_or(AccountError::BalanceOutOfRange)?;
        let overdraft = delta.is_negative() && balance.is_negative();
        if overdraft {
            balance = balance.checked_sub(OVERDRAFT_FEE)
                .ok_or(AccountError::BalanceOutOfRange)?;
        }

        let entry = LedgerEntry::new(delta, balance, overdraft);
        self.balance = balance;
        self.history.push(entry.clone());
        return Ok(entry);
    }

    fn balance(&self) -> Money {
        self.balance
    }

    fn history(&self) -> &[LedgerEntry] {
        &self.history
    }
}

impl fmt::Debug for BankAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BankAccount {} ({}, {} entries)", self.id, self.balance, self.history.len())
    }
}
