use colored::{ColoredString, Colorize};

use crate::core::{LedgerEntry, Money, Teller, Withdrawal};
use crate::core::account::OVERDRAFT_FEE;

pub const HELP_MESSAGE: &str =
    "Must provide command: authorize, withdraw, deposit, balance, history, logout, or end";
pub const HELP_AUTHORIZE_MESSAGE: &str = "Authorize command requires two arguments: <id> <pin>";
pub const HELP_WITHDRAW_MESSAGE: &str = "Withdraw command requires one argument: <value>";
pub const HELP_DEPOSIT_MESSAGE: &str = "Deposit command requires one argument: <value>";
pub const EMPTY_HISTORY_MESSAGE: &str = "No history found.";

pub fn authorized_message(id: &str) -> String {
    format!("{} successfully authorized.", id)
}

pub fn balance_message(balance: Money) -> String {
    format!("Current balance: {}", paint(balance))
}

pub fn withdraw_message(withdrawal: &Withdrawal) -> String {
    let mut msg = String::new();
    if withdrawal.is_partial() {
        msg += "Unable to dispense full amount requested at this time. ";
    }
    msg += &format!("Amount dispensed: ${}\n", withdrawal.dispensed());
    if withdrawal.entry().overdraft_applied() {
        msg += &format!("You have been charged an overdraft fee of ${}. ", OVERDRAFT_FEE);
    }
    msg += &balance_message(withdrawal.entry().balance());
    return msg;
}

/// Newest entry first, one per line.
pub fn history_message(history: &[LedgerEntry]) -> String {
    if history.is_empty() {
        return EMPTY_HISTORY_MESSAGE.to_owned();
    }
    history.iter().rev()
        .map(|entry| entry.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn logout_message(id: &str) -> String {
    format!("Account {} logged out.", id)
}

fn paint(amount: Money) -> ColoredString {
    let text = amount.to_string();
    if amount.is_negative() {
        text.bright_red()
    } else if amount.is_positive() {
        text.green()
    } else {
        text.normal()
    }
}

/// Line-oriented front end of a device: one command in, one reply out.
/// Every failure comes back as the error's message, never as a panic.
pub struct TextInterface<T> {
    teller: T
}

impl<T: Teller> TextInterface<T> {
    pub fn new(teller: T) -> TextInterface<T> {
        TextInterface { teller }
    }

    pub fn execute(&self, command: &str) -> String {
        let fields: Vec<&str> = command.split_whitespace().collect();

        match fields.as_slice() {
            ["authorize", args @ ..] => match args {
                [id, pin] => match self.teller.authorize(id, pin) {
                    Ok(()) => authorized_message(id),
                    Err(err) => err.to_string()
                },
                _ => HELP_AUTHORIZE_MESSAGE.to_owned()
            },
            ["withdraw", args @ ..] => match args {
                [value] => match Money::parse(value) {
                    Ok(amount) => match self.teller.withdraw(amount) {
                        Ok(withdrawal) => withdraw_message(&withdrawal),
                        Err(err) => err.to_string()
                    },
                    Err(err) => err.to_string()
                },
                _ => HELP_WITHDRAW_MESSAGE.to_owned()
            },
            ["deposit", args @ ..] => match args {
                [value] => match Money::parse(value) {
                    Ok(amount) => match self.teller.deposit(amount) {
                        Ok(()) => self.balance(),
                        Err(err) => err.to_string()
                    },
                    Err(err) => err.to_string()
                },
                _ => HELP_DEPOSIT_MESSAGE.to_owned()
            },
            ["balance", ..] => self.balance(),
            ["history", ..] => match self.teller.history() {
                Ok(history) => history_message(&history),
                Err(err) => err.to_string()
            },
            ["logout", ..] => match self.teller.logout() {
                Ok(id) => logout_message(&id),
                Err(err) => err.to_string()
            },
            _ => HELP_MESSAGE.to_owned()
        }
    }

    fn balance(&self) -> String {
        match self.teller.balance() {
            Ok(balance) => balance_message(balance),
            Err(err) => err.to_string()
        }
    }
}
