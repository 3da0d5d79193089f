use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseMoneyError {
    /// More than two digits follow the decimal point.
    #[error("Error parsing amount: too many digits in the fractional part")]
    TooManyFractionalDigits,
    /// The part before the decimal point is not a number
    /// or does not fit the representation.
    #[error("Error parsing amount: invalid whole part {0:?}")]
    InvalidWhole(String),
    #[error("Error parsing amount: invalid fractional part {0:?}")]
    InvalidFractional(String)
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// Occurs when a withdrawal is attempted on an account
    /// whose balance is already below zero.
    #[error("Your account is overdrawn! You may not make withdrawals at this time.")]
    Overdrawn,
    /// The resulting balance does not fit the money representation.
    #[error("Transaction would take the balance out of range.")]
    BalanceOutOfRange
}

pub type AccountResult<T> = Result<T, AccountError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AtmError {
    /// Unknown account id, or the pin does not match.
    #[error("Authorization failed.")]
    AuthorizationFailed,
    /// The operation needs a session and there is none,
    /// including one that just expired.
    #[error("Authorization required.")]
    AuthorizationRequired,
    /// Logout requested while no session is active.
    #[error("No account currently authorized.")]
    NotAuthorized,
    /// Non-positive amount, or a withdrawal that is not
    /// a multiple of the dispensing denomination.
    #[error("Invalid amount.")]
    InvalidAmount,
    /// The device has no cash left to dispense.
    #[error("Unable to process your withdrawal at this time.")]
    NoMoney,
    #[error(transparent)]
    Account(#[from] AccountError)
}

pub type AtmResult<T> = Result<T, AtmError>;
