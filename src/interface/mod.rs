mod text;

pub use text::{TextInterface, HELP_MESSAGE, HELP_AUTHORIZE_MESSAGE, HELP_WITHDRAW_MESSAGE,
    HELP_DEPOSIT_MESSAGE, EMPTY_HISTORY_MESSAGE,
    authorized_message, balance_message, withdraw_message, history_message, logout_message};
