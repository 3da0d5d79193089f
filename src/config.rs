use std::{collections::HashSet, fmt, fs, path::Path};

use anyhow::{self, Context};
use serde::Deserialize;

use crate::core::{Atm, BankAccount, Money, Shutdown};
use crate::core::atm::DEFAULT_CASH_ON_HAND;

const DEFAULT_LOGOUT_SECONDS: u64 = 120;

#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AccountConfig {
    pub id: String,
    pub pin: String,
    #[serde(default)]
    pub balance: Money
}

impl AccountConfig {
    pub fn new(id: &str, pin: &str, balance: Money) -> AccountConfig {
        AccountConfig { id: id.to_owned(), pin: pin.to_owned(), balance }
    }
}

impl fmt::Debug for AccountConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountConfig {} ({})", self.id, self.balance)
    }
}

/// Device setup: idle timeout, cash loaded into the device and the
/// accounts it knows about. Money is written as decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AtmConfig {
    #[serde(default = "default_logout_seconds")]
    pub logout_seconds: u64,
    #[serde(default = "default_cash_on_hand")]
    pub cash_on_hand: Money,
    #[serde(default)]
    pub accounts: Vec<AccountConfig>
}

fn default_logout_seconds() -> u64 {
    DEFAULT_LOGOUT_SECONDS
}

fn default_cash_on_hand() -> Money {
    DEFAULT_CASH_ON_HAND
}

impl AtmConfig {
    pub fn read(filepath: impl AsRef<Path>) -> anyhow::Result<Self> {
        let file_content = fs::read_to_string(&filepath)
            .with_context(|| format!("failed to read config file {}", filepath.as_ref().display()))?;
        return AtmConfig::from_toml(&file_content);
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: AtmConfig = toml::from_str(content)
            .with_context(|| "failed to parse config file")?;
        config.validate()?;
        return Ok(config);
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.cash_on_hand.is_negative() {
            anyhow::bail!("cash on hand cannot be negative: {}", self.cash_on_hand);
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if !seen.insert(account.id.as_str()) {
                anyhow::bail!("duplicate account id {}", account.id);
            }
        }
        return Ok(());
    }

    pub fn bank_accounts(&self) -> Vec<BankAccount> {
        self.accounts.iter()
            .map(|account| BankAccount::new(&account.id, &account.pin, account.balance))
            .collect()
    }

    /// Starts a device from this configuration. Must run inside a tokio runtime.
    pub fn build(&self) -> (Atm, Shutdown) {
        Atm::with_cash_on_hand(self.logout_seconds, self.cash_on_hand, self.bank_accounts())
    }
}

impl Default for AtmConfig {
    fn default() -> Self {
        AtmConfig {
            logout_seconds: DEFAULT_LOGOUT_SECONDS,
            cash_on_hand: DEFAULT_CASH_ON_HAND,
            accounts: vec![
                AccountConfig::new("2859459814", "7386", Money::from_units(10, 24)),
                AccountConfig::new("1434597300", "4557", Money::from_units(90000, 55)),
                AccountConfig::new("7089382418", "0075", Money::ZERO),
                AccountConfig::new("2001377812", "5950", Money::from_whole(60)),
            ]
        }
    }
}
