use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, Interval, MissedTickBehavior};

use crate::core::account::{Account, BankAccount};
use crate::core::error::{AtmError, AtmResult};
use crate::core::money::Money;
use crate::core::transaction::LedgerEntry;

/// Every withdrawal must be a multiple of this.
pub const DISPENSE_DENOMINATION: Money = Money::from_whole(20);

pub const DEFAULT_CASH_ON_HAND: Money = Money::from_whole(10_000);

const TICK_PERIOD: Duration = Duration::from_secs(1);

/// The six operations a device offers to whoever is standing in front of it.
pub trait Teller {
    /// Opens a session for `id`, replacing any session already open,
    /// even one for another account.
    fn authorize(&self, id: &str, pin: &str) -> AtmResult<()>;

    /// Dispenses `amount`, or all remaining cash if the device holds less.
    fn withdraw(&self, amount: Money) -> AtmResult<Withdrawal>;

    /// Credits the account. Deposits are not assumed to be cash,
    /// so the device's own cash is unaffected.
    fn deposit(&self, amount: Money) -> AtmResult<()>;

    fn balance(&self) -> AtmResult<Money>;

    fn history(&self) -> AtmResult<Vec<LedgerEntry>>;

    /// Closes the session and returns the id of the account it was bound to.
    fn logout(&self) -> AtmResult<String>;
}

/// Outcome of a successful withdrawal. The device may dispense less than
/// requested when it runs short of cash; that is not an error.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Withdrawal {
    requested: Money,
    entry: LedgerEntry
}

impl Withdrawal {
    pub fn requested(&self) -> Money {
        self.requested
    }

    pub fn dispensed(&self) -> Money {
        self.entry.delta().abs()
    }

    pub fn is_partial(&self) -> bool {
        self.requested.is_greater_than(self.dispensed())
    }

    pub fn entry(&self) -> &LedgerEntry {
        &self.entry
    }

    pub fn into_entry(self) -> LedgerEntry {
        self.entry
    }
}

#[derive(Debug)]
struct Session {
    account_id: String,
    idle_seconds: u64
}

struct State<A> {
    cash_on_hand: Money,
    accounts: HashMap<String, A>,
    session: Option<Session>
}

impl<A: Account> State<A> {
    /// Resolves the session's account and marks the session as active.
    fn session_account(&mut self) -> AtmResult<&mut A> {
        let session = self.session.as_mut().ok_or(AtmError::AuthorizationRequired)?;
        session.idle_seconds = 0;
        self.accounts.get_mut(&session.account_id).ok_or(AtmError::AuthorizationRequired)
    }

    fn authorized_transaction(&mut self, delta: Money) -> AtmResult<LedgerEntry> {
        let account = self.session_account()?;
        Ok(account.transaction(delta)?)
    }

    /// Advances the idle counter by one second and drops the session once
    /// it reaches `logout_seconds`. Returns the id that was logged out.
    fn tick(&mut self, logout_seconds: u64) -> Option<String> {
        let session = self.session.as_mut()?;
        session.idle_seconds += 1;
        if session.idle_seconds < logout_seconds {
            return None;
        }
        self.session.take().map(|session| session.account_id)
    }
}

/// A single shared teller device.
///
/// All state sits behind one lock, taken once per operation, which the
/// background expiry task shares. Handles are cheap to clone and all
/// refer to the same device.
pub struct Atm<A = BankAccount> {
    state: Arc<Mutex<State<A>>>
}

impl<A> Clone for Atm<A> {
    fn clone(&self) -> Self {
        Atm { state: Arc::clone(&self.state) }
    }
}

impl<A> Atm<A>
where
    A: Account + Send + 'static
{
    /// Builds a device holding [`DEFAULT_CASH_ON_HAND`] and starts its
    /// session expiry task.
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn new(logout_seconds: u64, accounts: impl IntoIterator<Item = A>) -> (Atm<A>, Shutdown) {
        Atm::with_cash_on_hand(logout_seconds, DEFAULT_CASH_ON_HAND, accounts)
    }

    /// Same as [`Atm::new`] with an explicit amount of cash in the device.
    /// Accounts sharing an id are collapsed, the last one wins.
    pub fn with_cash_on_hand(logout_seconds: u64, cash_on_hand: Money,
                             accounts: impl IntoIterator<Item = A>) -> (Atm<A>, Shutdown) {
        let accounts: HashMap<String, A> = accounts.into_iter()
            .map(|account| (account.id().to_owned(), account))
            .collect();
        info!("starting device with {} accounts, {} on hand, logout after {}s",
            accounts.len(), cash_on_hand, logout_seconds);

        let state = Arc::new(Mutex::new(State { cash_on_hand, accounts, session: None }));
        let (signal, receiver) = oneshot::channel();
        let mut ticker = time::interval_at(Instant::now() + TICK_PERIOD, TICK_PERIOD);
        // a stalled runtime must not count as several idle seconds at once
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let task = tokio::spawn(expire_sessions(Arc::clone(&state), logout_seconds, ticker, receiver));

        return (Atm { state }, Shutdown { signal, task });
    }

    pub fn cash_on_hand(&self) -> Money {
        self.state.lock().cash_on_hand
    }
}

impl<A: Account> Teller for Atm<A> {
    fn authorize(&self, id: &str, pin: &str) -> AtmResult<()> {
        let replaced = {
            let mut guard = self.state.lock();
            let state = &mut *guard;
            let authorized = state.accounts.get(id)
                .map_or(false, |account| account.authorize(pin));
            if !authorized {
                None
            } else {
                let previous = state.session.replace(Session { account_id: id.to_owned(), idle_seconds: 0 });
                Some(previous.map(|session| session.account_id))
            }
        };

        match replaced {
            None => {
                warn!("authorization failed for account {}", id);
                Err(AtmError::AuthorizationFailed)
            },
            Some(previous) => {
                if let Some(previous) = previous {
                    info!("session for account {} replaced", previous);
                }
                info!("account {} authorized", id);
                Ok(())
            }
        }
    }

    fn withdraw(&self, amount: Money) -> AtmResult<Withdrawal> {
        if !amount.is_positive() || !amount.is_multiple_of(DISPENSE_DENOMINATION) {
            return Err(AtmError::InvalidAmount);
        }

        let (entry, cash_left) = {
            let mut state = self.state.lock();
            if !state.cash_on_hand.is_positive() {
                return Err(AtmError::NoMoney);
            }
            let dispense = if amount.is_greater_than(state.cash_on_hand) { state.cash_on_hand } else { amount };
            let cash_left = state.cash_on_hand.checked_sub(dispense).ok_or(AtmError::NoMoney)?;
            let entry = state.authorized_transaction(dispense.negate())?;
            state.cash_on_hand = cash_left;
            (entry, cash_left)
        };

        let withdrawal = Withdrawal { requested: amount, entry };
        if withdrawal.is_partial() {
            warn!("requested {} but only {} could be dispensed", amount, withdrawal.dispensed());
        }
        if withdrawal.entry.overdraft_applied() {
            warn!("withdrawal overdrew the account, balance now {}", withdrawal.entry.balance());
        }
        debug!("dispensed {}, {} left in device", withdrawal.dispensed(), cash_left);
        return Ok(withdrawal);
    }

    fn deposit(&self, amount: Money) -> AtmResult<()> {
        if !amount.is_positive() {
            return Err(AtmError::InvalidAmount);
        }

        let entry = self.state.lock().authorized_transaction(amount)?;
        debug!("deposited {}, balance now {}", entry.delta(), entry.balance());
        return Ok(());
    }

    fn balance(&self) -> AtmResult<Money> {
        let mut state = self.state.lock();
        Ok(state.session_account()?.balance())
    }

    fn history(&self) -> AtmResult<Vec<LedgerEntry>> {
        let mut state = self.state.lock();
        Ok(state.session_account()?.history().to_vec())
    }

    fn logout(&self) -> AtmResult<String> {
        let session = self.state.lock().session.take();
        match session {
            Some(session) => {
                info!("account {} logged out", session.account_id);
                Ok(session.account_id)
            },
            None => Err(AtmError::NotAuthorized)
        }
    }
}

async fn expire_sessions<A: Account>(state: Arc<Mutex<State<A>>>, logout_seconds: u64,
                                     mut ticker: Interval, mut shutdown: oneshot::Receiver<()>) {
    debug!("session expiry started");
    loop {
        tokio::select! {
            // a dropped sender also lands here
            _ = &mut shutdown => break,
            _ = ticker.tick() => {
                let expired = state.lock().tick(logout_seconds);
                if let Some(account_id) = expired {
                    info!("account {} logged out after {}s idle", account_id, logout_seconds);
                }
            }
        }
    }
    debug!("session expiry stopped");
}

/// Stops the session expiry task of an [`Atm`]. Dropping the handle
/// stops the task as well, without waiting for it.
#[must_use = "dropping the handle stops session expiry immediately"]
pub struct Shutdown {
    signal: oneshot::Sender<()>,
    task: JoinHandle<()>
}

impl Shutdown {
    pub async fn signal(self) {
        let _ = self.signal.send(());
        let _ = self.task.await;
    }
}
