use std::time::Duration;

use atm::{Atm, BankAccount, Money, Shutdown, TextInterface};
use atm::interface::{self, HELP_MESSAGE};

const ID: &str = "12345";
const PIN: &str = "1234";
const OTHER_ID: &str = "23456";
const OTHER_PIN: &str = "2345";

fn start(logout_seconds: u64) -> (TextInterface<Atm>, Shutdown) {
    colored::control::set_override(false);
    let (atm, shutdown) = Atm::new(logout_seconds, vec![
        BankAccount::new(ID, PIN, Money::from_whole(20_000)),
        BankAccount::new(OTHER_ID, OTHER_PIN, Money::from_whole(25)),
    ]);
    (TextInterface::new(atm), shutdown)
}

fn login(ui: &TextInterface<Atm>, id: &str, pin: &str) {
    assert_eq!(ui.execute(&format!("authorize {} {}", id, pin)), interface::authorized_message(id));
}

#[tokio::test(start_paused = true)]
async fn unknown_command() {
    let (ui, shutdown) = start(120);
    assert_eq!(ui.execute("foo"), HELP_MESSAGE);
    assert_eq!(ui.execute(""), HELP_MESSAGE);
    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn not_authorized() {
    let (ui, shutdown) = start(120);
    assert_eq!(ui.execute("balance"), "Authorization required.");
    assert_eq!(ui.execute("authorize foo bar"), "Authorization failed.");
    assert_eq!(ui.execute("balance"), "Authorization required.");
    assert_eq!(ui.execute("logout"), "No account currently authorized.");
    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn balance_and_deposit() {
    let (ui, shutdown) = start(120);
    login(&ui, ID, PIN);

    assert_eq!(ui.execute("balance"), "Current balance: 20000.00");
    assert_eq!(ui.execute("deposit 500"), "Current balance: 20500.00");
    assert_eq!(ui.execute("deposit 0"), "Invalid amount.");

    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn withdraw() {
    let (ui, shutdown) = start(120);
    login(&ui, ID, PIN);

    assert_eq!(ui.execute("withdraw 500"), "Amount dispensed: $500.00\nCurrent balance: 19500.00");
    assert_eq!(ui.execute("withdraw 15"), "Invalid amount.");

    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn withdraw_overdraft() {
    let (ui, shutdown) = start(120);
    login(&ui, OTHER_ID, OTHER_PIN);

    assert_eq!(ui.execute("withdraw 40"),
        "Amount dispensed: $40.00\nYou have been charged an overdraft fee of $5.00. Current balance: -20.00");
    assert_eq!(ui.execute("withdraw 20"),
        "Your account is overdrawn! You may not make withdrawals at this time.");

    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn withdraw_runs_out_of_money() {
    let (ui, shutdown) = start(120);
    login(&ui, ID, PIN);

    assert_eq!(ui.execute("withdraw 20000"),
        "Unable to dispense full amount requested at this time. Amount dispensed: $10000.00\nCurrent balance: 10000.00");
    assert_eq!(ui.execute("withdraw 20"), "Unable to process your withdrawal at this time.");

    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn history_newest_first() {
    let (ui, shutdown) = start(120);
    login(&ui, ID, PIN);
    assert_eq!(ui.execute("history"), interface::EMPTY_HISTORY_MESSAGE);

    ui.execute("withdraw 500");
    ui.execute("deposit 20.5");

    let history = ui.execute("history");
    let lines: Vec<&str> = history.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with(" 20.50 19520.50"), "{}", lines[0]);
    assert!(lines[1].ends_with(" -500.00 19500.00"), "{}", lines[1]);

    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn logout() {
    let (ui, shutdown) = start(120);
    login(&ui, ID, PIN);

    assert_eq!(ui.execute("logout"), "Account 12345 logged out.");
    assert_eq!(ui.execute("balance"), "Authorization required.");

    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn idle_logout() {
    let (ui, shutdown) = start(1);
    login(&ui, ID, PIN);

    tokio::time::sleep(Duration::from_millis(1500)).await;

    assert_eq!(ui.execute("balance"), "Authorization required.");
    shutdown.signal().await;
}

#[tokio::test(start_paused = true)]
async fn deposit_near_the_largest_amount() {
    let (ui, shutdown) = start(120);
    login(&ui, ID, PIN);

    assert_eq!(ui.execute("deposit 92233720368547758.07"), "Transaction would take the balance out of range.");
    assert_eq!(ui.execute("balance"), "Current balance: 20000.00");
    assert_eq!(ui.execute("history"), interface::EMPTY_HISTORY_MESSAGE);

    shutdown.signal().await;
}
