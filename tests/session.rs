//! Session-level poller behavior against a stub chain reader.

use alloy::primitives::{Address, U256, address};
use oracle_swap_sdk::{
    Market,
    state::Session,
    testing::{ChainStateBuilder, StubReader},
};

const ACCOUNT: Address = address!("0x1111111111111111111111111111111111111111");

fn snapshot(seed: u64) -> oracle_swap_sdk::state::ChainState {
    ChainStateBuilder::new()
        .account_balance(true, U256::from(seed))
        .account_balance(false, U256::from(seed + 1))
        .pool_balance(true, U256::from(seed + 2))
        .pool_balance(false, U256::from(seed + 3))
        .staked_balance(true, U256::from(seed + 4))
        .staked_balance(false, U256::from(seed + 5))
        .fee_total(true, U256::from(seed + 6))
        .fee_total(false, U256::from(seed + 7))
        .build()
}

#[tokio::test]
async fn test_refresh_publishes_all_eight_quantities_at_once() {
    let reader = StubReader::new(snapshot(100));
    let mut session = Session::new(Market::testnet());
    session.connect(ACCOUNT);
    assert!(session.chain_state().is_none());

    session.refresh(&reader).await.unwrap();

    let state = session.chain_state().unwrap();
    assert_eq!(*state, snapshot(100));
    assert_eq!(reader.reads(), 8);
}

#[tokio::test]
async fn test_failed_refresh_keeps_previous_snapshot() {
    let mut reader = StubReader::new(snapshot(100));
    let mut session = Session::new(Market::testnet());
    session.connect(ACCOUNT);
    session.refresh(&reader).await.unwrap();

    // New values are on chain but one of the eight reads fails
    reader.set_snapshot(snapshot(200));
    let mut failing = reader.with_failing_read();
    assert!(session.refresh(&failing).await.is_err());
    assert_eq!(*session.chain_state().unwrap(), snapshot(100));

    // The next scheduled tick is the retry
    failing = StubReader::new(snapshot(200));
    session.refresh(&failing).await.unwrap();
    assert_eq!(*session.chain_state().unwrap(), snapshot(200));
}

#[tokio::test]
async fn test_disconnect_clears_snapshot() {
    let reader = StubReader::new(snapshot(100));
    let mut session = Session::new(Market::testnet());
    session.connect(ACCOUNT);
    session.refresh(&reader).await.unwrap();
    assert!(session.chain_state().is_some());

    session.disconnect();
    assert!(!session.is_connected());
    assert!(session.chain_state().is_none());
}

#[tokio::test]
async fn test_refresh_while_disconnected_is_a_no_op() {
    let reader = StubReader::new(snapshot(100));
    let mut session = Session::new(Market::testnet());

    session.refresh(&reader).await.unwrap();
    assert!(session.chain_state().is_none());
    assert_eq!(reader.reads(), 0);
}
