//! Concurrent access to a shared ledger.

use debit_ledger::{Amount, Ledger};
use std::thread;

const THREADS: usize = 8;
const OPS_PER_THREAD: usize = 250;

#[test]
fn test_concurrent_charges_never_overdraw() {
    let ledger = &Ledger::new();
    let acc = &ledger.create_account(Amount::from(1_000)).unwrap();

    let successes: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    (0..OPS_PER_THREAD)
                        .filter(|_| ledger.charge(acc, Amount::from(1)).unwrap())
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(successes, 1_000);
    assert_eq!(ledger.account(acc).unwrap().balance(), Amount::ZERO);
}

#[test]
fn test_concurrent_holds_one_winner_per_vendor() {
    let ledger = &Ledger::new();
    let acc = &ledger.create_account(Amount::from(1_000)).unwrap();

    let winners: usize = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || usize::from(ledger.hold(acc, "pizza_hut", Amount::from(10)).unwrap()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(winners, 1);
    let account = ledger.account(acc).unwrap();
    assert_eq!(account.balance(), Amount::from(990));
    assert_eq!(account.hold_count(), 1);
}

#[test]
fn test_hold_settle_cycles_conserve_funds() {
    let ledger = &Ledger::new();
    let acc = &ledger.create_account(Amount::from(10_000)).unwrap();

    thread::scope(|s| {
        for t in 0..THREADS {
            s.spawn(move || {
                let vendor = format!("vendor-{}", t);
                for _ in 0..OPS_PER_THREAD {
                    assert!(ledger.hold(acc, &vendor, Amount::from(3)).unwrap());
                    assert!(ledger.settle_hold(acc, &vendor, Amount::from(2)).unwrap());
                }
            });
        }
    });

    let account = ledger.account(acc).unwrap();
    let spent = Amount::from((THREADS * OPS_PER_THREAD * 2) as i64);
    assert_eq!(account.balance(), Amount::from(10_000) - spent);
    assert_eq!(account.hold_count(), 0);
}

#[test]
fn test_independent_accounts_and_concurrent_creation() {
    let ledger = &Ledger::new();

    let ids = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(move || {
                    let acc = ledger.create_account(Amount::from(OPS_PER_THREAD as i64)).unwrap();
                    for _ in 0..OPS_PER_THREAD {
                        assert!(ledger.charge(&acc, Amount::from(1)).unwrap());
                    }
                    acc
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(ledger.len(), THREADS);
    for id in &ids {
        assert_eq!(ledger.account(id).unwrap().balance(), Amount::ZERO);
    }
}
