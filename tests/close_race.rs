//! Concurrent close attempts on the same order
//!
//! Exactly one of N racing closers holding the correct OTP may succeed;
//! every loser must see "already completed" (or a retryable conflict),
//! never a credential error and never a second success.

use rust_decimal::Decimal;
use tempfile::TempDir;

use tradepost::MarketStore;
use tradepost::market::{MarketError, cart, engine};
use tradepost::store::models::{Category, Item, OrderStatus, User};

#[test]
fn exactly_one_concurrent_close_wins() {
    let dir = TempDir::new().unwrap();
    let store = MarketStore::open(dir.path().join("race.redb")).unwrap();

    store
        .create_user(&User {
            id: "buyer".into(),
            first_name: "Bea".into(),
            last_name: "Buyer".into(),
            email: "buyer@example.com".into(),
            age: 22,
            contact_number: "555-0100".into(),
            password_hash: Some("hash".into()),
            created_at: 0,
        })
        .unwrap();
    store
        .put_item(&Item {
            id: "x".into(),
            name: "Desk lamp".into(),
            description: "race test item".into(),
            price: Decimal::new(1000, 2),
            category: Category::Other,
            seller_id: "seller".into(),
            created_at: 0,
        })
        .unwrap();

    cart::add_item(&store, "buyer", "x").unwrap();
    let orders = engine::place_order(&store, "buyer").unwrap();
    let order_id = orders[0].id.clone();
    let otp = orders[0].otp.clone();

    const CLOSERS: usize = 8;
    let mut results = Vec::with_capacity(CLOSERS);
    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..CLOSERS)
            .map(|_| {
                let store = store.clone();
                let order_id = order_id.clone();
                let otp = otp.clone();
                scope.spawn(move || engine::close_transaction(&store, &order_id, &otp))
            })
            .collect();
        for handle in handles {
            results.push(handle.join().unwrap());
        }
    });

    let successes = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(successes, 1, "exactly one closer must win");

    for result in results {
        match result {
            Ok(order) => assert_eq!(order.status, OrderStatus::Completed),
            Err(MarketError::AlreadyCompleted) | Err(MarketError::Conflict(_)) => {}
            Err(other) => panic!("loser saw the wrong error: {other}"),
        }
    }

    // The ledger holds the terminal state
    let stored = store.get_order(&order_id).unwrap().unwrap();
    assert_eq!(stored.status, OrderStatus::Completed);
}
