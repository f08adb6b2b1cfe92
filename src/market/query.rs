//! Order query service
//!
//! Read-side projections over the order ledger, filtered by participant
//! role and status. Pure reads against a redb read transaction snapshot,
//! so a member always sees their own prior committed writes. Each row
//! resolves the item and the counterpart member for display.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::store::MarketStore;
use crate::store::models::{Order, OrderStatus};

use super::MarketResult;

/// Which side of the order the counterpart is resolved from
enum Counterpart {
    Buyer,
    Seller,
}

/// One row of an order projection
///
/// `otp` is populated only in the buyer-pending view; every other
/// projection omits the field entirely.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub order_id: String,
    pub item_id: String,
    pub item_name: String,
    pub item_price: Decimal,
    pub counterpart_id: String,
    pub counterpart_name: String,
    pub amount: Decimal,
    pub status: OrderStatus,
    pub created_at: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
}

/// Pending orders where the member is the seller ("to deliver")
pub fn pending_for_seller(store: &MarketStore, seller_id: &str) -> MarketResult<Vec<OrderView>> {
    let orders = store.orders_for_seller(seller_id, OrderStatus::Pending)?;
    resolve(store, orders, Counterpart::Buyer, false)
}

/// Pending orders where the member is the buyer ("awaiting pickup")
///
/// The one projection that carries the plaintext OTP, so the buyer can
/// read the code out at handover.
pub fn pending_for_buyer(store: &MarketStore, buyer_id: &str) -> MarketResult<Vec<OrderView>> {
    let orders = store.orders_for_buyer(buyer_id, OrderStatus::Pending)?;
    resolve(store, orders, Counterpart::Seller, true)
}

/// Completed orders where the member is the buyer ("bought")
pub fn completed_bought(store: &MarketStore, buyer_id: &str) -> MarketResult<Vec<OrderView>> {
    let orders = store.orders_for_buyer(buyer_id, OrderStatus::Completed)?;
    resolve(store, orders, Counterpart::Seller, false)
}

/// Completed orders where the member is the seller ("sold")
pub fn completed_sold(store: &MarketStore, seller_id: &str) -> MarketResult<Vec<OrderView>> {
    let orders = store.orders_for_seller(seller_id, OrderStatus::Completed)?;
    resolve(store, orders, Counterpart::Buyer, false)
}

fn resolve(
    store: &MarketStore,
    orders: Vec<Order>,
    counterpart: Counterpart,
    include_otp: bool,
) -> MarketResult<Vec<OrderView>> {
    let mut views = Vec::with_capacity(orders.len());
    for order in orders {
        let item = store.get_item(&order.item_id)?;
        let (item_name, item_price) = match item {
            Some(i) => (i.name, i.price),
            // Ledger history outlives the catalog record; fall back to the
            // snapshot the order carries.
            None => ("(item removed)".to_string(), order.amount),
        };

        let counterpart_id = match counterpart {
            Counterpart::Buyer => order.buyer_id.clone(),
            Counterpart::Seller => order.seller_id.clone(),
        };
        let counterpart_name = store
            .get_user(&counterpart_id)?
            .map(|u| u.display_name())
            .unwrap_or_else(|| "(unknown member)".to_string());

        views.push(OrderView {
            order_id: order.id,
            item_id: order.item_id,
            item_name,
            item_price,
            counterpart_id,
            counterpart_name,
            amount: order.amount,
            status: order.status,
            created_at: order.created_at,
            otp: include_otp.then_some(order.otp),
        });
    }
    Ok(views)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market::{cart, engine};
    use crate::store::models::{Category, Item, User};
    use crate::utils::now_millis;

    fn seed_user(store: &MarketStore, id: &str, first: &str, last: &str) {
        store
            .create_user(&User {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: format!("{id}@example.com"),
                age: 21,
                contact_number: "555-0100".into(),
                password_hash: Some("hash".into()),
                created_at: now_millis(),
            })
            .unwrap();
    }

    fn seed_item(store: &MarketStore, id: &str, seller: &str) {
        store
            .put_item(&Item {
                id: id.to_string(),
                name: format!("Item {id}"),
                description: "desc".into(),
                price: Decimal::new(1000, 2),
                category: Category::Clothing,
                seller_id: seller.to_string(),
                created_at: now_millis(),
            })
            .unwrap();
    }

    #[test]
    fn projections_split_by_role_and_status() {
        let store = MarketStore::open_in_memory().unwrap();
        seed_user(&store, "buyer", "Bea", "Buyer");
        seed_user(&store, "seller", "Sam", "Seller");
        seed_item(&store, "x", "seller");
        seed_item(&store, "y", "seller");
        cart::add_item(&store, "buyer", "x").unwrap();
        cart::add_item(&store, "buyer", "y").unwrap();
        let orders = engine::place_order(&store, "buyer").unwrap();

        // Both pending views see both orders; only the buyer view has OTPs
        let to_deliver = pending_for_seller(&store, "seller").unwrap();
        assert_eq!(to_deliver.len(), 2);
        assert!(to_deliver.iter().all(|v| v.otp.is_none()));
        assert!(to_deliver.iter().all(|v| v.counterpart_name == "Bea Buyer"));

        let awaiting = pending_for_buyer(&store, "buyer").unwrap();
        assert_eq!(awaiting.len(), 2);
        assert!(awaiting.iter().all(|v| v.otp.is_some()));
        assert!(awaiting.iter().all(|v| v.counterpart_name == "Sam Seller"));

        // Close one order; it moves to both completed views
        let first = &orders[0];
        engine::close_transaction(&store, &first.id, &first.otp).unwrap();

        assert_eq!(pending_for_seller(&store, "seller").unwrap().len(), 1);
        assert_eq!(pending_for_buyer(&store, "buyer").unwrap().len(), 1);

        let bought = completed_bought(&store, "buyer").unwrap();
        assert_eq!(bought.len(), 1);
        assert_eq!(bought[0].order_id, first.id);
        assert!(bought[0].otp.is_none());

        let sold = completed_sold(&store, "seller").unwrap();
        assert_eq!(sold.len(), 1);
        assert_eq!(sold[0].amount, Decimal::new(1000, 2));
    }
}
