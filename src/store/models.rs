//! Persisted record types
//!
//! All records serialize as camelCase JSON, both on disk (redb values) and
//! over the API.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A registered member
///
/// The password hash never leaves the server; use [`User::profile`] for
/// anything client-facing. The member's cart lives in its own table keyed
/// by user id (set semantics), not on this record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub age: u32,
    pub contact_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password_hash: Option<String>,
    pub created_at: i64,
}

impl User {
    /// Client-facing view with the password hash stripped
    pub fn profile(&self) -> User {
        User {
            password_hash: None,
            ..self.clone()
        }
    }

    /// "First Last" display name for projections
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Item categories (fixed set)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Clothing,
    Grocery,
    Electronics,
    Furniture,
    Other,
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "clothing" => Ok(Category::Clothing),
            "grocery" => Ok(Category::Grocery),
            "electronics" => Ok(Category::Electronics),
            "furniture" => Ok(Category::Furniture),
            "other" => Ok(Category::Other),
            other => Err(format!("Unknown category: {other}")),
        }
    }
}

/// A listed item
///
/// Immutable from the fulfillment core's perspective; the core only checks
/// existence and snapshots the price at order creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: Category,
    pub seller_id: String,
    pub created_at: i64,
}

/// Order lifecycle status
///
/// The only lawful transition is `Pending -> Completed`; [`Completed`] is
/// terminal and orders are never deleted.
///
/// [`Completed`]: OrderStatus::Completed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Completed,
}

/// The durable record of a single item's sale
///
/// `seller_id` and `amount` are copied from the item at order creation and
/// never re-derived. `hashed_otp` is the only value consulted during
/// verification; the plaintext `otp` exists for the buyer-pending view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub buyer_id: String,
    pub seller_id: String,
    pub item_id: String,
    /// Price snapshot at order creation, 2 decimal places
    pub amount: Decimal,
    /// Plaintext handover code, exposed to the buyer only
    pub otp: String,
    /// Salted SHA-256 of the OTP, used for verification
    pub hashed_otp: String,
    pub status: OrderStatus,
    pub created_at: i64,
}
