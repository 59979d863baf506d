//! The user record: the single mutable aggregate every screen reads and
//! replaces wholesale. Serde field names match the original persisted JSON
//! (camelCase) so a record written by the web app round-trips unchanged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub credits: i64,
    /// Monotonic: once true, never reverts.
    pub has_passed: bool,
    pub test_attempts: u32,
    /// Titles of settled course purchases. Append-only, no duplicates.
    pub courses_completed: Vec<String>,
    pub trading_active: bool,
    pub portfolio: Portfolio,
    pub joined_at: String,
}

impl User {
    /// A zeroed record as created at signup.
    pub fn new(id: String, email: String, name: String, joined_at: String) -> Self {
        Self {
            id,
            email,
            name,
            credits: 0,
            has_passed: false,
            test_attempts: 0,
            courses_completed: Vec::new(),
            trading_active: false,
            portfolio: Portfolio::default(),
            joined_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub balance: f64,
    pub positions: Vec<Position>,
    pub total_value: f64,
    pub profit_loss: f64,
}

impl Portfolio {
    pub fn position(&self, symbol: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.symbol == symbol)
    }

    pub fn held_quantity(&self, symbol: &str) -> u32 {
        self.position(symbol).map(|p| p.quantity).unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub name: String,
    pub quantity: u32,
    pub avg_price: f64,
    pub current_price: f64,
    pub profit_loss: f64,
}
