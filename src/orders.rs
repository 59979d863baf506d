//! Portfolio order model. Orders mutate the portfolio directly: a buy debits
//! cash and opens or grows a position at a volume-weighted average price, a
//! sell credits cash at the current quote. Failed orders leave the portfolio
//! untouched.

use serde::{Deserialize, Serialize};

use crate::error::{AcademyError, Result};
use crate::market::Quote;
use crate::user::{Portfolio, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "buy",
            OrderSide::Sell => "sell",
        }
    }
}

pub fn place_order(
    portfolio: &mut Portfolio,
    quote: &Quote,
    side: OrderSide,
    quantity: u32,
) -> Result<()> {
    if quantity == 0 {
        return Err(AcademyError::Validation(
            "order quantity must be positive".to_string(),
        ));
    }

    match side {
        OrderSide::Buy => {
            let cost = quote.price * quantity as f64;
            if cost > portfolio.balance {
                return Err(AcademyError::InsufficientFunds {
                    needed: cost,
                    available: portfolio.balance,
                });
            }
            portfolio.balance -= cost;
            match portfolio.positions.iter_mut().find(|p| p.symbol == quote.symbol) {
                Some(pos) => {
                    let held = pos.quantity as f64;
                    let added = quantity as f64;
                    pos.avg_price = (pos.avg_price * held + quote.price * added) / (held + added);
                    pos.quantity += quantity;
                    pos.current_price = quote.price;
                }
                None => portfolio.positions.push(Position {
                    symbol: quote.symbol.clone(),
                    name: quote.name.clone(),
                    quantity,
                    avg_price: quote.price,
                    current_price: quote.price,
                    profit_loss: 0.0,
                }),
            }
        }
        OrderSide::Sell => {
            let held = portfolio.held_quantity(&quote.symbol);
            if held < quantity {
                return Err(AcademyError::InsufficientShares {
                    held,
                    requested: quantity,
                });
            }
            portfolio.balance += quote.price * quantity as f64;
            let pos = portfolio
                .positions
                .iter_mut()
                .find(|p| p.symbol == quote.symbol)
                .expect("held quantity checked above");
            pos.quantity -= quantity;
            pos.current_price = quote.price;
            portfolio.positions.retain(|p| p.quantity > 0);
        }
    }

    revalue(portfolio);
    Ok(())
}

/// Refresh every position against the latest snapshot, then recompute the
/// derived totals. Symbols missing from the snapshot keep their last price.
pub fn mark_to_market(portfolio: &mut Portfolio, quotes: &[Quote]) {
    for pos in &mut portfolio.positions {
        if let Some(q) = quotes.iter().find(|q| q.symbol == pos.symbol) {
            pos.current_price = q.price;
        }
    }
    revalue(portfolio);
}

fn revalue(portfolio: &mut Portfolio) {
    let mut holdings = 0.0;
    let mut pnl = 0.0;
    for pos in &mut portfolio.positions {
        pos.profit_loss = pos.quantity as f64 * (pos.current_price - pos.avg_price);
        holdings += pos.quantity as f64 * pos.current_price;
        pnl += pos.profit_loss;
    }
    portfolio.total_value = portfolio.balance + holdings;
    portfolio.profit_loss = pnl;
}
