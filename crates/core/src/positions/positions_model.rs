use chrono::{DateTime, Utc};
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::constants::QUANTITY_THRESHOLD;

/// True when `quantity` is large enough to count as an open position.
pub fn is_quantity_significant(quantity: &Decimal) -> bool {
    let threshold =
        Decimal::from_str_radix(QUANTITY_THRESHOLD, 10).unwrap_or_else(|_| Decimal::new(1, 8));
    quantity.abs() >= threshold
}

/// One append-only position row. The current position for a symbol is the
/// latest row with a significant quantity.
///
/// `average_cost` moves only on buys (weighted average of prior basis and the
/// new purchase); sells reduce quantity and leave it untouched. The
/// `last_known_*` fields are display caches from the instant the row was
/// written; authoritative unrealized P/L is recomputed on read from a current
/// price.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: String,
    pub symbol: String,
    pub quantity: Decimal,
    /// Average cost per share.
    pub average_cost: Decimal,
    pub timestamp: DateTime<Utc>,
    pub last_known_price: Decimal,
    pub last_known_value: Decimal,
    pub unrealized_pl: Decimal,
}

impl Position {
    /// First acquisition of a symbol: average cost equals the purchase price.
    pub fn opened(symbol: &str, quantity: Decimal, price: Decimal, at: DateTime<Utc>) -> Self {
        let mut position = Position {
            id: Uuid::new_v4().to_string(),
            symbol: symbol.to_string(),
            quantity,
            average_cost: price,
            timestamp: at,
            last_known_price: price,
            last_known_value: Decimal::ZERO,
            unrealized_pl: Decimal::ZERO,
        };
        position.refresh_display_fields(price);
        position
    }

    /// Next row after buying `quantity` at `price`.
    pub fn after_buy(&self, quantity: Decimal, price: Decimal, at: DateTime<Utc>) -> Position {
        let new_quantity = self.quantity + quantity;
        let average_cost = if is_quantity_significant(&self.quantity) {
            (self.quantity * self.average_cost + quantity * price) / new_quantity
        } else {
            price
        };

        let mut next = Position {
            id: Uuid::new_v4().to_string(),
            symbol: self.symbol.clone(),
            quantity: new_quantity,
            average_cost,
            timestamp: at,
            last_known_price: price,
            last_known_value: Decimal::ZERO,
            unrealized_pl: Decimal::ZERO,
        };
        next.refresh_display_fields(price);
        next
    }

    /// Next row after selling `quantity` at `price`. Average cost is
    /// unchanged. An oversell clamps quantity at zero; short positions are
    /// not modeled.
    pub fn after_sell(&self, quantity: Decimal, price: Decimal, at: DateTime<Utc>) -> Position {
        let new_quantity = if quantity > self.quantity {
            warn!(
                "Oversell of {}: requested {} but holding {}; clamping position to zero",
                self.symbol, quantity, self.quantity
            );
            Decimal::ZERO
        } else {
            self.quantity - quantity
        };

        let mut next = Position {
            id: Uuid::new_v4().to_string(),
            symbol: self.symbol.clone(),
            quantity: new_quantity,
            average_cost: self.average_cost,
            timestamp: at,
            last_known_price: price,
            last_known_value: Decimal::ZERO,
            unrealized_pl: Decimal::ZERO,
        };
        next.refresh_display_fields(price);
        next
    }

    /// Copy of this row revalued at `price` (read path; nothing persisted).
    pub fn revalued(&self, price: Decimal) -> Position {
        let mut valued = self.clone();
        valued.refresh_display_fields(price);
        valued
    }

    /// Unrealized P/L at `price`: `quantity * (price - average_cost)`.
    pub fn unrealized_pl_at(&self, price: Decimal) -> Decimal {
        self.quantity * (price - self.average_cost)
    }

    /// Cost basis of the whole position.
    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.average_cost
    }

    pub fn is_open(&self) -> bool {
        is_quantity_significant(&self.quantity)
    }

    fn refresh_display_fields(&mut self, price: Decimal) {
        self.last_known_price = price;
        self.last_known_value = self.quantity * price;
        self.unrealized_pl = self.unrealized_pl_at(price);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_quantity_significance() {
        assert!(is_quantity_significant(&dec!(1)));
        assert!(is_quantity_significant(&dec!(0.00000001)));
        assert!(!is_quantity_significant(&dec!(0.000000001)));
        assert!(!is_quantity_significant(&Decimal::ZERO));
    }

    #[test]
    fn test_opened_position_costs_at_purchase_price() {
        let position = Position::opened("KO", dec!(10), dec!(60), Utc::now());
        assert_eq!(position.average_cost, dec!(60));
        assert_eq!(position.last_known_value, dec!(600));
        assert_eq!(position.unrealized_pl, Decimal::ZERO);
    }

    #[test]
    fn test_buy_from_closed_row_resets_average_cost() {
        let closed = Position {
            quantity: Decimal::ZERO,
            average_cost: dec!(99),
            ..Position::opened("KO", dec!(1), dec!(99), Utc::now())
        };
        let reopened = closed.after_buy(dec!(4), dec!(50), Utc::now());
        assert_eq!(reopened.average_cost, dec!(50));
        assert_eq!(reopened.quantity, dec!(4));
    }

    #[test]
    fn test_unrealized_pl_at_price() {
        let position = Position::opened("KO", dec!(10), dec!(60), Utc::now());
        assert_eq!(position.unrealized_pl_at(dec!(65)), dec!(50));
        assert_eq!(position.unrealized_pl_at(dec!(55)), dec!(-50));
    }
}
