//! `cart` slice

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::Record;

use super::Slice;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Record,
    pub quantity: u32,
}

impl CartItem {
    /// Unit price from the product's `price` field (number or numeric string)
    pub fn unit_price(&self) -> Option<f64> {
        match self.product.get("price")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartState {
    pub items: Vec<CartItem>,
}

impl CartState {
    pub fn item(&self, id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.product.id == id)
    }

    pub fn total_quantity(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    /// Sum of price × quantity; items without a usable price count as 0
    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|item| item.unit_price().unwrap_or(0.0) * f64::from(item.quantity))
            .sum()
    }

    fn item_mut(&mut self, id: &str) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.product.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "camelCase")]
pub enum CartAction {
    /// Add one unit; a product already in the cart gets its quantity bumped
    AddToCart(Record),
    DeleteFromCart { id: String },
    IncrementQuantity { id: String },
    /// Never goes below one; use `DeleteFromCart` to remove
    DecrementQuantity { id: String },
    ClearCart,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CartSlice;

impl Slice for CartSlice {
    const NAME: &'static str = "cart";

    type State = CartState;
    type Action = CartAction;

    fn action_type(action: &CartAction) -> &'static str {
        match action {
            CartAction::AddToCart(_) => "addToCart",
            CartAction::DeleteFromCart { .. } => "deleteFromCart",
            CartAction::IncrementQuantity { .. } => "incrementQuantity",
            CartAction::DecrementQuantity { .. } => "decrementQuantity",
            CartAction::ClearCart => "clearCart",
        }
    }

    fn reduce(state: &mut CartState, action: CartAction) {
        match action {
            CartAction::AddToCart(product) => match state.item_mut(&product.id) {
                Some(item) => item.quantity = item.quantity.saturating_add(1),
                None => state.items.push(CartItem {
                    product,
                    quantity: 1,
                }),
            },
            CartAction::DeleteFromCart { id } => {
                state.items.retain(|item| item.product.id != id);
            }
            CartAction::IncrementQuantity { id } => {
                if let Some(item) = state.item_mut(&id) {
                    item.quantity = item.quantity.saturating_add(1);
                }
            }
            CartAction::DecrementQuantity { id } => {
                if let Some(item) = state.item_mut(&id)
                    && item.quantity > 1
                {
                    item.quantity -= 1;
                }
            }
            CartAction::ClearCart => state.items.clear(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn product(id: &str, price: Value) -> Record {
        Record::new(id, json!({"price": price, "time": 1}).as_object().cloned().unwrap())
    }

    #[test]
    fn test_add_existing_product_bumps_quantity() {
        let mut state = CartState::default();
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p1", json!(10))));
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p1", json!(10))));
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p2", json!(5))));

        assert_eq!(state.items.len(), 2);
        assert_eq!(state.item("p1").unwrap().quantity, 2);
        assert_eq!(state.total_quantity(), 3);
    }

    #[test]
    fn test_decrement_stops_at_one() {
        let mut state = CartState::default();
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p1", json!(10))));
        CartSlice::reduce(
            &mut state,
            CartAction::DecrementQuantity {
                id: "p1".to_string(),
            },
        );
        assert_eq!(state.item("p1").unwrap().quantity, 1);
    }

    #[test]
    fn test_total_price_accepts_numeric_strings() {
        let mut state = CartState::default();
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p1", json!("499"))));
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p2", json!(0.5))));
        CartSlice::reduce(
            &mut state,
            CartAction::IncrementQuantity {
                id: "p2".to_string(),
            },
        );
        CartSlice::reduce(&mut state, CartAction::AddToCart(product("p3", json!(null))));

        assert_eq!(state.total_price(), 500.0);
    }

    #[test]
    fn test_action_wire_format() {
        let action = CartAction::DeleteFromCart {
            id: "p1".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&action).unwrap(),
            json!({"type": "deleteFromCart", "payload": {"id": "p1"}})
        );
        assert_eq!(
            serde_json::to_value(CartAction::ClearCart).unwrap(),
            json!({"type": "clearCart"})
        );
    }
}
