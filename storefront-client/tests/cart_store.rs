// storefront-client/tests/cart_store.rs
// 集成测试: 购物车 store

use serde_json::json;
use storefront_client::store::devtools::INIT_ACTION;
use storefront_client::{CartAction, Record, StoreOptions, StorefrontConfig, configure_cart_store};

fn product(id: &str, price: f64) -> Record {
    Record::new(
        id,
        json!({"title": format!("Item {}", id), "price": price, "time": 1})
            .as_object()
            .cloned()
            .unwrap(),
    )
}

#[test]
fn test_single_cart_slice() {
    let store = configure_cart_store(StoreOptions::default());
    let root = serde_json::to_value(store.state()).unwrap();
    assert_eq!(root, json!({"cart": {"items": []}}));
}

#[test]
fn test_clones_share_state() {
    let store = configure_cart_store(StoreOptions::default());
    let other = store.clone();

    store.dispatch(CartAction::AddToCart(product("p1", 4.0)));
    other.dispatch(CartAction::AddToCart(product("p1", 4.0)));

    assert_eq!(store.select(|root| root.cart.total_quantity()), 2);
    assert_eq!(other.state().cart.total_price(), 8.0);
}

#[tokio::test]
async fn test_observers_see_dispatches() {
    let store = configure_cart_store(StoreOptions::default());
    let mut rx = store.subscribe();

    store.dispatch(CartAction::AddToCart(product("p1", 1.0)));
    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().cart.items.len(), 1);

    store.dispatch(CartAction::ClearCart);
    rx.changed().await.unwrap();
    assert!(rx.borrow().cart.items.is_empty());
}

#[test]
fn test_dev_tools_enabled_by_default() {
    let store = configure_cart_store(StorefrontConfig::default().store_options());
    let dev_tools = store.dev_tools().expect("dev tools on by default");
    assert_eq!(dev_tools.history()[0].action_type, INIT_ACTION);

    store.dispatch(CartAction::AddToCart(product("p1", 2.5)));
    store.dispatch(CartAction::DeleteFromCart {
        id: "p1".to_string(),
    });

    let history = dev_tools.history();
    assert_eq!(history.len(), 3);
    assert_eq!(history[1].action_type, "cart/addToCart");
    assert_eq!(history[1].state["cart"]["items"][0]["quantity"], json!(1));
    assert_eq!(history[2].action_type, "cart/deleteFromCart");
    assert_eq!(history[2].payload, json!({"id": "p1"}));
    assert_eq!(history[2].state, json!({"cart": {"items": []}}));
}

#[test]
fn test_dev_tools_can_be_disabled() {
    let store = configure_cart_store(StoreOptions {
        dev_tools: false,
        ..Default::default()
    });
    store.dispatch(CartAction::ClearCart);
    assert!(store.dev_tools().is_none());
}
