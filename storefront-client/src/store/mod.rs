//! Cart store
//!
//! A centralized, dispatch-based store holding one slice, `cart`. Any
//! component holding a [`Store`] handle reads with [`Store::state`] /
//! [`Store::select`] and writes with [`Store::dispatch`]; observers follow
//! changes through [`Store::subscribe`].

pub mod cart;
pub mod devtools;

pub use cart::{CartAction, CartItem, CartSlice, CartState};
pub use devtools::{ActionRecord, DevTools};

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;

/// A named, independently reducible section of the store
pub trait Slice: Send + Sync + 'static {
    /// Slice name, used as action type prefix
    const NAME: &'static str;

    type State: Clone + Default + fmt::Debug + Serialize + Send + Sync + 'static;
    type Action: fmt::Debug + Serialize + Send + 'static;

    /// Action name without the slice prefix
    fn action_type(action: &Self::Action) -> &'static str;

    fn reduce(state: &mut Self::State, action: Self::Action);
}

/// Root state: exactly one slice, `cart`
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RootState<C> {
    pub cart: C,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreOptions {
    /// Record dispatched actions for inspection
    pub dev_tools: bool,
    /// Inspection history bound
    pub dev_tools_max_age: usize,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            dev_tools: true,
            dev_tools_max_age: 50,
        }
    }
}

/// Build a store whose root holds the `cart` slice `S`
pub fn configure_store<S: Slice>(options: StoreOptions) -> Store<S> {
    let (tx, _) = watch::channel(RootState::<S::State>::default());
    let dev_tools = options.dev_tools.then(|| {
        let dev_tools = DevTools::new(options.dev_tools_max_age);
        dev_tools.record_init(&*tx.borrow());
        dev_tools
    });
    tracing::debug!(slice = S::NAME, dev_tools = options.dev_tools, "Store configured");

    Store {
        state: Arc::new(tx),
        dev_tools,
    }
}

/// Shared handle to the store; clones see the same state
pub struct Store<S: Slice> {
    state: Arc<watch::Sender<RootState<S::State>>>,
    dev_tools: Option<DevTools>,
}

impl<S: Slice> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            dev_tools: self.dev_tools.clone(),
        }
    }
}

impl<S: Slice> fmt::Debug for Store<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &*self.state.borrow())
            .field("dev_tools", &self.dev_tools.is_some())
            .finish()
    }
}

impl<S: Slice> Store<S> {
    /// Apply an action through the slice reducer
    ///
    /// Dispatches are serialized; observers are notified once per action.
    pub fn dispatch(&self, action: S::Action) {
        let action_type = format!("{}/{}", S::NAME, S::action_type(&action));
        let payload = self.dev_tools.as_ref().map(|_| match serde_json::to_value(&action) {
            Ok(value) => devtools::action_payload(value),
            Err(e) => {
                tracing::warn!(action = %action_type, error = %e, "Unserializable action");
                serde_json::Value::Null
            }
        });

        self.state.send_modify(|root| {
            S::reduce(&mut root.cart, action);
            if let (Some(dev_tools), Some(payload)) = (&self.dev_tools, payload) {
                dev_tools.record(&action_type, payload, &*root);
            }
        });
    }

    pub fn state(&self) -> RootState<S::State> {
        self.state.borrow().clone()
    }

    pub fn select<R>(&self, selector: impl FnOnce(&RootState<S::State>) -> R) -> R {
        selector(&self.state.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<RootState<S::State>> {
        self.state.subscribe()
    }

    /// Inspection history, `None` when disabled
    pub fn dev_tools(&self) -> Option<&DevTools> {
        self.dev_tools.as_ref()
    }
}

/// The application store
pub type CartStore = Store<CartSlice>;

pub fn configure_cart_store(options: StoreOptions) -> CartStore {
    configure_store::<CartSlice>(options)
}
