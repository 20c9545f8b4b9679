use serde::{Deserialize, Serialize};

use super::Collection;

/// Per-collection loading flags
///
/// A flag is `true` while an initial fetch, refresh or delete for that
/// collection is pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadingFlags {
    pub products: bool,
    pub orders: bool,
    pub users: bool,
}

impl LoadingFlags {
    pub fn get(&self, collection: Collection) -> bool {
        match collection {
            Collection::Products => self.products,
            Collection::Orders => self.orders,
            Collection::Users => self.users,
        }
    }

    pub fn set(&mut self, collection: Collection, value: bool) {
        match collection {
            Collection::Products => self.products = value,
            Collection::Orders => self.orders = value,
            Collection::Users => self.users = value,
        }
    }

    /// Whether any collection is still loading
    pub fn any(&self) -> bool {
        self.products || self.orders || self.users
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_only_touches_one_flag() {
        let mut flags = LoadingFlags::default();
        flags.set(Collection::Orders, true);

        assert!(flags.get(Collection::Orders));
        assert!(!flags.get(Collection::Products));
        assert!(!flags.get(Collection::Users));
        assert!(flags.any());
    }

    #[test]
    fn test_serializes_as_keyed_map() {
        let flags = LoadingFlags {
            users: true,
            ..Default::default()
        };
        let value = serde_json::to_value(flags).unwrap();
        assert_eq!(
            value,
            serde_json::json!({"products": false, "orders": false, "users": true})
        );
    }
}
