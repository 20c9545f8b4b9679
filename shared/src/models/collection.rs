//! Collection bindings
//!
//! 本地镜像名称 (复数) 与远端集合路径 (单数) 的对应关系。
//! The remote schema uses `order` and `user`; the local side keeps the plural
//! names. Both are part of the existing contract and must not be unified.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A mirrored remote collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Products,
    Orders,
    Users,
}

impl Collection {
    /// All mirrored collections, in mount order
    pub const ALL: [Collection; 3] = [Collection::Products, Collection::Orders, Collection::Users];

    /// Local key (mirror name and loading flag key)
    pub fn key(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "orders",
            Self::Users => "users",
        }
    }

    /// Remote collection path
    pub fn remote_path(&self) -> &'static str {
        match self {
            Self::Products => "products",
            Self::Orders => "order",
            Self::Users => "user",
        }
    }

    /// Singular, lowercase entity name for user-facing messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Products => "product",
            Self::Orders => "order",
            Self::Users => "user",
        }
    }

    /// Capitalized entity name, for the start of a sentence
    pub fn title(&self) -> &'static str {
        match self {
            Self::Products => "Product",
            Self::Orders => "Order",
            Self::Users => "User",
        }
    }
}

impl TryFrom<&str> for Collection {
    type Error = ();

    /// Accepts the local key only
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "products" => Ok(Self::Products),
            "orders" => Ok(Self::Orders),
            "users" => Ok(Self::Users),
            _ => Err(()),
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_paths_keep_singular_names() {
        assert_eq!(Collection::Products.remote_path(), "products");
        assert_eq!(Collection::Orders.remote_path(), "order");
        assert_eq!(Collection::Users.remote_path(), "user");
    }

    #[test]
    fn test_try_from_local_key() {
        assert_eq!(Collection::try_from("orders"), Ok(Collection::Orders));
        // 远端路径不是本地键
        assert!(Collection::try_from("order").is_err());
    }

    #[test]
    fn test_serde_uses_local_key() {
        let json = serde_json::to_string(&Collection::Users).unwrap();
        assert_eq!(json, "\"users\"");
    }
}
