//! Seed data: compiled-in JSON or an override directory.

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::info;

use crate::errors::StoreError;
use crate::record::{NewFaq, Order, Product};

const FAQS_JSON: &str = include_str!("../data/faqs.json");
const PRODUCTS_JSON: &str = include_str!("../data/products.json");
const ORDERS_JSON: &str = include_str!("../data/orders.json");

#[derive(Clone, Debug, Default)]
pub struct SeedData {
    pub faqs: Vec<NewFaq>,
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
}

impl SeedData {
    /// The data shipped with the crate.
    pub fn builtin() -> Result<Self, StoreError> {
        Ok(Self {
            faqs: parse("faqs.json", FAQS_JSON)?,
            products: parse("products.json", PRODUCTS_JSON)?,
            orders: parse("orders.json", ORDERS_JSON)?,
        })
    }

    /// Reads `faqs.json`, `products.json` and `orders.json` from `dir`.
    /// A missing file falls back to the built-in copy.
    pub fn from_dir(dir: &Path) -> Result<Self, StoreError> {
        let builtin = Self::builtin()?;
        Ok(Self {
            faqs: read_or(dir, "faqs.json", builtin.faqs)?,
            products: read_or(dir, "products.json", builtin.products)?,
            orders: read_or(dir, "orders.json", builtin.orders)?,
        })
    }

    /// `SEED_DATA_DIR` when set, otherwise the built-in data.
    pub fn from_env() -> Result<Self, StoreError> {
        match std::env::var("SEED_DATA_DIR") {
            Ok(dir) if !dir.trim().is_empty() => Self::from_dir(Path::new(dir.trim())),
            _ => Self::builtin(),
        }
    }
}

fn parse<T: DeserializeOwned>(file: &str, raw: &str) -> Result<Vec<T>, StoreError> {
    serde_json::from_str(raw).map_err(|source| StoreError::Parse {
        file: file.to_string(),
        source,
    })
}

fn read_or<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    fallback: Vec<T>,
) -> Result<Vec<T>, StoreError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(fallback);
    }
    let raw = std::fs::read_to_string(&path)?;
    let items = parse(&path.display().to_string(), &raw)?;
    info!(file = %path.display(), count = items.len(), "seed file loaded");
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::OrderStatus;

    #[test]
    fn builtin_parses() {
        let seed = SeedData::builtin().unwrap();
        assert_eq!(seed.faqs.len(), 15);
        assert_eq!(seed.products.len(), 9);
        assert_eq!(seed.orders.len(), 5);
        assert!(seed.faqs.iter().all(|f| !f.keywords.is_empty()));
        assert_eq!(seed.products.iter().filter(|p| p.is_featured()).count(), 3);
        let shipped = seed
            .orders
            .iter()
            .find(|o| o.order_number == "NK123456")
            .unwrap();
        assert_eq!(shipped.status, OrderStatus::Shipped);
    }

    #[test]
    fn bad_json_names_the_file() {
        let err = parse::<Product>("products.json", "{").unwrap_err();
        assert!(err.to_string().contains("products.json"));
    }

    #[test]
    fn missing_dir_files_fall_back() {
        let dir = std::env::temp_dir().join("support-store-seed-empty");
        let seed = SeedData::from_dir(&dir).unwrap();
        assert_eq!(seed.faqs.len(), 15);
    }
}
