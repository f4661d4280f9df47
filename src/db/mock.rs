//! Mock query backend.
//!
//! Nothing is parsed or validated. The lowercased query text is sniffed for
//! keywords to pick one of five dataset shapes, and a fresh dataset of that
//! shape is synthesized on every call.

use super::{QueryBackend, QueryResult, Row, Value};
use crate::error::Result;
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;
use tracing::debug;

/// Rows produced by every randomized shape.
pub const MOCK_ROW_COUNT: usize = 25;

const COUNTRIES: [&str; 5] = ["USA", "Canada", "UK", "Australia", "Germany"];

const PRODUCTS: [&str; 7] = [
    "Laptop",
    "Phone",
    "Tablet",
    "Monitor",
    "Keyboard",
    "Mouse",
    "Headphones",
];

const PRICES: [f64; 7] = [999.99, 699.99, 349.99, 249.99, 49.99, 29.99, 99.99];

const CATEGORIES: [&str; 5] = ["Electronics", "Accessories", "Furniture", "Clothing", "Food"];

const OUT_OF_STOCK: [(i64, &str); 3] = [
    (17, "Alice Mutton"),
    (29, "Thüringer Rostbratwurst"),
    (53, "Perth Pasties"),
];

/// The dataset shape a query is answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetShape {
    Customers,
    Orders,
    Products,
    OutOfStock,
    Generic,
}

impl DatasetShape {
    /// Column names for this shape, in display order.
    pub fn columns(self) -> &'static [&'static str] {
        match self {
            Self::Customers => &["id", "name", "email", "country", "subscription_date"],
            Self::Orders => &[
                "order_id",
                "customer_id",
                "product",
                "quantity",
                "price",
                "order_date",
            ],
            Self::Products => &["product_id", "name", "category", "price", "stock"],
            Self::OutOfStock => &["product_id", "name", "stock"],
            Self::Generic => &["id", "name", "value", "created_at"],
        }
    }
}

/// Picks the dataset shape for a query.
///
/// Checks run in order and the first match wins, so a query mentioning both
/// customers and orders is answered with customers.
pub fn classify(query: &str) -> DatasetShape {
    let q = query.to_lowercase();
    let select = q.contains("select");

    if select && q.contains("customers") {
        DatasetShape::Customers
    } else if select && (q.contains("orders") || q.contains("order_date")) {
        DatasetShape::Orders
    } else if select && (q.contains("products") || q.contains("category")) {
        DatasetShape::Products
    } else if select && q.contains("out of stock") {
        DatasetShape::OutOfStock
    } else {
        DatasetShape::Generic
    }
}

/// Produces a mock result for any query text. Never fails.
pub fn generate_result<R: Rng + ?Sized>(query: &str, rng: &mut R) -> QueryResult {
    let shape = classify(query);
    debug!("Mock dataset for query: {:?}", shape);

    let rows: Vec<Row> = match shape {
        DatasetShape::Customers => (1..=MOCK_ROW_COUNT as i64)
            .map(|n| {
                build_row(
                    shape,
                    vec![
                        Value::Int(n),
                        Value::Text(format!("Customer {n}")),
                        Value::Text(format!("customer{n}@example.com")),
                        Value::from(pick(rng, &COUNTRIES)),
                        Value::Text(random_date_2023(rng)),
                    ],
                )
            })
            .collect(),
        DatasetShape::Orders => (0..MOCK_ROW_COUNT as i64)
            .map(|i| {
                // product and price are drawn independently
                let product = pick(rng, &PRODUCTS);
                let quantity = rng.gen_range(1..=5);
                let price = PRICES[rng.gen_range(0..PRICES.len())];
                let customer_id = rng.gen_range(1..=10);
                build_row(
                    shape,
                    vec![
                        Value::Int(1001 + i),
                        Value::Int(customer_id),
                        Value::from(product),
                        Value::Int(quantity),
                        Value::Float(price),
                        Value::Text(random_date_2023(rng)),
                    ],
                )
            })
            .collect(),
        DatasetShape::Products => (1..=MOCK_ROW_COUNT as i64)
            .map(|n| {
                build_row(
                    shape,
                    vec![
                        Value::Int(n),
                        Value::Text(format!("Product {n}")),
                        Value::from(pick(rng, &CATEGORIES)),
                        Value::Text(format!("{:.2}", rng.gen_range(10.0..1010.0))),
                        Value::Int(rng.gen_range(0..100)),
                    ],
                )
            })
            .collect(),
        DatasetShape::OutOfStock => OUT_OF_STOCK
            .iter()
            .map(|&(id, name)| build_row(shape, vec![Value::Int(id), Value::from(name), Value::Int(0)]))
            .collect(),
        DatasetShape::Generic => (1..=MOCK_ROW_COUNT as i64)
            .map(|n| {
                build_row(
                    shape,
                    vec![
                        Value::Int(n),
                        Value::Text(format!("Item {n}")),
                        Value::Int(n * 100),
                        Value::Text(format!("2023-01-{n:02}")),
                    ],
                )
            })
            .collect(),
    };

    let columns = shape.columns().iter().map(|c| c.to_string()).collect();
    QueryResult::with_data(columns, rows)
}

fn build_row(shape: DatasetShape, values: Vec<Value>) -> Row {
    shape
        .columns()
        .iter()
        .map(|c| c.to_string())
        .zip(values)
        .collect()
}

fn pick<R: Rng + ?Sized>(rng: &mut R, items: &[&'static str]) -> &'static str {
    items[rng.gen_range(0..items.len())]
}

/// A `2023-MM-DD` date with the day capped at 28.
fn random_date_2023<R: Rng + ?Sized>(rng: &mut R) -> String {
    let month = rng.gen_range(1..=12);
    let day = rng.gen_range(1..=28);
    format!("2023-{month:02}-{day:02}")
}

/// Query backend that answers every query from the mock generator.
pub struct MockBackend {
    rng: Mutex<StdRng>,
}

impl MockBackend {
    /// Creates a backend seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a backend whose output is reproducible for a given seed.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QueryBackend for MockBackend {
    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        // A poisoned lock only means another caller panicked mid-generation;
        // the rng state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        Ok(generate_result(sql, &mut *rng))
    }
}
