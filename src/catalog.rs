//! Built-in query catalog.
//!
//! The predefined queries run as soon as they are picked; the sample
//! snippets only fill the editor.

/// A named query from the predefined catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredefinedQuery {
    pub name: &'static str,
    pub sql: &'static str,
    pub description: &'static str,
}

impl PredefinedQuery {
    /// The `name - description` label used in the picker.
    pub fn label(&self) -> String {
        format!("{} - {}", self.name, self.description)
    }
}

pub const PREDEFINED_QUERIES: [PredefinedQuery; 5] = [
    PredefinedQuery {
        name: "Get All Customers",
        sql: "SELECT * FROM customers",
        description: "Retrieves all customer records",
    },
    PredefinedQuery {
        name: "Get Recent Orders",
        sql: "SELECT * FROM orders ORDER BY order_date DESC LIMIT 10",
        description: "Shows the 10 most recent orders",
    },
    PredefinedQuery {
        name: "Get Products by Category",
        sql: "SELECT product_id, name, category, price FROM products ORDER BY category",
        description: "Lists products grouped by category",
    },
    PredefinedQuery {
        name: "Get Order Details",
        sql: "SELECT o.order_id, c.name, o.order_date, o.total_amount FROM orders o JOIN customers c ON o.customer_id = c.id",
        description: "Shows order details with customer names",
    },
    PredefinedQuery {
        name: "Get Out of Stock Items",
        sql: "SELECT product_id, name, stock FROM products WHERE stock <= 0",
        description: "Lists products that are out of stock",
    },
];

pub const SAMPLE_QUERIES: [&str; 3] = [
    "SELECT * FROM customers",
    "SELECT name, email FROM customers WHERE country = 'USA'",
    "SELECT product, SUM(quantity) FROM orders GROUP BY product",
];

/// Looks up a predefined query by position.
pub fn predefined(index: usize) -> Option<&'static PredefinedQuery> {
    PREDEFINED_QUERIES.get(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{classify, DatasetShape};

    #[test]
    fn test_catalog_shapes() {
        let shapes: Vec<DatasetShape> = PREDEFINED_QUERIES.iter().map(|q| classify(q.sql)).collect();

        // "Order Details" joins customers, and the out-of-stock query names
        // the products table, so neither reaches its "own" shape.
        assert_eq!(
            shapes,
            vec![
                DatasetShape::Customers,
                DatasetShape::Orders,
                DatasetShape::Products,
                DatasetShape::Customers,
                DatasetShape::Products,
            ]
        );
    }

    #[test]
    fn test_label() {
        assert_eq!(
            PREDEFINED_QUERIES[0].label(),
            "Get All Customers - Retrieves all customer records"
        );
    }

    #[test]
    fn test_predefined_out_of_range() {
        assert!(predefined(5).is_none());
        assert_eq!(predefined(1).map(|q| q.name), Some("Get Recent Orders"));
    }
}
