use serde::{Deserialize, Serialize};

use super::Product;

/// One cart or order line: a product snapshot and a quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub product: Product,
    pub qty: i32,
}

impl CartItem {
    pub fn line_total(&self) -> f64 {
        f64::from(self.qty) * self.product.price
    }
}

/// Customer cart. Holds at most one line per product id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let mut cart = Self::default();
        for item in items {
            cart.add(item.product, item.qty);
        }
        cart
    }

    /// Adds `qty` to the product's line, appending a line when absent.
    ///
    /// The quantity is not validated; a negative `qty` can drive the line negative.
    /// Merged quantities saturate at the `i32` bounds.
    pub fn add(&mut self, product: Product, qty: i32) {
        match self.items.iter_mut().find(|i| i.product.id == product.id) {
            Some(existing) => existing.qty = existing.qty.saturating_add(qty),
            None => self.items.push(CartItem { product, qty }),
        }
    }

    /// Sets the line quantity; a resulting quantity of zero or less removes the line.
    pub fn set_qty(&mut self, product_id: &str, qty: i32) {
        for item in self.items.iter_mut().filter(|i| i.product.id == product_id) {
            item.qty = qty;
        }
        self.items.retain(|i| i.qty > 0);
    }

    pub fn remove(&mut self, product_id: &str) {
        self.items.retain(|i| i.product.id != product_id);
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Empties the cart and returns its lines.
    pub fn take(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    pub fn count(&self) -> i64 {
        self.items.iter().map(|i| i64::from(i.qty)).sum()
    }

    pub fn total(&self) -> f64 {
        lines_total(&self.items)
    }
}

pub fn lines_total(items: &[CartItem]) -> f64 {
    items.iter().map(CartItem::line_total).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn burger() -> Product {
        Product::new("p1", "Burger", 10.0)
    }

    #[test]
    fn test_adding_same_product_merges_lines() {
        let mut cart = Cart::default();
        cart.add(burger(), 2);
        cart.add(burger(), 3);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.items()[0].qty, 5);
        assert_eq!(cart.count(), 5);
        assert_eq!(cart.total(), 50.0);

        cart.set_qty("p1", 0);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_qty_on_unknown_product_is_noop() {
        let mut cart = Cart::default();
        cart.add(burger(), 1);
        cart.set_qty("nope", 4);
        assert_eq!(cart.items()[0].qty, 1);
    }

    #[test]
    fn test_remove_and_take() {
        let mut cart = Cart::default();
        cart.add(burger(), 1);
        cart.add(Product::new("p2", "Soda", 2.5), 2);
        cart.remove("p1");
        assert_eq!(cart.total(), 5.0);

        let lines = cart.take();
        assert_eq!(lines.len(), 1);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_from_items_merges_duplicates() {
        let line = CartItem { product: burger(), qty: 1 };
        let cart = Cart::from_items(vec![line.clone(), line]);
        assert_eq!(cart.items().len(), 1);
        assert_eq!(cart.count(), 2);
    }

    #[test]
    fn test_merged_quantity_saturates() {
        let mut cart = Cart::default();
        cart.add(burger(), i32::MAX);
        cart.add(burger(), 1);
        assert_eq!(cart.items()[0].qty, i32::MAX);

        cart.add(Product::new("p2", "Soda", 2.5), i32::MIN);
        cart.add(Product::new("p2", "Soda", 2.5), -1);
        assert_eq!(cart.items()[1].qty, i32::MIN);

        let line = CartItem { product: burger(), qty: i32::MAX };
        let restored = Cart::from_items(vec![line.clone(), line]);
        assert_eq!(restored.items()[0].qty, i32::MAX);
    }
}
