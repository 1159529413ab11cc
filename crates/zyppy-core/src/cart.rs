//! Cart engine.
//!
//! An order-in-progress: an ordered list of menu items with quantities,
//! all from a single restaurant. The engine owns the one business rule the
//! storefront is built around: a cart never mixes restaurants. Adding an
//! item from a different restaurant replaces the whole cart with that item.
//!
//! All mutation goes through the methods here so the invariant cannot be
//! broken from outside; totals are computed on demand and never cached.

use crate::catalog::MenuItem;
use serde::{Deserialize, Serialize};

/// One cart entry: a menu item with the chosen quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Identifier of the menu item this line was created from
    pub food_item_id: String,
    /// Item name, kept for display without refetching the menu
    pub name: String,
    /// Price per unit at the time the item was added
    pub unit_price: f64,
    /// Always at least 1; updates to zero or below remove the line
    pub quantity: u32,
    /// Restaurant the item belongs to
    pub restaurant_id: String,
}

impl CartLine {
    /// Price of this line (`unit_price * quantity`).
    pub fn subtotal(&self) -> f64 {
        self.unit_price * f64::from(self.quantity)
    }
}

/// The order being assembled, unique per client.
///
/// Lines are kept in insertion order and are unique by food item id. The
/// `restaurant_id` reference tracks which restaurant the cart belongs to;
/// it is set by the first add and only changes when the cart switches
/// restaurants or is cleared.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    lines: Vec<CartLine>,
    restaurant_id: Option<String>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// The cart lines, in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The restaurant this cart currently belongs to.
    pub fn restaurant_id(&self) -> Option<&str> {
        self.restaurant_id.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }

    /// Adds a menu item to the cart.
    ///
    /// If the cart already holds items from a different restaurant, it is
    /// atomically replaced: every existing line is dropped and the new item
    /// becomes the only line. Otherwise an existing line for the same item
    /// has its quantity incremented, or a new line is appended.
    ///
    /// `quantity` below 1 is treated as 1 so a line can never violate the
    /// quantity floor.
    pub fn add_item(&mut self, item: &MenuItem, quantity: u32) {
        let quantity = quantity.max(1);
        let switching = self
            .restaurant_id
            .as_deref()
            .is_some_and(|current| current != item.restaurant_id);
        if switching {
            self.lines.clear();
        }
        self.restaurant_id = Some(item.restaurant_id.clone());

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.food_item_id == item.id)
        {
            line.quantity += quantity;
        } else {
            self.lines.push(CartLine {
                food_item_id: item.id.clone(),
                name: item.name.clone(),
                unit_price: item.price,
                quantity,
                restaurant_id: item.restaurant_id.clone(),
            });
        }
    }

    /// Removes the line for `food_item_id`.
    ///
    /// Removing an id that is not in the cart is a no-op.
    pub fn remove_item(&mut self, food_item_id: &str) {
        self.lines.retain(|line| line.food_item_id != food_item_id);
    }

    /// Sets the quantity of an existing line exactly (not additively).
    ///
    /// A quantity of zero or below behaves exactly like
    /// [`remove_item`](Self::remove_item). Unknown ids are ignored.
    pub fn set_quantity(&mut self, food_item_id: &str, quantity: i32) {
        if quantity <= 0 {
            self.remove_item(food_item_id);
            return;
        }
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.food_item_id == food_item_id)
        {
            line.quantity = quantity as u32;
        }
    }

    /// Empties the cart and forgets the restaurant reference.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.restaurant_id = None;
    }

    /// Sum of `unit_price * quantity` over all lines, computed on demand.
    pub fn total(&self) -> f64 {
        self.lines.iter().map(CartLine::subtotal).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, restaurant_id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            restaurant_id: restaurant_id.to_string(),
            name: format!("item-{id}"),
            description: String::new(),
            price,
            category: "Mains".to_string(),
            image_url: String::new(),
            is_vegetarian: false,
            is_available: true,
        }
    }

    fn assert_single_restaurant(cart: &Cart) {
        if let Some(expected) = cart.restaurant_id() {
            assert!(
                cart.lines()
                    .iter()
                    .all(|line| line.restaurant_id == expected),
                "cart mixes restaurants: {cart:?}"
            );
        } else {
            assert!(cart.is_empty());
        }
    }

    #[test]
    fn test_add_first_item_sets_restaurant() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 9.5), 1);

        assert_eq!(cart.restaurant_id(), Some("r1"));
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_add_same_item_increments_quantity() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 4.0), 1);
        cart.add_item(&item("i1", "r1", 4.0), 2);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 3);
        assert_eq!(cart.total(), 12.0);
    }

    #[test]
    fn test_totals_track_each_addition() {
        let mut cart = Cart::new();

        cart.add_item(&item("i1", "r1", 10.0), 1);
        assert_eq!(cart.total(), 10.0);

        cart.add_item(&item("i2", "r1", 5.0), 1);
        cart.add_item(&item("i2", "r1", 5.0), 1);
        assert_eq!(cart.total(), 20.0);
        assert_eq!(cart.lines().len(), 2);
        assert_eq!(cart.lines()[1].quantity, 2);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_switching_restaurant_replaces_cart() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 10.0), 1);
        cart.add_item(&item("i2", "r1", 5.0), 2);

        cart.add_item(&item("x9", "r2", 7.25), 1);

        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.restaurant_id(), Some("r2"));
        assert_eq!(cart.lines()[0].food_item_id, "x9");
        assert_eq!(cart.total(), 7.25);
    }

    #[test]
    fn test_single_restaurant_invariant_across_mixed_sequence() {
        let additions = [
            ("i1", "r1", 3.0),
            ("i2", "r1", 4.0),
            ("j1", "r2", 5.0),
            ("j1", "r2", 5.0),
            ("k1", "r3", 6.0),
            ("j2", "r2", 2.0),
            ("j3", "r2", 1.0),
        ];

        let mut cart = Cart::new();
        for (id, restaurant_id, price) in additions {
            cart.add_item(&item(id, restaurant_id, price), 1);
            assert_single_restaurant(&cart);
        }

        assert_eq!(cart.restaurant_id(), Some("r2"));
        assert_eq!(cart.lines().len(), 3);
    }

    #[test]
    fn test_remove_item_is_idempotent() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 3.0), 1);
        cart.add_item(&item("i2", "r1", 4.0), 1);

        cart.remove_item("i1");
        assert_eq!(cart.lines().len(), 1);

        let before = cart.clone();
        cart.remove_item("i1");
        cart.remove_item("never-added");
        assert_eq!(cart, before);
    }

    #[test]
    fn test_set_quantity_is_exact_not_additive() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 2.0), 3);

        cart.set_quantity("i1", 5);

        assert_eq!(cart.lines()[0].quantity, 5);
        assert_eq!(cart.total(), 10.0);
    }

    #[test]
    fn test_set_quantity_at_or_below_zero_removes_the_line() {
        for q in [0, -1, -5] {
            let mut cart = Cart::new();
            cart.add_item(&item("i1", "r1", 2.0), 2);
            cart.add_item(&item("i2", "r1", 3.0), 1);

            cart.set_quantity("i1", q);

            let mut expected = Cart::new();
            expected.add_item(&item("i1", "r1", 2.0), 2);
            expected.add_item(&item("i2", "r1", 3.0), 1);
            expected.remove_item("i1");
            assert_eq!(cart, expected, "set_quantity({q}) must equal removal");
        }
    }

    #[test]
    fn test_set_quantity_ignores_unknown_ids() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 2.0), 2);

        let before = cart.clone();
        cart.set_quantity("ghost", 4);
        assert_eq!(cart, before);
    }

    #[test]
    fn test_add_item_quantity_floor() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 2.0), 0);

        assert_eq!(cart.lines()[0].quantity, 1);
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = Cart::new();
        cart.add_item(&item("i1", "r1", 2.0), 2);

        cart.clear();

        assert!(cart.is_empty());
        assert_eq!(cart.restaurant_id(), None);
        assert_eq!(cart.total(), 0.0);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        assert_eq!(Cart::new().total(), 0.0);
    }
}
