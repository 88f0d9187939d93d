// src/catalog.rs

use crate::models::{Product, ProductDraft, seed_products};

/// The ordered in-memory product list.
///
/// Holds and exposes the catalog; supports append, replace-by-id and
/// remove-by-id. Invariant: ids are unique at all times. The store itself has
/// no side effects; re-rendering the table happens at the HTTP layer after
/// every mutation.
#[derive(Debug, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    #[allow(dead_code)]
    pub fn new() -> Self {
        ProductCatalog::default()
    }

    /// A catalog pre-populated with the three seed listings (ids 1..=3).
    pub fn seeded() -> Self {
        ProductCatalog {
            products: seed_products(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// The id the next created product receives: `max(existing) + 1`, or `1`
    /// for an empty catalog.
    pub fn next_id(&self) -> i64 {
        self.products.iter().map(|p| p.id).max().map_or(1, |m| m + 1)
    }

    /// Appends to the end. The caller guarantees a fresh unique id (submit
    /// pairs this with `next_id` under the exclusive editor session).
    pub fn add(&mut self, product: Product) {
        debug_assert!(self.get(product.id).is_none(), "duplicate product id");
        self.products.push(product);
    }

    /// Overwrites name/description/price of the entry matching `id`, leaving
    /// every other entry and the order untouched. A missing id is a no-op,
    /// not an error. Returns whether an entry was replaced.
    pub fn replace_by_id(&mut self, id: i64, draft: &ProductDraft) -> bool {
        match self.products.iter_mut().find(|p| p.id == id) {
            Some(product) => {
                product.name = draft.name.clone();
                product.description = draft.description.clone();
                product.price = draft.price;
                true
            }
            None => false,
        }
    }

    /// Removes the entry matching `id`, preserving the order of the rest. A
    /// missing id is a no-op. Returns whether an entry was removed.
    pub fn remove_by_id(&mut self, id: i64) -> bool {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        self.products.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(name: &str, description: &str, price: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: description.to_string(),
            price,
        }
    }

    #[test]
    fn seeded_catalog_has_three_listings() {
        let catalog = ProductCatalog::seeded();
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.products().iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn next_id_is_one_for_empty_catalog() {
        assert_eq!(ProductCatalog::new().next_id(), 1);
    }

    #[test]
    fn next_id_is_max_plus_one() {
        let mut catalog = ProductCatalog::seeded();
        assert_eq!(catalog.next_id(), 4);

        // The maximum survives removals in the middle of the list.
        catalog.remove_by_id(2);
        assert_eq!(catalog.next_id(), 4);
    }

    #[test]
    fn add_appends_at_the_end() {
        let mut catalog = ProductCatalog::seeded();
        let id = catalog.next_id();
        catalog.add(draft("Autoclave", "Sterilizer unit", 800).into_product(id));

        assert_eq!(catalog.len(), 4);
        let last = catalog.products().last().unwrap();
        assert_eq!(last.id, 4);
        assert_eq!(last.name, "Autoclave");
        assert_eq!(last.price, 800);
    }

    #[test]
    fn replace_by_id_touches_only_the_matching_entry() {
        let mut catalog = ProductCatalog::seeded();
        let replaced = catalog.replace_by_id(2, &draft("Dental Chair", "A used dental chair in good condition.", 1200));

        assert!(replaced);
        assert_eq!(catalog.len(), 3);
        assert_eq!(
            catalog.products().iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        let chair = catalog.get(2).unwrap();
        assert_eq!(chair.price, 1200);
        assert_eq!(chair.name, "Dental Chair");
        assert_eq!(catalog.get(1).unwrap().price, 2500);
        assert_eq!(catalog.get(3).unwrap().price, 500);
    }

    #[test]
    fn replace_by_id_is_idempotent() {
        let mut once = ProductCatalog::seeded();
        once.replace_by_id(2, &draft("Dental Chair", "Refurbished.", 1200));

        let mut twice = ProductCatalog::seeded();
        twice.replace_by_id(2, &draft("Dental Chair", "Refurbished.", 1200));
        twice.replace_by_id(2, &draft("Dental Chair", "Refurbished.", 1200));

        assert_eq!(once.products(), twice.products());
    }

    #[test]
    fn replace_by_id_with_absent_id_is_a_noop() {
        let mut catalog = ProductCatalog::seeded();
        let replaced = catalog.replace_by_id(42, &draft("Ghost", "", 0));

        assert!(!replaced);
        assert_eq!(catalog.products(), ProductCatalog::seeded().products());
    }

    #[test]
    fn remove_by_id_drops_the_entry_and_preserves_order() {
        let mut catalog = ProductCatalog::seeded();
        let removed = catalog.remove_by_id(1);

        assert!(removed);
        assert_eq!(catalog.len(), 2);
        assert!(catalog.get(1).is_none());
        assert_eq!(
            catalog.products().iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![2, 3]
        );
    }

    #[test]
    fn remove_by_id_with_absent_id_is_a_noop() {
        let mut catalog = ProductCatalog::seeded();
        assert!(!catalog.remove_by_id(42));
        assert_eq!(catalog.len(), 3);
    }
}
