//! In-memory product catalog guarded by a single reader/writer lock.
//!
//! Readers (listing, add-to-cart stock checks) share the lock. Checkout takes
//! the write lock for its whole validate + decrement pass, so two checkouts
//! never interleave and no reader sees a half-applied reservation.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use thiserror::Error;

use storefront_core::{DomainError, DomainResult, Entity, ProductId};

use crate::product::Product;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product not found: {0}")]
    UnknownProduct(ProductId),

    #[error("not enough stock for {product_id} (requested {requested}, available {available})")]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    #[error("catalog lock poisoned")]
    LockPoisoned,
}

#[derive(Debug, Default)]
pub struct Catalog {
    products: RwLock<BTreeMap<ProductId, Product>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a catalog. Duplicate product ids are rejected.
    pub fn with_products(products: impl IntoIterator<Item = Product>) -> DomainResult<Self> {
        let mut map = BTreeMap::new();
        for product in products {
            let id = product.id().clone();
            if map.insert(id.clone(), product).is_some() {
                return Err(DomainError::validation(format!("duplicate product id '{id}'")));
            }
        }
        Ok(Self {
            products: RwLock::new(map),
        })
    }

    /// Insert or replace a product, returning the previous record.
    pub fn insert(&self, product: Product) -> CatalogResult<Option<Product>> {
        let mut guard = self.write()?;
        Ok(guard.products.insert(product.id().clone(), product))
    }

    pub fn remove(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        let mut guard = self.write()?;
        Ok(guard.products.remove(id))
    }

    /// Snapshot of a single product.
    pub fn get(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.read()?.get(id).cloned())
    }

    /// Snapshot of every product, ordered by id.
    pub fn list(&self) -> CatalogResult<Vec<Product>> {
        Ok(self.read()?.products.values().cloned().collect())
    }

    pub fn read(&self) -> CatalogResult<CatalogReadGuard<'_>> {
        let products = self.products.read().map_err(|_| CatalogError::LockPoisoned)?;
        Ok(CatalogReadGuard { products })
    }

    pub fn write(&self) -> CatalogResult<CatalogWriteGuard<'_>> {
        let products = self
            .products
            .write()
            .map_err(|_| CatalogError::LockPoisoned)?;
        Ok(CatalogWriteGuard { products })
    }
}

/// Shared view of the catalog.
pub struct CatalogReadGuard<'a> {
    products: RwLockReadGuard<'a, BTreeMap<ProductId, Product>>,
}

impl CatalogReadGuard<'_> {
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }
}

/// Exclusive view of the catalog.
pub struct CatalogWriteGuard<'a> {
    products: RwLockWriteGuard<'a, BTreeMap<ProductId, Product>>,
}

impl CatalogWriteGuard<'_> {
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.get(id)
    }

    /// Reserve stock for every `(product, quantity)` request, all or nothing.
    ///
    /// Requests for the same product are summed before checking, so the total
    /// taken from a product never exceeds what it held. Products are checked in
    /// the order they first appear and the first failure is returned. On error
    /// no stock has been touched.
    pub fn reserve<'r>(
        &mut self,
        requests: impl IntoIterator<Item = (&'r ProductId, u32)>,
    ) -> CatalogResult<()> {
        // First-appearance order, so errors name the earliest failing line.
        let mut wanted: Vec<(&ProductId, u32)> = Vec::new();
        for (id, quantity) in requests {
            match wanted.iter_mut().find(|(seen, _)| *seen == id) {
                Some((_, total)) => *total = total.saturating_add(quantity),
                None => wanted.push((id, quantity)),
            }
        }

        for &(id, requested) in &wanted {
            let product = self
                .products
                .get(id)
                .ok_or_else(|| CatalogError::UnknownProduct(id.clone()))?;
            if !product.has_stock_for(requested) {
                return Err(CatalogError::InsufficientStock {
                    product_id: id.clone(),
                    requested,
                    available: product.quantity(),
                });
            }
        }

        for (id, requested) in wanted {
            if let Some(product) = self.products.get_mut(id) {
                let taken = product.take_stock(requested);
                debug_assert!(taken, "stock validated under the same write lock");
                tracing::debug!(
                    product_id = %id,
                    reserved = requested,
                    remaining = product.quantity(),
                    "stock reserved"
                );
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::str::FromStr;
    use storefront_core::Money;

    fn product(id: &str, quantity: u32) -> Product {
        Product::new(
            ProductId::from(id),
            id.to_uppercase(),
            id,
            Money::from_str("10.00").unwrap(),
            quantity,
        )
        .unwrap()
    }

    fn stock(catalog: &Catalog, id: &str) -> u32 {
        catalog
            .get(&ProductId::from(id))
            .unwrap()
            .map(|p| p.quantity())
            .unwrap()
    }

    #[test]
    fn duplicate_ids_are_rejected_when_seeding() {
        let err = Catalog::with_products([product("a", 1), product("a", 2)]).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("duplicate")));
    }

    #[test]
    fn list_is_ordered_by_id() {
        let catalog =
            Catalog::with_products([product("c", 1), product("a", 1), product("b", 1)]).unwrap();
        let ids: Vec<_> = catalog
            .list()
            .unwrap()
            .into_iter()
            .map(|p| p.id().to_string())
            .collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[test]
    fn reserve_decrements_every_requested_product() {
        let catalog = Catalog::with_products([product("a", 5), product("b", 2)]).unwrap();
        let a = ProductId::from("a");
        let b = ProductId::from("b");

        catalog
            .write()
            .unwrap()
            .reserve([(&a, 3), (&b, 2)])
            .unwrap();

        assert_eq!(stock(&catalog, "a"), 2);
        assert_eq!(stock(&catalog, "b"), 0);
    }

    #[test]
    fn failed_reservation_leaves_all_stock_untouched() {
        let catalog = Catalog::with_products([product("a", 5), product("b", 1)]).unwrap();
        let a = ProductId::from("a");
        let b = ProductId::from("b");

        let err = catalog
            .write()
            .unwrap()
            .reserve([(&a, 3), (&b, 2)])
            .unwrap_err();

        assert_eq!(
            err,
            CatalogError::InsufficientStock {
                product_id: b,
                requested: 2,
                available: 1,
            }
        );
        assert_eq!(stock(&catalog, "a"), 5);
        assert_eq!(stock(&catalog, "b"), 1);
    }

    #[test]
    fn unknown_product_aborts_reservation() {
        let catalog = Catalog::with_products([product("a", 5)]).unwrap();
        let a = ProductId::from("a");
        let ghost = ProductId::from("ghost");

        let err = catalog
            .write()
            .unwrap()
            .reserve([(&a, 1), (&ghost, 1)])
            .unwrap_err();

        assert_eq!(err, CatalogError::UnknownProduct(ghost));
        assert_eq!(stock(&catalog, "a"), 5);
    }

    #[test]
    fn first_failing_request_is_reported_in_request_order() {
        let catalog = Catalog::with_products([product("a", 4)]).unwrap();
        let a = ProductId::from("a");
        let zeta = ProductId::from("zeta");

        let err = catalog
            .write()
            .unwrap()
            .reserve([(&zeta, 1), (&a, 5)])
            .unwrap_err();

        assert_eq!(err, CatalogError::UnknownProduct(zeta));
        assert_eq!(stock(&catalog, "a"), 4);
    }

    #[test]
    fn repeated_requests_for_one_product_are_summed() {
        let catalog = Catalog::with_products([product("a", 4)]).unwrap();
        let a = ProductId::from("a");

        let err = catalog
            .write()
            .unwrap()
            .reserve([(&a, 3), (&a, 2)])
            .unwrap_err();
        assert!(matches!(
            err,
            CatalogError::InsufficientStock { requested: 5, available: 4, .. }
        ));
        assert_eq!(stock(&catalog, "a"), 4);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: reservation either takes exactly the requested units or
            /// nothing, and stock never underflows.
            #[test]
            fn reservation_is_all_or_nothing(
                initial in prop::collection::vec(0u32..20, 1..6),
                requests in prop::collection::vec((0usize..6, 1u32..10), 0..10)
            ) {
                let ids: Vec<String> = (0..initial.len()).map(|i| format!("p{i}")).collect();
                let catalog = Catalog::with_products(
                    ids.iter().zip(&initial).map(|(id, qty)| product(id, *qty)),
                ).unwrap();

                let requests: Vec<(ProductId, u32)> = requests
                    .into_iter()
                    .map(|(idx, qty)| (ProductId::from(format!("p{idx}").as_str()), qty))
                    .collect();

                let mut wanted = vec![0u32; 6];
                for (id, qty) in &requests {
                    let idx: usize = id.as_str()[1..].parse().unwrap();
                    wanted[idx] += qty;
                }
                let feasible = (0..6).all(|i| {
                    wanted[i] == 0 || initial.get(i).is_some_and(|stock| *stock >= wanted[i])
                });

                let result = catalog
                    .write()
                    .unwrap()
                    .reserve(requests.iter().map(|(id, qty)| (id, *qty)));

                prop_assert_eq!(result.is_ok(), feasible);
                for (i, id) in ids.iter().enumerate() {
                    let expected = if feasible { initial[i] - wanted[i] } else { initial[i] };
                    prop_assert_eq!(stock(&catalog, id), expected);
                }
            }
        }
    }
}
