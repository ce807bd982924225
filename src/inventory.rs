// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2025 Daniel Negri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Product stock bookkeeping.
//!
//! # Thread Safety
//!
//! [`ProductInventory`] uses [`DashMap`] so a single inventory can be shared
//! by several machines behind an `Arc`. Each deduction is an atomic
//! check-and-decrement on the product's entry, so two machines can never
//! both take the last unit.

use crate::{Product, VendingError};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

/// Quantity ledger consulted by the machine's states.
pub trait Inventory: Send + Sync {
    /// Adds `quantity` units; repeated adds accumulate.
    ///
    /// # Errors
    ///
    /// Returns [`VendingError::NegativeQuantity`] if `quantity < 0`.
    fn add_product(&self, product: &Product, quantity: i32) -> Result<(), VendingError>;

    /// Removes one unit.
    ///
    /// # Errors
    ///
    /// Returns [`VendingError::OutOfStock`] if the product is unknown or has
    /// no units left.
    fn deduct_product(&self, product: &Product) -> Result<(), VendingError>;

    /// True when at least one unit remains.
    fn is_available(&self, product: &Product) -> bool;

    /// Remaining units, zero for unknown products.
    fn quantity(&self, product: &Product) -> u32;
}

/// In-memory [`Inventory`].
#[derive(Debug, Default)]
pub struct ProductInventory {
    stock: DashMap<Product, u32>,
}

impl ProductInventory {
    pub fn new() -> Self {
        Self {
            stock: DashMap::new(),
        }
    }
}

impl Inventory for ProductInventory {
    fn add_product(&self, product: &Product, quantity: i32) -> Result<(), VendingError> {
        let quantity = u32::try_from(quantity).map_err(|_| VendingError::NegativeQuantity)?;
        *self.stock.entry(product.clone()).or_insert(0) += quantity;
        Ok(())
    }

    fn deduct_product(&self, product: &Product) -> Result<(), VendingError> {
        match self.stock.entry(product.clone()) {
            Entry::Occupied(mut entry) if *entry.get() > 0 => {
                *entry.get_mut() -= 1;
                Ok(())
            }
            _ => Err(VendingError::OutOfStock(product.name().to_owned())),
        }
    }

    fn is_available(&self, product: &Product) -> bool {
        self.quantity(product) > 0
    }

    fn quantity(&self, product: &Product) -> u32 {
        self.stock.get(product).map(|entry| *entry).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Price;
    use rust_decimal_macros::dec;

    fn cola() -> Product {
        Product::new("Cola", Price::new(dec!(1.00)).unwrap()).unwrap()
    }

    #[test]
    fn add_product_makes_it_available() {
        let inventory = ProductInventory::new();
        inventory.add_product(&cola(), 5).unwrap();
        assert!(inventory.is_available(&cola()));
        assert_eq!(inventory.quantity(&cola()), 5);
    }

    #[test]
    fn add_product_accumulates() {
        let inventory = ProductInventory::new();
        inventory.add_product(&cola(), 2).unwrap();
        inventory.add_product(&cola(), 3).unwrap();
        assert_eq!(inventory.quantity(&cola()), 5);
    }

    #[test]
    fn add_zero_quantity_is_not_available() {
        let inventory = ProductInventory::new();
        inventory.add_product(&cola(), 0).unwrap();
        assert!(!inventory.is_available(&cola()));
    }

    #[test]
    fn add_negative_quantity_fails() {
        let inventory = ProductInventory::new();
        assert_eq!(
            inventory.add_product(&cola(), -1),
            Err(VendingError::NegativeQuantity)
        );
        assert_eq!(inventory.quantity(&cola()), 0);
    }

    #[test]
    fn deduct_decrements_by_one() {
        let inventory = ProductInventory::new();
        inventory.add_product(&cola(), 2).unwrap();
        inventory.deduct_product(&cola()).unwrap();
        assert_eq!(inventory.quantity(&cola()), 1);
    }

    #[test]
    fn deduct_last_unit_then_fails() {
        let inventory = ProductInventory::new();
        inventory.add_product(&cola(), 1).unwrap();
        inventory.deduct_product(&cola()).unwrap();
        assert!(!inventory.is_available(&cola()));
        assert_eq!(
            inventory.deduct_product(&cola()),
            Err(VendingError::OutOfStock("Cola".into()))
        );
    }

    #[test]
    fn deduct_unknown_product_fails() {
        let inventory = ProductInventory::new();
        assert_eq!(
            inventory.deduct_product(&cola()),
            Err(VendingError::OutOfStock("Cola".into()))
        );
    }

    #[test]
    fn same_name_different_price_is_a_different_product() {
        let inventory = ProductInventory::new();
        inventory.add_product(&cola(), 1).unwrap();
        let discounted = Product::new("Cola", Price::new(dec!(0.75)).unwrap()).unwrap();
        assert!(!inventory.is_available(&discounted));
    }
}
