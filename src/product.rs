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

//! Sellable products and the catalog they are loaded into.

use crate::{Price, VendingError};
use std::fmt;

/// A sellable item.
///
/// Two products are the same product when both name and price match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Product {
    name: String,
    price: Price,
}

impl Product {
    /// # Errors
    ///
    /// - [`VendingError::EmptyProductName`] - `name` is empty or whitespace.
    /// - [`VendingError::NonPositivePrice`] - `price` is zero.
    pub fn new(name: impl Into<String>, price: Price) -> Result<Self, VendingError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(VendingError::EmptyProductName);
        }
        if price.is_zero() {
            return Err(VendingError::NonPositivePrice);
        }
        Ok(Self { name, price })
    }

    /// The "nothing selected" sentinel. Never equal to a real product.
    pub fn empty() -> Self {
        Self {
            name: String::new(),
            price: Price::ZERO,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_empty() && self.price.is_zero()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Price {
        self.price
    }
}

impl Default for Product {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Display for Product {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.name, self.price)
    }
}

/// Ordered list of the products a machine offers.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a product, replacing any earlier entry with the same name.
    pub fn insert(&mut self, product: Product) {
        match self
            .products
            .iter_mut()
            .find(|existing| existing.name.eq_ignore_ascii_case(&product.name))
        {
            Some(existing) => *existing = product,
            None => self.products.push(product),
        }
    }

    /// Looks a product up by name, ignoring ASCII case.
    pub fn find(&self, name: &str) -> Option<&Product> {
        let name = name.trim();
        self.products
            .iter()
            .find(|product| product.name.eq_ignore_ascii_case(name))
    }

    pub fn products(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}
