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

//! Machine configuration loaded from TOML.
//!
//! ```toml
//! [[coins]]
//! label = "Quarter"
//! monetary_value = "0.25"
//! weight_grams = "5.670"
//! diameter_mm = "24.26"
//! tolerance = "0.025"
//!
//! [[products]]
//! name = "Cola"
//! price = "1.00"
//! initial_quantity = 5
//! ```

use crate::{
    Catalog, CoinSpecification, CoinValidator, Inventory, Price, Product, ProductInventory,
    StateFactory, VendingError, VendingMachine,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Configuration shipped with the binary.
pub const DEFAULT_CONFIG: &str = include_str!("../machine.toml");

/// Contents of a machine configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct MachineConfig {
    /// Accepted coins, in matching order.
    #[serde(default)]
    pub coins: Vec<CoinConfig>,
    #[serde(default)]
    pub products: Vec<ProductConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CoinConfig {
    pub label: String,
    pub monetary_value: Decimal,
    pub weight_grams: Decimal,
    pub diameter_mm: Decimal,
    #[serde(default = "default_tolerance")]
    pub tolerance: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductConfig {
    pub name: String,
    pub price: Decimal,
    pub initial_quantity: i32,
}

fn default_tolerance() -> Decimal {
    dec!(0.001)
}

/// Reads and parses a configuration file.
///
/// # Errors
///
/// Returns [`VendingError::Config`] if the file cannot be read or is not
/// valid TOML for [`MachineConfig`].
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<MachineConfig, VendingError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path).map_err(|e| {
        VendingError::Config(format!("failed to read {}: {e}", path.display()))
    })?;
    parse_config(&contents)
}

/// Parses configuration from a TOML string.
///
/// # Errors
///
/// Returns [`VendingError::Config`] on invalid TOML or missing fields.
pub fn parse_config(contents: &str) -> Result<MachineConfig, VendingError> {
    toml::from_str(contents).map_err(|e| VendingError::Config(format!("failed to parse: {e}")))
}

impl MachineConfig {
    /// The embedded default configuration.
    ///
    /// # Errors
    ///
    /// Only fails if the embedded file is broken.
    pub fn default_config() -> Result<Self, VendingError> {
        parse_config(DEFAULT_CONFIG)
    }

    /// Builds the coin specifications in file order.
    ///
    /// # Errors
    ///
    /// Propagates [`VendingError::NegativePrice`] and
    /// [`VendingError::NegativeTolerance`].
    pub fn coin_specifications(&self) -> Result<Vec<CoinSpecification>, VendingError> {
        self.coins
            .iter()
            .map(|coin| {
                CoinSpecification::new(
                    coin.label.clone(),
                    Price::new(coin.monetary_value)?,
                    coin.weight_grams,
                    coin.diameter_mm,
                    coin.tolerance,
                )
            })
            .collect()
    }

    /// Stocks `inventory` with the configured products and returns them as
    /// a catalog.
    ///
    /// # Errors
    ///
    /// Fails on an invalid product or a negative initial quantity.
    pub fn stock(&self, inventory: &dyn Inventory) -> Result<Catalog, VendingError> {
        let mut catalog = Catalog::new();
        for entry in &self.products {
            let product = Product::new(entry.name.clone(), Price::new(entry.price)?)?;
            inventory.add_product(&product, entry.initial_quantity)?;
            info!(
                product = product.name(),
                price = %product.price(),
                quantity = entry.initial_quantity,
                "stocked"
            );
            catalog.insert(product);
        }
        Ok(catalog)
    }

    /// Builds a ready-to-use machine with its own stocked inventory.
    ///
    /// # Errors
    ///
    /// - [`VendingError::NoCoinSpecifications`] - no `[[coins]]` entries.
    /// - Any error from [`MachineConfig::coin_specifications`] or
    ///   [`MachineConfig::stock`].
    pub fn build(&self) -> Result<(VendingMachine, Catalog), VendingError> {
        let validator = CoinValidator::new(self.coin_specifications()?)?;
        let inventory = Arc::new(ProductInventory::new());
        let catalog = self.stock(inventory.as_ref())?;
        let factory = StateFactory::new(Arc::new(validator), inventory);
        Ok((VendingMachine::new(factory), catalog))
    }
}
