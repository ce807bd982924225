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

//! Error types for the vending machine.
//!
//! Only precondition and domain-rule violations are errors. Invalid coins,
//! out-of-stock selections and insufficient balance are ordinary outcomes
//! reported through the machine's message log.

use thiserror::Error;

/// Vending machine errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendingError {
    /// Coin weight is zero or negative
    #[error("coin weight must be greater than zero")]
    InvalidCoinWeight,

    /// Coin diameter is zero or negative
    #[error("coin diameter must be greater than zero")]
    InvalidCoinDiameter,

    /// Specification tolerance is negative
    #[error("coin tolerance cannot be negative")]
    NegativeTolerance,

    /// Validator was built without any specification
    #[error("coin specifications cannot be empty")]
    NoCoinSpecifications,

    /// Monetary amount is negative
    #[error("price cannot be negative")]
    NegativePrice,

    /// Subtraction would produce a negative amount
    #[error("cannot subtract a larger price from a smaller one")]
    PriceUnderflow,

    /// Addition exceeds the representable range
    #[error("price is too large to represent")]
    PriceOverflow,

    /// Nominal value plus or minus tolerance exceeds the representable range
    #[error("coin tolerance window is too large to represent")]
    ToleranceOverflow,

    /// Product name is empty
    #[error("product name cannot be empty")]
    EmptyProductName,

    /// Product price is zero
    #[error("product price must be greater than zero")]
    NonPositivePrice,

    /// Inventory quantity is negative
    #[error("quantity must be non-negative")]
    NegativeQuantity,

    /// Product has no remaining stock, or was never stocked
    #[error("product {0} is not available or out of stock")]
    OutOfStock(String),

    /// Configuration could not be read or parsed
    #[error("configuration error: {0}")]
    Config(String),
}
