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

//! Non-negative monetary amounts.

use crate::VendingError;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

/// A non-negative fixed-point monetary amount.
///
/// Used for product prices, coin values and the running balance. There is no
/// implicit conversion from [`Decimal`]; go through [`Price::new`] so the
/// non-negative rule is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Price(Decimal);

impl Price {
    pub const ZERO: Price = Price(Decimal::ZERO);

    /// Fraction digits shown when formatting as currency.
    const DISPLAY_PRECISION: u32 = 2;

    pub fn new(amount: Decimal) -> Result<Self, VendingError> {
        if amount < Decimal::ZERO {
            return Err(VendingError::NegativePrice);
        }
        Ok(Self(amount))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Subtracts `other`, refusing to go below zero.
    ///
    /// # Errors
    ///
    /// Returns [`VendingError::PriceUnderflow`] if `other` is larger than `self`.
    pub fn checked_sub(self, other: Price) -> Result<Price, VendingError> {
        if self.0 < other.0 {
            return Err(VendingError::PriceUnderflow);
        }
        Ok(Price(self.0 - other.0))
    }

    /// # Errors
    ///
    /// Returns [`VendingError::PriceOverflow`] if the sum is out of range.
    pub fn checked_add(self, other: Price) -> Result<Price, VendingError> {
        self.0
            .checked_add(other.0)
            .map(Price)
            .ok_or(VendingError::PriceOverflow)
    }
}

/// Formats as US currency: `$0.25`, `$1.00`.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut rounded = self.0.round_dp_with_strategy(
            Self::DISPLAY_PRECISION,
            RoundingStrategy::MidpointAwayFromZero,
        );
        rounded.rescale(Self::DISPLAY_PRECISION);
        write!(f, "${rounded}")
    }
}
