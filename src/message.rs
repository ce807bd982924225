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

//! Display messages and the per-transaction message log.
//!
//! The literals here are what a front panel shows; presentation layers match
//! on them, so they must not change.

use crate::{Price, Product};

pub const INSERT_COIN: &str = "INSERT COIN";
pub const INVALID_COIN: &str = "INVALID COIN";
pub const NO_COINS_TO_RETURN: &str = "NO COINS TO RETURN";
pub const INSERT_COIN_FIRST: &str = "INSERT COIN FIRST";
pub const RETURNING_COIN: &str = "RETURNING COIN...";
pub const SELECT_PRODUCT: &str = "SELECT PRODUCT";
pub const COINS_RETURNED: &str = "COIN(S) RETURNED";
pub const OUT_OF_STOCK: &str = "OUT OF STOCK";
pub const THANK_YOU: &str = "THANK YOU";
pub const WAIT_FOR_A_FEW: &str = "WAIT FOR A FEW...";

pub fn balance(amount: Price) -> String {
    format!("BALANCE: {amount}")
}

/// `Cola - $1.00`
pub fn product_price(product: &Product) -> String {
    format!("{} - {}", product.name(), product.price())
}

pub fn out_of_stock(product: &Product) -> String {
    format!("{} {OUT_OF_STOCK}", product.name())
}

pub fn already_selected(product: &Product) -> String {
    format!("{} ALREADY SELECTED", product.name())
}

pub fn dispensing(product: &Product) -> String {
    format!("DISPENSING {}...", product.name())
}

pub fn dispensed(product: &Product) -> String {
    format!("{} DISPENSED", product.name())
}

/// Ordered messages of the current transaction.
///
/// Only two mutations exist: append, and reset to a single message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageLog {
    entries: Vec<String>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, message: impl Into<String>) {
        self.entries.push(message.into());
    }

    /// Clears the log, seeds it with `message`, and hands back what was there.
    pub fn reset_to(&mut self, message: impl Into<String>) -> Vec<String> {
        std::mem::replace(&mut self.entries, vec![message.into()])
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn last(&self) -> Option<&str> {
        self.entries.last().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
