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

//! # Vending Demo
//!
//! This library models the controller of a coin-operated vending machine:
//! it validates coins, tracks the customer's balance, handles product
//! selection and dispenses once the balance covers the price.
//!
//! ## Core Components
//!
//! - [`VendingMachine`]: Transaction context, delegates every event to its [`State`]
//! - [`CoinValidator`]: Matches coin samples against [`CoinSpecification`]s
//! - [`ProductInventory`]: Stock ledger, shareable between machines
//! - [`Price`]: Non-negative fixed-point money
//! - [`VendingError`]: Precondition and domain-rule failures
//!
//! ## Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use vending_demo_rs::{Coin, MachineConfig, State};
//!
//! let (mut machine, catalog) = MachineConfig::default_config().unwrap().build().unwrap();
//! let quarter = Coin::new(dec!(5.670), dec!(24.26)).unwrap();
//! let chips = catalog.find("Chips").unwrap().clone();
//!
//! machine.insert_coin(&quarter).unwrap();
//! machine.select_product(&chips).unwrap();
//! let messages = machine.insert_coin(&quarter).unwrap();
//!
//! assert_eq!(
//!     messages,
//!     ["BALANCE: $0.50", "DISPENSING Chips...", "Chips DISPENSED", "THANK YOU", "INSERT COIN"]
//! );
//! assert_eq!(machine.state(), State::NoCoin);
//! ```
//!
//! ## Business Outcomes vs Errors
//!
//! An invalid coin, an out-of-stock product or a short balance is not an
//! error: the call succeeds and the outcome is visible in the returned
//! messages. Errors are reserved for broken preconditions (a coin with zero
//! weight, an empty product name) and for domain rules the inventory or
//! ledger refuses to break.

pub mod coin;
pub mod config;
mod error;
pub mod inventory;
mod machine;
pub mod message;
mod money;
mod product;

pub use coin::{Coin, CoinSpecification, CoinValidation, CoinValidationResult, CoinValidator};
pub use config::{MachineConfig, load_config, parse_config};
pub use error::VendingError;
pub use inventory::{Inventory, ProductInventory};
pub use machine::{State, StateFactory, VendingMachine};
pub use money::Price;
pub use product::{Catalog, Product};
