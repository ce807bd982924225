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

//! Vending machine context.
//!
//! The [`VendingMachine`] owns everything about the transaction in progress:
//! the active [`State`], the running balance, the selected product and the
//! message log. Each external event is forwarded to the active state, which
//! updates the machine only through the narrow setters defined here.
//!
//! # Transactions
//!
//! A transaction ends with a reset, either because the customer asked for
//! their coins back or because a product was dispensed. A reset refunds any
//! remaining balance, clears the selection and re-seeds the log with
//! `INSERT COIN`.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use std::sync::Arc;
//! use vending_demo_rs::{
//!     Coin, CoinValidator, Inventory, Price, Product, ProductInventory, State, StateFactory,
//!     VendingMachine,
//! };
//!
//! let cola = Product::new("Cola", Price::new(dec!(1.00)).unwrap()).unwrap();
//! let inventory = Arc::new(ProductInventory::new());
//! inventory.add_product(&cola, 5).unwrap();
//!
//! let factory = StateFactory::new(Arc::new(CoinValidator::us_coins()), inventory);
//! let mut machine = VendingMachine::new(factory);
//!
//! let quarter = Coin::new(dec!(5.670), dec!(24.26)).unwrap();
//! let messages = machine.insert_coin(&quarter).unwrap();
//! assert_eq!(messages, ["BALANCE: $0.25", "SELECT PRODUCT"]);
//! assert_eq!(machine.state(), State::HasCoin);
//! ```

mod factory;
mod state;

pub use factory::StateFactory;
pub use state::State;

use crate::message::{self, MessageLog};
use crate::{Coin, CoinValidationResult, Inventory, Price, Product, VendingError};
use tracing::{debug, info, warn};

/// A single vending machine and the transaction it is running.
#[derive(Debug)]
pub struct VendingMachine {
    factory: StateFactory,
    state: State,
    balance: Price,
    selected: Product,
    current_message: String,
    history: MessageLog,
    /// Log of the last completed transaction, archived on reset.
    last_transaction: Vec<String>,
    /// Messages emitted by the event being handled.
    emitted: Vec<String>,
}

/// Public API
impl VendingMachine {
    /// Creates a machine waiting for its first coin.
    pub fn new(factory: StateFactory) -> Self {
        let mut history = MessageLog::new();
        history.push(message::INSERT_COIN);
        Self {
            factory,
            state: State::NoCoin,
            balance: Price::ZERO,
            selected: Product::empty(),
            current_message: message::INSERT_COIN.to_owned(),
            history,
            last_transaction: Vec::new(),
            emitted: Vec::new(),
        }
    }

    /// Handles a coin dropped into the slot.
    ///
    /// Returns the messages shown while handling the coin, in order.
    ///
    /// # Errors
    ///
    /// - [`VendingError::OutOfStock`] - the coin completed a purchase but the
    ///   inventory could no longer supply the product. The machine is left
    ///   exactly as it was before the call.
    pub fn insert_coin(&mut self, coin: &Coin) -> Result<Vec<String>, VendingError> {
        let state = self.state;
        self.dispatch("insert_coin", |machine| state.insert_coin(machine, coin))
    }

    /// Handles a product button press.
    ///
    /// # Errors
    ///
    /// Same as [`VendingMachine::insert_coin`].
    pub fn select_product(&mut self, product: &Product) -> Result<Vec<String>, VendingError> {
        let state = self.state;
        self.dispatch("select_product", |machine| {
            state.select_product(machine, product)
        })
    }

    /// Handles the coin return lever.
    pub fn return_coins(&mut self) -> Result<Vec<String>, VendingError> {
        let state = self.state;
        self.dispatch("return_coins", |machine| state.return_coins(machine))
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn balance(&self) -> Price {
        self.balance
    }

    /// The product being bought, or [`Product::empty`] between transactions.
    pub fn selected_product(&self) -> &Product {
        &self.selected
    }

    pub fn current_message(&self) -> &str {
        &self.current_message
    }

    pub fn message_history(&self) -> &[String] {
        self.history.entries()
    }

    pub fn last_transaction(&self) -> &[String] {
        &self.last_transaction
    }

    pub fn inventory(&self) -> &dyn Inventory {
        self.factory.inventory()
    }
}

/// Operations used by the state handlers.
impl VendingMachine {
    fn dispatch(
        &mut self,
        operation: &'static str,
        handler: impl FnOnce(&mut Self) -> Result<(), VendingError>,
    ) -> Result<Vec<String>, VendingError> {
        self.emitted.clear();
        let result = handler(self);
        let emitted = std::mem::take(&mut self.emitted);
        self.assert_invariants();

        match result {
            Ok(()) => Ok(emitted),
            Err(e) => {
                warn!(operation, state = %self.state, error = %e, "operation failed");
                Err(e)
            }
        }
    }

    fn assert_invariants(&self) {
        debug_assert!(
            self.selected.is_empty() || !matches!(self.state, State::NoCoin),
            "Invariant violated: product {} selected while waiting for a coin",
            self.selected.name()
        );
        debug_assert!(
            !self.history.is_empty(),
            "Invariant violated: message log is empty"
        );
    }

    pub(crate) fn validate(&self, coin: &Coin) -> CoinValidationResult {
        self.factory.validator().validate(coin)
    }

    pub(crate) fn is_current_balance_insufficient(&self) -> bool {
        self.selected.price() > self.balance
    }

    /// # Errors
    ///
    /// Returns [`VendingError::PriceOverflow`] and leaves the balance
    /// untouched if the sum is out of range.
    pub(crate) fn add_to_current_balance(
        &mut self,
        amount: Price,
    ) -> Result<(), VendingError> {
        self.balance = self.balance.checked_add(amount)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`VendingError::PriceUnderflow`] and leaves the balance
    /// untouched if `amount` exceeds it.
    pub(crate) fn deduct_from_current_balance(
        &mut self,
        amount: Price,
    ) -> Result<(), VendingError> {
        self.balance = self.balance.checked_sub(amount)?;
        Ok(())
    }

    pub(crate) fn set_selected_product(&mut self, product: Product) {
        self.selected = product;
    }

    pub(crate) fn transition_to(&mut self, next: State) {
        debug!(from = %self.state, to = %next, "state transition");
        self.state = next;
    }

    pub(crate) fn set_current_message(&mut self, message: impl Into<String>) {
        self.current_message = message.into();
    }

    /// Appends to the log, shows the message and makes it current.
    pub(crate) fn add_and_set_message(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(state = %self.state, "{message}");
        self.history.push(message.clone());
        self.emitted.push(message.clone());
        self.current_message = message;
    }

    /// Ends the transaction, refunding whatever balance is left.
    pub(crate) fn reset(&mut self) {
        if self.balance > Price::ZERO {
            info!(refund = %self.balance, "returning balance");
            self.add_and_set_message(message::RETURNING_COIN);
        }

        self.balance = Price::ZERO;
        self.selected = Product::empty();
        self.set_current_message(message::INSERT_COIN);
        self.last_transaction = self.history.reset_to(message::INSERT_COIN);
        self.emitted.push(message::INSERT_COIN.to_owned());
        debug!("transaction reset");
    }
}
