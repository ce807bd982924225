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

//! Machine states and their event handlers.
//!
//! ```text
//!              valid coin                select (in stock)
//!  NoCoin ─────────────────► HasCoin ───────────────────► ProductSelected
//!    ▲                          │                              │
//!    │        return coins      │                              │ balance covers price
//!    ├──────────────────────────┘                              ▼
//!    │        return coins                             ProductDispensed
//!    ├─────────────────────────────────────────────────────────┤
//!    │                  immediately, with reset                │
//!    └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers that can fail do all fallible work (inventory deduction) before
//! touching the machine, so an error leaves the transaction unchanged.

use super::VendingMachine;
use crate::message;
use crate::{Coin, Product, VendingError};
use std::fmt;
use tracing::info;

/// Phase of the current transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum State {
    /// Waiting for the first coin.
    NoCoin,
    /// Holding a balance, nothing selected yet.
    HasCoin,
    /// Holding a balance short of the selected product's price.
    ProductSelected,
    /// Dispensing. The machine passes through this state while a purchase
    /// completes and lands back in [`State::NoCoin`].
    ProductDispensed,
}

impl State {
    pub fn name(&self) -> &'static str {
        match self {
            Self::NoCoin => "NoCoin",
            Self::HasCoin => "HasCoin",
            Self::ProductSelected => "ProductSelected",
            Self::ProductDispensed => "ProductDispensed",
        }
    }

    pub(crate) fn insert_coin(
        self,
        machine: &mut VendingMachine,
        coin: &Coin,
    ) -> Result<(), VendingError> {
        match self {
            Self::NoCoin => no_coin_insert(machine, coin),
            Self::HasCoin => has_coin_insert(machine, coin),
            Self::ProductSelected => product_selected_insert(machine, coin),
            Self::ProductDispensed => self.return_coins(machine),
        }
    }

    pub(crate) fn select_product(
        self,
        machine: &mut VendingMachine,
        product: &Product,
    ) -> Result<(), VendingError> {
        match self {
            Self::NoCoin => machine.add_and_set_message(message::INSERT_COIN_FIRST),
            Self::HasCoin => has_coin_select(machine, product),
            Self::ProductSelected => product_selected_select(machine, product)?,
            Self::ProductDispensed => machine.add_and_set_message(message::WAIT_FOR_A_FEW),
        }
        Ok(())
    }

    pub(crate) fn return_coins(self, machine: &mut VendingMachine) -> Result<(), VendingError> {
        match self {
            Self::NoCoin => machine.add_and_set_message(message::NO_COINS_TO_RETURN),
            Self::HasCoin => {
                machine.add_and_set_message(message::COINS_RETURNED);
                machine.add_and_set_message(message::INSERT_COIN);
                machine.enter_no_coin();
                machine.reset();
            }
            Self::ProductSelected => {
                machine.add_and_set_message(message::COINS_RETURNED);
                machine.enter_no_coin();
                machine.reset();
            }
            Self::ProductDispensed => machine.add_and_set_message(message::RETURNING_COIN),
        }
        Ok(())
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn no_coin_insert(machine: &mut VendingMachine, coin: &Coin) -> Result<(), VendingError> {
    let result = machine.validate(coin);
    if !result.is_valid() {
        machine.add_and_set_message(message::INVALID_COIN);
        machine.add_and_set_message(message::RETURNING_COIN);
        machine.add_and_set_message(message::INSERT_COIN);
        return Ok(());
    }

    machine.add_to_current_balance(result.value())?;
    machine.add_and_set_message(message::balance(machine.balance()));
    machine.add_and_set_message(message::SELECT_PRODUCT);
    machine.enter_has_coin();
    Ok(())
}

fn has_coin_insert(machine: &mut VendingMachine, coin: &Coin) -> Result<(), VendingError> {
    let result = machine.validate(coin);
    if !result.is_valid() {
        machine.add_and_set_message(message::INVALID_COIN);
        machine.add_and_set_message(message::COINS_RETURNED);
        machine.add_and_set_message(message::INSERT_COIN);
        return Ok(());
    }

    machine.add_to_current_balance(result.value())?;
    machine.add_and_set_message(message::balance(machine.balance()));
    machine.add_and_set_message(message::SELECT_PRODUCT);
    Ok(())
}

fn has_coin_select(machine: &mut VendingMachine, product: &Product) {
    if !machine.inventory().is_available(product) {
        machine.add_and_set_message(message::out_of_stock(product));
        machine.add_and_set_message(message::SELECT_PRODUCT);
        return;
    }

    machine.set_selected_product(product.clone());
    machine.add_and_set_message(message::product_price(product));
    machine.add_and_set_message(message::balance(machine.balance()));
    machine.add_and_set_message(message::INSERT_COIN);
    machine.enter_product_selected();
}

fn product_selected_insert(
    machine: &mut VendingMachine,
    coin: &Coin,
) -> Result<(), VendingError> {
    let result = machine.validate(coin);
    if !result.is_valid() {
        machine.add_and_set_message(message::INVALID_COIN);
        return Ok(());
    }

    let selected = machine.selected_product().clone();
    let covers_price = machine.balance().checked_add(result.value())? >= selected.price();
    if covers_price {
        machine.inventory().deduct_product(&selected)?;
    }

    machine.add_to_current_balance(result.value())?;
    machine.add_and_set_message(message::balance(machine.balance()));
    if machine.is_current_balance_insufficient() {
        machine.add_and_set_message(message::INSERT_COIN);
        return Ok(());
    }

    dispense(machine, &selected)
}

/// Switching to another product keeps the balance and checks it against the
/// new product's price.
fn product_selected_select(
    machine: &mut VendingMachine,
    product: &Product,
) -> Result<(), VendingError> {
    if machine.selected_product() == product {
        machine.add_and_set_message(message::already_selected(product));
        machine.add_and_set_message(message::INSERT_COIN);
        return Ok(());
    }

    if !machine.inventory().is_available(product) {
        machine.add_and_set_message(message::out_of_stock(product));
        machine.add_and_set_message(message::SELECT_PRODUCT);
        return Ok(());
    }

    let covers_price = machine.balance() >= product.price();
    if covers_price {
        machine.inventory().deduct_product(product)?;
    }

    machine.set_selected_product(product.clone());
    machine.add_and_set_message(message::product_price(product));
    if !covers_price {
        machine.add_and_set_message(message::balance(machine.balance()));
        machine.add_and_set_message(message::INSERT_COIN);
        return Ok(());
    }

    dispense(machine, product)
}

/// Charges the price of a product whose unit has already been taken from
/// the inventory, then completes the transaction.
fn dispense(machine: &mut VendingMachine, product: &Product) -> Result<(), VendingError> {
    machine.deduct_from_current_balance(product.price())?;
    machine.add_and_set_message(message::dispensing(product));
    machine.add_and_set_message(message::dispensed(product));
    machine.add_and_set_message(message::THANK_YOU);
    machine.enter_product_dispensed(product);
    Ok(())
}

/// State entry points. Each binds the machine to its next state.
impl VendingMachine {
    fn enter_no_coin(&mut self) {
        self.transition_to(State::NoCoin);
    }

    fn enter_has_coin(&mut self) {
        self.transition_to(State::HasCoin);
    }

    fn enter_product_selected(&mut self) {
        self.transition_to(State::ProductSelected);
    }

    /// Passes through [`State::ProductDispensed`] and straight back to
    /// [`State::NoCoin`], refunding any change.
    fn enter_product_dispensed(&mut self, product: &Product) {
        self.transition_to(State::ProductDispensed);
        info!(
            product = product.name(),
            price = %product.price(),
            change = %self.balance(),
            "product dispensed"
        );
        self.transition_to(State::NoCoin);
        self.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CoinValidator, Inventory, Price, ProductInventory, StateFactory};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use std::sync::Arc;

    fn quarter() -> Coin {
        Coin::new(dec!(5.670), dec!(24.26)).unwrap()
    }

    fn chips() -> Product {
        Product::new("Chips", Price::new(dec!(0.50)).unwrap()).unwrap()
    }

    fn machine_in(state: State) -> VendingMachine {
        let inventory = Arc::new(ProductInventory::new());
        inventory.add_product(&chips(), 1).unwrap();
        let factory = StateFactory::new(Arc::new(CoinValidator::us_coins()), inventory);
        let mut machine = VendingMachine::new(factory);
        machine.transition_to(state);
        machine
    }

    #[test]
    fn state_names() {
        assert_eq!(State::NoCoin.to_string(), "NoCoin");
        assert_eq!(State::HasCoin.to_string(), "HasCoin");
        assert_eq!(State::ProductSelected.to_string(), "ProductSelected");
        assert_eq!(State::ProductDispensed.to_string(), "ProductDispensed");
    }

    #[test]
    fn dispensed_state_returns_inserted_coin() {
        let mut machine = machine_in(State::ProductDispensed);
        let messages = machine.insert_coin(&quarter()).unwrap();
        assert_eq!(messages, ["RETURNING COIN..."]);
        assert_eq!(machine.balance(), Price::ZERO);
        assert_eq!(machine.state(), State::ProductDispensed);
    }

    #[test]
    fn dispensed_state_asks_to_wait_on_select() {
        let mut machine = machine_in(State::ProductDispensed);
        let messages = machine.select_product(&chips()).unwrap();
        assert_eq!(messages, ["WAIT FOR A FEW..."]);
        assert!(machine.selected_product().is_empty());
    }

    #[test]
    fn dispensed_state_return_coins() {
        let mut machine = machine_in(State::ProductDispensed);
        let messages = machine.return_coins().unwrap();
        assert_eq!(messages, ["RETURNING COIN..."]);
    }

    #[test]
    fn entering_dispensed_lands_in_no_coin() {
        let mut machine = machine_in(State::ProductSelected);
        machine.set_selected_product(chips());
        machine.add_to_current_balance(Price::new(dec!(0.75)).unwrap()).unwrap();

        machine.enter_product_dispensed(&chips());

        assert_eq!(machine.state(), State::NoCoin);
        assert_eq!(machine.balance(), Price::ZERO);
        assert!(machine.selected_product().is_empty());
        assert_eq!(machine.message_history(), ["INSERT COIN"]);
    }

    #[test]
    fn out_of_stock_during_purchase_leaves_machine_unchanged() {
        let mut machine = machine_in(State::HasCoin);
        machine.add_to_current_balance(Price::new(dec!(0.25)).unwrap()).unwrap();
        machine.select_product(&chips()).unwrap();
        // Another machine sharing the inventory takes the last bag.
        machine.inventory().deduct_product(&chips()).unwrap();
        let history = machine.message_history().to_vec();

        let result = machine.insert_coin(&quarter());

        assert_eq!(result, Err(VendingError::OutOfStock("Chips".into())));
        assert_eq!(machine.state(), State::ProductSelected);
        assert_eq!(machine.balance(), Price::new(dec!(0.25)).unwrap());
        assert_eq!(machine.selected_product(), &chips());
        assert_eq!(machine.message_history(), history);
    }

    #[test]
    fn balance_overflow_leaves_machine_unchanged() {
        let mut machine = machine_in(State::HasCoin);
        let full = Price::new(Decimal::MAX).unwrap();
        machine.add_to_current_balance(full).unwrap();
        let history = machine.message_history().to_vec();

        let result = machine.insert_coin(&quarter());

        assert_eq!(result, Err(VendingError::PriceOverflow));
        assert_eq!(machine.state(), State::HasCoin);
        assert_eq!(machine.balance(), full);
        assert_eq!(machine.message_history(), history);
    }
}
