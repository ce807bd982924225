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

use crate::{CoinValidation, Inventory};
use std::fmt;
use std::sync::Arc;

/// Collaborators every state handler is bound to.
///
/// States themselves are plain [`State`](super::State) values; the factory
/// supplies the coin validator and inventory they consult while handling an
/// event. Cloning is cheap and shares both collaborators.
#[derive(Clone)]
pub struct StateFactory {
    validator: Arc<dyn CoinValidation>,
    inventory: Arc<dyn Inventory>,
}

impl StateFactory {
    pub fn new(validator: Arc<dyn CoinValidation>, inventory: Arc<dyn Inventory>) -> Self {
        Self {
            validator,
            inventory,
        }
    }

    pub fn validator(&self) -> &dyn CoinValidation {
        self.validator.as_ref()
    }

    pub fn inventory(&self) -> &dyn Inventory {
        self.inventory.as_ref()
    }
}

impl fmt::Debug for StateFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateFactory").finish_non_exhaustive()
    }
}
