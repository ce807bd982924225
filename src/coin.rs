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

//! Coin samples and their validation.
//!
//! A [`Coin`] is what the customer drops into the slot: a weight and a
//! diameter. A [`CoinValidator`] decides which denomination, if any, the
//! sample is by checking it against a list of [`CoinSpecification`]s.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use vending_demo_rs::{Coin, CoinSpecification, CoinValidation, CoinValidator};
//!
//! let validator = CoinValidator::new(vec![CoinSpecification::us_quarter()]).unwrap();
//! let result = validator.validate(&Coin::new(dec!(5.670), dec!(24.26)).unwrap());
//! assert!(result.is_valid());
//! assert_eq!(result.label(), "Quarter");
//! ```

use crate::{Price, VendingError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// A physical coin sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    weight_grams: Decimal,
    diameter_mm: Decimal,
}

impl Coin {
    /// # Errors
    ///
    /// - [`VendingError::InvalidCoinWeight`] - weight is zero or negative.
    /// - [`VendingError::InvalidCoinDiameter`] - diameter is zero or negative.
    pub fn new(weight_grams: Decimal, diameter_mm: Decimal) -> Result<Self, VendingError> {
        if weight_grams <= Decimal::ZERO {
            return Err(VendingError::InvalidCoinWeight);
        }
        if diameter_mm <= Decimal::ZERO {
            return Err(VendingError::InvalidCoinDiameter);
        }
        Ok(Self {
            weight_grams,
            diameter_mm,
        })
    }

    pub fn weight_grams(&self) -> Decimal {
        self.weight_grams
    }

    pub fn diameter_mm(&self) -> Decimal {
        self.diameter_mm
    }
}

/// Inclusive `[min, max]` measurement window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToleranceWindow {
    min: Decimal,
    max: Decimal,
}

impl ToleranceWindow {
    fn around(nominal: Decimal, tolerance: Decimal) -> Result<Self, VendingError> {
        let min = nominal.checked_sub(tolerance);
        let max = nominal.checked_add(tolerance);
        match (min, max) {
            (Some(min), Some(max)) => Ok(Self { min, max }),
            _ => Err(VendingError::ToleranceOverflow),
        }
    }

    pub fn min(&self) -> Decimal {
        self.min
    }

    pub fn max(&self) -> Decimal {
        self.max
    }

    pub fn contains(&self, value: Decimal) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Accepted physical profile of one denomination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinSpecification {
    label: String,
    value: Price,
    weight: ToleranceWindow,
    diameter: ToleranceWindow,
}

impl CoinSpecification {
    /// Builds a specification accepting `nominal ± tolerance` on both
    /// weight and diameter.
    ///
    /// # Errors
    ///
    /// Returns [`VendingError::NegativeTolerance`] if `tolerance < 0`.
    pub fn new(
        label: impl Into<String>,
        value: Price,
        weight_grams: Decimal,
        diameter_mm: Decimal,
        tolerance: Decimal,
    ) -> Result<Self, VendingError> {
        if tolerance < Decimal::ZERO {
            return Err(VendingError::NegativeTolerance);
        }
        Ok(Self {
            label: label.into(),
            value,
            weight: ToleranceWindow::around(weight_grams, tolerance)?,
            diameter: ToleranceWindow::around(diameter_mm, tolerance)?,
        })
    }

    /// Builds a specification from explicit inclusive windows.
    ///
    /// # Errors
    ///
    /// Returns [`VendingError::NegativeTolerance`] if either window has
    /// `min > max`.
    pub fn from_ranges(
        label: impl Into<String>,
        value: Price,
        weight_grams: (Decimal, Decimal),
        diameter_mm: (Decimal, Decimal),
    ) -> Result<Self, VendingError> {
        let (weight_min, weight_max) = weight_grams;
        let (diameter_min, diameter_max) = diameter_mm;
        if weight_min > weight_max || diameter_min > diameter_max {
            return Err(VendingError::NegativeTolerance);
        }
        Ok(Self {
            label: label.into(),
            value,
            weight: ToleranceWindow {
                min: weight_min,
                max: weight_max,
            },
            diameter: ToleranceWindow {
                min: diameter_min,
                max: diameter_max,
            },
        })
    }

    /// US nickel: $0.05, 4.980–5.020 g, 21.15–21.27 mm.
    pub fn us_nickel() -> Self {
        Self::us_preset(
            "Nickel",
            dec!(0.05),
            (dec!(4.980), dec!(5.020)),
            (dec!(21.15), dec!(21.27)),
        )
    }

    /// US dime: $0.10, 2.250–2.290 g, 17.85–17.99 mm.
    pub fn us_dime() -> Self {
        Self::us_preset(
            "Dime",
            dec!(0.10),
            (dec!(2.250), dec!(2.290)),
            (dec!(17.85), dec!(17.99)),
        )
    }

    /// US quarter: $0.25, 5.650–5.700 g, 24.20–24.30 mm.
    pub fn us_quarter() -> Self {
        Self::us_preset(
            "Quarter",
            dec!(0.25),
            (dec!(5.650), dec!(5.700)),
            (dec!(24.20), dec!(24.30)),
        )
    }

    fn us_preset(
        label: &str,
        value: Decimal,
        weight: (Decimal, Decimal),
        diameter: (Decimal, Decimal),
    ) -> Self {
        Self {
            label: label.to_owned(),
            value: Price::new(value).unwrap_or_default(),
            weight: ToleranceWindow {
                min: weight.0,
                max: weight.1,
            },
            diameter: ToleranceWindow {
                min: diameter.0,
                max: diameter.1,
            },
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> Price {
        self.value
    }

    pub fn weight(&self) -> ToleranceWindow {
        self.weight
    }

    pub fn diameter(&self) -> ToleranceWindow {
        self.diameter
    }

    /// True when both measurements fall inside their windows.
    pub fn is_satisfied_by(&self, coin: &Coin) -> bool {
        self.weight.contains(coin.weight_grams) && self.diameter.contains(coin.diameter_mm)
    }
}

/// Outcome of validating one coin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoinValidationResult {
    valid: bool,
    label: String,
    value: Price,
}

impl CoinValidationResult {
    pub fn valid(label: impl Into<String>, value: Price) -> Self {
        Self {
            valid: true,
            label: label.into(),
            value,
        }
    }

    /// Empty label, zero value.
    pub fn invalid() -> Self {
        Self {
            valid: false,
            label: String::new(),
            value: Price::ZERO,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.valid
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn value(&self) -> Price {
        self.value
    }
}

/// Decides whether a coin sample is an accepted denomination.
pub trait CoinValidation: Send + Sync {
    fn validate(&self, coin: &Coin) -> CoinValidationResult;
}

/// Matches coins against specifications in registration order.
#[derive(Debug, Clone)]
pub struct CoinValidator {
    specifications: Vec<CoinSpecification>,
}

impl CoinValidator {
    /// # Errors
    ///
    /// Returns [`VendingError::NoCoinSpecifications`] if `specifications` is empty.
    pub fn new(specifications: Vec<CoinSpecification>) -> Result<Self, VendingError> {
        if specifications.is_empty() {
            return Err(VendingError::NoCoinSpecifications);
        }
        Ok(Self { specifications })
    }

    /// Nickel, dime and quarter.
    pub fn us_coins() -> Self {
        Self {
            specifications: vec![
                CoinSpecification::us_nickel(),
                CoinSpecification::us_dime(),
                CoinSpecification::us_quarter(),
            ],
        }
    }

    pub fn specifications(&self) -> &[CoinSpecification] {
        &self.specifications
    }
}

impl CoinValidation for CoinValidator {
    /// First registered match wins, even when a later one fits more closely.
    fn validate(&self, coin: &Coin) -> CoinValidationResult {
        self.specifications
            .iter()
            .find(|spec| spec.is_satisfied_by(coin))
            .map(|spec| CoinValidationResult::valid(&spec.label, spec.value))
            .unwrap_or_else(CoinValidationResult::invalid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(amount: Decimal) -> Price {
        Price::new(amount).unwrap()
    }

    fn make_spec(
        label: &str,
        value: Decimal,
        weight: Decimal,
        diameter: Decimal,
        tolerance: Decimal,
    ) -> Result<CoinSpecification, VendingError> {
        CoinSpecification::new(label, price(value), weight, diameter, tolerance)
    }

    #[test]
    fn coin_rejects_non_positive_weight() {
        assert_eq!(
            Coin::new(Decimal::ZERO, dec!(24.26)),
            Err(VendingError::InvalidCoinWeight)
        );
        assert_eq!(
            Coin::new(dec!(-1), dec!(24.26)),
            Err(VendingError::InvalidCoinWeight)
        );
    }

    #[test]
    fn coin_rejects_non_positive_diameter() {
        assert_eq!(
            Coin::new(dec!(5.670), Decimal::ZERO),
            Err(VendingError::InvalidCoinDiameter)
        );
    }

    #[test]
    fn specification_rejects_negative_tolerance() {
        let result = make_spec("Dime", dec!(0.10), dec!(10), dec!(24), dec!(-0.001));
        assert_eq!(result, Err(VendingError::NegativeTolerance));
    }

    #[test]
    fn specification_window_is_nominal_plus_minus_tolerance() {
        let spec = make_spec("Dime", dec!(0.10), dec!(10), dec!(24), dec!(0.001)).unwrap();
        assert_eq!(spec.weight().min(), dec!(9.999));
        assert_eq!(spec.weight().max(), dec!(10.001));
        assert_eq!(spec.diameter().min(), dec!(23.999));
        assert_eq!(spec.diameter().max(), dec!(24.001));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let spec = make_spec("Dime", dec!(0.10), dec!(10), dec!(24), dec!(0.001)).unwrap();
        let low = Coin::new(dec!(9.999), dec!(23.999)).unwrap();
        let high = Coin::new(dec!(10.001), dec!(24.001)).unwrap();
        let outside = Coin::new(dec!(10.0011), dec!(24)).unwrap();
        assert!(spec.is_satisfied_by(&low));
        assert!(spec.is_satisfied_by(&high));
        assert!(!spec.is_satisfied_by(&outside));
    }

    #[test]
    fn zero_tolerance_matches_exact_measurements_only() {
        let spec = make_spec("Token", dec!(1), dec!(8), dec!(26), Decimal::ZERO).unwrap();
        assert!(spec.is_satisfied_by(&Coin::new(dec!(8), dec!(26)).unwrap()));
        assert!(!spec.is_satisfied_by(&Coin::new(dec!(8.0001), dec!(26)).unwrap()));
    }

    #[test]
    fn from_ranges_rejects_inverted_window() {
        let result = CoinSpecification::from_ranges(
            "Broken",
            price(dec!(0.05)),
            (dec!(5.1), dec!(5.0)),
            (dec!(21), dec!(22)),
        );
        assert_eq!(result, Err(VendingError::NegativeTolerance));
    }

    #[test]
    fn validator_requires_specifications() {
        assert_eq!(
            CoinValidator::new(Vec::new()).unwrap_err(),
            VendingError::NoCoinSpecifications
        );
    }

    #[test]
    fn validator_returns_matching_label_and_value() {
        let validator = CoinValidator::new(vec![
            make_spec("Dime", dec!(0.10), dec!(10), dec!(24), dec!(0.001)).unwrap(),
            make_spec("Quarter", dec!(0.25), dec!(11.34), dec!(24.26), dec!(0.001)).unwrap(),
        ])
        .unwrap();

        let result = validator.validate(&Coin::new(dec!(10), dec!(24)).unwrap());

        assert!(result.is_valid());
        assert_eq!(result.label(), "Dime");
        assert_eq!(result.value(), price(dec!(0.10)));
    }

    #[test]
    fn validator_rejects_unknown_coin() {
        let validator = CoinValidator::new(vec![
            make_spec("Dime", dec!(0.10), dec!(10), dec!(24), dec!(0.001)).unwrap(),
        ])
        .unwrap();

        let result = validator.validate(&Coin::new(dec!(5), dec!(20)).unwrap());

        assert!(!result.is_valid());
        assert_eq!(result.label(), "");
        assert_eq!(result.value(), Price::ZERO);
    }

    #[test]
    fn overlapping_specifications_resolve_to_first_registered() {
        let validator = CoinValidator::new(vec![
            make_spec("Wide", dec!(0.05), dec!(5), dec!(20), dec!(1)).unwrap(),
            make_spec("Exact", dec!(0.50), dec!(5.5), dec!(20.5), dec!(0)).unwrap(),
        ])
        .unwrap();

        let result = validator.validate(&Coin::new(dec!(5.5), dec!(20.5)).unwrap());

        assert_eq!(result.label(), "Wide");
    }

    #[test]
    fn us_presets_accept_nominal_coins() {
        let validator = CoinValidator::us_coins();
        let nickel = validator.validate(&Coin::new(dec!(5), dec!(21.21)).unwrap());
        let dime = validator.validate(&Coin::new(dec!(2.268), dec!(17.91)).unwrap());
        let quarter = validator.validate(&Coin::new(dec!(5.670), dec!(24.26)).unwrap());

        assert_eq!((nickel.label(), nickel.value()), ("Nickel", price(dec!(0.05))));
        assert_eq!((dime.label(), dime.value()), ("Dime", price(dec!(0.10))));
        assert_eq!((quarter.label(), quarter.value()), ("Quarter", price(dec!(0.25))));
    }

    #[test]
    fn window_past_decimal_range_is_rejected() {
        let result = make_spec("Slab", dec!(1), Decimal::MAX, dec!(24), dec!(1));
        assert_eq!(result, Err(VendingError::ToleranceOverflow));
    }

    #[test]
    fn us_coins_register_smallest_first() {
        let validator = CoinValidator::us_coins();
        let labels: Vec<_> = validator
            .specifications()
            .iter()
            .map(CoinSpecification::label)
            .collect();
        assert_eq!(labels, ["Nickel", "Dime", "Quarter"]);
    }

    #[test]
    fn us_presets_reject_penny() {
        let penny = Coin::new(dec!(2.5), dec!(19.05)).unwrap();
        assert!(!CoinValidator::us_coins().validate(&penny).is_valid());
    }
}
