//! Money type for representing monetary values.
//!
//! Amounts are integers in the smallest unit of the currency, which avoids
//! the floating-point precision issues that plague monetary arithmetic. The
//! shop's home currency is the forint, which has no minor unit at all, so
//! display prices and stored amounts coincide.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Mul};

/// Supported currencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Currency {
    #[default]
    HUF,
    EUR,
    USD,
}

impl Currency {
    /// Get the currency code (e.g., "HUF").
    pub fn code(&self) -> &'static str {
        match self {
            Currency::HUF => "HUF",
            Currency::EUR => "EUR",
            Currency::USD => "USD",
        }
    }

    /// Get the currency symbol.
    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::HUF => "Ft",
            Currency::EUR => "\u{20ac}",
            Currency::USD => "$",
        }
    }

    /// Get the number of decimal places for this currency.
    pub fn decimal_places(&self) -> u32 {
        match self {
            Currency::HUF => 0,
            _ => 2,
        }
    }

}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A monetary value with currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub struct Money {
    /// Amount in the smallest currency unit.
    pub amount: i64,
    /// The currency.
    pub currency: Currency,
}

impl Money {
    /// Create a new Money value.
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Create an amount in the shop's home currency.
    pub fn huf(amount: i64) -> Self {
        Self::new(amount, Currency::HUF)
    }

    /// Create a zero amount in the given currency.
    pub fn zero(currency: Currency) -> Self {
        Self::new(0, currency)
    }

    /// Check if this is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Format as a display string.
    ///
    /// Forint amounts carry the symbol as a suffix ("8000 Ft"), everything
    /// else as a prefix ("\u{20ac}12.50").
    pub fn display(&self) -> String {
        match self.currency {
            Currency::HUF => format!("{} {}", self.amount, self.currency.symbol()),
            _ => {
                let divisor = 10_i64.pow(self.currency.decimal_places());
                let decimal = self.amount as f64 / divisor as f64;
                let places = self.currency.decimal_places() as usize;
                format!("{}{:.places$}", self.currency.symbol(), decimal)
            }
        }
    }

    /// Add another Money value.
    ///
    /// # Panics
    /// Panics if currencies don't match. Use `try_add` for fallible addition.
    pub fn add(&self, other: &Money) -> Money {
        self.try_add(other).expect("Currency mismatch in addition")
    }

    /// Try to add another Money value, returning None if currencies don't match.
    pub fn try_add(&self, other: &Money) -> Option<Money> {
        if self.currency != other.currency {
            return None;
        }
        Some(Money::new(self.amount + other.amount, self.currency))
    }

    /// Multiply by a scalar, saturating on overflow.
    pub fn multiply(&self, factor: i64) -> Money {
        Money::new(self.amount.saturating_mul(factor), self.currency)
    }

    /// Sum an iterator of Money values.
    ///
    /// # Panics
    /// Panics if currencies are mixed.
    pub fn sum(iter: impl Iterator<Item = Money>, currency: Currency) -> Money {
        iter.fold(Money::zero(currency), |acc, m| acc + m)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money::add(&self, &other)
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    fn mul(self, factor: i64) -> Money {
        self.multiply(factor)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}
