//! Money

use rust_decimal::{Decimal, prelude::ToPrimitive};
use rusty_money::{Findable, Money, MoneyError, iso::Currency};
use thiserror::Error;

/// A storefront amount. Every amount carries its ISO currency.
pub type Amount = Money<'static, Currency>;

/// Errors raised while converting or combining amounts.
#[derive(Debug, Error, PartialEq)]
pub enum AmountError {
    /// The currency code is not a known ISO 4217 code.
    #[error("unknown currency: {0}")]
    UnknownCurrency(String),

    /// The decimal value does not fit in minor units.
    #[error("amount {0} cannot be represented in minor units")]
    OutOfRange(Decimal),

    /// Multiplying a unit price by a quantity overflowed.
    #[error("line total overflowed for quantity {0}")]
    Overflow(u32),

    /// Two amounts that must share a currency do not.
    #[error("expected an amount in {expected}, got {found}")]
    CurrencyMismatch {
        /// Currency the caller works in.
        expected: &'static str,

        /// Currency of the offending amount.
        found: &'static str,
    },

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Look up an ISO currency by its alphabetic code.
///
/// # Errors
///
/// Returns [`AmountError::UnknownCurrency`] when the code is not recognised.
pub fn currency(code: &str) -> Result<&'static Currency, AmountError> {
    Currency::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| AmountError::UnknownCurrency(code.to_string()))
}

/// Zero in the given currency.
pub fn zero(currency: &'static Currency) -> Amount {
    Money::from_minor(0, currency)
}

/// Convert a major-unit decimal (as sent by the backend) into an amount.
///
/// Values with more fractional digits than the currency allows are rounded
/// to the nearest minor unit.
///
/// # Errors
///
/// Returns [`AmountError::OutOfRange`] when the value does not fit in `i64`
/// minor units.
pub fn from_major(value: Decimal, currency: &'static Currency) -> Result<Amount, AmountError> {
    let minor = value
        .checked_mul(minor_scale(currency))
        .and_then(|scaled| scaled.round_dp(0).to_i64())
        .ok_or(AmountError::OutOfRange(value))?;

    Ok(Money::from_minor(minor, currency))
}

/// The amount as a major-unit decimal, e.g. `180.00`.
pub fn to_major(amount: &Amount) -> Decimal {
    Decimal::new(amount.to_minor_units(), amount.currency().exponent)
}

/// `unit_price * quantity`, computed in minor units.
///
/// # Errors
///
/// Returns [`AmountError::Overflow`] if the product does not fit in `i64`.
pub fn line_total(unit_price: Amount, quantity: u32) -> Result<Amount, AmountError> {
    unit_price
        .to_minor_units()
        .checked_mul(i64::from(quantity))
        .map(|minor| Money::from_minor(minor, unit_price.currency()))
        .ok_or(AmountError::Overflow(quantity))
}

/// Sum amounts, starting from zero in `currency`.
///
/// # Errors
///
/// Returns [`AmountError::CurrencyMismatch`] if any amount is in a different
/// currency, or [`AmountError::Money`] if the arithmetic fails.
pub fn sum<I>(amounts: I, currency: &'static Currency) -> Result<Amount, AmountError>
where
    I: IntoIterator<Item = Amount>,
{
    amounts
        .into_iter()
        .try_fold(zero(currency), |acc, amount| -> Result<Amount, AmountError> {
            ensure_currency(&amount, currency)?;

            Ok(acc.add(amount)?)
        })
}

/// Replace `removed` with `added` inside `total`: `total - removed + added`.
///
/// # Errors
///
/// Returns [`AmountError::CurrencyMismatch`] if the currencies differ, or
/// [`AmountError::OutOfRange`] on overflow.
pub fn swap(total: Amount, removed: Amount, added: Amount) -> Result<Amount, AmountError> {
    ensure_currency(&removed, total.currency())?;
    ensure_currency(&added, total.currency())?;

    total
        .to_minor_units()
        .checked_sub(removed.to_minor_units())
        .and_then(|minor| minor.checked_add(added.to_minor_units()))
        .map(|minor| Money::from_minor(minor, total.currency()))
        .ok_or_else(|| AmountError::OutOfRange(to_major(&total)))
}

/// Check that `amount` is denominated in `currency`.
///
/// # Errors
///
/// Returns [`AmountError::CurrencyMismatch`] otherwise.
pub fn ensure_currency(amount: &Amount, currency: &'static Currency) -> Result<(), AmountError> {
    if amount.currency() == currency {
        Ok(())
    } else {
        Err(AmountError::CurrencyMismatch {
            expected: currency.iso_alpha_code,
            found: amount.currency().iso_alpha_code,
        })
    }
}

fn minor_scale(currency: &Currency) -> Decimal {
    Decimal::from(10_i64.pow(currency.exponent))
}
