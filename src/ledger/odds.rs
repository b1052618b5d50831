//! Odds combination for single and multiple bets.
//!
//! Odds are multiplied as exact decimals, then the product is rounded to
//! [`ODDS_DP`] places and the payout to [`CURRENCY_DP`] places, both with
//! banker's rounding.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;
use serde_json::Value;

use super::LedgerError;

/// Decimal places kept on combined odds.
pub const ODDS_DP: u32 = 6;
/// Decimal places kept on currency amounts.
pub const CURRENCY_DP: u32 = 2;

/// Exclusive upper bound on stored combined odds and currency amounts. Both
/// `NUMERIC(18,6)` and `NUMERIC(14,2)` columns hold twelve integer digits.
pub fn value_ceiling() -> Decimal {
    Decimal::from(1_000_000_000_000_i64)
}

/// Combined odds and payout for a prospective bet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub combined_odds: Decimal,
    pub potential: Decimal,
}

/// Product of all odds, rounded to [`ODDS_DP`]. An empty list yields 1.
pub fn combine_odds(odds: &[Decimal]) -> Result<Decimal, LedgerError> {
    let product = odds.iter().try_fold(Decimal::ONE, |acc, odd| {
        acc.checked_mul(*odd)
            .ok_or_else(|| LedgerError::Validation("combined odds are too large".into()))
    })?;

    let combined = product.round_dp_with_strategy(ODDS_DP, RoundingStrategy::MidpointNearestEven);
    if combined >= value_ceiling() {
        return Err(LedgerError::Validation(format!(
            "combined odds {combined} exceed the maximum of {}",
            value_ceiling()
        )));
    }
    Ok(combined)
}

/// Payout if the bet wins: `stake × combined_odds`, rounded to [`CURRENCY_DP`].
pub fn potential_return(stake: Decimal, combined_odds: Decimal) -> Result<Decimal, LedgerError> {
    let raw = stake
        .checked_mul(combined_odds)
        .ok_or_else(|| LedgerError::Validation("potential return is too large".into()))?;

    let potential = raw.round_dp_with_strategy(CURRENCY_DP, RoundingStrategy::MidpointNearestEven);
    if potential >= value_ceiling() {
        return Err(LedgerError::Validation(format!(
            "potential return {potential} exceeds the maximum of {}",
            value_ceiling()
        )));
    }
    Ok(potential)
}

pub fn quote(stake: Decimal, odds: &[Decimal]) -> Result<Quote, LedgerError> {
    let combined_odds = combine_odds(odds)?;
    let potential = potential_return(stake, combined_odds)?;
    Ok(Quote {
        combined_odds,
        potential,
    })
}

/// Parse an untyped odd (JSON number or numeric string) for selection
/// `index` (1-based in messages). Missing, non-numeric and non-positive values
/// are rejected.
pub fn parse_odd(index: usize, raw: Option<&Value>) -> Result<Decimal, LedgerError> {
    let odd = raw
        .and_then(decimal_from_json)
        .ok_or_else(|| LedgerError::Validation(format!("selection {}: odd must be numeric", index + 1)))?;

    ensure_positive_odd(index, odd)?;
    Ok(odd)
}

pub fn ensure_positive_odd(index: usize, odd: Decimal) -> Result<(), LedgerError> {
    if odd <= Decimal::ZERO {
        return Err(LedgerError::Validation(format!(
            "selection {}: odd must be positive, got {odd}",
            index + 1
        )));
    }
    Ok(())
}

/// Lenient decimal conversion for form-style JSON: numbers and numeric strings.
pub fn decimal_from_json(value: &Value) -> Option<Decimal> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().replace(',', "."),
        _ => return None,
    };

    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn combined_odds_beyond_storable_range_are_rejected() {
        let legs = vec![d("1000"); 5];
        assert!(matches!(combine_odds(&legs), Err(LedgerError::Validation(_))));
        assert!(matches!(quote(d("1"), &legs), Err(LedgerError::Validation(_))));

        let legs = vec![d("1000"); 4];
        assert!(matches!(combine_odds(&legs), Err(LedgerError::Validation(_))));

        let legs = vec![d("1000"); 3];
        assert_eq!(combine_odds(&legs).unwrap(), d("1000000000"));
    }

    #[test]
    fn potential_beyond_storable_range_is_rejected() {
        assert!(matches!(
            potential_return(d("1000000000"), d("1000")),
            Err(LedgerError::Validation(_))
        ));
        assert_eq!(
            potential_return(d("999999999"), d("1000")).unwrap(),
            d("999999999000.00")
        );
    }

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn single_selection_keeps_its_odd() {
        assert_eq!(combine_odds(&[d("2.5")]).unwrap(), d("2.5"));
    }

    #[test]
    fn empty_selection_list_is_product_identity() {
        assert_eq!(combine_odds(&[]).unwrap(), Decimal::ONE);
    }

    #[test]
    fn double_pays_stake_times_product() {
        let q = quote(d("10"), &[d("2.0"), d("1.5")]).unwrap();
        assert_eq!(q.combined_odds, d("3.0"));
        assert_eq!(q.potential, d("30.00"));
    }

    #[test]
    fn combined_odds_rounded_to_six_places() {
        // 1.333333 * 1.333333 * 1.333333 = 2.370369...
        let combined = combine_odds(&[d("1.333333"), d("1.333333"), d("1.333333")]).unwrap();
        assert_eq!(combined, d("2.370369"));
        assert!(combined.scale() <= ODDS_DP);
    }

    #[test]
    fn potential_uses_bankers_rounding() {
        assert_eq!(potential_return(d("1"), d("2.125")).unwrap(), d("2.12"));
        assert_eq!(potential_return(d("1"), d("2.135")).unwrap(), d("2.14"));
    }

    #[test]
    fn accumulator_of_many_legs() {
        let odds = vec![d("1.9"); 10];
        let q = quote(d("5"), &odds).unwrap();
        assert_eq!(q.combined_odds, d("613.106626"));
        assert_eq!(q.potential, d("3065.53"));
    }

    #[test]
    fn parse_odd_accepts_numbers_and_numeric_strings() {
        assert_eq!(parse_odd(0, Some(&json!(2.5))).unwrap(), d("2.5"));
        assert_eq!(parse_odd(0, Some(&json!("1.75"))).unwrap(), d("1.75"));
        assert_eq!(parse_odd(0, Some(&json!("1,75"))).unwrap(), d("1.75"));
        assert_eq!(parse_odd(0, Some(&json!(3))).unwrap(), d("3"));
    }

    #[test]
    fn parse_odd_names_the_offending_selection() {
        let err = parse_odd(2, Some(&json!("abc"))).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref m) if m.starts_with("selection 3:")));

        let err = parse_odd(0, None).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(ref m) if m.starts_with("selection 1:")));

        let err = parse_odd(1, Some(&json!(null))).unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    #[test]
    fn parse_odd_rejects_non_positive() {
        assert!(parse_odd(0, Some(&json!(0))).is_err());
        assert!(parse_odd(0, Some(&json!("-1.5"))).is_err());
    }
}
