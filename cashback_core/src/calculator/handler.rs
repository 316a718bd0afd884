use crate::calculator::dto::{Bracket, BracketChoice};
use crate::error::FormInputError;

/// Parses the exact deposit the user typed. Anything that is not a positive
/// integer is rejected before the bracket is even looked at.
pub fn parse_amount(text: &str) -> Result<u64, FormInputError> {
    let amount: i64 = text
        .trim()
        .parse()
        .map_err(|_| FormInputError::InvalidAmount)?;

    if amount <= 0 {
        return Err(FormInputError::InvalidAmount);
    }

    Ok(amount as u64)
}

pub fn calculate_cashback(choice: &BracketChoice, amount: u64) -> Result<u64, FormInputError> {
    let bracket = match choice {
        BracketChoice::Known(bracket) => bracket,
        BracketChoice::Unknown(_) => return Err(FormInputError::AmountOutOfRange),
    };

    if !bracket.contains(amount) {
        return Err(FormInputError::AmountOutOfRange);
    }

    Ok(cashback_for(bracket, amount))
}

fn cashback_for(bracket: &Bracket, amount: u64) -> u64 {
    // rate < 100, so the quotient always fits back into u64
    let raw = (amount as u128 * bracket.rate_percent() as u128 / 100) as u64;
    match bracket.cap() {
        Some(cap) => raw.min(cap),
        None => raw,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn known(bracket: Bracket) -> BracketChoice {
        BracketChoice::Known(bracket)
    }

    #[test]
    fn test_cashback_examples() {
        assert_eq!(calculate_cashback(&known(Bracket::Low), 800), Ok(560));
        assert_eq!(calculate_cashback(&known(Bracket::Mid), 1200), Ok(600));
        assert_eq!(calculate_cashback(&known(Bracket::High), 10000), Ok(1500));
    }

    #[test]
    fn test_cashback_floors_fractional_results() {
        // 70% of 501 = 350.7
        assert_eq!(calculate_cashback(&known(Bracket::Low), 501), Ok(350));
        // 50% of 1001 = 500.5
        assert_eq!(calculate_cashback(&known(Bracket::Mid), 1001), Ok(500));
        // 30% of 1501 = 450.3
        assert_eq!(calculate_cashback(&known(Bracket::High), 1501), Ok(450));
    }

    #[test]
    fn test_cashback_bounds_are_inclusive() {
        assert_eq!(calculate_cashback(&known(Bracket::Low), 500), Ok(350));
        assert_eq!(calculate_cashback(&known(Bracket::Low), 1000), Ok(700));
        assert_eq!(calculate_cashback(&known(Bracket::Mid), 1499), Ok(749));
        assert_eq!(calculate_cashback(&known(Bracket::High), 1500), Ok(450));
        // cap kicks in exactly at 5000
        assert_eq!(calculate_cashback(&known(Bracket::High), 5000), Ok(1500));
        assert_eq!(calculate_cashback(&known(Bracket::High), 4999), Ok(1499));
    }

    #[test]
    fn test_amount_outside_bracket_is_rejected() {
        let cases = [
            (Bracket::Low, 499),
            (Bracket::Low, 1001),
            (Bracket::Mid, 1000),
            (Bracket::Mid, 1500),
            (Bracket::High, 1499),
        ];
        for (bracket, amount) in cases {
            assert_eq!(
                calculate_cashback(&known(bracket), amount),
                Err(FormInputError::AmountOutOfRange),
                "{:?} {}",
                bracket,
                amount
            );
        }
    }

    #[test]
    fn test_unknown_bracket_never_validates() {
        let choice = BracketChoice::Unknown("100 - 700 ₽".to_string());
        assert_eq!(
            calculate_cashback(&choice, 600),
            Err(FormInputError::AmountOutOfRange)
        );
    }

    #[test]
    fn test_huge_amount_is_capped_without_overflow() {
        assert_eq!(
            calculate_cashback(&known(Bracket::High), i64::MAX as u64),
            Ok(1500)
        );
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("800"), Ok(800));
        assert_eq!(parse_amount(" 1200 "), Ok(1200));
        assert_eq!(parse_amount("0"), Err(FormInputError::InvalidAmount));
        assert_eq!(parse_amount("-500"), Err(FormInputError::InvalidAmount));
        assert_eq!(parse_amount("800₽"), Err(FormInputError::InvalidAmount));
        assert_eq!(parse_amount("восемьсот"), Err(FormInputError::InvalidAmount));
        assert_eq!(parse_amount(""), Err(FormInputError::InvalidAmount));
    }

    #[test]
    fn test_bracket_labels_round_trip() {
        for bracket in Bracket::ALL {
            assert_eq!(Bracket::from_label(bracket.label()), Some(bracket));
        }
        assert_eq!(Bracket::from_label("от 500 до 1001 ₽"), None);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Bracket::Low.percent_display(), "70%");
        assert_eq!(Bracket::Mid.percent_display(), "50%");
        assert_eq!(Bracket::High.percent_display(), "30% (⚠ максимум 1500₽)");
        assert_eq!(
            BracketChoice::Unknown("x".to_string()).percent_display(),
            "неизвестно"
        );
    }
}
