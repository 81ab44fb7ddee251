use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer};

/// Rounds a derived currency amount to cents, half away from zero.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole dollars, half away from zero.
pub fn round_dollars(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

pub fn floor_dollars(amount: Decimal) -> Decimal {
    amount.floor()
}

/// Coerces free-text numeric input (`"1,500"`, `"$750"`, `"abc"`) to a whole
/// number. Anything that is not a digit is dropped; nothing parseable yields 0.
pub fn parse_amount_input(raw: &str) -> u64 {
    let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
    digits.parse::<u64>().unwrap_or(0)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AmountInput {
    Number(Decimal),
    Text(String),
    Other(IgnoredAny),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CountInput {
    Whole(u64),
    Fractional(f64),
    Text(String),
    Other(IgnoredAny),
}

/// Serde adapter for budgets typed into a form field. Plain decimals pass
/// through; any other text goes through [`parse_amount_input`] and values
/// that are neither number nor text become 0. Never fails.
pub fn deserialize_amount<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AmountInput::deserialize(deserializer)? {
        AmountInput::Number(amount) => amount,
        AmountInput::Text(raw) => Decimal::from(parse_amount_input(&raw)),
        AmountInput::Other(_) => Decimal::ZERO,
    })
}

/// Serde adapter for view counts. Negative or fractional numbers are
/// truncated into range; text goes through [`parse_amount_input`].
pub fn deserialize_count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match CountInput::deserialize(deserializer)? {
        CountInput::Whole(count) => count,
        // `as` saturates and maps NaN to 0.
        CountInput::Fractional(count) => count.max(0.0) as u64,
        CountInput::Text(raw) => parse_amount_input(&raw),
        CountInput::Other(_) => 0,
    })
}

pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// `$1,500` for whole amounts, `$64.80` otherwise.
pub fn format_usd(amount: Decimal) -> String {
    let rounded = round_cents(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let absolute = rounded.abs();
    let whole = absolute.trunc();
    let cents = ((absolute - whole) * Decimal::ONE_HUNDRED).trunc();
    let grouped = group_thousands(&whole.to_string());

    if cents.is_zero() {
        format!("{sign}${grouped}")
    } else {
        format!("{sign}${grouped}.{cents:0>2}")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (index, ch) in digits.chars().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use serde::Deserialize;

    use super::{
        deserialize_amount, deserialize_count, format_count, format_usd, parse_amount_input,
        round_cents, round_dollars,
    };

    #[derive(Deserialize)]
    struct FormInput {
        #[serde(deserialize_with = "deserialize_amount")]
        budget: Decimal,
        #[serde(deserialize_with = "deserialize_count")]
        views: u64,
    }

    fn form(json: &str) -> FormInput {
        serde_json::from_str(json).expect("form input never fails to parse")
    }

    #[test]
    fn non_numeric_input_is_coerced_to_zero() {
        assert_eq!(parse_amount_input("abc"), 0);
        assert_eq!(parse_amount_input(""), 0);
        assert_eq!(parse_amount_input("$1,500"), 1_500);
        assert_eq!(parse_amount_input("99999999999999999999999"), 0);
    }

    #[test]
    fn form_numbers_accept_text_and_coerce_garbage_to_zero() {
        let parsed = form(r#"{"budget":"abc","views":"lots"}"#);
        assert_eq!(parsed.budget, Decimal::ZERO);
        assert_eq!(parsed.views, 0);

        let parsed = form(r#"{"budget":"1,500","views":"1,500"}"#);
        assert_eq!(parsed.budget, Decimal::from(1_500));
        assert_eq!(parsed.views, 1_500);

        let parsed = form(r#"{"budget":"750.50","views":-20}"#);
        assert_eq!(parsed.budget, Decimal::new(75_050, 2));
        assert_eq!(parsed.views, 0);

        let parsed = form(r#"{"budget":null,"views":12.9}"#);
        assert_eq!(parsed.budget, Decimal::ZERO);
        assert_eq!(parsed.views, 12);

        let parsed = form(r#"{"budget":500,"views":200000}"#);
        assert_eq!(parsed.budget, Decimal::from(500));
        assert_eq!(parsed.views, 200_000);
    }

    #[test]
    fn rounding_is_half_away_from_zero() {
        assert_eq!(round_cents(Decimal::new(12_345, 3)), Decimal::new(1_235, 2));
        assert_eq!(round_dollars(Decimal::new(2_505, 1)), Decimal::from(251));
        assert_eq!(round_dollars(Decimal::new(10_000_005, 4)), Decimal::from(1_000));
    }

    #[test]
    fn currency_formatting_groups_thousands_and_drops_zero_cents() {
        assert_eq!(format_usd(Decimal::from(1_500)), "$1,500");
        assert_eq!(format_usd(Decimal::new(648, 1)), "$64.80");
        assert_eq!(format_usd(Decimal::from(1_234_567)), "$1,234,567");
        assert_eq!(format_usd(Decimal::ZERO), "$0");
        assert_eq!(format_count(200_000), "200,000");
        assert_eq!(format_count(999), "999");
    }
}
