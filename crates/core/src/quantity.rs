//! Requested Quantities

/// A quantity as requested by the user, before it is checked against any ceiling.
///
/// Text input is read the way a quantity field is read: surrounding whitespace
/// and an optional sign are accepted, leading digits are taken and anything
/// after them is ignored. `"3kg"` is 3, `"2.7"` is 2 and `"abc"` does not parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedQuantity(Option<i64>);

impl RequestedQuantity {
    /// The parsed integer, if the input contained one.
    pub fn value(self) -> Option<i64> {
        self.0
    }

    /// The parsed integer when it is strictly positive.
    pub fn positive(self) -> Option<u32> {
        self.0
            .filter(|value| *value > 0)
            .map(|value| u32::try_from(value).unwrap_or(u32::MAX))
    }
}

impl From<i64> for RequestedQuantity {
    fn from(value: i64) -> Self {
        Self(Some(value))
    }
}

impl From<i32> for RequestedQuantity {
    fn from(value: i32) -> Self {
        Self(Some(i64::from(value)))
    }
}

impl From<u32> for RequestedQuantity {
    fn from(value: u32) -> Self {
        Self(Some(i64::from(value)))
    }
}

impl From<&str> for RequestedQuantity {
    fn from(value: &str) -> Self {
        Self(parse_leading_integer(value))
    }
}

impl From<String> for RequestedQuantity {
    fn from(value: String) -> Self {
        Self::from(value.as_str())
    }
}

impl From<&String> for RequestedQuantity {
    fn from(value: &String) -> Self {
        Self::from(value.as_str())
    }
}

fn parse_leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();

    let (negative, rest) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();

    if digits.is_empty() {
        return None;
    }

    // Overlong input saturates; it is far beyond any ceiling either way.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);

    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integers_convert_directly() {
        assert_eq!(RequestedQuantity::from(3_u32).value(), Some(3));
        assert_eq!(RequestedQuantity::from(-2_i64).value(), Some(-2));
    }

    #[test]
    fn text_takes_leading_digits() {
        assert_eq!(RequestedQuantity::from("3kg").value(), Some(3));
        assert_eq!(RequestedQuantity::from("2.7").value(), Some(2));
        assert_eq!(RequestedQuantity::from("  12 ").value(), Some(12));
        assert_eq!(RequestedQuantity::from("+4").value(), Some(4));
        assert_eq!(RequestedQuantity::from("-1").value(), Some(-1));
    }

    #[test]
    fn text_without_digits_does_not_parse() {
        assert_eq!(RequestedQuantity::from("abc").value(), None);
        assert_eq!(RequestedQuantity::from("").value(), None);
        assert_eq!(RequestedQuantity::from("-").value(), None);
        assert_eq!(RequestedQuantity::from(".5").value(), None);
    }

    #[test]
    fn positive_rejects_zero_and_negatives() {
        assert_eq!(RequestedQuantity::from(0_i64).positive(), None);
        assert_eq!(RequestedQuantity::from(-3_i64).positive(), None);
        assert_eq!(RequestedQuantity::from("7").positive(), Some(7));
    }

    #[test]
    fn overlong_input_saturates() {
        let quantity = RequestedQuantity::from("99999999999999999999999");

        assert_eq!(quantity.value(), Some(i64::MAX));
        assert_eq!(quantity.positive(), Some(u32::MAX));
    }
}
