use std::str::FromStr;

use serde_json::Value;

use super::error::QuotaError;

/// Reduction requested by a caller that may hand over loosely typed input.
///
/// Accepts integers and integral numerics written as decimals (`"3"`,
/// `" 3 "`, `"3.0"`, `-2`). Anything with a fractional part or that is not a
/// number is rejected. Whole numbers too large for `i64` saturate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReduceAmount(i64);

impl ReduceAmount {
    pub const ONE: ReduceAmount = ReduceAmount(1);

    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl Default for ReduceAmount {
    fn default() -> Self {
        Self::ONE
    }
}

impl From<i64> for ReduceAmount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl FromStr for ReduceAmount {
    type Err = QuotaError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        if let Ok(value) = trimmed.parse::<i64>() {
            return Ok(Self(value));
        }

        trimmed
            .parse::<f64>()
            .ok()
            .and_then(integral)
            .map(Self)
            .ok_or_else(|| QuotaError::InvalidAmount(raw.to_string()))
    }
}

impl TryFrom<&Value> for ReduceAmount {
    type Error = QuotaError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Null => Ok(Self::ONE),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().and_then(integral))
                .map(Self)
                .ok_or_else(|| QuotaError::InvalidAmount(number.to_string())),
            Value::String(raw) => raw.parse(),
            other => Err(QuotaError::InvalidAmount(other.to_string())),
        }
    }
}

/// Whole numbers past the `i64` range saturate to its bounds.
fn integral(value: f64) -> Option<i64> {
    (value.is_finite() && value.fract() == 0.0).then_some(value as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_integer_strings() {
        assert_eq!("5".parse::<ReduceAmount>().unwrap().get(), 5);
        assert_eq!(" -5 ".parse::<ReduceAmount>().unwrap().get(), -5);
        assert_eq!("40.0".parse::<ReduceAmount>().unwrap().get(), 40);
    }

    #[test]
    fn rejects_non_numeric_input() {
        for raw in ["abc", "", "2.5", "inf", "NaN", "1e400"] {
            assert_eq!(
                raw.parse::<ReduceAmount>(),
                Err(QuotaError::InvalidAmount(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn oversized_whole_numbers_saturate() {
        let huge = "99999999999999999999".parse::<ReduceAmount>().unwrap();
        assert_eq!(huge.get(), i64::MAX);
        assert_eq!("-1e30".parse::<ReduceAmount>().unwrap().get(), i64::MIN);
        assert_eq!(ReduceAmount::try_from(&json!(1e19)).unwrap().get(), i64::MAX);
        assert_eq!(
            ReduceAmount::try_from(&json!(10_000_000_000_000_000_000u64))
                .unwrap()
                .get(),
            i64::MAX
        );
        assert!("1e19.5".parse::<ReduceAmount>().is_err());
    }

    #[test]
    fn converts_json_values() {
        assert_eq!(ReduceAmount::try_from(&json!(null)).unwrap(), ReduceAmount::ONE);
        assert_eq!(ReduceAmount::try_from(&json!(7)).unwrap().get(), 7);
        assert_eq!(ReduceAmount::try_from(&json!(7.0)).unwrap().get(), 7);
        assert_eq!(ReduceAmount::try_from(&json!("12")).unwrap().get(), 12);
        assert!(ReduceAmount::try_from(&json!(1.5)).is_err());
        assert!(ReduceAmount::try_from(&json!(true)).is_err());
        assert!(ReduceAmount::try_from(&json!([1])).is_err());
    }
}
