//! Serde adapters for `Amount` as a decimal string
//!
//! Deserialization also accepts a plain JSON integer.

use serde::{de, Deserialize, Deserializer, Serializer};

use core_kernel::Amount;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Text(String),
    Number(u64),
}

fn parse<E: de::Error>(raw: RawAmount) -> Result<Amount, E> {
    match raw {
        RawAmount::Text(text) => text
            .trim()
            .parse::<u128>()
            .map(Amount::new)
            .map_err(|_| E::custom(format!("invalid amount: {:?}", text))),
        RawAmount::Number(units) => Ok(Amount::new(units as u128)),
    }
}

pub fn serialize<S>(amount: &Amount, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&amount.units().to_string())
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Amount, D::Error>
where
    D: Deserializer<'de>,
{
    parse(RawAmount::deserialize(deserializer)?)
}

/// The same encoding for optional amounts
pub mod option {
    use super::*;

    pub fn serialize<S>(amount: &Option<Amount>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match amount {
            Some(amount) => super::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Amount>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<RawAmount>::deserialize(deserializer)?
            .map(parse)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Body {
        #[serde(with = "super")]
        amount: Amount,
    }

    #[test]
    fn test_amount_encodes_as_string() {
        let body = Body {
            amount: Amount::from_coins(50),
        };
        let json = serde_json::to_string(&body).unwrap();
        assert_eq!(json, r#"{"amount":"50000000000000000000"}"#);
    }

    #[test]
    fn test_amount_accepts_string_or_number() {
        let from_text: Body = serde_json::from_str(r#"{"amount":"50000000000000000000"}"#).unwrap();
        assert_eq!(from_text.amount, Amount::from_coins(50));
        let from_number: Body = serde_json::from_str(r#"{"amount":42}"#).unwrap();
        assert_eq!(from_number.amount, Amount::new(42));
    }

    #[test]
    fn test_invalid_amount_rejected() {
        assert!(serde_json::from_str::<Body>(r#"{"amount":"-5"}"#).is_err());
        assert!(serde_json::from_str::<Body>(r#"{"amount":"1.5"}"#).is_err());
    }
}
