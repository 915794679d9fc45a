// Arbitrary-precision integers as lowercase hex strings, for use in `#[serde(with)]`
pub mod biguint_hex {
    use num_bigint::BigUint;
    use num_traits::Num;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&value.to_str_radix(16))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BigUint, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        BigUint::from_str_radix(&s, 16).map_err(de::Error::custom)
    }
}
