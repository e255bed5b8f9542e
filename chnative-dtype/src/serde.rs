use std::fmt::Formatter;

use serde::de::{Error, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::DType;

/// Types serialize as their canonical name.
impl Serialize for DType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(TypeNameVisitor)
    }
}

struct TypeNameVisitor;

impl Visitor<'_> for TypeNameVisitor {
    type Value = DType;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a column type name")
    }

    fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
        v.parse().map_err(|e| E::custom(format!("invalid type name '{v}': {e}")))
    }
}

#[cfg(test)]
mod tests {
    use crate::DType;

    #[test]
    fn serializes_as_name() {
        let dtype: DType = "Array(Enum8('a' = 1))".parse().unwrap();
        let json = serde_json::to_string(&dtype).unwrap();
        assert_eq!(json, r#""Array(Enum8('a' = 1))""#);
        assert_eq!(serde_json::from_str::<DType>(&json).unwrap(), dtype);
    }

    #[test]
    fn rejects_bad_names() {
        assert!(serde_json::from_str::<DType>(r#""Array(""#).is_err());
        assert!(serde_json::from_str::<DType>("42").is_err());
    }
}
