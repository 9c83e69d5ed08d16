//! 三态部分更新字段
//!
//! 更新接口的契约是 "apply a diff"：载荷里没有的字段保持不变，
//! 显式传 `null` 的字段被清空，传值的字段被校验后写入。
//! `Option<T>` 只有两态，无法区分 "缺失" 和 "null"，所以这里
//! 用一个显式的三态枚举配合 `#[serde(default, skip_serializing_if =
//! "Patch::is_missing")]` 保留这个区分。

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A partially-updatable field: absent, explicitly cleared, or set.
///
/// | JSON payload          | Deserialized value  | Meaning            |
/// |-----------------------|---------------------|--------------------|
/// | key absent            | `Patch::Missing`    | leave unchanged    |
/// | `"field": null`       | `Patch::Null`       | clear stored value |
/// | `"field": v`          | `Patch::Value(v)`   | set to `v`         |
///
/// Requires `#[serde(default, skip_serializing_if = "Patch::is_missing")]`
/// on every field of this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Patch<T> {
    /// Key absent from the payload.
    #[default]
    Missing,
    /// Key present with an explicit `null`.
    Null,
    /// Key present with a value.
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Patch::Missing)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Patch::Null)
    }

    /// Value reference, if one is present.
    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_ref(&self) -> Patch<&T> {
        match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(v),
        }
    }

    /// Map the contained value, preserving Missing/Null.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Patch<U> {
        match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)),
        }
    }

    /// Map the contained value with a fallible function, preserving
    /// Missing/Null.
    pub fn try_map<U, E, F: FnOnce(T) -> Result<U, E>>(self, f: F) -> Result<Patch<U>, E> {
        Ok(match self {
            Patch::Missing => Patch::Missing,
            Patch::Null => Patch::Null,
            Patch::Value(v) => Patch::Value(f(v)?),
        })
    }

    /// `None` when missing, `Some(None)` when cleared, `Some(Some(v))`
    /// when set. Useful against `Option<T>`-typed storage columns.
    pub fn into_nested(self) -> Option<Option<T>> {
        match self {
            Patch::Missing => None,
            Patch::Null => Some(None),
            Patch::Value(v) => Some(Some(v)),
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

// 反序列化时字段缺失走 serde 的 default (Missing)，所以这里只需要
// 区分 null 和有值两种情况。
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            // Missing is normally skipped via skip_serializing_if;
            // if it does get here, emit null rather than fail.
            Patch::Missing | Patch::Null => serializer.serialize_none(),
            Patch::Value(v) => v.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Payload {
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        link: Patch<i64>,
        #[serde(default, skip_serializing_if = "Patch::is_missing")]
        note: Patch<String>,
    }

    #[test]
    fn absent_key_deserializes_as_missing() {
        let p: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(p.link, Patch::Missing);
        assert_eq!(p.note, Patch::Missing);
    }

    #[test]
    fn null_key_deserializes_as_null() {
        let p: Payload = serde_json::from_str(r#"{"link": null}"#).unwrap();
        assert_eq!(p.link, Patch::Null);
        assert_eq!(p.note, Patch::Missing);
    }

    #[test]
    fn value_key_deserializes_as_value() {
        let p: Payload = serde_json::from_str(r#"{"link": 42, "note": "x"}"#).unwrap();
        assert_eq!(p.link, Patch::Value(42));
        assert_eq!(p.note, Patch::Value("x".to_string()));
    }

    #[test]
    fn missing_is_skipped_on_serialize() {
        let p = Payload {
            link: Patch::Missing,
            note: Patch::Value("x".to_string()),
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"note":"x"}"#);
    }

    #[test]
    fn null_round_trips() {
        let p = Payload {
            link: Patch::Null,
            note: Patch::Missing,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"link":null}"#);
        let back: Payload = serde_json::from_str(&json).unwrap();
        assert_eq!(back.link, Patch::Null);
    }

    #[test]
    fn try_map_propagates_errors() {
        let p: Patch<String> = Patch::Value("abc".to_string());
        let res: Result<Patch<i64>, _> = p.try_map(|s| s.parse::<i64>());
        assert!(res.is_err());

        let p: Patch<String> = Patch::Null;
        let res: Result<Patch<i64>, std::num::ParseIntError> = p.try_map(|s| s.parse::<i64>());
        assert_eq!(res.unwrap(), Patch::Null);
    }
}
