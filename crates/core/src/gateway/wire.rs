//! Serde helpers for Braintree's XML conventions.
//!
//! Scalars arrive as element text with a `type` attribute
//! (`<quantity type="integer">2</quantity>`), absent values as
//! `<description nil="true"/>`, and collections wrap their items:
//! `<add-ons type="array"><add-on>...</add-on></add-ons>`. The helpers read
//! text and parse it, so the attributes never reach the typed fields.

use std::fmt::{self, Display};
use std::marker::PhantomData;
use std::str::FromStr;

use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Parses a required element's text.
pub fn text<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = String::deserialize(deserializer)?;
    raw.trim().parse().map_err(de::Error::custom)
}

/// Parses an element that may be missing or `nil="true"`.
pub fn optional_text<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: Display,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(de::Error::custom),
    }
}

/// Like [`optional_text`], falling back to the type's default for nil.
pub fn text_or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Default,
    T::Err: Display,
{
    Ok(optional_text(deserializer)?.unwrap_or_default())
}

/// Collects the children of a `type="array"` element, whatever their tag.
pub fn array<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct Items<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for Items<T> {
        type Value = Vec<T>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("an element wrapping array items")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Vec<T>, A::Error> {
            let mut items = Vec::new();
            while let Some(key) = map.next_key::<String>()? {
                // `@type`, `@nil` and stray text are not items
                if key.starts_with('@') || key.starts_with('$') {
                    map.next_value::<IgnoredAny>()?;
                    continue;
                }
                items.push(map.next_value()?);
            }
            Ok(items)
        }
    }

    deserializer.deserialize_map(Items(PhantomData))
}

/// Writes `items` as `<field type="array"><item>...</item>...</field>`.
///
/// The outer tag comes from the field this value is serialized under.
pub struct TypedArray<'a, T> {
    item: &'static str,
    items: &'a [T],
}

impl<'a, T> TypedArray<'a, T> {
    pub fn new(item: &'static str, items: &'a [T]) -> Self {
        Self { item, items }
    }
}

impl<T: Serialize> Serialize for TypedArray<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("array", 2)?;
        state.serialize_field("@type", "array")?;
        state.serialize_field(self.item, self.items)?;
        state.end()
    }
}
