//! Row types and request payloads.

mod admin;
mod category;
mod product;
mod region;
mod review;
mod seller;

pub use admin::*;
pub use category::*;
pub use product::*;
pub use region::*;
pub use review::*;
pub use seller::*;

use serde::{Deserialize, Deserializer};

/// Query-string integer where an empty value means "no filter".
pub(crate) fn empty_as_none<'de, D>(d: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(d)? {
        Some(s) if !s.trim().is_empty() => s
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| serde::de::Error::custom(format!("expected an integer, got '{}'", s))),
        _ => Ok(None),
    }
}

/// List field where an explicit `null` means the same as an absent one.
pub(crate) fn null_as_empty<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(d)?.unwrap_or_default())
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`, via `#[serde(default)]`).
pub(crate) fn present<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(d).map(Some)
}
