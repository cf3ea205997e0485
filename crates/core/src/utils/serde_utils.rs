use serde::{Deserialize, Deserializer};

/// Deserializes an explicit JSON `null` as the type's default value.
///
/// Counter columns on the hosted table are nullable; `#[serde(default)]` alone
/// only covers a missing key.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
