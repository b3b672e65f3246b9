//! Deserialización tolerante
//!
//! El rastreo a veces manda `null`, tipos equivocados o registros a medias.
//! Un campo que no se puede leer toma su valor por defecto y un elemento de
//! lista ilegible se descarta; el resto de la foto se conserva.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Lee el campo o cae al `Default` si es `null` o de otro tipo
pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

/// Lee una lista descartando los elementos que no se pueden interpretar
pub fn skip_invalid<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: serde::de::DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    let items = match value {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };

    Ok(items
        .into_iter()
        .filter_map(|item| T::deserialize(item).ok())
        .collect())
}
