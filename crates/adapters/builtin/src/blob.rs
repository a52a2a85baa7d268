//! JSON encoding of the configuration blobs owned by the built-in types.
//!
//! An empty blob is a freshly added, unconfigured trigger.

use serde::Serialize;
use serde::de::DeserializeOwned;

use triggerhub_domain::error::HandlerError;

pub(crate) fn decode<T: DeserializeOwned + Default>(data: &[u8]) -> Result<T, HandlerError> {
    if data.is_empty() {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(data)?)
}

pub(crate) fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, HandlerError> {
    Ok(serde_json::to_vec(value)?)
}

/// `HH:MM` serde format for optional times of day.
pub(crate) mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub(crate) const FORMAT: &str = "%H:%M";

    #[allow(clippy::ref_option)]
    pub(crate) fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.collect_str(&time.format(FORMAT)),
            None => serializer.serialize_none(),
        }
    }

    pub(crate) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        Option::<String>::deserialize(deserializer)?
            .map(|text| NaiveTime::parse_from_str(&text, FORMAT))
            .transpose()
            .map_err(serde::de::Error::custom)
    }
}
