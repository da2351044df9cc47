//! Opaque continuation [`Cursor`]s.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

use crate::DateTime;

use super::{Error, Field, Kind, Listable, Sorting, Value};

/// Version of the [`Cursor`] format.
///
/// Cursors of other versions are rejected.
const VERSION: u8 = 1;

/// Position of an entity in a listing: its sort key and its ID.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Anchor {
    /// Value of the sort [`Field`].
    pub value: Value,

    /// ID of the entity.
    pub id: String,
}

impl Anchor {
    /// Returns the [`Anchor`] of the provided entity under the provided
    /// [`Sorting`].
    #[must_use]
    pub fn of<E: Listable>(sorting: &Sorting<E::Field>, entity: &E) -> Self {
        Self {
            value: entity.value(sorting.field),
            id: entity.id().to_owned(),
        }
    }
}

/// Opaque token pointing right after an [`Anchor`].
///
/// The token also records the [`Sorting`] it was issued for, so it cannot be
/// silently reused with another one.
#[derive(Clone, Debug, Display, Eq, From, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Cursor(String);

/// Decoded contents of a [`Cursor`].
#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
struct Payload {
    /// Format version.
    v: u8,

    /// Name of the sort field.
    f: String,

    /// Sort order.
    o: String,

    /// Value of the sort field.
    k: serde_json::Value,

    /// ID of the entity.
    id: String,
}

impl Cursor {
    /// Encodes the provided [`Anchor`] issued under the provided [`Sorting`].
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn encode<F: Field>(sorting: &Sorting<F>, anchor: &Anchor) -> Self {
        let payload = Payload {
            v: VERSION,
            f: sorting.field.name().to_owned(),
            o: sorting.order.to_string(),
            k: match &anchor.value {
                Value::Text(s) => s.clone().into(),
                Value::Integer(n) => (*n).into(),
                Value::Timestamp(dt) => dt.to_rfc3339().into(),
            },
            id: anchor.id.clone(),
        };
        let json = serde_json::to_vec(&payload).expect("serializable");
        Self(URL_SAFE_NO_PAD.encode(json))
    }

    /// Decodes the [`Anchor`] of this [`Cursor`], checking it was issued
    /// under the provided [`Sorting`].
    ///
    /// # Errors
    ///
    /// With [`Error::InvalidCursor`] if this [`Cursor`] is malformed, has
    /// another version, or was issued under another [`Sorting`].
    pub fn decode<F: Field>(
        &self,
        sorting: &Sorting<F>,
    ) -> Result<Anchor, Error> {
        let json = URL_SAFE_NO_PAD
            .decode(self.0.as_bytes())
            .map_err(|_| Error::InvalidCursor)?;
        let payload = serde_json::from_slice::<Payload>(&json)
            .map_err(|_| Error::InvalidCursor)?;

        if payload.v != VERSION
            || payload.f != sorting.field.name()
            || payload.o != sorting.order.to_string()
        {
            return Err(Error::InvalidCursor);
        }

        let value = match (sorting.field.kind(), payload.k) {
            (Kind::Text, serde_json::Value::String(s)) => Value::Text(s),
            (Kind::Integer, serde_json::Value::Number(n)) => {
                Value::Integer(n.as_i64().ok_or(Error::InvalidCursor)?)
            }
            (Kind::Timestamp, serde_json::Value::String(s)) => {
                Value::Timestamp(
                    DateTime::from_rfc3339(&s)
                        .map_err(|_| Error::InvalidCursor)?,
                )
            }
            (Kind::Text | Kind::Integer | Kind::Timestamp, _) => {
                return Err(Error::InvalidCursor)
            }
        };

        Ok(Anchor {
            value,
            id: payload.id,
        })
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
