use serde::{Deserialize, Deserializer, Serialize};

/// A JSON scalar that may arrive as either a string or a number, kept as its textual form.
#[derive(Deserialize)]
#[serde(untagged)]
enum Textual {
    Text(String),
    Number(serde_json::Number),
}
impl From<Textual> for String {
    fn from(value: Textual) -> Self {
        match value {
            Textual::Text(text) => text,
            Textual::Number(number) => number.to_string(),
        }
    }
}

/// Opaque song identifier, assigned by the backend.
///
/// Some backends hand out `"C001"`, others hand out `1`; both are kept as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SongId(String);
impl SongId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
impl<'de> Deserialize<'de> for SongId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Textual::deserialize(deserializer).map(|raw| Self(raw.into()))
    }
}
impl core::fmt::Display for SongId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
impl From<&str> for SongId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
impl From<String> for SongId {
    fn from(value: String) -> Self {
        Self(value)
    }
}
impl core::str::FromStr for SongId {
    type Err = core::convert::Infallible;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

/// Length of a song, exactly as the backend reports it.
///
/// Seconds in some catalogs, free text (`"3:20"`) in others. No unit is assumed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SongDuration(String);
impl SongDuration {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
impl<'de> Deserialize<'de> for SongDuration {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<Textual>::deserialize(deserializer).map(|raw| Self(raw.map(String::from).unwrap_or_default()))
    }
}
impl core::fmt::Display for SongDuration {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A catalog entry as exchanged with the backend.
///
/// Nothing here is validated; the backend is the only source of truth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    /// Absent on songs that have not been created yet.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SongId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub titulo: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub artista: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub album: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genero: String,
    #[serde(default)]
    pub duracion: SongDuration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compositor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub escritor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub productor: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discografica: Option<String>,
}
impl Song {
    /// The same song with its identifier stripped, as sent in create and update bodies.
    pub fn into_payload(self) -> Self {
        Self { id: None, ..self }
    }
}

/// What a mutating endpoint answers with.
///
/// Backends differ: some echo the stored song, others reply `{"mensaje": "...", "id": "..."}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Acknowledgement {
    pub id: Option<SongId>,
    pub message: Option<String>,
    pub song: Option<Song>,
}
impl Acknowledgement {
    pub(crate) fn from_body(body: &str) -> Self {
        #[derive(Deserialize)]
        struct RawAcknowledgement {
            #[serde(default)]
            id: Option<SongId>,
            #[serde(default, alias = "mensaje")]
            message: Option<String>,
            #[serde(default)]
            titulo: Option<String>,
        }

        if body.trim().is_empty() {
            return Self::default();
        }

        match serde_json::from_str::<RawAcknowledgement>(body) {
            Ok(raw) => {
                let song = match raw.titulo {
                    Some(_) => serde_json::from_str::<Song>(body).ok(),
                    None => None,
                };
                Self { id: raw.id, message: raw.message, song }
            }
            Err(error) => {
                tracing::debug!(?error, "mutation response was not a JSON object; ignoring body");
                Self::default()
            }
        }
    }
}
