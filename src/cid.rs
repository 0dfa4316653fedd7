//! Content identifiers and their display encodings

use std::fmt;

use data_encoding::BASE32_NOPAD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A content-derived address naming one object in the store.
///
/// The identifier is an opaque BLAKE3 digest. It is never stored in its
/// rendered form: encoding happens at output time via [`CidBase`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId([u8; 32]);

impl ContentId {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hash arbitrary bytes into an identifier.
    pub fn digest(data: &[u8]) -> Self {
        Self(*blake3::hash(data).as_bytes())
    }

    /// Render with the given base, including the multibase prefix.
    pub fn encode(&self, base: CidBase) -> String {
        base.encode(self)
    }

    /// Parse a prefixed identifier (`b...` base32 or `f...` base16).
    ///
    /// Returns `None` for anything that is not exactly one identifier, so
    /// callers can fall back to treating the text as a plain path segment.
    pub fn parse(s: &str) -> Option<Self> {
        let (prefix, body) = s.split_at_checked(1)?;
        let bytes = match prefix {
            "f" | "F" => hex::decode(body).ok()?,
            "b" | "B" => decode_base32(body)?,
            _ => return None,
        };
        let bytes: [u8; 32] = bytes.try_into().ok()?;
        Some(Self(bytes))
    }
}

impl fmt::Debug for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentId({})", self.encode(CidBase::Base32))
    }
}

impl fmt::Display for ContentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode(CidBase::Base32))
    }
}

impl Serialize for ContentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode(CidBase::Base32))
    }
}

impl<'de> Deserialize<'de> for ContentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        ContentId::parse(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid content identifier: {}", s)))
    }
}

/// Display encoding for identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum CidBase {
    /// Lowercase RFC 4648 base32 without padding, prefixed with `b`
    #[default]
    Base32,
    /// Lowercase hexadecimal, prefixed with `f`
    Base16,
}

impl CidBase {
    pub fn encode(&self, id: &ContentId) -> String {
        match self {
            CidBase::Base32 => format!("b{}", encode_base32(id.as_bytes())),
            CidBase::Base16 => format!("f{}", hex::encode(id.as_bytes())),
        }
    }
}

fn encode_base32(bytes: &[u8]) -> String {
    BASE32_NOPAD.encode(bytes).to_ascii_lowercase()
}

fn decode_base32(s: &str) -> Option<Vec<u8>> {
    BASE32_NOPAD.decode(s.to_ascii_uppercase().as_bytes()).ok()
}
