// Copyright 2023. The Tari Project
// SPDX-License-Identifier: BSD-3-Clause

/// Serde helpers for 32-byte digests and keys. Human-readable formats carry hex strings, binary formats carry the
/// raw bytes.
pub mod hash_hex {
    use std::{convert::TryFrom, fmt};

    use serde::{
        de::{self, Visitor},
        Deserializer,
        Serializer,
    };

    use crate::node::KEY_LENGTH;

    pub fn serialize<S>(bytes: &[u8; KEY_LENGTH], ser: S) -> Result<S::Ok, S::Error>
    where S: Serializer {
        if ser.is_human_readable() {
            ser.serialize_str(&hex::encode(bytes))
        } else {
            ser.serialize_bytes(bytes)
        }
    }

    pub fn deserialize<'de, D>(de: D) -> Result<[u8; KEY_LENGTH], D::Error>
    where D: Deserializer<'de> {
        struct HashVisitor;

        impl<'de> Visitor<'de> for HashVisitor {
            type Value = [u8; KEY_LENGTH];

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a 32-byte hash")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where E: de::Error {
                let bytes = hex::decode(v).map_err(de::Error::custom)?;
                <[u8; KEY_LENGTH]>::try_from(bytes.as_slice())
                    .map_err(|_| de::Error::invalid_length(bytes.len(), &self))
            }

            fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
            where E: de::Error {
                <[u8; KEY_LENGTH]>::try_from(v).map_err(|_| de::Error::invalid_length(v.len(), &self))
            }

            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where A: de::SeqAccess<'de> {
                let mut result = [0u8; KEY_LENGTH];
                for (i, byte) in result.iter_mut().enumerate() {
                    *byte = seq.next_element()?.ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                Ok(result)
            }
        }

        if de.is_human_readable() {
            de.deserialize_str(HashVisitor)
        } else {
            de.deserialize_bytes(HashVisitor)
        }
    }
}

#[cfg(test)]
mod test {
    use serde::{Deserialize, Serialize};

    use crate::node::KEY_LENGTH;

    #[derive(Serialize, Deserialize, PartialEq, Debug)]
    struct Wrapper(#[serde(with = "super::hash_hex")] [u8; KEY_LENGTH]);

    #[test]
    fn json_is_hex() {
        let w = Wrapper([0xab; KEY_LENGTH]);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(json, format!("\"{}\"", "ab".repeat(KEY_LENGTH)));
        let back: Wrapper = serde_json::from_str(&json).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn bincode_is_raw_bytes() {
        let w = Wrapper([7; KEY_LENGTH]);
        let bytes = bincode::serialize(&w).unwrap();
        // 8-byte length prefix plus the raw digest
        assert_eq!(bytes.len(), 8 + KEY_LENGTH);
        let back: Wrapper = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back, w);
    }

    #[test]
    fn rejects_wrong_length() {
        let short = format!("\"{}\"", "ab".repeat(KEY_LENGTH - 1));
        assert!(serde_json::from_str::<Wrapper>(&short).is_err());
        assert!(serde_json::from_str::<Wrapper>("\"zz\"").is_err());
    }
}
