use {
    crate::{StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    data_encoding::HEXUPPER,
    serde::{de, ser},
    sha2::{Digest, Sha256},
    std::{fmt, str::FromStr},
};

/// A 32-byte SHA-256 digest.
///
/// Packet commitments, acknowledgement commitments and Merkle nodes are all
/// represented by this type. In text form (`Display`, JSON) it is encoded as
/// upper-case hex.
#[derive(
    BorshSerialize, BorshDeserialize, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct Hash256([u8; Self::LENGTH]);

impl Hash256 {
    pub const LENGTH: usize = 32;
    pub const ZERO: Self = Self([0; Self::LENGTH]);

    pub const fn from_inner(bytes: [u8; Self::LENGTH]) -> Self {
        Self(bytes)
    }

    pub const fn into_inner(self) -> [u8; Self::LENGTH] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Hash256 {
    type Error = StdError;

    fn try_from(bytes: &[u8]) -> StdResult<Self> {
        <[u8; Self::LENGTH]>::try_from(bytes)
            .map(Self)
            .map_err(|_| {
                StdError::deserialize::<Self, _>(
                    "bytes",
                    format!("expecting {} bytes, got {}", Self::LENGTH, bytes.len()),
                )
            })
    }
}

impl FromStr for Hash256 {
    type Err = StdError;

    fn from_str(s: &str) -> StdResult<Self> {
        let bytes = HEXUPPER
            .decode(s.to_ascii_uppercase().as_bytes())
            .map_err(|err| StdError::deserialize::<Self, _>("hex", err))?;

        Self::try_from(bytes.as_slice())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&HEXUPPER.encode(&self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Hash256({})", HEXUPPER.encode(&self.0))
    }
}

impl ser::Serialize for Hash256 {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> de::Deserialize<'de> for Hash256 {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = <String as de::Deserialize>::deserialize(deserializer)?;
        Self::from_str(&s).map_err(de::Error::custom)
    }
}

// ---------------------------------- hashing ----------------------------------

pub fn sha2_256(data: &[u8]) -> [u8; Hash256::LENGTH] {
    Sha256::digest(data).into()
}

pub trait HashExt {
    fn hash256(&self) -> Hash256;
}

impl<T> HashExt for T
where
    T: AsRef<[u8]> + ?Sized,
{
    fn hash256(&self) -> Hash256 {
        Hash256::from_inner(sha2_256(self.as_ref()))
    }
}

// ----------------------------------- tests -----------------------------------

#[cfg(test)]
mod tests {
    use {super::*, hex_literal::hex};

    #[test]
    fn hashing_empty_input() {
        assert_eq!(
            b"".hash256(),
            Hash256::from_inner(hex!(
                "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
            ))
        );
    }

    #[test]
    fn text_form_is_upper_hex() {
        let hash = b"conduit".hash256();
        let text = hash.to_string();

        assert_eq!(text, text.to_ascii_uppercase());
        assert_eq!(Hash256::from_str(&text).unwrap(), hash);
        assert_eq!(Hash256::from_str(&text.to_lowercase()).unwrap(), hash);
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(Hash256::try_from([0_u8; 31].as_slice()).is_err());
        assert!(Hash256::from_str("ABCD").is_err());
    }
}
