//! Byte encodings used across the workspace: Borsh for everything that is
//! stored or proven, JSON for the query adapter.

use {
    crate::{StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{de::DeserializeOwned, ser::Serialize},
};

pub trait JsonSerExt: Sized {
    fn to_json_vec(&self) -> StdResult<Vec<u8>>;
}

pub trait BorshSerExt: Sized {
    fn to_borsh_vec(&self) -> StdResult<Vec<u8>>;
}

/// Decoding of raw bytes. Implemented on `[u8]`, so it's callable on anything
/// that dereferences to bytes (`Vec<u8>`, [`Binary`](crate::Binary)).
pub trait JsonDeExt {
    fn deserialize_json<D>(&self) -> StdResult<D>
    where
        D: DeserializeOwned;
}

pub trait BorshDeExt {
    fn deserialize_borsh<D>(&self) -> StdResult<D>
    where
        D: BorshDeserialize;
}

impl<T> JsonSerExt for T
where
    T: Serialize,
{
    fn to_json_vec(&self) -> StdResult<Vec<u8>> {
        serde_json::to_vec(self).map_err(|err| StdError::serialize::<T, _>("json", err))
    }
}

impl<T> BorshSerExt for T
where
    T: BorshSerialize,
{
    fn to_borsh_vec(&self) -> StdResult<Vec<u8>> {
        borsh::to_vec(self).map_err(|err| StdError::serialize::<T, _>("borsh", err))
    }
}

impl JsonDeExt for [u8] {
    fn deserialize_json<D>(&self) -> StdResult<D>
    where
        D: DeserializeOwned,
    {
        serde_json::from_slice(self).map_err(|err| StdError::deserialize::<D, _>("json", err))
    }
}

impl BorshDeExt for [u8] {
    fn deserialize_borsh<D>(&self) -> StdResult<D>
    where
        D: BorshDeserialize,
    {
        // Trailing bytes are an error, so a value has exactly one encoding.
        borsh::from_slice(self).map_err(|err| StdError::deserialize::<D, _>("borsh", err))
    }
}
