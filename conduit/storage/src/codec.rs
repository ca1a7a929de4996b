use {
    borsh::{BorshDeserialize, BorshSerialize},
    conduit_types::{BorshDeExt, BorshSerExt, StdResult},
};

/// How a storage container turns its values into bytes and back.
///
/// Every host record is stored Borsh-encoded, since the stored bytes are what
/// the commitment tree proves. The trait exists so containers stay generic over
/// the value type without naming the encoding at every call site.
pub trait Codec<T> {
    fn encode(data: &T) -> StdResult<Vec<u8>>;

    fn decode(data: &[u8]) -> StdResult<T>;
}

#[derive(Clone)]
pub struct Borsh;

impl<T> Codec<T> for Borsh
where
    T: BorshSerialize + BorshDeserialize,
{
    fn encode(data: &T) -> StdResult<Vec<u8>> {
        data.to_borsh_vec()
    }

    fn decode(data: &[u8]) -> StdResult<T> {
        data.deserialize_borsh()
    }
}
