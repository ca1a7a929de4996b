use {
    conduit_types::{
        ChannelId, ChannelIdentity, ClientId, ConnectionId, PortId, Sequence, StdError, StdResult,
        nested_namespaces_with_key,
    },
    std::{borrow::Cow, mem},
};

// ------------------------------------ key ------------------------------------

/// Describes a key used in mapping data structures, i.e. [`Map`](crate::Map).
///
/// Compound keys can be split into `Prefix` and `Suffix`, which is what allows
/// iterating all sequences under one channel.
pub trait PrimaryKey {
    /// The number of elements in a tuple key. Singletons are 1; a channel
    /// identity counts as 2 because it is stored as two raw keys.
    ///
    /// This value is necessary for deserializing _nested_ tuple keys. Consider
    /// `(&ChannelIdentity, Sequence)`, serialized as:
    ///
    /// ```plain
    /// len(port) | port | len(channel) | channel | sequence
    /// ```
    ///
    /// Only knowing that the first element has two raw keys can we tell where
    /// it ends.
    const KEY_ELEMS: u8;

    /// For tuple keys, the first element. Use `()` for singleton keys.
    type Prefix: Prefixer;

    /// For tuple keys, the elements _excluding_ the `Prefix`. Use `()` for
    /// singleton keys.
    type Suffix;

    /// The type that raw keys deserialize into, which may be different from the
    /// key itself. E.g. `&ChannelIdentity` deserializes into `ChannelIdentity`.
    type Output;

    /// Convert the key into one or more _raw keys_.
    fn raw_keys(&self) -> Vec<Cow<[u8]>>;

    /// Serialize the raw keys into bytes. Each raw key other than the last one
    /// is prefixed by its length as a 16-bit big endian number:
    ///
    /// ```plain
    /// len(A) | A | len(B) | B | C
    /// ```
    fn joined_key(&self) -> Vec<u8> {
        let mut raw_keys = self.raw_keys();
        let last_raw_key = raw_keys.pop();
        nested_namespaces_with_key(None, &raw_keys, last_raw_key.as_ref())
    }

    /// Deserialize the raw bytes into the output.
    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output>;
}

impl PrimaryKey for () {
    type Output = ();
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        if !bytes.is_empty() {
            return Err(StdError::deserialize::<Self::Output, _>(
                "key",
                "expecting empty bytes",
            ));
        }

        Ok(())
    }
}

impl PrimaryKey for &str {
    type Output = String;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        String::from_utf8(bytes.to_vec())
            .map_err(|err| StdError::deserialize::<Self::Output, _>("key", err))
    }
}

impl PrimaryKey for u64 {
    type Output = u64;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Owned(self.to_be_bytes().to_vec())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let Ok(bytes) = <[u8; mem::size_of::<u64>()]>::try_from(bytes) else {
            return Err(StdError::deserialize::<Self::Output, _>(
                "key",
                format!(
                    "wrong number of bytes: expecting {}, got {}",
                    mem::size_of::<u64>(),
                    bytes.len()
                ),
            ));
        };

        Ok(u64::from_be_bytes(bytes))
    }
}

impl PrimaryKey for Sequence {
    type Output = Sequence;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Owned(self.number().to_be_bytes().to_vec())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        u64::from_slice(bytes).map(Sequence::new)
    }
}

impl PrimaryKey for &ConnectionId {
    type Output = ConnectionId;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        <&str>::from_slice(bytes)?.try_into()
    }
}

impl PrimaryKey for &ClientId {
    type Output = ClientId;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 1;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_bytes())]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        <&str>::from_slice(bytes)?.try_into()
    }
}

impl PrimaryKey for &ChannelIdentity {
    type Output = ChannelIdentity;
    type Prefix = ();
    type Suffix = ();

    const KEY_ELEMS: u8 = 2;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        vec![
            Cow::Borrowed(self.port_id.as_bytes()),
            Cow::Borrowed(self.channel_id.as_bytes()),
        ]
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let (port_raw, channel_raw) = split_first_key(1, bytes)?;

        let port_id = PortId::try_from(<&str>::from_slice(&port_raw)?)?;
        let channel_id = ChannelId::try_from(<&str>::from_slice(channel_raw)?)?;

        Ok(ChannelIdentity::new(port_id, channel_id))
    }
}

impl<A, B> PrimaryKey for (A, B)
where
    A: PrimaryKey + Prefixer,
    B: PrimaryKey,
{
    type Output = (A::Output, B::Output);
    type Prefix = A;
    type Suffix = B;

    const KEY_ELEMS: u8 = A::KEY_ELEMS + B::KEY_ELEMS;

    fn raw_keys(&self) -> Vec<Cow<[u8]>> {
        let mut keys = self.0.raw_keys();
        keys.extend(self.1.raw_keys());
        keys
    }

    fn from_slice(bytes: &[u8]) -> StdResult<Self::Output> {
        let (a_raw, b_raw) = split_first_key(A::KEY_ELEMS, bytes)?;

        let a = A::from_slice(&a_raw)?;
        let b = B::from_slice(b_raw)?;

        Ok((a, b))
    }
}

/// Given a joined key, take the first `key_elems` raw keys off it.
///
/// Elements of the first key other than its last one keep their length
/// prefixes, so that the first key can itself be deserialized with
/// `from_slice`. Errors if the bytes are shorter than the length prefixes claim.
pub fn split_first_key(key_elems: u8, value: &[u8]) -> StdResult<(Vec<u8>, &[u8])> {
    let mut index = 0;
    let mut first_key = Vec::new();

    for i in 0..key_elems {
        let Some(len_slice) = value.get(index..index + 2) else {
            return Err(truncated_key(value));
        };
        index += 2;

        if i < key_elems - 1 {
            first_key.extend_from_slice(len_slice);
        }

        let elem_len = u16::from_be_bytes([len_slice[0], len_slice[1]]) as usize;
        let Some(elem) = value.get(index..index + elem_len) else {
            return Err(truncated_key(value));
        };
        first_key.extend_from_slice(elem);
        index += elem_len;
    }

    Ok((first_key, &value[index..]))
}

fn truncated_key(value: &[u8]) -> StdError {
    StdError::deserialize::<Vec<u8>, _>(
        "key",
        format!("length prefix exceeds remaining bytes ({} total)", value.len()),
    )
}

// ---------------------------------- prefix -----------------------------------

pub trait Prefixer {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>>;

    fn joined_prefix(&self) -> Vec<u8> {
        let raw_prefixes = self.raw_prefixes();
        nested_namespaces_with_key(None, &raw_prefixes, None)
    }
}

impl Prefixer for () {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        vec![]
    }
}

impl Prefixer for &str {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_bytes())]
    }
}

impl Prefixer for u64 {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Owned(self.to_be_bytes().to_vec())]
    }
}

impl Prefixer for ConnectionId {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        vec![Cow::Borrowed(self.as_bytes())]
    }
}

impl Prefixer for ChannelIdentity {
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        vec![
            Cow::Borrowed(self.port_id.as_bytes()),
            Cow::Borrowed(self.channel_id.as_bytes()),
        ]
    }
}

impl<P> Prefixer for &P
where
    P: Prefixer,
{
    fn raw_prefixes(&self) -> Vec<Cow<[u8]>> {
        (*self).raw_prefixes()
    }
}

// ----------------------------------- tests -----------------------------------
