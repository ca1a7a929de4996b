use {
    crate::{StdError, StdResult},
    borsh::{BorshDeserialize, BorshSerialize},
    serde::{
        Deserialize, Serialize,
        de::{self, Error},
    },
    std::{
        fmt::{self, Display, Formatter},
        io,
        ops::{Deref, RangeInclusive},
        str::FromStr,
    },
};

/// Check an identifier against the host identifier rules: its length must be
/// within the given bounds, and it may only contain alphanumerics and the
/// characters `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`.
fn validate_identifier<T>(id: &str, bounds: RangeInclusive<usize>) -> StdResult<()> {
    if id.is_empty() {
        return Err(StdError::invalid_identifier::<T, _>(id, "empty"));
    }

    if !bounds.contains(&id.len()) {
        return Err(StdError::invalid_identifier::<T, _>(
            id,
            format!(
                "length {} is outside of {}..={}",
                id.len(),
                bounds.start(),
                bounds.end()
            ),
        ));
    }

    if let Some(ch) = id.chars().find(|ch| !is_valid_char(*ch)) {
        return Err(StdError::invalid_identifier::<T, _>(
            id,
            format!("invalid character `{ch}`"),
        ));
    }

    Ok(())
}

fn is_valid_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '.' | '_' | '+' | '-' | '#' | '[' | ']' | '<' | '>')
}

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident, $bounds:expr) => {
        $(#[$meta])*
        #[derive(Serialize, BorshSerialize, Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            pub const LENGTH_BOUNDS: RangeInclusive<usize> = $bounds;

            pub fn new_unchecked<T>(s: T) -> Self
            where
                T: Into<String>,
            {
                Self(s.into())
            }

            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                self.0.as_str()
            }
        }

        impl Deref for $name {
            type Target = str;

            fn deref(&self) -> &Self::Target {
                self.0.as_str()
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl TryFrom<String> for $name {
            type Error = StdError;

            fn try_from(s: String) -> StdResult<Self> {
                validate_identifier::<Self>(&s, Self::LENGTH_BOUNDS)?;
                Ok(Self(s))
            }
        }

        impl TryFrom<&str> for $name {
            type Error = StdError;

            fn try_from(s: &str) -> StdResult<Self> {
                Self::try_from(s.to_string())
            }
        }

        impl FromStr for $name {
            type Err = StdError;

            fn from_str(s: &str) -> StdResult<Self> {
                Self::try_from(s.to_string())
            }
        }

        impl<'de> de::Deserialize<'de> for $name {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: de::Deserializer<'de>,
            {
                <String as de::Deserialize>::deserialize(deserializer)?
                    .try_into()
                    .map_err(D::Error::custom)
            }
        }

        impl BorshDeserialize for $name {
            fn deserialize_reader<R>(reader: &mut R) -> io::Result<Self>
            where
                R: io::Read,
            {
                <String as BorshDeserialize>::deserialize_reader(reader)?
                    .try_into()
                    .map_err(io::Error::other)
            }
        }
    };
}

identifier! {
    /// Identifier of a port, e.g. `transfer`.
    PortId, 2..=128
}

identifier! {
    /// Identifier of a channel end on a port, conventionally `channel-{n}`.
    ChannelId, 8..=64
}

identifier! {
    /// Identifier of a connection, conventionally `connection-{n}`.
    ConnectionId, 10..=64
}

identifier! {
    /// Identifier of a light client, `{client type}-{n}`, e.g. `07-tendermint-0`.
    ClientId, 9..=64
}

impl ChannelId {
    pub fn with_index(index: u64) -> Self {
        Self(format!("channel-{index}"))
    }
}

impl ConnectionId {
    pub fn with_index(index: u64) -> Self {
        Self(format!("connection-{index}"))
    }
}

impl ClientId {
    pub fn with_index(client_type: &str, index: u64) -> Self {
        Self(format!("{client_type}-{index}"))
    }
}

// ----------------------------- channel identity ------------------------------

/// The `(port, channel)` pair that uniquely addresses a channel end.
#[derive(
    Serialize,
    Deserialize,
    BorshSerialize,
    BorshDeserialize,
    Debug,
    Clone,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
)]
pub struct ChannelIdentity {
    pub port_id: PortId,
    pub channel_id: ChannelId,
}

impl ChannelIdentity {
    pub fn new(port_id: PortId, channel_id: ChannelId) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    /// Parse and validate both halves.
    pub fn parse(port_id: &str, channel_id: &str) -> StdResult<Self> {
        Ok(Self {
            port_id: port_id.parse()?,
            channel_id: channel_id.parse()?,
        })
    }
}

impl Display for ChannelIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.port_id, self.channel_id)
    }
}
