use {
    crate::{ChannelError, ChannelResult},
    borsh::{BorshDeserialize, BorshSerialize},
    conduit_types::{BorshDeExt, BorshSerExt, ChannelIdentity, ConnectionId, Height},
    data_encoding::BASE64URL_NOPAD,
    serde::{Deserialize, Serialize},
    serde_with::skip_serializing_none,
    std::fmt::{self, Display, Formatter},
};

// ---------------------------------- listing ----------------------------------

/// One page of a listing read straight from storage.
///
/// `last_key` is the key of the last item if more items follow, `None` if the
/// listing is exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Listing<T> {
    pub items: Vec<T>,
    pub last_key: Option<u64>,
}

impl<T> Listing<T> {
    /// Collect at most `limit` items from an iterator of `(key, item)` pairs
    /// sorted by key. One extra item is pulled to tell whether the listing
    /// continues.
    pub fn collect<I>(iter: I, limit: usize) -> ChannelResult<Self>
    where
        I: Iterator<Item = ChannelResult<(u64, T)>>,
    {
        let mut items = Vec::with_capacity(limit);
        let mut last_key = None;
        let mut has_more = false;

        for res in iter.take(limit + 1) {
            let (key, item) = res?;

            if items.len() == limit {
                has_more = true;
                break;
            }

            items.push(item);
            last_key = Some(key);
        }

        Ok(Self {
            items,
            last_key: if has_more { last_key } else { None },
        })
    }
}

// ---------------------------------- cursor -----------------------------------

/// Names the listing a cursor belongs to.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum CursorKind {
    Channels,
    ConnectionChannels(ConnectionId),
    Commitments(ChannelIdentity),
    Acknowledgements(ChannelIdentity),
}

impl Display for CursorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CursorKind::Channels => write!(f, "channels"),
            CursorKind::ConnectionChannels(connection_id) => {
                write!(f, "channels of connection {connection_id}")
            },
            CursorKind::Commitments(channel) => write!(f, "commitments of {channel}"),
            CursorKind::Acknowledgements(channel) => write!(f, "acknowledgements of {channel}"),
        }
    }
}

/// What a cursor carries: the listing, the height it was produced at, and the
/// key of the last item already returned.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub struct CursorData {
    pub kind: CursorKind,
    pub height: Height,
    pub last_key: u64,
}

/// An opaque pagination cursor.
///
/// Callers must treat it as an arbitrary string and hand it back unchanged.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    pub fn new<T>(text: T) -> Self
    where
        T: Into<String>,
    {
        Self(text.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn encode(data: &CursorData) -> ChannelResult<Self> {
        let bytes = data.to_borsh_vec()?;
        Ok(Self(BASE64URL_NOPAD.encode(&bytes)))
    }

    pub fn decode(&self) -> ChannelResult<CursorData> {
        let bytes = BASE64URL_NOPAD
            .decode(self.0.as_bytes())
            .map_err(ChannelError::invalid_cursor)?;

        bytes.deserialize_borsh().map_err(ChannelError::invalid_cursor)
    }
}

impl Display for Cursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------- request ----------------------------------

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct PageRequest {
    /// Cursor returned by the previous page; `None` for the first page.
    pub cursor: Option<Cursor>,
    /// Maximum number of items; the configured default if unspecified.
    pub limit: Option<u32>,
}

impl PageRequest {
    pub fn first(limit: u32) -> Self {
        Self {
            cursor: None,
            limit: Some(limit),
        }
    }

    pub fn after(cursor: Cursor, limit: Option<u32>) -> Self {
        Self {
            cursor: Some(cursor),
            limit,
        }
    }
}

// --------------------------------- response ----------------------------------

#[skip_serializing_none]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Cursor of the next page; `None` exactly when the listing is exhausted.
    pub next: Option<Cursor>,
    /// The height every item of the page was read at.
    pub height: Height,
}

impl<T> Page<T> {
    /// Turn a storage listing into a page, producing a cursor for the next one
    /// if the listing continues.
    pub fn from_listing(
        listing: Listing<T>,
        kind: CursorKind,
        height: Height,
    ) -> ChannelResult<Self> {
        let next = listing
            .last_key
            .map(|last_key| {
                Cursor::encode(&CursorData {
                    kind,
                    height,
                    last_key,
                })
            })
            .transpose()?;

        Ok(Self {
            items: listing.items,
            next,
            height,
        })
    }
}

// ----------------------------------- tests -----------------------------------
