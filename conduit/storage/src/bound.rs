use crate::PrimaryKey;

/// One end of an iteration range. A missing end (`None`) means the range is
/// open on that side.
pub enum Bound<K> {
    Inclusive(K),
    Exclusive(K),
}

/// A [`Bound`] whose key has already been joined into raw bytes.
pub enum RawBound {
    Inclusive(Vec<u8>),
    Exclusive(Vec<u8>),
}

impl<K> From<Bound<K>> for RawBound
where
    K: PrimaryKey,
{
    fn from(bound: Bound<K>) -> Self {
        match bound {
            Bound::Inclusive(key) => Self::Inclusive(key.joined_key()),
            Bound::Exclusive(key) => Self::Exclusive(key.joined_key()),
        }
    }
}
