use {
    data_encoding::BASE64,
    std::{any::type_name, fmt::Display},
    thiserror::Error,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StdError {
    #[error("data not found! type: {ty}, storage key: {key}")]
    DataNotFound { ty: &'static str, key: String },

    #[error("invalid {ty} identifier `{id}`: {reason}")]
    InvalidIdentifier {
        ty: &'static str,
        id: String,
        reason: String,
    },

    #[error("value of type {ty} overflowed")]
    Overflow { ty: &'static str },

    #[error("failed to serialize! codec: {codec}, type: {ty}, reason: {reason}")]
    Serialize {
        codec: &'static str,
        ty: &'static str,
        reason: String,
    },

    #[error("failed to deserialize! codec: {codec}, type: {ty}, reason: {reason}")]
    Deserialize {
        codec: &'static str,
        ty: &'static str,
        reason: String,
    },
}

impl StdError {
    pub fn data_not_found<T>(key: &[u8]) -> Self {
        Self::DataNotFound {
            ty: type_name::<T>(),
            key: BASE64.encode(key),
        }
    }

    pub fn invalid_identifier<T, R>(id: &str, reason: R) -> Self
    where
        R: Display,
    {
        Self::InvalidIdentifier {
            ty: type_name::<T>(),
            id: id.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn overflow<T>() -> Self {
        Self::Overflow {
            ty: type_name::<T>(),
        }
    }

    pub fn serialize<T, R>(codec: &'static str, reason: R) -> Self
    where
        R: Display,
    {
        Self::Serialize {
            codec,
            ty: type_name::<T>(),
            reason: reason.to_string(),
        }
    }

    pub fn deserialize<T, R>(codec: &'static str, reason: R) -> Self
    where
        R: Display,
    {
        Self::Deserialize {
            codec,
            ty: type_name::<T>(),
            reason: reason.to_string(),
        }
    }
}

pub type StdResult<T> = core::result::Result<T, StdError>;
