use {conduit_channel::ChannelError, conduit_types::StdError, thiserror::Error};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DbError {
    #[error(transparent)]
    Std(#[from] StdError),

    #[error("cannot flush when changeset is already set")]
    ChangeSetAlreadySet,

    #[error("cannot commit when changeset is not yet set")]
    ChangeSetNotSet,

    #[error("no version has been committed yet")]
    NothingCommitted,

    #[error("version {version} is not yet committed! latest: {latest}")]
    VersionNotFound { version: u64, latest: u64 },

    #[error("version {version} has been pruned! oldest: {oldest}")]
    VersionPruned { version: u64, oldest: u64 },

    #[error("cannot prune up to version {up_to}! latest: {latest}")]
    InvalidPrune { up_to: u64, latest: u64 },
}

impl From<DbError> for ChannelError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::Std(err) => ChannelError::Std(err),
            _ => ChannelError::Db(err.to_string()),
        }
    }
}

pub type DbResult<T> = core::result::Result<T, DbError>;
