use {
    crate::{ChannelError, ChannelResult},
    config::{Config, Environment, File},
    conduit_types::revision_number_from_chain_id,
    serde::{Deserialize, Serialize},
    std::path::Path,
};

/// Settings of the query service.
///
/// Loaded from a TOML file, with every field overridable by an environment
/// variable of the form `CONDUIT__<FIELD>`, e.g. `CONDUIT__MAX_PAGE_LIMIT=50`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct QueryConfig {
    /// Chain id of the host chain. Its `-{n}` suffix is the revision number
    /// attached to every height the service reports.
    pub chain_id: String,
    /// Page size used when a request doesn't specify one.
    pub default_page_limit: u32,
    /// Requested page sizes above this are clamped down to it.
    pub max_page_limit: u32,
    /// Upper bound on the number of sequences a reconciliation query may
    /// carry.
    pub max_candidate_sequences: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            chain_id: "conduit-1".to_string(),
            default_page_limit: 30,
            max_page_limit: 100,
            max_candidate_sequences: 10_000,
        }
    }
}

impl QueryConfig {
    pub fn load<P>(path: P) -> ChannelResult<Self>
    where
        P: AsRef<Path>,
    {
        let env_override = Environment::with_prefix("CONDUIT")
            .separator("__")
            .try_parsing(true);

        let config = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(env_override)
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> ChannelResult<()> {
        if self.default_page_limit == 0 || self.max_page_limit == 0 {
            return Err(ChannelError::Config("page limits must be positive".to_string()));
        }

        if self.default_page_limit > self.max_page_limit {
            return Err(ChannelError::Config(format!(
                "default page limit ({}) exceeds the maximum ({})",
                self.default_page_limit, self.max_page_limit
            )));
        }

        Ok(())
    }

    pub fn revision_number(&self) -> u64 {
        revision_number_from_chain_id(&self.chain_id)
    }

    /// Resolve the page size of a listing request.
    ///
    /// A zero limit is rejected. Limits above the maximum are clamped.
    pub fn page_limit(&self, requested: Option<u32>) -> ChannelResult<usize> {
        match requested {
            Some(0) => Err(ChannelError::invalid_argument("page limit must be positive")),
            Some(limit) => Ok(limit.min(self.max_page_limit) as usize),
            None => Ok(self.default_page_limit as usize),
        }
    }
}
