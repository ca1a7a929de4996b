use {
    crate::{setup_tracing_subscriber, TestSuite},
    conduit_channel::QueryConfig,
    conduit_db_memory::MemDb,
    tracing::Level,
};

pub const DEFAULT_TRACING_LEVEL: Option<Level> = Some(Level::INFO);

pub struct TestBuilder {
    tracing_level: Option<Level>,
    config: QueryConfig,
    genesis_blocks: u64,
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestBuilder {
    pub fn new() -> Self {
        Self {
            tracing_level: DEFAULT_TRACING_LEVEL,
            config: QueryConfig::default(),
            genesis_blocks: 1,
        }
    }

    // Setting this to `None` means no tracing.
    pub fn set_tracing_level(mut self, level: Option<Level>) -> Self {
        self.tracing_level = level;
        self
    }

    pub fn set_chain_id<T>(mut self, chain_id: T) -> Self
    where
        T: ToString,
    {
        self.config.chain_id = chain_id.to_string();
        self
    }

    pub fn set_page_limits(mut self, default: u32, max: u32) -> Self {
        self.config.default_page_limit = default;
        self.config.max_page_limit = max;
        self
    }

    pub fn set_max_candidate_sequences(mut self, max: usize) -> Self {
        self.config.max_candidate_sequences = max;
        self
    }

    pub fn set_config(mut self, config: QueryConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of empty blocks committed before the suite is handed out. Zero
    /// leaves the database without any committed height.
    pub fn set_genesis_blocks(mut self, count: u64) -> Self {
        self.genesis_blocks = count;
        self
    }

    pub fn build(self) -> anyhow::Result<TestSuite<MemDb>> {
        if let Some(tracing_level) = self.tracing_level {
            setup_tracing_subscriber(tracing_level);
        }

        self.config.validate()?;

        let mut suite = TestSuite::new(self.config);

        for _ in 0..self.genesis_blocks {
            suite.make_block();
        }

        tracing::info!(
            chain_id = suite.service.config().chain_id.as_str(),
            genesis_blocks = self.genesis_blocks,
            "Built test suite"
        );

        Ok(suite)
    }
}
