use {
    std::sync::Once,
    tracing::Level,
    tracing_subscriber::{EnvFilter, FmtSubscriber},
};

static TRACING: Once = Once::new();

/// Install a global tracing subscriber at the given level.
///
/// Tests in one binary share the global subscriber, so only the first call
/// takes effect.
pub fn setup_tracing_subscriber(level: Level) {
    TRACING.call_once(|| {
        let filter = EnvFilter::new(level.to_string());
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(filter)
            .with_test_writer()
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .expect("failed to set global tracing subscriber");
    });
}
