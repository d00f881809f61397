mod health_checks;

use tracing::level_filters::LevelFilter;

pub(crate) fn setup_logging() {
    let _ = tracing_subscriber::FmtSubscriber::builder()
        .with_max_level(LevelFilter::DEBUG)
        .with_test_writer()
        .try_init();
}
