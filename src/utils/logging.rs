//! Logging - Tracing Subscriber Setup

/// Initialize the global tracing subscriber
///
/// Safe to call more than once; later calls are no-ops. Host
/// applications that install their own subscriber simply skip this.
pub fn init() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .try_init();
}
