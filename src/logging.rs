use tracing_subscriber::EnvFilter;

/// stderr로 출력하는 tracing 구독자를 설치한다. `RUST_LOG`가 없으면 warn 수준.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
