use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志：优先读取 `RUST_LOG`，缺省 `info`；重复调用无副作用
pub fn init_logging() {
    init_logging_with("info");
}

pub fn init_logging_with(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    let _ = fmt().with_env_filter(filter).try_init();
}
