/// CLI Indexes: Annotators
pub mod annotators;

pub use annotators::Annotators;

/// Initialize logging from `RUST_LOG`, falling back to `info`
pub fn init_logger() {
    let filters = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

    pretty_env_logger::formatted_builder()
        .parse_filters(&filters)
        .init();
}
