
/// Sends the tree's `log` output through `env_logger`, so `RUST_LOG=trace cargo test` shows which
/// rebalancing cases a test went through. Safe to call from every test.
pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
