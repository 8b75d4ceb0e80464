//! Backend Binary
//!
//! Serves the authentication API on BIND_ADDR (e.g. 0.0.0.0:8888).
//! Run with `--help` for every flag and its environment variable.

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = rlt_server::Config::load();
    rlt_core::log()?;
    rlt_core::kys();
    rlt_server::run(config).await
}
