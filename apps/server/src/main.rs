use anyhow::Context;
use rsvp::domain::config::ApiConfig;
use rsvp::kernel::config::load_config;
use rsvp_logger::{LevelFilter, Logger};
use rsvp_server::Server;

#[rsvp_runtime::main(high_performance)]
async fn main() -> anyhow::Result<()> {
    let cfg: ApiConfig =
        load_config(Some("server")).context("Critical: Configuration is malformed")?;

    let level: LevelFilter = cfg.logging.level.parse().context("Invalid logging.level")?;
    let logger = Logger::builder().name(env!("CARGO_PKG_NAME")).level(level);
    let _log = match &cfg.logging.directory {
        Some(directory) if cfg.logging.json => logger.path(directory).json().init()?,
        Some(directory) => logger.path(directory).init()?,
        None => logger.init()?,
    };

    Server::builder().config(cfg).build().await?.run().await
}
