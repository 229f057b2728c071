use std::sync::Arc;

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::report::build_report;
use crate::server::HttpServer;

pub async fn serve(ctx: AppContext, config: &Config) -> Result<()> {
    let addr = config.listen_socket_addr()?;

    tracing::info!(
        "Rendering {} through {} clients: {}",
        ctx.remote_url,
        ctx.registry.len(),
        ctx.registry.names().join(", ")
    );

    HttpServer::new(Arc::new(ctx)).run(addr).await
}

pub async fn probe(ctx: &AppContext) -> Result<()> {
    let report = build_report(ctx).await;
    print!("{}", report);
    Ok(())
}

pub fn print_default_config() {
    print!("{}", Config::default_config_content());
}
