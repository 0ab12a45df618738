use std::sync::Arc;

use log::info;

/// The immutable service context
pub mod context;

/// Page models and rendering
pub mod pages;

/// Routes and handlers
pub mod routes;

pub use context::Context;

/// The port the service binds by default
pub static DEFAULT_PORT: u16 = 4000;

/// Bind all interfaces on the given port and serve requests until shutdown
pub async fn serve(context: Context, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;

    info!("Serving on {}", listener.local_addr()?);

    axum::serve(listener, routes::router(Arc::new(context))).await?;

    Ok(())
}
