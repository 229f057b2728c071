//! HTTP front end.
//!
//! Every GET, whatever its path, renders a fresh report.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::app::{AppContext, Result};
use crate::report::build_report;

pub struct HttpServer {
    ctx: Arc<AppContext>,
}

impl HttpServer {
    pub fn new(ctx: Arc<AppContext>) -> Self {
        Self { ctx }
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(report_handler))
            .route("/*path", get(report_handler))
            .with_state(self.ctx.clone())
            .layer(TraceLayer::new_for_http())
    }

    /// Bind `addr` and serve until Ctrl-C or SIGTERM.
    pub async fn run(&self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr).await?;
        info!("Server running on http://{}/", listener.local_addr()?);

        self.serve(listener, shutdown_signal()).await
    }

    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn report_handler(State(ctx): State<Arc<AppContext>>) -> impl IntoResponse {
    let report = build_report(&ctx).await;

    ([(header::CONTENT_TYPE, "text/plain; charset=utf-8")], report)
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = sigterm.recv() => {},
                    _ = tokio::signal::ctrl_c() => {},
                }
            }
            Err(e) => {
                tracing::warn!("Failed to set up SIGTERM handler: {}", e);
                let _ = tokio::signal::ctrl_c().await;
            }
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }

    info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ServiceIdentity;
    use crate::config::Config;
    use crate::fetcher::StrategyRegistry;

    #[tokio::test]
    async fn test_serves_report_on_any_path() {
        let ctx = AppContext::with_registry(
            &Config::default(),
            ServiceIdentity {
                name: "Rust".into(),
                version: "1.80.0".into(),
                hostname: "web-1".into(),
            },
            StrategyRegistry::new(vec![]),
        )
        .unwrap();
        let server = HttpServer::new(Arc::new(ctx));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async {
                    let _ = rx.await;
                })
                .await
        });

        for path in ["/", "/some/nested/path"] {
            let response = reqwest::get(format!("http://{}{}", addr, path)).await.unwrap();
            assert_eq!(response.status(), 200);
            assert_eq!(
                response.headers()[reqwest::header::CONTENT_TYPE],
                "text/plain; charset=utf-8"
            );
            let body = response.text().await.unwrap();
            assert!(body.starts_with("Hi, I'm Rust/1.80.0 service running on 'web-1' host."));
            assert!(body.ends_with("Thank you!\n"));
        }

        let response = reqwest::Client::new()
            .post(format!("http://{}/", addr))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 405);

        tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }
}
