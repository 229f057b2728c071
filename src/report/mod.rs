//! Plain-text report assembled for every inbound request.
//!
//! ```text
//! Hi, I'm Rust/1.80.0 service running on 'web-1' host.
//!
//! Time is 2024-05-01T10:20:30+02:00
//!
//! Rendering https://whoami.local.test page
//!
//! request (1) - using 'reqwest' lib:
//!
//!     Hostname: srv1
//!     IP: 10.0.0.9
//! ...
//!
//! Thank you!
//! ```

use std::fmt::Display;

use chrono::{DateTime, Local, SecondsFormat, TimeZone};

use crate::app::{AppContext, ServiceIdentity};
use crate::fetcher::FetchOutcome;
use crate::parser::indent_line;

/// Append-only report text.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    text: String,
    sections: usize,
}

impl ReportBuilder {
    pub fn new<Tz>(identity: &ServiceIdentity, now: &DateTime<Tz>, url: &str) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let mut text = format!(
            "Hi, I'm {}/{} service running on '{}' host.\n\n",
            identity.name, identity.version, identity.hostname
        );
        text.push_str(&format!(
            "Time is {}\n\n",
            now.to_rfc3339_opts(SecondsFormat::Secs, false)
        ));
        text.push_str(&format!("Rendering {} page\n", url));

        Self { text, sections: 0 }
    }

    /// Appends the numbered section for one strategy's outcome.
    pub fn push_section(&mut self, name: &str, outcome: &FetchOutcome) {
        self.sections += 1;
        self.text.push_str(&format!(
            "\nrequest ({}) - using '{}' lib:\n\n",
            self.sections, name
        ));

        match outcome {
            Ok(body) => {
                self.text.push_str(body);
                self.text.push('\n');
            }
            Err(e) => {
                self.text
                    .push_str(&indent_line(&format!("# Error: ({}) {}\n", e.kind(), e)));
            }
        }
    }

    pub fn sections(&self) -> usize {
        self.sections
    }

    pub fn finish(mut self) -> String {
        self.text.push_str("\nThank you!\n");
        self.text
    }
}

/// Runs every strategy in order against the configured URL.
pub async fn build_report(ctx: &AppContext) -> String {
    build_report_at(ctx, Local::now()).await
}

pub async fn build_report_at<Tz>(ctx: &AppContext, now: DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let mut report = ReportBuilder::new(&ctx.identity, &now, &ctx.remote_url);

    for strategy in ctx.registry.iter() {
        let outcome = strategy.run(&ctx.remote_url, ctx.request_timeout).await;

        match &outcome {
            Ok(_) => tracing::debug!("Fetched {} with {}", ctx.remote_url, strategy.name),
            Err(e) => tracing::warn!(
                "Fetching {} with {} failed: ({}) {}",
                ctx.remote_url,
                strategy.name,
                e.kind(),
                e
            ),
        }

        report.push_section(strategy.name, &outcome);
    }

    report.finish()
}
