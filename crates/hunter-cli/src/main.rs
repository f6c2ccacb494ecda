//! Command-line front end for the event discovery service.
//!
//! Composes a natural-language query from flags, streams it over the
//! WebSocket endpoint (or hits the synchronous endpoint with `--http`),
//! and prints the final markdown result to stdout. Progress goes to stderr
//! through the log facade; set `RUST_LOG=info` to watch a query run.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;
use clap::Parser;
use hunter_client::{QueryClient, SessionState, SessionSubscriber, Supervisor};
use hunter_core::query::{DateRange, QueryForm, Vertical};
use log::{debug, error, info};

#[derive(Parser, Debug)]
#[command(name = "hunter", about = "Find industry events through the discovery backend")]
struct Args {
    /// Streaming endpoint of the backend agent process.
    #[arg(long, default_value = "ws://127.0.0.1:8000/ws/query")]
    url: String,

    /// Use the synchronous endpoint at this URL instead of streaming.
    #[arg(long)]
    http: Option<String>,

    /// City, country, or region to search in.
    #[arg(long)]
    location: String,

    /// Industry vertical, e.g. "Fintech" or "Climate Tech".
    #[arg(long)]
    vertical: String,

    /// Earliest event date (YYYY-MM-DD).
    #[arg(long)]
    from: Option<NaiveDate>,

    /// Latest event date (YYYY-MM-DD).
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Companies that should be involved.
    #[arg(long)]
    companies: Option<String>,

    /// Free-form additional requirements.
    #[arg(long)]
    info: Option<String>,
}

/// Streams session progress to the log facade.
struct Progress;

#[async_trait::async_trait]
impl SessionSubscriber for Progress {
    async fn on_start(&self) {
        info!("response cycle started");
    }

    async fn on_result_updated(&self, result: &str) {
        info!("result updated ({} chars)", result.chars().count());
    }

    async fn on_fragment_discarded(&self, fragment: &str) {
        debug!(
            "discarded agent narration ({} chars)",
            fragment.chars().count()
        );
    }

    async fn on_complete(&self, _state: &SessionState) {
        info!("query complete");
    }

    async fn on_error(&self, message: &str) {
        error!("{message}");
    }
}

fn build_form(args: &Args) -> Result<QueryForm> {
    let vertical: Vertical = args.vertical.parse()?;
    let mut form = QueryForm::new(args.location.clone(), vertical);
    form.date_range = DateRange {
        from: args.from,
        to: args.to,
    };
    if let Some(companies) = &args.companies {
        form = form.with_companies(companies.clone());
    }
    if let Some(additional) = &args.info {
        form = form.with_additional_info(additional.clone());
    }
    form.validate()?;
    Ok(form)
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let form = build_form(&args)?;
    debug!("composed query: {}", form.compose());

    if let Some(endpoint) = &args.http {
        let url = endpoint.parse().context("invalid --http endpoint")?;
        let client = QueryClient::new(url);
        let response = client.query(form.compose()).await?;
        println!("{}", response.response);
        return Ok(());
    }

    let mut supervisor = Supervisor::connect(&args.url)
        .await
        .with_context(|| format!("could not reach the discovery service at {}", args.url))?;
    supervisor.add_subscriber(Arc::new(Progress));

    let state = supervisor.run_query(&form).await?.clone();
    supervisor.close().await;

    if !state.error.is_empty() {
        bail!("{}", state.error);
    }
    if state.result.is_empty() {
        bail!("the backend finished without producing a displayable result");
    }
    println!("{}", state.result);
    Ok(())
}
