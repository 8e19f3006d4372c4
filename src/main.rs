use anyhow::Result;
use clap::Parser;
use std::time::Duration;
use tracing::error;

use pageviews::{
    analyze_log, print_analysis_results,
    utils::{setup_logging, validate_args},
    Args, HttpSource, LocalFileSource, LogSource,
};

fn build_source(args: &Args) -> Result<Box<dyn LogSource>> {
    let source: Box<dyn LogSource> = match (&args.url, args.timeout_secs) {
        (Some(url), Some(secs)) => Box::new(HttpSource::with_timeout(
            url.clone(),
            Duration::from_secs(secs),
        )?),
        (Some(url), None) => Box::new(HttpSource::new(url.clone())?),
        (None, _) => Box::new(LocalFileSource::new(&args.log)),
    };
    Ok(source)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    setup_logging(args.verbose);

    validate_args(&args)?;

    let source = build_source(&args)?;

    match analyze_log(source, args.workers).await {
        Ok(result) => print_analysis_results(&result, &args),
        Err(e) => {
            error!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
