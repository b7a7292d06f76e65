use spss_access::AccessError;
use spss_core::{ConnectError, ReportError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

/// Message for the person at the terminal
fn user_message(err: &anyhow::Error) -> String {
    if let Some(e) = err.downcast_ref::<ConnectError>() {
        return e.user_message();
    }
    if let Some(e) = err.downcast_ref::<AccessError>() {
        return e.user_message().to_string();
    }
    if let Some(e) = err.downcast_ref::<ReportError>() {
        return e.user_message();
    }
    format!("{err:#}")
}

#[tokio::main]
async fn main() {
    let matches = spss_cli::cli().get_matches();
    init_tracing(spss_cli::wants_json_logs(&matches));

    match spss_cli::run(&matches).await {
        Ok(output) => print!("{output}"),
        Err(err) => {
            tracing::error!(error = %format!("{err:#}"), "command failed");
            eprintln!("{}", user_message(&err));
            std::process::exit(1);
        }
    }
}
