use clap::Parser;
use image_classify::client::PredictClient;
use image_classify::error::{ClassifyError, Result};
use image_classify::session::Session;
use image_classify::{cli, config, image_file, render};
use cli::{Cli, Commands};
use config::Config;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn spinner(message: String) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = Config::load()?;
    let api_url = config.api_url(cli.api_url.as_deref());

    match cli.command {
        Commands::Classify { image, model, json } => {
            let client = PredictClient::with_timeout(&api_url, config.timeout())?;
            let mut session = Session::new(client);
            session.choose_model(model.unwrap_or(config.default_model));

            let selected = image_file::load_image(&image).await?;
            if !json {
                println!("📷 {} ({} bytes)", selected.file_name, selected.len());
            }
            session.select_file(selected).await;

            let pb = spinner(format!("予測中... ({})", session.state().model().label()));
            let state = session.submit().await;
            pb.finish_and_clear();

            if let Some(message) = state.error() {
                return Err(ClassifyError::Prediction(message.to_string()));
            }

            match state.result() {
                Some(result) if json => println!("{}", serde_json::to_string_pretty(result)?),
                _ => render::print_state(state),
            }
        }

        Commands::Health => {
            let client = PredictClient::with_timeout(&api_url, config.timeout())?;
            println!("推論サービス: {}", client.base_url());

            let health = client
                .health()
                .await
                .map_err(|e| ClassifyError::unavailable(&e))?;
            println!("✔ status: {}", health.status);

            if let Ok(info) = client.service_info().await {
                println!("  {}", info.message);
                for (name, path) in &info.endpoints {
                    println!("  {:<10} {}", name, path);
                }
            }
        }

        Commands::Config { set_api_url, set_timeout, set_model, show } => {
            let mut config = config;
            let changed = set_api_url.is_some() || set_timeout.is_some() || set_model.is_some();

            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
            }
            if let Some(secs) = set_timeout {
                config.timeout_seconds = Some(secs);
            }
            if let Some(model) = set_model {
                config.default_model = model;
            }
            if changed {
                config.save()?;
                println!("✔ 設定を保存しました");
            }

            if show || !changed {
                println!("設定:");
                println!("  ベースURL: {}", config.api_url(cli.api_url.as_deref()));
                println!("  既定モデル: {}", config.default_model.label());
                match config.timeout_seconds {
                    Some(secs) => println!("  タイムアウト: {}秒", secs),
                    None => println!("  タイムアウト: 既定"),
                }
            }
        }
    }

    Ok(())
}
