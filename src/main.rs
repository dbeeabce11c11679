use anyhow::Context;
use clap::Parser;
use soil_search::{cli, config, server};
use cli::{Cli, Commands};
use config::Config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load().context("設定の読み込みに失敗しました")?;

    match cli.command {
        Commands::Serve { root, port } => {
            if let Some(root) = root {
                config.root = root;
            }
            if let Some(port) = port {
                config.port = port;
            }
            server::run(config).await?;
        }

        Commands::Config { show } => {
            if show {
                println!("設定:");
                println!("  設定ファイル: {}", Config::config_path()?.display());
                println!("  ポート: {}", config.port);
                println!("  公開ディレクトリ: {}", config.root.display());
                println!("  上流API: {}", config.upstream_url);
                println!("  タイムアウト: {}秒", config.timeout_seconds);
                println!(
                    "  APIキー: {}",
                    if config.has_api_key() { "設定済み" } else { "未設定" }
                );
            } else {
                println!("`soil-search config --show` で設定を表示します");
            }
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
