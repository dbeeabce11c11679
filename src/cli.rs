use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "soil-search")]
#[command(about = "Soil Search: static site server and plant identification proxy", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// 詳細ログを出力
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// サイトとプロキシを起動
    Serve {
        /// 公開ディレクトリ（デフォルト: 設定値 または ./site）
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// 待ち受けポート
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// 設定を表示
    Config {
        /// 設定を表示
        #[arg(long)]
        show: bool,
    },
}
