//! Soil Search サーバー
//!
//! 静的サイトの配信と、植物判定APIへのプロキシ

pub mod cli;
pub mod config;
pub mod error;
pub mod proxy;
pub mod server;
pub mod static_files;
