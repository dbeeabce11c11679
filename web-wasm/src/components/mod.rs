//! UIコンポーネント

pub mod header;
