//! Domain layer
//!
//! Hub とクライアントが共有する型を定義します。
//!
//! - `ClientId`: 接続ごとの不透明な識別子
//! - `normalize_message`: ブロードキャスト前のメッセージ正規化
//! - `ConnectionReader` / `ConnectionWriter`: 接続の読み取り側・書き込み側の抽象化

pub mod client_id;
pub mod connection;
pub mod message;

pub use client_id::ClientId;
pub use connection::{ConnectionError, ConnectionReader, ConnectionWriter, Frame};
pub use message::normalize_message;

#[cfg(test)]
pub use connection::MockConnectionWriter;
