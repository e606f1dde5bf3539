//! tokio_http1_lite - Tokio integration for shiguredo_http1_lite
//!
//! tokio を使用した非同期 HTTP リクエスト受信ライブラリ。
//!
//! ## 特徴
//!
//! - **shiguredo_http1_lite ベース**: Sans I/O ライブラリをベースにした設計
//! - **非同期 I/O**: tokio による完全非同期対応
//! - **1 接続 1 リクエスト**: accept → フレーミング → デコード →
//!   診断レスポンス → クローズ、を順番に処理
//!
//! ## サーバー
//!
//! ```ignore
//! use tokio_http1_lite::Server;
//!
//! let mut server = Server::bind("0.0.0.0:8080").await?
//!     .receive_timeout(std::time::Duration::from_secs(5));
//!
//! let request = server.receive_message().await?;
//! println!("{} {}", request.method(), request.path());
//! ```

pub mod error;
pub mod server;

pub use error::{Error, Result};
pub use server::Server;

// shiguredo_http1_lite の型を re-export
pub use shiguredo_http1_lite::{FrameEnd, HttpMethod, ParsedRequest};
