//! # shiguredo_http1_lite
//!
//! 依存なしの HTTP/1.x リクエストフレーミング/パースライブラリ (Sans I/O)
//!
//! ## 特徴
//!
//! - **依存なし**: 標準ライブラリのみ使用
//! - **Sans I/O**: フレーミングの状態機械を I/O から完全に分離した設計
//! - **寛容なパース**: 不完全/不正なリクエストもベストエフォートで解釈
//!
//! ## 使い方
//!
//! ### フレーミング (バイトストリームからリクエスト 1 件を切り出す)
//!
//! ```rust
//! use shiguredo_http1_lite::{FrameEnd, FrameProgress, RequestFramer};
//!
//! let mut framer = RequestFramer::new();
//!
//! // 受信データを到着順に feed する (分割の仕方は任意)
//! framer.feed(b"GET /search?q=hello HTTP/1.1\r\nHost: exa");
//! let progress = framer.feed(b"mple.com\r\n\r\n");
//! assert_eq!(progress, FrameProgress::Complete);
//!
//! let raw = framer.into_raw();
//! assert_eq!(raw.end(), FrameEnd::Complete);
//! ```
//!
//! ### デコード (切り出したバイト列を構造化する)
//!
//! ```rust
//! use shiguredo_http1_lite::{HttpMethod, ParsedRequest};
//!
//! let raw = b"GET /search?q=hello HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let request = ParsedRequest::parse(raw);
//!
//! assert_eq!(request.method(), HttpMethod::Get);
//! assert_eq!(request.path(), "/search");
//! assert_eq!(request.query_parameter("q"), Some("hello"));
//! assert_eq!(request.get_header("HOST"), Some("example.com"));
//! ```
//!
//! tokio での非同期サーバーは `tokio_http1_lite` クレートを参照。

mod buffer;
mod error;
mod framer;
mod limits;
mod method;
mod request;
mod responder;

pub use buffer::RecvBuffer;
pub use error::FrameError;
pub use framer::{frame, FrameEnd, FrameProgress, RawRequest, RequestFramer};
pub use limits::FrameLimits;
pub use method::HttpMethod;
pub use request::ParsedRequest;
pub use responder::diagnostic_response;
