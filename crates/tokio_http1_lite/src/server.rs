//! HTTP サーバー
//!
//! tokio を使用した非同期 HTTP サーバー。接続は accept → フレーミング →
//! デコード → 診断レスポンス → クローズ、を 1 接続ずつ順番に処理する。
//! フレーミング中の接続は 1 本だけであり、Keep-Alive はサポートしない。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_http1_lite::Server;
//!
//! let mut server = Server::bind("0.0.0.0:8080").await?;
//! let request = server.receive_message().await?;
//! println!("{} {}", request.method(), request.path());
//! ```

use std::net::SocketAddr;
use std::time::Duration;

use shiguredo_http1_lite::{
    diagnostic_response, FrameLimits, FrameProgress, ParsedRequest, RawRequest, RequestFramer,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use crate::error::{Error, Result};

/// HTTP サーバー
///
/// 受信/送信メッセージ数と最後のクライアント情報を保持する。
pub struct Server {
    listener: TcpListener,
    max_message_size: usize,
    receive_timeout: Duration,
    read_buffer_size: usize,
    received_message_count: u64,
    sent_message_count: u64,
    last_client_addr: Option<SocketAddr>,
}

impl Server {
    /// 指定アドレスにバインド
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            max_message_size: FrameLimits::default().max_message_size,
            receive_timeout: Duration::ZERO,
            read_buffer_size: 8192,
            received_message_count: 0,
            sent_message_count: 0,
            last_client_addr: None,
        })
    }

    /// 1 リクエストの最大サイズを設定 (0 で無制限)
    pub fn max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// 受信タイムアウトを設定 (`Duration::ZERO` で無期限)
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// ローカルアドレスを取得
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// 接続を 1 つ受け付けてリクエストを受信する
    ///
    /// フレーミング完了後に診断レスポンスを書き戻して接続を閉じ、
    /// デコード済みリクエストを返す。タイムアウトが設定されている場合、
    /// 期限内に完了しなければ `Error::Timeout` になり、部分的な
    /// リクエストが返ることはない。
    pub async fn receive_message(&mut self) -> Result<ParsedRequest> {
        let (stream, peer_addr) = self.listener.accept().await?;
        self.last_client_addr = Some(peer_addr);

        let raw = self.frame_connection(stream, peer_addr).await?;

        let request = ParsedRequest::parse_with_client(
            raw.as_bytes(),
            &peer_addr.ip().to_string(),
            peer_addr.port(),
        );
        self.received_message_count += 1;
        Ok(request)
    }

    /// リクエストを受信し続ける
    ///
    /// accept の失敗はエラーとして返す。接続単位のエラー (タイムアウトや
    /// 早期切断) はログに出力して次の接続に進む。
    pub async fn serve(mut self) -> Result<()> {
        loop {
            match self.receive_message().await {
                Ok(_) => {}
                Err(Error::Io(e)) => return Err(Error::Io(e)),
                Err(e) => {
                    match self.last_client_addr {
                        Some(peer) => eprintln!("Connection error from {}: {}", peer, e),
                        None => eprintln!("Connection error: {}", e),
                    }
                }
            }
        }
    }

    /// 受信メッセージ数を取得
    pub fn received_message_count(&self) -> u64 {
        self.received_message_count
    }

    /// 送信メッセージ数を取得
    pub fn sent_message_count(&self) -> u64 {
        self.sent_message_count
    }

    /// 最後に接続したクライアントのアドレスを取得
    pub fn last_client_addr(&self) -> Option<SocketAddr> {
        self.last_client_addr
    }

    /// 統計カウンターをリセットする
    pub fn reset_statistics(&mut self) {
        self.received_message_count = 0;
        self.sent_message_count = 0;
    }

    /// 1 接続をフレーミングし、診断レスポンスを書き戻す
    async fn frame_connection(
        &mut self,
        mut stream: TcpStream,
        _peer_addr: SocketAddr,
    ) -> Result<RawRequest> {
        let limits = FrameLimits::with_max_message_size(self.max_message_size);
        let mut framer = RequestFramer::with_limits(limits);
        let mut buf = vec![0u8; self.read_buffer_size];

        loop {
            let n = self.read_some(&mut stream, &mut buf).await?;
            if n == 0 {
                framer.mark_eof()?;
                break;
            }
            if framer.feed(&buf[..n]) == FrameProgress::Complete {
                break;
            }
        }

        let raw = framer.into_raw();
        let request = ParsedRequest::parse(raw.as_bytes());
        stream.write_all(&diagnostic_response(&request)).await?;
        stream.flush().await?;
        stream.shutdown().await?;
        self.sent_message_count += 1;
        Ok(raw)
    }

    async fn read_some(&self, stream: &mut TcpStream, buf: &mut [u8]) -> Result<usize> {
        if self.receive_timeout.is_zero() {
            Ok(stream.read(buf).await?)
        } else {
            Ok(tokio::time::timeout(self.receive_timeout, stream.read(buf)).await??)
        }
    }
}
