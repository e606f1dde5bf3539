//! HTTP/1.x リクエストフレーマー (Sans I/O)
//!
//! 任意分割されたバイト列から 1 リクエスト分の境界を決定する。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http1_lite::{FrameEnd, FrameProgress, RequestFramer};
//!
//! let mut framer = RequestFramer::new();
//!
//! // 受信データを分割して投入 (終端はチャンク境界をまたいでよい)
//! assert_eq!(
//!     framer.feed(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r"),
//!     FrameProgress::Continue
//! );
//! assert_eq!(framer.feed(b"\nhello"), FrameProgress::Complete);
//!
//! let raw = framer.into_raw();
//! assert_eq!(raw.end(), FrameEnd::Complete);
//! assert!(raw.as_bytes().ends_with(b"hello"));
//! ```

use crate::buffer::RecvBuffer;
use crate::error::FrameError;
use crate::limits::FrameLimits;

/// フレーミングの進捗
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameProgress {
    /// まだデータが必要
    Continue,
    /// 1 リクエスト分の受信が完了
    Complete,
}

/// フレーミングの終了理由
///
/// `Complete` 以外はすべて縮退した解釈を表すが、いずれも
/// 蓄積済みバイト列は有効な `RawRequest` として取り出せる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameEnd {
    /// ヘッダー終端と宣言されたボディを完全に受信した
    Complete,
    /// 受信途中でピアが接続を閉じた (ベストエフォート)
    PeerClosed,
    /// メッセージが最大サイズを超えたため打ち切った
    BufferExhausted,
    /// ヘッダー終端が見つからないままバッファが満杯になった
    NoHeaderTerminator,
    /// Content-Length が数値としてパースできず、ヘッダーのみで打ち切った
    MalformedContentLength,
}

/// フレーミング済みの生リクエスト
///
/// 1 接続につき 1 回だけ生成される不変のバイト列。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRequest {
    bytes: Vec<u8>,
    end: FrameEnd,
}

impl RawRequest {
    /// 生バイト列を取得
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// 論理長 (バイト数) を取得
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// 空かどうか確認
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// フレーミングの終了理由を取得
    pub fn end(&self) -> FrameEnd {
        self.end
    }

    /// バイト列を取り出す
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// フレーミング状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FramePhase {
    /// ヘッダー終端待ち
    Headers,
    /// ボディ読み取り中
    Body {
        /// 完了に必要な総バイト数 (body_start + 期待ボディ長)
        target: usize,
        /// 宣言された Content-Length が上限を超えて切り詰められたか
        truncated: bool,
    },
    /// 完了
    Done(FrameEnd),
}

/// HTTP/1.x リクエストフレーマー (Sans I/O)
///
/// 接続から読み取ったバイト列を `feed` で投入し、ヘッダー終端の検出と
/// `Content-Length` に基づくボディ長の決定によって 1 リクエスト分の
/// 境界を判定する。I/O は呼び出し側が行う。
///
/// 不正な入力はエラーにせず、縮退した終了理由 (`FrameEnd`) として記録する。
/// ハードエラーは「1 バイトも受信せずに EOF」の場合のみ (`mark_eof`)。
#[derive(Debug)]
pub struct RequestFramer {
    buf: RecvBuffer,
    phase: FramePhase,
}

impl Default for RequestFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestFramer {
    /// デフォルトの制限でフレーマーを作成
    pub fn new() -> Self {
        Self::with_limits(FrameLimits::default())
    }

    /// 制限付きでフレーマーを作成
    pub fn with_limits(limits: FrameLimits) -> Self {
        Self {
            buf: RecvBuffer::new(limits.ceiling()),
            phase: FramePhase::Headers,
        }
    }

    /// 受信データを投入する
    ///
    /// 投入のたびに蓄積済みバッファ全体を再走査する
    /// (ヘッダー終端はチャンク境界をまたぐことがある)。
    /// 完了後の呼び出しは何もせず `Complete` を返す。
    pub fn feed(&mut self, data: &[u8]) -> FrameProgress {
        if matches!(self.phase, FramePhase::Done(_)) {
            return FrameProgress::Complete;
        }

        self.buf.push(data);
        self.scan();

        match self.phase {
            FramePhase::Done(_) => FrameProgress::Complete,
            _ => FrameProgress::Continue,
        }
    }

    /// バイトソースの EOF を通知する
    ///
    /// 1 バイトも受信していない場合は `ConnectionClosedEarly` エラー。
    /// 何か受信済みであれば、蓄積分を完全なメッセージとして扱う
    /// (ベストエフォート)。
    pub fn mark_eof(&mut self) -> Result<FrameProgress, FrameError> {
        match self.phase {
            FramePhase::Done(_) => Ok(FrameProgress::Complete),
            _ if self.buf.is_empty() => Err(FrameError::ConnectionClosedEarly),
            _ => {
                self.phase = FramePhase::Done(FrameEnd::PeerClosed);
                Ok(FrameProgress::Complete)
            }
        }
    }

    /// フレーミングが完了しているか確認
    pub fn is_complete(&self) -> bool {
        matches!(self.phase, FramePhase::Done(_))
    }

    /// 終了理由を取得 (未完了の場合は `None`)
    pub fn end(&self) -> Option<FrameEnd> {
        match self.phase {
            FramePhase::Done(end) => Some(end),
            _ => None,
        }
    }

    /// 蓄積済みバイト数を取得
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// フレーマーを消費して生リクエストを取り出す
    ///
    /// 未完了のまま呼ばれた場合は `PeerClosed` 扱いの
    /// ベストエフォート結果になる。
    pub fn into_raw(self) -> RawRequest {
        let end = match self.phase {
            FramePhase::Done(end) => end,
            _ => FrameEnd::PeerClosed,
        };
        RawRequest {
            bytes: self.buf.into_vec(),
            end,
        }
    }

    /// 蓄積済みバッファを走査して状態を進める
    fn scan(&mut self) {
        if let FramePhase::Headers = self.phase {
            let Some((offset, terminator_len)) = find_header_terminator(self.buf.as_slice())
            else {
                // 終端未検出のままバッファが満杯なら、ここで打ち切る
                // (パース失敗ではなく意図的な寛容さ)
                if self.buf.is_full() {
                    self.phase = FramePhase::Done(FrameEnd::NoHeaderTerminator);
                }
                return;
            };

            let body_start = offset + terminator_len;
            let (expected, malformed) =
                match extract_content_length(&self.buf.as_slice()[..offset]) {
                    ContentLength::Missing => (0, false),
                    ContentLength::Declared(len) => (len, false),
                    ContentLength::Malformed => (0, true),
                };

            if malformed {
                // 追加ボディなしとして打ち切る (クラッシュさせない)
                self.phase = FramePhase::Done(FrameEnd::MalformedContentLength);
                return;
            }

            // 宣言長が上限を超える場合は収まる分まで切り詰める
            let limit = self.buf.limit();
            let (target, truncated) = match body_start.checked_add(expected) {
                Some(target) if target <= limit => (target, false),
                _ => (limit, true),
            };

            self.phase = FramePhase::Body { target, truncated };
        }

        if let FramePhase::Body { target, truncated } = self.phase {
            if self.buf.len() >= target {
                let end = if truncated {
                    FrameEnd::BufferExhausted
                } else {
                    FrameEnd::Complete
                };
                self.phase = FramePhase::Done(end);
            }
        }
    }
}

/// ヘッダー終端を探す
///
/// `\r\n\r\n` を優先し、見つからなければ緩い `\n\n` も受け付ける。
/// 戻り値は (終端開始オフセット, 終端長)。
fn find_header_terminator(buf: &[u8]) -> Option<(usize, usize)> {
    if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
        return Some((pos, 4));
    }
    buf.windows(2)
        .position(|w| w == b"\n\n")
        .map(|pos| (pos, 2))
}

/// Content-Length 抽出の結果
enum ContentLength {
    Missing,
    Declared(usize),
    Malformed,
}

/// ヘッダー部から Content-Length を抽出する
///
/// リテラル `"Content-Length:"` の大文字小文字を区別した部分文字列検索
/// (元実装の挙動を保存)。値は行末までを取り出し、前後の空白/タブを
/// 取り除いてからパースする。
fn extract_content_length(head: &[u8]) -> ContentLength {
    const NEEDLE: &[u8] = b"Content-Length:";

    let Some(pos) = head.windows(NEEDLE.len()).position(|w| w == NEEDLE) else {
        return ContentLength::Missing;
    };

    let rest = &head[pos + NEEDLE.len()..];
    let line_end = rest
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(rest.len());

    let value: &[u8] = trim_ascii_spaces(&rest[..line_end]);
    if value.is_empty() || !value.iter().all(u8::is_ascii_digit) {
        return ContentLength::Malformed;
    }

    match std::str::from_utf8(value).ok().and_then(|s| s.parse().ok()) {
        Some(len) => ContentLength::Declared(len),
        None => ContentLength::Malformed, // usize オーバーフロー
    }
}

/// 前後のスペース/タブを取り除く
fn trim_ascii_spaces(mut bytes: &[u8]) -> &[u8] {
    while let [b' ' | b'\t', rest @ ..] = bytes {
        bytes = rest;
    }
    while let [rest @ .., b' ' | b'\t'] = bytes {
        bytes = rest;
    }
    bytes
}

/// バイトソースから 1 リクエスト分をフレーミングする
///
/// `std::io::Read` に対するブロッキングの便利関数。非同期 I/O では
/// `RequestFramer` を直接使う (tokio_http1_lite クレートを参照)。
///
/// 読み取りが 0 バイトを返した時点で EOF とみなす。1 バイトも受信する前の
/// EOF は `ConnectionClosedEarly`、読み取りエラー (タイムアウト含む) は
/// `Io` として返す。
pub fn frame<R: std::io::Read>(
    source: &mut R,
    limits: FrameLimits,
) -> Result<RawRequest, FrameError> {
    let mut framer = RequestFramer::with_limits(limits);
    let mut chunk = [0u8; 8192];

    loop {
        let n = source.read(&mut chunk)?;
        if n == 0 {
            framer.mark_eof()?;
            break;
        }
        if let FrameProgress::Complete = framer.feed(&chunk[..n]) {
            break;
        }
    }

    Ok(framer.into_raw())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_headers_only() {
        let mut framer = RequestFramer::new();
        let progress = framer.feed(b"GET / HTTP/1.1\r\nHost: example.com\r\n\r\n");
        assert_eq!(progress, FrameProgress::Complete);
        assert_eq!(framer.end(), Some(FrameEnd::Complete));
    }

    #[test]
    fn frame_with_content_length() {
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\n"),
            FrameProgress::Continue
        );
        assert_eq!(framer.feed(b"hel"), FrameProgress::Continue);
        assert_eq!(framer.feed(b"lo"), FrameProgress::Complete);

        let raw = framer.into_raw();
        assert_eq!(raw.end(), FrameEnd::Complete);
        assert!(raw.as_bytes().ends_with(b"hello"));
    }

    #[test]
    fn terminator_straddles_chunk_boundary() {
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"GET / HTTP/1.1\r\nHost: a\r\n\r"),
            FrameProgress::Continue
        );
        assert_eq!(framer.feed(b"\n"), FrameProgress::Complete);
        assert_eq!(framer.end(), Some(FrameEnd::Complete));
    }

    #[test]
    fn accepts_bare_lf_terminator() {
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"GET / HTTP/1.1\nHost: a\n\n"),
            FrameProgress::Complete
        );
        assert_eq!(framer.end(), Some(FrameEnd::Complete));
    }

    #[test]
    fn content_length_value_is_trimmed() {
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"POST / HTTP/1.1\r\nContent-Length: \t 3 \r\n\r\nabc"),
            FrameProgress::Complete
        );
        assert_eq!(framer.end(), Some(FrameEnd::Complete));
    }

    #[test]
    fn content_length_search_is_case_sensitive() {
        // 小文字の "content-length:" はリテラル検索にかからず、
        // ヘッダーのみのメッセージとして完了する (元実装の挙動を保存)
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"POST / HTTP/1.1\r\ncontent-length: 5\r\n\r\n"),
            FrameProgress::Complete
        );
        assert_eq!(framer.end(), Some(FrameEnd::Complete));
    }

    #[test]
    fn malformed_content_length_degrades_to_headers_only() {
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"POST / HTTP/1.1\r\nContent-Length: abc\r\n\r\n"),
            FrameProgress::Complete
        );
        assert_eq!(framer.end(), Some(FrameEnd::MalformedContentLength));
    }

    #[test]
    fn declared_length_truncated_at_limit() {
        let head = b"POST / HTTP/1.1\r\nContent-Length: 1000\r\n\r\n";
        let limit = head.len() + 10;
        let mut framer = RequestFramer::with_limits(FrameLimits::with_max_message_size(limit));
        assert_eq!(framer.feed(head), FrameProgress::Continue);
        assert_eq!(framer.feed(&[b'x'; 10]), FrameProgress::Complete);

        let raw = framer.into_raw();
        assert_eq!(raw.end(), FrameEnd::BufferExhausted);
        assert_eq!(raw.len(), limit);
    }

    #[test]
    fn buffer_full_without_terminator() {
        let mut framer = RequestFramer::with_limits(FrameLimits::with_max_message_size(16));
        assert_eq!(
            framer.feed(b"GET /aaaaaaaaaaaaaaaaaaaaaaaa HTTP/1.1"),
            FrameProgress::Complete
        );

        let raw = framer.into_raw();
        assert_eq!(raw.end(), FrameEnd::NoHeaderTerminator);
        assert_eq!(raw.len(), 16);
    }

    #[test]
    fn eof_before_any_bytes_is_an_error() {
        let mut framer = RequestFramer::new();
        assert!(matches!(
            framer.mark_eof(),
            Err(FrameError::ConnectionClosedEarly)
        ));
    }

    #[test]
    fn eof_after_partial_body_is_best_effort() {
        let mut framer = RequestFramer::new();
        assert_eq!(
            framer.feed(b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nabc"),
            FrameProgress::Continue
        );
        assert_eq!(framer.mark_eof().unwrap(), FrameProgress::Complete);

        let raw = framer.into_raw();
        assert_eq!(raw.end(), FrameEnd::PeerClosed);
        assert!(raw.as_bytes().ends_with(b"abc"));
    }

    #[test]
    fn frame_reader_roundtrip() {
        let bytes = b"POST / HTTP/1.1\r\nContent-Length: 5\r\n\r\nhello";
        let mut cursor = std::io::Cursor::new(&bytes[..]);
        let raw = frame(&mut cursor, FrameLimits::default()).unwrap();
        assert_eq!(raw.end(), FrameEnd::Complete);
        assert_eq!(raw.as_bytes(), bytes);
    }

    #[test]
    fn frame_reader_empty_stream() {
        let mut cursor = std::io::Cursor::new(&b""[..]);
        assert!(matches!(
            frame(&mut cursor, FrameLimits::default()),
            Err(FrameError::ConnectionClosedEarly)
        ));
    }
}
