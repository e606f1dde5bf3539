use std::fmt;

/// フレーミングエラー
///
/// 1 バイトも受信する前に発生した失敗のみをエラーとして表面化する。
/// それ以外の異常 (バッファ超過、不正な Content-Length、ヘッダー終端未検出) は
/// エラーではなく、蓄積済みバイト列のベストエフォートな解釈に縮退する
/// (`FrameEnd` を参照)。
#[derive(Debug)]
pub enum FrameError {
    /// 1 バイトも受信する前にピアが接続を閉じた
    ConnectionClosedEarly,
    /// バイトソースからの読み取りエラー (タイムアウト含む)
    Io(std::io::Error),
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::ConnectionClosedEarly => {
                write!(f, "connection closed before any bytes were received")
            }
            FrameError::Io(e) => write!(f, "read error: {}", e),
        }
    }
}

impl std::error::Error for FrameError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrameError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for FrameError {
    fn from(e: std::io::Error) -> Self {
        FrameError::Io(e)
    }
}
