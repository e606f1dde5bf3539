/// フレーミングの制限設定
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameLimits {
    /// 最大メッセージサイズ (バイト、デフォルト: 88192)
    ///
    /// 0 は「実質無制限」を意味し、内部上限 (100MB) まで受信する。
    pub max_message_size: usize,
}

/// max_message_size が 0 のときの内部上限 (100MB)
pub(crate) const UNBOUNDED_CEILING: usize = 100 * 1024 * 1024;

impl Default for FrameLimits {
    fn default() -> Self {
        Self {
            max_message_size: 88_192,
        }
    }
}

impl FrameLimits {
    /// 指定した最大メッセージサイズで制限を作成
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self { max_message_size }
    }

    /// 実質無制限の設定を作成 (内部上限 100MB)
    pub fn unlimited() -> Self {
        Self {
            max_message_size: 0,
        }
    }

    /// 実効的なバッファ上限を取得
    ///
    /// max_message_size が 0 の場合は内部上限を返す
    pub fn ceiling(&self) -> usize {
        if self.max_message_size == 0 {
            UNBOUNDED_CEILING
        } else {
            self.max_message_size
        }
    }
}
