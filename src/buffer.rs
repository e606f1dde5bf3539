//! 受信バッファの定義

/// 上限付きの可変長受信バッファ
///
/// I/O は一切持たない。`push` は上限を超える分を切り捨てて、
/// 実際に受け入れたバイト数を返す (上限超過はエラーではなく縮退)。
#[derive(Debug)]
pub struct RecvBuffer {
    data: Vec<u8>,
    limit: usize,
}

impl RecvBuffer {
    /// 指定した上限でバッファを作成
    ///
    /// メモリは必要に応じて確保されるため、大きな上限を指定しても
    /// 事前確保は行われない。
    pub fn new(limit: usize) -> Self {
        Self {
            data: Vec::new(),
            limit,
        }
    }

    /// バイト列を追加し、受け入れたバイト数を返す
    ///
    /// 上限に達した場合は収まる分だけを受け入れる。
    pub fn push(&mut self, bytes: &[u8]) -> usize {
        let room = self.limit.saturating_sub(self.data.len());
        let accepted = bytes.len().min(room);
        self.data.extend_from_slice(&bytes[..accepted]);
        accepted
    }

    /// 蓄積済みバイト数を取得
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// バッファが空か確認
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// バッファが上限に達しているか確認
    pub fn is_full(&self) -> bool {
        self.data.len() >= self.limit
    }

    /// バッファ上限を取得
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// 蓄積済みバイト列を取得
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    /// バッファを消費してバイト列を取り出す
    pub fn into_vec(self) -> Vec<u8> {
        self.data
    }
}
