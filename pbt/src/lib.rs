//! PBT テスト共通ユーティリティ

use proptest::prelude::*;

// ========================================
// HTTP リクエスト断片の生成
// ========================================

/// HTTP トークン文字 (RFC 7230)
pub fn token_char() -> impl Strategy<Value = char> {
    prop_oneof![
        prop::char::range('a', 'z'),
        prop::char::range('A', 'Z'),
        prop::char::range('0', '9'),
        Just('-'),
        Just('_'),
        Just('.'),
    ]
}

/// トークン文字列 (1..=max_len 文字)
pub fn token_string(max_len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(token_char(), 1..=max_len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// HTTP メソッドトークン (未知のものも含む)
pub fn method_token() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("GET".to_string()),
        Just("POST".to_string()),
        Just("PUT".to_string()),
        Just("DELETE".to_string()),
        Just("HEAD".to_string()),
        Just("OPTIONS".to_string()),
        Just("PATCH".to_string()),
    ]
}

/// URL パス (スペースや CRLF、'?' を含まない)
pub fn url_path() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("/".to_string()),
        "/[a-zA-Z0-9/_.-]{1,64}".prop_map(|s| s),
    ]
}

/// クエリパラメーター: 小文字キー (一意) → 値 ('&' '=' '#' SP を含まない)
pub fn query_parameters() -> impl Strategy<Value = std::collections::BTreeMap<String, String>> {
    proptest::collection::btree_map("[a-z0-9]{1,8}", "[a-zA-Z0-9._~-]{0,8}", 0..6)
}

/// ヘッダー名: "x-" 前置の小文字トークン
///
/// 小文字に限定することで、大文字小文字違いの衝突や Cookie/Content-Length
/// との干渉なしにプロパティを決定的に検証できる。
pub fn header_name() -> impl Strategy<Value = String> {
    "x-[a-z0-9-]{1,16}".prop_map(|s| s)
}

/// ヘッダー値 (field-vchar、CR/LF なし、前後空白なし)
pub fn header_value() -> impl Strategy<Value = String> {
    "[!-~][ -~]{0,30}[!-~]|[!-~]".prop_map(|s| s)
}

/// ヘッダーの集合 (キーは一意)
pub fn headers() -> impl Strategy<Value = std::collections::BTreeMap<String, String>> {
    proptest::collection::btree_map(header_name(), header_value(), 0..8)
}

/// Cookie の集合: 小文字キー (一意) → 値 (';' '=' SP を含まない)
pub fn cookie_pairs() -> impl Strategy<Value = std::collections::BTreeMap<String, String>> {
    proptest::collection::btree_map("[a-z0-9_]{1,8}", "[a-zA-Z0-9._-]{1,12}", 0..6)
}

/// リクエストボディ (任意バイト列)
pub fn body() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..256)
}

/// 正確な Content-Length 付きのリクエストバイト列を組み立てる
pub fn build_request(
    method: &str,
    path: &str,
    query: &std::collections::BTreeMap<String, String>,
    headers: &std::collections::BTreeMap<String, String>,
    cookies: &std::collections::BTreeMap<String, String>,
    body: &[u8],
) -> Vec<u8> {
    let mut target = path.to_string();
    if !query.is_empty() {
        let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        target.push('?');
        target.push_str(&pairs.join("&"));
    }

    let mut bytes = format!("{} {} HTTP/1.1\r\n", method, target).into_bytes();
    for (name, value) in headers {
        bytes.extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
    }
    if !cookies.is_empty() {
        let pairs: Vec<String> = cookies.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        bytes.extend_from_slice(format!("Cookie: {}\r\n", pairs.join("; ")).as_bytes());
    }
    if !body.is_empty() {
        bytes.extend_from_slice(format!("Content-Length: {}\r\n", body.len()).as_bytes());
    }
    bytes.extend_from_slice(b"\r\n");
    bytes.extend_from_slice(body);
    bytes
}
