//! HTTP リクエストのベストエフォートデコーダー
//!
//! フレーミング済みの生バイト列を、構造化された不変のリクエスト値に
//! デコードする。不正な入力でも失敗せず、見つけられなかったフィールドは
//! 空/デフォルト値になる (寛容なパース方針)。
//!
//! ## 使い方
//!
//! ```rust
//! use shiguredo_http1_lite::{HttpMethod, ParsedRequest};
//!
//! let raw = b"GET /search?q=hello&x=1 HTTP/1.1\r\nHost: example.com\r\n\r\n";
//! let request = ParsedRequest::parse(raw);
//!
//! assert_eq!(request.method(), HttpMethod::Get);
//! assert_eq!(request.path(), "/search");
//! assert_eq!(request.query_parameter("q"), Some("hello"));
//! assert_eq!(request.get_header("host"), Some("example.com"));
//! ```

use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::method::HttpMethod;

/// デコード済みの HTTP リクエスト (不変)
///
/// 1 接続につき 1 回生成され、レスポンス生成後に破棄される値オブジェクト。
/// すべてのアクセサは読み取り専用で、同じ値に対して常に同じ結果を返す。
///
/// ヘッダー/クエリ/Cookie は元の表記のままのキーで保持される。
/// 表記違いの重複ヘッダーはマージされず、大文字小文字を区別しない検索は
/// 反復順 (未規定) での最初の一致を返す。
#[derive(Debug, Clone)]
pub struct ParsedRequest {
    method: HttpMethod,
    path: String,
    full_url: String,
    http_version: String,
    query_parameters: HashMap<String, String>,
    headers: HashMap<String, String>,
    cookies: HashMap<String, String>,
    body: String,
    body_bytes: Vec<u8>,
    raw_request: Vec<u8>,
    client_ip: String,
    client_port: u16,
    timestamp: u64,
}

impl ParsedRequest {
    /// 生バイト列をデコードする
    ///
    /// 決して失敗しない。空入力はメソッド GET、全フィールド空の
    /// リクエストになる。
    pub fn parse(raw: &[u8]) -> Self {
        Self::parse_with_client(raw, "", 0)
    }

    /// クライアント情報付きでデコードする
    ///
    /// クライアントの IP/ポートはバイト列からは導出できないため、
    /// 受け付け側 (フレーマー/accept 層) が渡す。
    pub fn parse_with_client(raw: &[u8], client_ip: &str, client_port: u16) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        let mut request = Self {
            method: HttpMethod::Get,
            path: String::new(),
            full_url: String::new(),
            http_version: String::new(),
            query_parameters: HashMap::new(),
            headers: HashMap::new(),
            cookies: HashMap::new(),
            body: String::new(),
            body_bytes: Vec::new(),
            raw_request: raw.to_vec(),
            client_ip: client_ip.to_string(),
            client_port,
            timestamp,
        };

        if raw.is_empty() {
            return request;
        }

        // ヘッダー/ボディ区切りはフレーミングとは独立に再計算する
        // (デコードは単体でも呼べる)
        let (head, body) = split_head_body(raw);
        request.body_bytes = body.to_vec();
        request.body = String::from_utf8_lossy(body).into_owned();

        let head_text = String::from_utf8_lossy(head);
        let mut lines = head_text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line));

        // リクエストライン: METHOD SP target SP version
        // トークンが足りない場合、足りないフィールドは空のまま
        if let Some(line) = lines.next() {
            let mut tokens = line.split_whitespace();
            let method_token = tokens.next().unwrap_or("");
            let url = tokens.next().unwrap_or("");
            let version = tokens.next().unwrap_or("");

            request.method = HttpMethod::from_token(method_token);
            request.http_version = version.to_string();
            request.full_url = url.to_string();

            // 最初の '?' でパスとクエリ文字列に分割 (パーセントデコードはしない)
            match url.split_once('?') {
                Some((path, query)) => {
                    request.path = path.to_string();
                    request.query_parameters = parse_query(query);
                }
                None => request.path = url.to_string(),
            }
        }

        // ヘッダー行: 最初の ':' で分割し、名前と値の前後の空白/タブを除去。
        // ':' のない行は黙ってスキップ。空行で終了。
        for line in lines {
            if line.is_empty() {
                break;
            }
            let Some((name, value)) = line.split_once(':') else {
                continue;
            };
            let name = name.trim_matches([' ', '\t']);
            let value = value.trim_matches([' ', '\t']);

            if name.eq_ignore_ascii_case("cookie") {
                // 後の Cookie ヘッダーが同名キーを上書きする
                parse_cookies_into(&mut request.cookies, value);
            }

            request.headers.insert(name.to_string(), value.to_string());
        }

        request
    }

    /// HTTP メソッドを取得
    pub fn method(&self) -> HttpMethod {
        self.method
    }

    /// パス ('?' より前の部分) を取得
    pub fn path(&self) -> &str {
        &self.path
    }

    /// リクエストラインのターゲット全体 (パス + クエリ文字列) を取得
    pub fn full_url(&self) -> &str {
        &self.full_url
    }

    /// HTTP バージョン (リクエストラインの第 3 トークンそのまま) を取得
    pub fn http_version(&self) -> &str {
        &self.http_version
    }

    /// クエリパラメーターを取得
    pub fn query_parameter(&self, name: &str) -> Option<&str> {
        self.query_parameters.get(name).map(String::as_str)
    }

    /// すべてのクエリパラメーターを取得
    pub fn query_parameters(&self) -> &HashMap<String, String> {
        &self.query_parameters
    }

    /// クエリパラメーターが存在するか確認
    pub fn has_query_parameter(&self, name: &str) -> bool {
        self.query_parameters.contains_key(name)
    }

    /// ヘッダーを取得 (大文字小文字を区別しない)
    ///
    /// 表記違いの重複がある場合は反復順 (未規定) での最初の一致を返す。
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// すべてのヘッダーを取得 (元の表記のままのキー)
    pub fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    /// ヘッダーが存在するか確認 (大文字小文字を区別しない)
    pub fn has_header(&self, name: &str) -> bool {
        self.headers
            .keys()
            .any(|n| n.eq_ignore_ascii_case(name))
    }

    /// Authorization ヘッダーの値を取得
    pub fn authorization(&self) -> Option<&str> {
        self.get_header("Authorization")
    }

    /// Authorization ヘッダーから Bearer トークンを取得
    ///
    /// リテラル `"Bearer "` に続く部分を返す。
    pub fn bearer_token(&self) -> Option<&str> {
        let auth = self.authorization()?;
        auth.find("Bearer ").map(|pos| &auth[pos + 7..])
    }

    /// Authorization ヘッダーから Basic 認証情報 (base64) を取得
    ///
    /// リテラル `"Basic "` に続く部分を返す。
    pub fn basic_auth(&self) -> Option<&str> {
        let auth = self.authorization()?;
        auth.find("Basic ").map(|pos| &auth[pos + 6..])
    }

    /// X-API-Key ヘッダーの値を取得
    pub fn api_key(&self) -> Option<&str> {
        self.get_header("X-API-Key")
    }

    /// Content-Type ヘッダーの値を取得
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("Content-Type")
    }

    /// Content-Length ヘッダーの値を取得
    pub fn content_length(&self) -> Option<u64> {
        self.get_header("Content-Length")
            .and_then(|v| v.trim().parse().ok())
    }

    /// User-Agent ヘッダーの値を取得
    pub fn user_agent(&self) -> Option<&str> {
        self.get_header("User-Agent")
    }

    /// Referer ヘッダーの値を取得
    pub fn referer(&self) -> Option<&str> {
        self.get_header("Referer")
    }

    /// Host ヘッダーの値を取得
    pub fn host(&self) -> Option<&str> {
        self.get_header("Host")
    }

    /// Cookie を取得
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.cookies.get(name).map(String::as_str)
    }

    /// すべての Cookie を取得
    pub fn cookies(&self) -> &HashMap<String, String> {
        &self.cookies
    }

    /// Cookie が存在するか確認
    pub fn has_cookie(&self, name: &str) -> bool {
        self.cookies.contains_key(name)
    }

    /// ボディを文字列として取得
    ///
    /// UTF-8 として解釈できないバイトは置換される。バイナリボディには
    /// `body_bytes` を使う。
    pub fn body(&self) -> &str {
        &self.body
    }

    /// ボディをバイト列として取得 (区切り以降そのまま)
    pub fn body_bytes(&self) -> &[u8] {
        &self.body_bytes
    }

    /// 受信したままの完全な生リクエストを取得 (診断用)
    pub fn raw_request(&self) -> &[u8] {
        &self.raw_request
    }

    /// クライアントの IP アドレスを取得
    pub fn client_ip(&self) -> &str {
        &self.client_ip
    }

    /// クライアントのポート番号を取得
    pub fn client_port(&self) -> u16 {
        self.client_port
    }

    /// デコード時刻 (Unix 秒) を取得
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }

    /// ボディが空でないか確認
    pub fn has_body(&self) -> bool {
        !self.body_bytes.is_empty()
    }

    /// 指定したメソッドか確認
    pub fn is_method(&self, method: HttpMethod) -> bool {
        self.method == method
    }

    /// Content-Type が JSON か確認
    pub fn is_json(&self) -> bool {
        self.content_type_contains("application/json")
    }

    /// Content-Type がフォームデータか確認
    pub fn is_form_data(&self) -> bool {
        self.content_type_contains("application/x-www-form-urlencoded")
    }

    /// Content-Type がマルチパートか確認
    pub fn is_multipart(&self) -> bool {
        self.content_type_contains("multipart/")
    }

    fn content_type_contains(&self, needle: &str) -> bool {
        self.content_type()
            .is_some_and(|ct| ct.to_ascii_lowercase().contains(needle))
    }
}

/// ヘッダー部とボディ部に分割する
///
/// `\r\n\r\n` を優先し、なければ `\n\n`。区切りが見つからない場合は
/// 入力全体をヘッダー部として扱い、ボディは空になる。
fn split_head_body(raw: &[u8]) -> (&[u8], &[u8]) {
    if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
        return (&raw[..pos], &raw[pos + 4..]);
    }
    if let Some(pos) = raw.windows(2).position(|w| w == b"\n\n") {
        return (&raw[..pos], &raw[pos + 2..]);
    }
    (raw, &[])
}

/// クエリ文字列をパースする
///
/// '&' で区切り、各ペアを最初の '=' で分割する。'=' を含まない
/// セグメントに出会った時点で以降のパースを黙って打ち切る。
fn parse_query(query: &str) -> HashMap<String, String> {
    let mut parameters = HashMap::new();
    for pair in query.split('&') {
        let Some((name, value)) = pair.split_once('=') else {
            break;
        };
        parameters.insert(name.to_string(), value.to_string());
    }
    parameters
}

/// Cookie ヘッダー値をパースしてマージする
///
/// ';' で区切り、各ペアを最初の '=' で分割し、名前と値の前後の
/// 空白/タブを除去する。同名キーは上書きされる。
fn parse_cookies_into(cookies: &mut HashMap<String, String>, header_value: &str) {
    for pair in header_value.split(';') {
        let pair = pair.trim_matches([' ', '\t']);
        if pair.is_empty() {
            continue;
        }
        let Some((name, value)) = pair.split_once('=') else {
            break;
        };
        cookies.insert(
            name.trim_matches([' ', '\t']).to_string(),
            value.trim_matches([' ', '\t']).to_string(),
        );
    }
}
