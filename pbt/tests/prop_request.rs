//! ParsedRequest のプロパティテスト (request.rs)

use std::collections::BTreeMap;

use pbt::{
    body, build_request, cookie_pairs, headers, method_token, query_parameters, url_path,
};
use proptest::prelude::*;
use shiguredo_http1_lite::{HttpMethod, ParsedRequest};

// ========================================
// リクエストラインのプロパティ
// ========================================

proptest! {
    /// full_url はパスとクエリ文字列をそのまま連結したものに
    /// バイト単位で一致する (パーセントデコードなし)
    #[test]
    fn prop_full_url_is_verbatim(
        method in method_token(),
        path in url_path(),
        query in query_parameters()
    ) {
        let bytes = build_request(&method, &path, &query, &BTreeMap::new(), &BTreeMap::new(), &[]);
        let request = ParsedRequest::parse(&bytes);

        prop_assert_eq!(request.path(), path.as_str());
        if query.is_empty() {
            prop_assert_eq!(request.full_url(), path.as_str());
        } else {
            let pairs: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
            let expected = format!("{}?{}", path, pairs.join("&"));
            prop_assert_eq!(request.full_url(), expected.as_str());
        }
    }

    /// 生成したクエリパラメーターはすべて取り出せる
    #[test]
    fn prop_query_parameters_roundtrip(
        path in url_path(),
        query in query_parameters()
    ) {
        let bytes = build_request("GET", &path, &query, &BTreeMap::new(), &BTreeMap::new(), &[]);
        let request = ParsedRequest::parse(&bytes);

        prop_assert_eq!(request.query_parameters().len(), query.len());
        for (name, value) in &query {
            prop_assert_eq!(request.query_parameter(name), Some(value.as_str()));
        }
    }
}

// ========================================
// ヘッダーと Cookie のプロパティ
// ========================================

proptest! {
    /// 生成したヘッダーはすべて、大文字小文字を無視した検索で取り出せる
    #[test]
    fn prop_headers_roundtrip(hdrs in headers(), body_data in body()) {
        let bytes = build_request("POST", "/", &BTreeMap::new(), &hdrs, &BTreeMap::new(), &body_data);
        let request = ParsedRequest::parse(&bytes);

        for (name, value) in &hdrs {
            prop_assert_eq!(request.get_header(name), Some(value.as_str()));
            prop_assert_eq!(request.get_header(&name.to_ascii_uppercase()), Some(value.as_str()));
            prop_assert!(request.has_header(name));
        }
    }

    /// ヘッダー値の前後の空白/タブはパース時に取り除かれる
    #[test]
    fn prop_header_values_are_trimmed(
        value in "[!-~][ -~]{0,20}[!-~]|[!-~]",
        pad_left in "[ \t]{0,4}",
        pad_right in "[ \t]{0,4}"
    ) {
        let line = format!("GET / HTTP/1.1\r\nx-padded:{}{}{}\r\n\r\n", pad_left, value, pad_right);
        let request = ParsedRequest::parse(line.as_bytes());
        prop_assert_eq!(request.get_header("x-padded"), Some(value.as_str()));
    }

    /// 生成した Cookie はすべて取り出せる
    #[test]
    fn prop_cookies_roundtrip(cookies in cookie_pairs()) {
        let bytes = build_request("GET", "/", &BTreeMap::new(), &BTreeMap::new(), &cookies, &[]);
        let request = ParsedRequest::parse(&bytes);

        prop_assert_eq!(request.cookies().len(), cookies.len());
        for (name, value) in &cookies {
            prop_assert_eq!(request.cookie(name), Some(value.as_str()));
        }
    }

    /// Bearer トークンはそのまま取り出せる
    #[test]
    fn prop_bearer_token_roundtrip(token in "[A-Za-z0-9._-]{1,32}") {
        let line = format!("GET / HTTP/1.1\r\nAuthorization: Bearer {}\r\n\r\n", token);
        let request = ParsedRequest::parse(line.as_bytes());
        prop_assert_eq!(request.bearer_token(), Some(token.as_str()));
    }
}

// ========================================
// 頑健性とボディのプロパティ
// ========================================

proptest! {
    /// 任意のバイト列をデコードしてもパニックせず、アクセサは
    /// 読み取りごとに同じ結果を返す
    #[test]
    fn prop_parse_never_panics(data in proptest::collection::vec(any::<u8>(), 0..512)) {
        let request = ParsedRequest::parse(&data);
        prop_assert_eq!(request.get_header("host"), request.get_header("host"));
        prop_assert_eq!(request.bearer_token(), request.bearer_token());
        prop_assert_eq!(request.path(), request.path());
        prop_assert_eq!(request.raw_request(), &data[..]);
        let _ = request.is_json();
        let _ = request.content_length();
        let _ = request.has_body();
    }

    /// ボディは区切り以降のバイト列そのまま
    #[test]
    fn prop_body_is_verbatim(method in method_token(), body_data in body()) {
        let bytes = build_request(&method, "/", &BTreeMap::new(), &BTreeMap::new(), &BTreeMap::new(), &body_data);
        let request = ParsedRequest::parse(&bytes);
        prop_assert_eq!(request.body_bytes(), &body_data[..]);
        prop_assert_eq!(request.has_body(), !body_data.is_empty());
    }
}

#[test]
fn empty_input_decodes_to_defaults() {
    let request = ParsedRequest::parse(b"");
    assert_eq!(request.method(), HttpMethod::Get);
    assert_eq!(request.full_url(), "");
    assert!(!request.has_body());
}
