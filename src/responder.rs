//! 診断用レスポンスのエンコード
//!
//! 受信したリクエストの内容をそのまま折り返す、固定の平文 200 レスポンスを
//! 生成する。接続確認やデバッグ用であり、一般的なレスポンス構築は
//! 提供しない。

use crate::request::ParsedRequest;

/// 診断用の平文レスポンスをエンコードする
///
/// メソッドとパス、および受信した生リクエスト全体を本文に含む
/// `HTTP/1.1 200 OK` レスポンスのバイト列を返す。生リクエストは
/// バイト列のまま埋め込まれるため、本文が UTF-8 になるとは限らない。
pub fn diagnostic_response(request: &ParsedRequest) -> Vec<u8> {
    let mut buf = Vec::with_capacity(256 + request.raw_request().len());
    buf.extend_from_slice(b"HTTP/1.1 200 OK\r\n");
    buf.extend_from_slice(b"Content-Type: text/plain\r\n");
    buf.extend_from_slice(b"Connection: close\r\n");
    buf.extend_from_slice(b"\r\n");
    buf.extend_from_slice(b"Request received successfully!\n");
    buf.extend_from_slice(b"Method: ");
    buf.extend_from_slice(request.method().as_str().as_bytes());
    buf.extend_from_slice(b"\nPath: ");
    buf.extend_from_slice(request.path().as_bytes());
    buf.extend_from_slice(b"\nFull Request:\n");
    buf.extend_from_slice(request.raw_request());
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_echoes_method_and_path() {
        let request = ParsedRequest::parse(b"POST /api/v1 HTTP/1.1\r\n\r\n");
        let response = diagnostic_response(&request);
        let text = String::from_utf8(response).expect("ascii response");
        assert!(text.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(text.contains("Content-Type: text/plain\r\n"));
        assert!(text.contains("Connection: close\r\n"));
        assert!(text.contains("Method: POST\n"));
        assert!(text.contains("Path: /api/v1\n"));
        assert!(text.contains("Full Request:\nPOST /api/v1 HTTP/1.1\r\n\r\n"));
    }

    #[test]
    fn response_carries_raw_bytes_verbatim() {
        let raw = b"GET / HTTP/1.1\r\n\r\n\xff\xfe";
        let request = ParsedRequest::parse(raw);
        let response = diagnostic_response(&request);
        assert!(response.ends_with(raw));
    }

    #[test]
    fn empty_request_still_produces_a_response() {
        let request = ParsedRequest::parse(b"");
        let response = diagnostic_response(&request);
        let text = String::from_utf8(response).expect("ascii response");
        assert!(text.contains("Method: GET\n"));
        assert!(text.contains("Path: \n"));
    }
}
