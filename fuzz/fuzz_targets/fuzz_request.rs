#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http1_lite::ParsedRequest;

fuzz_target!(|data: &[u8]| {
    let request = ParsedRequest::parse(data);

    // アクセサはどの入力に対しても安全に呼べる
    let _ = request.method();
    let _ = request.path();
    let _ = request.full_url();
    let _ = request.http_version();
    let _ = request.get_header("Host");
    let _ = request.bearer_token();
    let _ = request.basic_auth();
    let _ = request.content_length();
    let _ = request.cookie("session");
    let _ = request.query_parameter("q");
    let _ = request.is_json();
    let _ = request.is_form_data();
    let _ = request.is_multipart();
    let _ = request.has_body();

    assert_eq!(request.raw_request(), data);
});
