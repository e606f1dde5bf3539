#![no_main]

use libfuzzer_sys::fuzz_target;
use shiguredo_http1_lite::{FrameLimits, FrameProgress, RequestFramer};

fuzz_target!(|data: &[u8]| {
    // データを一度に feed
    let mut framer = RequestFramer::new();
    framer.feed(data);
    let _ = framer.mark_eof();
    let _ = framer.into_raw();

    // データを分割して feed (ストリーミングシナリオ)
    let mut framer = RequestFramer::new();
    for chunk in data.chunks(17) {
        if framer.feed(chunk) == FrameProgress::Complete {
            break;
        }
    }
    let _ = framer.mark_eof();
    let raw = framer.into_raw();
    assert!(raw.len() <= data.len());

    // 小さい上限でも挙動が破綻しない
    let mut framer = RequestFramer::with_limits(FrameLimits::with_max_message_size(64));
    framer.feed(data);
    let _ = framer.mark_eof();
    assert!(framer.into_raw().len() <= 64);
});
