#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Header probe and full decode — must never panic on arbitrary input
    let _ = planarform::ImageInfo::from_bytes(data);
    let _ = planarform::DecodeRequest::new(data).decode(enough::Unstoppable);
});
