#![no_main]

use libfuzzer_sys::fuzz_target;
use warden_core::pipeline::ControlFileParser;
use warden_monitrc::MonitrcParser;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let parser = MonitrcParser::new();
        let _ = ControlFileParser::parse(&parser, "fuzz", text);
    }
});
