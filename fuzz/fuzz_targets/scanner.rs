#![no_main]

use libfuzzer_sys::fuzz_target;
use warden_monitrc::scan;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let tokens: Vec<_> = scan("fuzz", text).collect();

        // 종료 토큰은 정확히 하나, 항상 마지막
        let terminal = tokens.iter().filter(|t| t.kind.is_terminal()).count();
        assert_eq!(terminal, 1, "expected exactly one terminal token");
        assert!(tokens.last().is_some_and(|t| t.kind.is_terminal()));
    }
});
