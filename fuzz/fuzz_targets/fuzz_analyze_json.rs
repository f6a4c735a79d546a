#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Records and config share the input; split on the first NUL.
        let (records, config) = s.split_once('\0').unwrap_or((s, "{}"));
        // Malformed or out-of-range input must come back as an error, never a panic.
        if let Ok(report) = leading8_stability::analyze_json(records, config) {
            let _ = report.to_json_pretty();
        }
    }
});
