#![no_main]
use leading8_norms::Norm;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() >= 4 {
        let id = u32::from_le_bytes([data[0], data[1], data[2], data[3]]);
        if let Ok(norm) = Norm::from_id(id) {
            assert_eq!(norm.id(), id);
        }
        let _ = leading8_norms::rules::NormRules::from_id(id);
    }
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(norm) = s.parse::<Norm>() {
            assert_eq!(norm.label().parse::<Norm>(), Ok(norm));
        }
    }
});
