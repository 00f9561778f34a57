#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary vendor payloads must never panic the extractor
    let Ok(body) = serde_json::from_slice::<serde_json::Value>(data) else {
        return;
    };
    for pointer in [
        "/properties/totalEnergy/value",
        "/totalKwh",
        "/mileage",
        "/odometer",
        "",
        "/0",
    ] {
        if let Some(v) = chargelog::sources::extract_number(&body, pointer) {
            assert!(v.is_finite() && v >= 0.0);
        }
    }
});
