#![no_main]
use chargelog::detector::{SessionDetector, SessionOutcome, SessionState, Transition};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Each byte is one tick: 0xff is a failed read, anything else a counter
    // value where 0 means idle
    let sample = |b: u8| (b != 0xff).then_some(f64::from(b));

    let mut detector = SessionDetector::new();
    let mut bytes = data.iter().copied();
    while let Some(b) = bytes.next() {
        let before = detector.state();
        match detector.observe(sample(b)) {
            Some(Transition::Started { energy_at_start }) => {
                assert_eq!(before, SessionState::Idle);
                assert_eq!(detector.energy_at_session_start(), Some(energy_at_start));
            }
            Some(Transition::Ending) => {
                let final_sample = bytes.next().and_then(sample);
                if let SessionOutcome::Ended {
                    energy_at_start,
                    final_energy,
                    energy_consumed,
                } = detector.close(final_sample)
                {
                    assert_eq!(energy_consumed, final_energy - energy_at_start);
                }
                assert_eq!(detector.state(), SessionState::Idle);
            }
            Some(Transition::Adopted { .. }) | None => {}
        }
        if b == 0xff {
            assert_eq!(detector.state(), before);
        }
    }
});
