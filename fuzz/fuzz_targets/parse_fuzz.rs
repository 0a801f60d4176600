//! Parse fuzz target: feed arbitrary bytes to the SDP parser.
//! Parsing must not panic, and the serialized form of anything that parses
//! must parse again to an equal session.
//! Build with: cargo fuzz run parse_fuzz (requires nightly and cargo fuzz).

#![cfg_attr(fuzzing, no_main)]

#[cfg(fuzzing)]
use libfuzzer_sys::fuzz_target;

#[cfg(fuzzing)]
fuzz_target!(|data: &[u8]| {
    if let Ok(session) = sdpgrammar::parse(data) {
        let bytes = sdpgrammar::serialize(&session);
        let again = sdpgrammar::parse(&bytes).expect("serialized session re-parses");
        assert_eq!(again, session);
    }
});

#[cfg(not(fuzzing))]
fn main() {
    eprintln!("Build with: cargo fuzz run parse_fuzz");
}
