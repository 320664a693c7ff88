#![no_main]

use libfuzzer_sys::fuzz_target;
use swiftida_core::{ArchProfile, Architecture};
use swiftida_types::{EditRequest, ParsedSignature};

fuzz_target!(|data: &[u8]| {
    let Ok(raw) = std::str::from_utf8(data) else {
        return;
    };

    for arch in [Architecture::X86_64, Architecture::Arm64] {
        let profile = ArchProfile::for_architecture(arch);

        // Parse errors are expected; panics are not
        let Ok(sig) = ParsedSignature::parse(raw, &profile) else {
            continue;
        };

        // Serialized output must parse back to the same signature
        let text = sig.serialize();
        let reparsed = ParsedSignature::parse(&text, &profile)
            .unwrap_or_else(|e| panic!("serialized output failed to parse: {:?}: {}", text, e));
        assert_eq!(reparsed, sig, "round trip changed {:?}", raw);

        for words in 2..=profile.max_tuple_words() {
            let _ = EditRequest::MakeMultiRegisterReturn(words).apply(sig.clone(), &profile);
        }
    }
});
