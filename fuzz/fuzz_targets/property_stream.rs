#![no_main]

use dissect_decoder::grouping::PropertyStream;
use libfuzzer_sys::fuzz_target;

// Fuzz target: header key/value grouping.
//
// Feeds arbitrary pairs through the grouping state machine. Once the
// stream reports complete it must stay complete.
fuzz_target!(|pairs: Vec<(String, String)>| {
    let mut stream = PropertyStream::new();
    let mut complete = false;
    for (key, value) in &pairs {
        if stream.push(key, value).is_err() {
            break;
        }
        if complete {
            assert!(stream.is_complete());
        }
        complete = stream.is_complete();
    }
    let _ = stream.finish();
});
