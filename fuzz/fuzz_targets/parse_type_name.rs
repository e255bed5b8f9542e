#![no_main]
#![allow(clippy::unwrap_used)]

use chnative_dtype::{TypeNameCache, parse_type_name};
use libfuzzer_sys::{Corpus, fuzz_target};

fuzz_target!(|name: &str| -> Corpus {
    let Ok(dtype) = parse_type_name(name) else {
        return Corpus::Reject;
    };

    // The canonical name parses back to the same type, and is its own canonical name.
    let canonical = dtype.name();
    let reparsed = parse_type_name(&canonical).unwrap();
    assert_eq!(reparsed, dtype, "{name} reparsed as {reparsed}");
    assert_eq!(reparsed.name(), canonical);

    let cache = TypeNameCache::default();
    assert_eq!(cache.get_or_parse(name).unwrap(), dtype);
    Corpus::Keep
});
