#![no_main]
#![allow(clippy::panic, clippy::unwrap_used)]

use std::sync::Arc;

use chnative_column::{Column, create_column};
use chnative_dtype::{DType, parse_type_name};
use chnative_error::ChError;
use libfuzzer_sys::{Corpus, fuzz_target};

fuzz_target!(|input: (DType, u8)| -> Corpus {
    let (dtype, rows) = input;
    let name = dtype.name();
    assert_eq!(parse_type_name(&name).unwrap().name(), name);

    let dtype = Arc::new(dtype);
    let mut column = match create_column(&dtype) {
        Ok(column) => column,
        Err(ChError::NotImplemented(..)) => return Corpus::Reject,
        Err(err) => panic!("no column for {name}: {err}"),
    };
    for _ in 0..rows {
        column.append_default();
    }
    assert_eq!(column.len(), usize::from(rows));

    let mut wire = Vec::new();
    column.save(&mut wire).unwrap();
    let mut loaded = column.clone_empty();
    let mut input = wire.as_slice();
    loaded.load(&mut input, usize::from(rows)).unwrap();
    assert!(input.is_empty(), "{name} left {} bytes unread", input.len());

    let mut again = Vec::new();
    loaded.save(&mut again).unwrap();
    assert_eq!(again, wire, "{name} changed across a round trip");
    Corpus::Keep
});
