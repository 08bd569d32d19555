#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use ftlscan::{LexCursor, Scanner, ScannerOptions, SourceCursor, TokenSet};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag + 4-byte accepted-set seed

thread_local! {
    static RNG: RefCell<SmallRng> = RefCell::new(SmallRng::from_os_rng());
}

static WS_TABLE: &[&[u8]] = &[
    b" ",
    b"\t",
    b"\n",
    b"\r",
    b"\x0B",
    b"\x0C",
    "\u{00A0}".as_bytes(),
    "\u{2003}".as_bytes(),
    "\u{3000}".as_bytes(),
];

static FRAGMENTS: &[&[u8]] = &[
    b"(",
    b")",
    b">",
    b">=",
    b"=",
    b"==",
    b"<#--",
    b"-->",
    b"--->",
    b"-",
    b"<#if",
    b"</#if>",
    b"<#",
    b"<",
    b"x",
    b"${",
    b"}",
    b"gt",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size <= HEADER {
        return fuzzer_mutate(data, size, max_size);
    }
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut prefix = HEADER;
        while prefix < size.max(HEADER + 1) {
            let ws = append_from(WS_TABLE, &mut data[prefix..], max_size - prefix);
            prefix += ws;
            let fragment = append_from(FRAGMENTS, &mut data[prefix..], max_size - prefix);
            prefix += fragment;
            if ws + fragment == 0 {
                break;
            }
        }
        prefix
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

/// Appends one randomly chosen entry of `table` if it fits in `limit`.
fn append_from(table: &[&[u8]], buf: &mut [u8], limit: usize) -> usize {
    with_rng(|rng| {
        let entry = table[rng.random_range(0..table.len())];
        if entry.len() > limit {
            return 0;
        }
        buf[..entry.len()].copy_from_slice(entry);
        entry.len()
    })
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

/// The accepted set for each call, derived from the header seed.
#[derive(Debug, Arbitrary)]
struct Schedule {
    sets: Vec<u8>,
}

fn scan(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }
    let flags = data[0];
    let seed = &data[1..HEADER];
    let src = &data[HEADER..];

    let schedule = Schedule::arbitrary(&mut Unstructured::new(seed)).unwrap_or(Schedule {
        sets: Vec::new(),
    });
    let mut sets = schedule.sets.into_iter().cycle();

    let mut scanner = Scanner::with_options(ScannerOptions {
        allow_unicode_whitespace: flags & 1 != 0,
    });
    let mut cursor = SourceCursor::from_bytes(src);

    while !cursor.is_eof() {
        let accepted = TokenSet::from_bits_retain(sets.next().unwrap_or(flags));
        let before = cursor.token_start().offset;
        match scanner.scan(&mut cursor, accepted) {
            Some(kind) => {
                let token = cursor.take_token().expect("commit records a token");
                assert_eq!(token.kind, kind);
                assert!(!token.span.is_empty(), "empty {kind} token");
                assert!(token.span.start >= before);
            }
            None => {
                assert_eq!(cursor.position(), cursor.token_start());
                // Stand-in for the grammar: one code point per step.
                cursor.advance();
                cursor.commit_span();
            }
        }

        // Pause and resume through the persisted form every so often.
        if flags & 2 != 0 {
            let saved = scanner.serialize();
            scanner.reset();
            scanner.deserialize(&saved);
        }
    }
}

fuzz_target!(|data: &[u8]| scan(data));
