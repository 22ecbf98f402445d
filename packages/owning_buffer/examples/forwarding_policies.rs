//! Compares three ways of storing a caller's buffer: always copying, forwarding the caller's
//! intent, and always moving. Only forwarding is both cheap and safe.

use owning_buffer::{BufferStore, OwningBuffer, TransferIntent, TransferSpan};

const LARGE_LEN: usize = 1024 * 1024;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .without_time()
        .init();

    let mut storage = BufferStore::new();

    let mut obj1 = OwningBuffer::with_len(LARGE_LEN);
    let mut obj2 = OwningBuffer::with_len(LARGE_LEN);
    let mut obj3 = OwningBuffer::with_len(LARGE_LEN);

    println!("== Always copy ==");
    let span = TransferSpan::new();
    storage.insert_copied(&obj1).expect("allocation failed"); // necessary copy
    storage.insert_copied(&obj2).expect("allocation failed"); // wasted copy, obj2 was ours to give
    println!("{}", span.to_delta());

    println!("== Forward intent ==");
    let span = TransferSpan::new();
    storage
        .insert_forwarded(&mut obj1, TransferIntent::Copy)
        .expect("allocation failed");
    storage
        .insert_forwarded(&mut obj2, TransferIntent::Move)
        .expect("allocation failed");
    storage
        .insert_forwarded(&mut OwningBuffer::with_len(LARGE_LEN), TransferIntent::Move)
        .expect("allocation failed");
    println!("{}", span.to_delta());

    println!("== Always move ==");
    let span = TransferSpan::new();
    storage.insert_forced_move(&mut obj1); // obj1 was still needed!
    storage.insert_forced_move(&mut obj3);
    storage.insert_forced_move(&mut OwningBuffer::with_len(LARGE_LEN));
    println!("{}", span.to_delta());

    println!(
        "obj1 is empty after the forced move even though it was not given away: {}",
        obj1.is_empty()
    );

    println!("{}", nm::Report::collect());
}
