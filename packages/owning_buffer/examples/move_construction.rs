//! Walks through every way a buffer can change hands: creation, move construction, move
//! assignment, giving a buffer to a function and replacing a buffer with a fresh one.
//!
//! Run with diagnostics to see each transfer as it happens.

use owning_buffer::{BufferStore, OwningBuffer, TransferSpan};

fn create_buffer() -> OwningBuffer {
    // Returning a local hands it to the caller without copying.
    OwningBuffer::with_len(10)
}

fn process_buffer(buffer: OwningBuffer) {
    println!("processing {} bytes", buffer.len());
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .without_time()
        .init();

    let span = TransferSpan::new();

    let mut store = BufferStore::new();
    let mut created = create_buffer();
    store.insert_forced_move(&mut created);

    let mut h1 = OwningBuffer::with_len(10);
    let mut h2 = OwningBuffer::take(&mut h1); // move construction
    h1.take_from(&mut h2); // move assignment

    // h2 is empty now, but still valid.
    println!("h2 after being moved from: {h2:?}");

    process_buffer(OwningBuffer::take(&mut h1));

    let mut replacement = OwningBuffer::with_len(20);
    h1.take_from(&mut replacement); // move assignment from a temporary

    println!("h1 ends up with {} bytes", h1.len());
    println!("total: {}", span.to_delta());
}
