//! Shows the operations on a collection of buffers that benefit from ownership transfer:
//! moving a whole collection, constructing in place, moving single buffers in and growing.

use owning_buffer::{BufferStore, OwningBuffer, TransferIntent, TransferSpan};

fn create_store() -> BufferStore {
    let mut store = BufferStore::with_capacity(100);
    for len in 0..3 {
        store.insert(OwningBuffer::with_len(len));
    }
    store
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .without_time()
        .init();

    let span = TransferSpan::new();

    let mut v1 = create_store();
    let mut v2 = v1.take_all();
    println!("after moving the store: v1 has {} slots, v2 has {}", v1.len(), v2.len());

    let mut h = OwningBuffer::with_len(10);
    v2.emplace(10).expect("allocation failed");
    v2.insert_forwarded(&mut h, TransferIntent::Move)
        .expect("allocation failed");

    // Growing pads with empty buffers; existing regions stay where they are.
    v2.resize(1000);

    println!(
        "v2 has {} slots holding {} bytes",
        v2.len(),
        v2.total_len()
    );
    println!("total: {}", span.to_delta());
}
