//! Shows how the kind of access a function asks for decides what a caller may pass to it
//! and what state the caller's buffer is in afterwards.

use owning_buffer::OwningBuffer;

/// Accepts any buffer the caller can lend out; the buffer cannot be changed.
fn inspect(buffer: &OwningBuffer) -> usize {
    buffer.len()
}

/// Accepts only a buffer the caller lends out exclusively; the caller sees the changes.
fn overwrite(buffer: &mut OwningBuffer) {
    buffer.fill(0xFF);
}

/// Accepts only a buffer the caller gives away; the caller can no longer name it.
fn consume(buffer: OwningBuffer) -> usize {
    buffer.len()
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .without_time()
        .init();

    let mut persistent = OwningBuffer::with_len(10);

    println!("inspect(&persistent) = {}", inspect(&persistent));
    println!(
        "inspect(&temporary) = {}",
        inspect(&OwningBuffer::with_len(5))
    );

    overwrite(&mut persistent);
    println!(
        "after overwrite(&mut persistent) first byte = {:#x}",
        persistent.first().copied().unwrap_or_default()
    );

    // Giving away a value the caller holds would make the name unusable. Taking its
    // contents instead leaves an empty but valid buffer behind.
    let taken = OwningBuffer::take(&mut persistent);
    println!("consume(taken) = {}", consume(taken));
    println!("persistent is now empty: {}", persistent.is_empty());

    println!("consume(temporary) = {}", consume(OwningBuffer::with_len(3)));

    let address = persistent.as_ptr();
    println!("an empty buffer owns no region: {address:?}");
}
