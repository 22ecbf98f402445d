//! Shows how passing a buffer around by duplication costs an allocation and a full copy
//! at every hand-off, even when the caller never looks at its buffer again.

use owning_buffer::{OwningBuffer, TransferSpan};

// One frame of 1080p RGB.
const FRAME_LEN: usize = 1920 * 1080 * 3;

fn update(frame: &OwningBuffer) -> OwningBuffer {
    let mut updated = frame.clone();
    if let Some(first) = updated.first_mut() {
        *first = 0;
    }
    updated
}

fn update_in_place(mut frame: OwningBuffer) -> OwningBuffer {
    if let Some(first) = frame.first_mut() {
        *first = 0;
    }
    frame
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .without_time()
        .init();

    let frame = OwningBuffer::with_len(FRAME_LEN);

    let span = TransferSpan::new();
    let updated = update(&frame);
    println!("Updating a copy: {}", span.to_delta());

    let span = TransferSpan::new();
    let updated_again = update_in_place(updated);
    println!("Updating in place: {}", span.to_delta());

    println!(
        "Original frame has {} bytes, updated frame has {} bytes",
        frame.len(),
        updated_again.len()
    );
}
