//! Verifies with a tracking global allocator that ownership transfers never touch the heap,
//! while duplications allocate exactly the duplicated region.

#![cfg(not(miri))] // Miri replaces the global allocator, so cannot be used here.

use std::hint::black_box;

use alloc_tracker::{Allocator, Session};
use owning_buffer::{BufferStore, OwningBuffer, TransferIntent};

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

const BUFFER_LEN: usize = 64 * 1024;

// Diagnostics and metrics register themselves lazily on first use, which allocates.
// Run every operation once so that measurements only see the operation itself.
fn warm_up() {
    let mut source = OwningBuffer::with_len(16);
    let mut target = OwningBuffer::take(&mut source);
    let copy = target.clone();
    target.take_from(&mut source);
    target.copy_from(&copy);

    let mut store = BufferStore::new();
    store.insert_forwarded(&mut target, TransferIntent::Move).unwrap();
    store.insert_forwarded(&mut target, TransferIntent::Copy).unwrap();
}

#[test]
fn move_construct_allocates_nothing() {
    warm_up();
    let session = Session::new();

    let mut source = OwningBuffer::with_len(BUFFER_LEN);

    let bytes = {
        let operation = session.operation("move_construct");
        {
            let _span = operation.measure_thread();
            let destination = OwningBuffer::take(&mut source);
            black_box(&destination);
            // Keep the drop (a release, not an allocation) inside the span too.
            drop(destination);
        }
        operation.total_bytes_allocated()
    };

    assert_eq!(bytes, 0);
    assert!(source.is_empty());
}

#[test]
fn move_assign_allocates_nothing() {
    warm_up();
    let session = Session::new();

    let mut source = OwningBuffer::with_len(BUFFER_LEN);
    let mut target = OwningBuffer::with_len(BUFFER_LEN);

    let bytes = {
        let operation = session.operation("move_assign");
        {
            let _span = operation.measure_thread();
            target.take_from(&mut source);
            black_box(&target);
        }
        operation.total_bytes_allocated()
    };

    assert_eq!(bytes, 0);
    assert_eq!(target.len(), BUFFER_LEN);
}

#[test]
fn copy_construct_allocates_region() {
    warm_up();
    let session = Session::new();

    let source = OwningBuffer::with_len(BUFFER_LEN);

    let bytes = {
        let operation = session.operation("copy_construct");
        {
            let _span = operation.measure_thread();
            let copy = source.clone();
            black_box(&copy);
        }
        operation.total_bytes_allocated()
    };

    assert!(bytes >= u64::try_from(BUFFER_LEN).unwrap());
}

#[test]
fn forwarding_move_allocates_nothing_beyond_slot_list() {
    warm_up();
    let session = Session::new();

    // Reserve the slot list up front so only the buffer transfer is measured.
    let mut store = BufferStore::with_capacity(1);
    let mut value = OwningBuffer::with_len(BUFFER_LEN);

    let bytes = {
        let operation = session.operation("forward_move");
        {
            let _span = operation.measure_thread();
            store
                .insert_forwarded(&mut value, TransferIntent::Move)
                .unwrap();
        }
        operation.total_bytes_allocated()
    };

    assert_eq!(bytes, 0);
    assert!(value.is_empty());
}
