//! Compares the cost of duplicating a buffer against transferring its ownership.
#![allow(
    missing_docs,
    reason = "No need for API documentation in benchmark code"
)]

use std::hint::black_box;
use std::iter;
use std::time::Instant;

use alloc_tracker::Allocator;
use criterion::{Criterion, criterion_group, criterion_main};
use owning_buffer::{BufferStore, OwningBuffer, TransferIntent};

criterion_group!(benches, entrypoint);
criterion_main!(benches);

#[global_allocator]
static ALLOCATOR: Allocator<std::alloc::System> = Allocator::system();

// One frame of 1080p RGB, the classic "heavy object".
const BUFFER_LEN: usize = 1920 * 1080 * 3;

fn buffers(count: u64) -> Vec<OwningBuffer> {
    iter::repeat_with(|| OwningBuffer::with_len(BUFFER_LEN))
        .take(usize::try_from(count).unwrap())
        .collect()
}

fn entrypoint(c: &mut Criterion) {
    let allocs = alloc_tracker::Session::new();

    let mut group = c.benchmark_group("copy_vs_move");

    let allocs_op = allocs.operation("copy_construct");
    group.bench_function("copy_construct", |b| {
        b.iter_custom(|iters| {
            let sources = buffers(iters);

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for source in &sources {
                drop(black_box(source.clone()));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("move_construct");
    group.bench_function("move_construct", |b| {
        b.iter_custom(|iters| {
            let mut sources = buffers(iters);
            let mut destinations = Vec::with_capacity(sources.len());

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for source in &mut sources {
                destinations.push(black_box(OwningBuffer::take(source)));
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("forward_copy");
    group.bench_function("forward_copy", |b| {
        b.iter_custom(|iters| {
            let mut sources = buffers(iters);
            let mut store = BufferStore::with_capacity(sources.len());

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for source in &mut sources {
                store
                    .insert_forwarded(source, TransferIntent::Copy)
                    .unwrap();
            }

            start.elapsed()
        });
    });

    let allocs_op = allocs.operation("forward_move");
    group.bench_function("forward_move", |b| {
        b.iter_custom(|iters| {
            let mut sources = buffers(iters);
            let mut store = BufferStore::with_capacity(sources.len());

            let _span = allocs_op.measure_thread().iterations(iters);

            let start = Instant::now();

            for source in &mut sources {
                store
                    .insert_forwarded(source, TransferIntent::Move)
                    .unwrap();
            }

            start.elapsed()
        });
    });

    group.finish();

    allocs.print_to_stdout();
}
