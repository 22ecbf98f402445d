#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! A byte buffer with exclusive ownership of its heap region and explicit, observable
//! copy and move transfers.
//!
//! This package is a study of value semantics: when does handing a value to someone else
//! duplicate it, when does it transfer ownership, and what happens to the value left behind?
//!
//! The core functionality includes:
//! - [`OwningBuffer`] - owns a heap byte region exclusively; copies allocate and duplicate,
//!   moves adopt the region and leave the source empty but valid
//! - [`TransferIntent`] - lets a caller declare whether a callee may empty its buffer
//! - [`BufferStore`] - receives buffers through different copy/move policies and supports
//!   slot-to-slot assignment, including self-assignment
//! - [`TransferStats`] and [`TransferSpan`] - per-thread counters of allocations, copies,
//!   moves and releases
//!
//! # Copy versus move
//!
//! ```
//! use owning_buffer::{OwningBuffer, TransferSpan};
//!
//! let mut original = OwningBuffer::with_len(1024 * 1024);
//!
//! let span = TransferSpan::new();
//! let duplicate = original.clone();
//! let adopted = OwningBuffer::take(&mut original);
//! let delta = span.to_delta();
//!
//! // The copy allocated and duplicated a megabyte; the move did neither.
//! assert_eq!(delta.copies(), 1);
//! assert_eq!(delta.bytes_copied(), 1024 * 1024);
//! assert_eq!(delta.moves(), 1);
//! assert_eq!(delta.allocations(), 1);
//!
//! assert!(original.is_empty());
//! assert_eq!(adopted, duplicate);
//! ```
//!
//! # Forwarding the caller's intent
//!
//! Generic code that stores a buffer on behalf of a caller should neither always copy (wasting
//! work when the caller is done with the buffer) nor always move (emptying a buffer the caller
//! still uses). [`BufferStore::insert_forwarded()`] takes a [`TransferIntent`] and does exactly
//! what the caller declared.
//!
//! ```
//! use owning_buffer::{BufferStore, OwningBuffer, TransferIntent, TransferSpan};
//!
//! let mut store = BufferStore::new();
//! let mut keep = OwningBuffer::with_len(64);
//! let mut give = OwningBuffer::with_len(64);
//!
//! let span = TransferSpan::new();
//! store.insert_forwarded(&mut keep, TransferIntent::Copy)?;
//! store.insert_forwarded(&mut give, TransferIntent::Move)?;
//! let delta = span.to_delta();
//!
//! assert_eq!(delta.copies(), 1);
//! assert_eq!(delta.moves(), 1);
//! assert_eq!(keep.len(), 64);
//! assert!(give.is_empty());
//! # Ok::<(), owning_buffer::Error>(())
//! ```
//!
//! # Errors
//!
//! Allocation failure is the only error. Operations that allocate have a `try_` form or return
//! [`Result`][std::result::Result] with [`Error::AllocationFailure`]; no partially constructed
//! buffer is ever observable.
//!
//! # Diagnostics
//!
//! Every construction, copy, move, assignment and release emits a `tracing` event at the
//! `TRACE` level and is published as an `nm` metrics event named `owning_buffer_*`.

mod buffer;
mod builder;
mod error;
mod stats;
mod store;
mod transfer_intent;

pub use buffer::*;
pub use builder::*;
pub use error::Error;
pub(crate) use error::Result;
pub use stats::{TransferSpan, TransferStats};
pub use store::*;
pub use transfer_intent::*;
