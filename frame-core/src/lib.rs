//! Frame Core - text ingestion for a frame-based object store (pure logic, no IO)
//!
//! Contains the lexer kit, the in-memory object heap, the reader that turns
//! frame text into frames and arrays, and 64-bit fingerprint utilities.
//!
//! Configuration is passed explicitly via parameters, not via global state.

pub mod kit;
pub mod reader;
pub mod store;
pub mod util;

// Re-export common types
pub use kit::lexer::{Lexer, TokenSource};
pub use reader::{ReadError, ReadResult, Reader};
pub use store::{Handle, Heap, Object, ObjectStore, Slot, StoreError};
pub use util::{fingerprint, fingerprint_cat, fingerprint_str};

// Re-export config types from frame-config
pub use frame_config::{FrameConfig, Phase, ReaderConfig, StoreConfig};

/// Read every top-level object of `source` into `store` in one session
pub fn read_str<S: ObjectStore + ?Sized>(
    store: &mut S,
    source: &str,
    config: &ReaderConfig,
) -> ReadResult<Vec<Handle>> {
    Reader::new(store, Lexer::from_source(source), config).read_all()
}
