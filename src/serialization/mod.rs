//! Session snapshots.
//!
//! A snapshot is the exported grid plus the running score and move count.
//! It is written as JSON for files a person might edit, or postcard bytes
//! when size matters. Restoring re-validates the grid exactly like an import.

mod snapshot;

pub use snapshot::{
    Snapshot,
    SnapshotError,
    to_postcard_bytes,
    from_postcard_bytes,
    write_json_to_path,
    read_json_from_path,
    write_to_path,
    read_from_path,
};
