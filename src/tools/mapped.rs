//! Memory mapped byte ranges over input and output files.
//!
//! The codec reads and writes through contiguous byte views: a read-only
//! view of the whole input, and a writable view created at the exact final
//! length before the first byte is written. Views live only for the
//! duration of one deflate or inflate call; writers flush before release.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::Path;

use memmap2::{Mmap, MmapMut};

/// Map an existing file as one read-only byte range.
pub fn view(path: &Path) -> io::Result<Mmap> {
    let file = File::open(path)?;
    // Safety: the mapping is read-only and dropped before the codec call
    // returns; concurrent truncation of the input is not supported.
    unsafe { Mmap::map(&file) }
}

/// Create (or truncate) a file of exactly `length` bytes and map it as one
/// writable byte range.
pub fn view_mut(path: &Path, length: u64) -> io::Result<MmapMut> {
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    file.set_len(length)?;
    // Safety: the file was just created at this length and the mapping is
    // exclusively owned until it is flushed and dropped.
    unsafe { MmapMut::map_mut(&file) }
}
