//! Bounded byte cursor and backpatching writer for cellnet.
//!
//! This crate provides [`ByteWriter`] and [`ByteReader`] for little-endian,
//! byte-granular encoding and decoding.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Bounded operations** - All reads are bounds-checked and never advance on failure.
//! - **No domain knowledge** - This crate knows nothing about frames, opcodes, or cells.
//! - **Explicit errors** - All failures return structured errors, never panic.
//!
//! # Example
//!
//! ```
//! use bytestream::{ByteReader, ByteWriter};
//!
//! let mut writer = ByteWriter::new();
//! writer.write_u16(0);
//! writer.write_varu32(300);
//! let len = writer.len() as u16;
//! writer.patch_u16(0, len).unwrap();
//!
//! let bytes = writer.finish();
//!
//! let mut reader = ByteReader::new(&bytes);
//! assert_eq!(reader.read_u16().unwrap(), 4);
//! assert_eq!(reader.read_varu32().unwrap(), 300);
//! ```

mod error;
mod reader;
mod writer;

pub use error::{StreamError, StreamResult};
pub use reader::ByteReader;
pub use writer::ByteWriter;
