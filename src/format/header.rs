//! The fixed 16-byte header at the front of every deflated file.
//!
//! Layout, packed, little-endian integers:
//! - offset 0: the three magic bytes `'R','L','E'`
//! - offset 3: the node format byte (0x11 / 0x12 / 0x21 / 0x22)
//! - offset 4: decompressed length, u64
//! - offset 12: table node count, u32

use crate::error::RleError;
use crate::format::node::NodeFormat;

pub const MAGIC: [u8; 3] = *b"RLE";
pub const HEADER_SIZE: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Header {
    pub format: NodeFormat,
    pub decompressed_length: u64,
    pub table_node_count: u32,
}

impl Header {
    /// Emplace the header at the front of an output range.
    pub fn write_to(&self, out: &mut [u8]) {
        out[..3].copy_from_slice(&MAGIC);
        out[3] = self.format.magic();
        out[4..12].copy_from_slice(&self.decompressed_length.to_le_bytes());
        out[12..16].copy_from_slice(&self.table_node_count.to_le_bytes());
    }

    /// Read and validate a header from the front of a compressed stream.
    pub fn parse(data: &[u8]) -> Result<Self, RleError> {
        // A stream too short to hold a header cannot carry the magic either.
        if data.len() < HEADER_SIZE || data[..3] != MAGIC {
            return Err(RleError::BadMagic);
        }
        let format = NodeFormat::from_magic(data[3])?;
        let decompressed_length = u64::from_le_bytes(data[4..12].try_into().unwrap());
        let table_node_count = u32::from_le_bytes(data[12..16].try_into().unwrap());
        Ok(Self {
            format,
            decompressed_length,
            table_node_count,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn write_parse_round_trip() {
        for format in NodeFormat::ALL {
            let header = Header {
                format,
                decompressed_length: 0x0102_0304_0506_0708,
                table_node_count: 42,
            };
            let mut buf = [0u8; HEADER_SIZE];
            header.write_to(&mut buf);
            assert_eq!(Header::parse(&buf).unwrap(), header);
        }
    }

    #[test]
    fn layout_is_packed_little_endian() {
        let header = Header {
            format: NodeFormat::P8L16,
            decompressed_length: 1000,
            table_node_count: 1,
        };
        let mut buf = [0u8; HEADER_SIZE];
        header.write_to(&mut buf);
        assert_eq!(&buf[..4], &[b'R', b'L', b'E', 0x12]);
        assert_eq!(&buf[4..12], &[0xE8, 0x03, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&buf[12..], &[1, 0, 0, 0]);
    }

    #[test]
    fn rejects_bad_magic() {
        let mut buf = [0u8; HEADER_SIZE];
        Header {
            format: NodeFormat::P8L8,
            decompressed_length: 0,
            table_node_count: 0,
        }
        .write_to(&mut buf);
        buf[0] = b'X';
        assert!(matches!(Header::parse(&buf), Err(RleError::BadMagic)));
    }

    #[test]
    fn rejects_unknown_format_byte() {
        let mut buf = [0u8; HEADER_SIZE];
        buf[..3].copy_from_slice(&MAGIC);
        buf[3] = 0x99;
        assert!(matches!(Header::parse(&buf), Err(RleError::BadFormat(0x99))));
    }

    #[test]
    fn rejects_truncated_header() {
        assert!(matches!(Header::parse(b"RL"), Err(RleError::BadMagic)));
    }
}
