//! Little-endian byte buffer with back-patching.
//!
//! From https://github.com/khanghugo/dem/blob/master/src/byte_writer.rs

pub struct ByteWriter {
    pub data: Vec<u8>,
    offset: usize,
}

impl Default for ByteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteWriter {
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            offset: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: Vec::with_capacity(capacity),
            offset: 0,
        }
    }

    fn offset(&mut self, offset: usize) {
        self.offset += offset;
    }

    pub fn get_offset(&self) -> usize {
        self.offset
    }

    pub fn append_u8(&mut self, i: u8) {
        self.data.push(i);
        self.offset(1);
    }

    pub fn append_u16(&mut self, i: u16) {
        self.data.extend(i.to_le_bytes());
        self.offset(2);
    }

    pub fn append_u32(&mut self, i: u32) {
        self.data.extend(i.to_le_bytes());
        self.offset(4);
    }

    pub fn append_u8_slice(&mut self, i: &[u8]) {
        self.data.extend_from_slice(i);
        self.offset(i.len());
    }

    pub fn append_u16_slice(&mut self, i: &[u16]) {
        i.iter().for_each(|&value| self.append_u16(value));
    }

    /// Overwrites bytes that were already appended.
    ///
    /// Panics if `start + slice.len()` is past what has been written.
    pub fn replace(&mut self, start: usize, slice: &[u8]) {
        self.data[start..(start + slice.len())].copy_from_slice(slice);
    }

    pub fn replace_with_u16(&mut self, start: usize, val: u16) {
        self.replace(start, &val.to_le_bytes());
    }

    pub fn replace_with_u32(&mut self, start: usize, val: u32) {
        self.replace(start, &val.to_le_bytes());
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }
}

#[cfg(test)]
mod test {
    use super::ByteWriter;

    #[test]
    fn little_endian() {
        let mut writer = ByteWriter::new();

        writer.append_u16(0x1234);
        writer.append_u32(0xdeadbeef);

        assert_eq!(writer.data, [0x34, 0x12, 0xef, 0xbe, 0xad, 0xde]);
        assert_eq!(writer.get_offset(), 6);
    }

    #[test]
    fn back_patch() {
        let mut writer = ByteWriter::new();

        writer.append_u8(0xff);
        let placeholder = writer.get_offset();
        writer.append_u16(0);
        writer.append_u8_slice(b"tail");

        writer.replace_with_u16(placeholder, 528);

        assert_eq!(writer.into_bytes(), [0xff, 0x10, 0x02, b't', b'a', b'i', b'l']);
    }
}
