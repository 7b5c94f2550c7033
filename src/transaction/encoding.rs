//! Graphene binary wire format.
//!
//! Integers are little-endian, lengths and operation ids are unsigned
//! LEB128 varints, strings are length-prefixed UTF-8.

/// Types that have a binary wire form.
pub trait Encode {
    fn encode(&self, out: &mut Encoder);
}

/// Append-only byte sink.
#[derive(Debug, Default)]
pub struct Encoder {
    buf: Vec<u8>,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn i16(&mut self, value: i16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn i64(&mut self, value: i64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn varint(&mut self, mut value: u64) {
        loop {
            let byte = (value & 0x7f) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.push(byte);
                break;
            }
            self.buf.push(byte | 0x80);
        }
    }

    pub fn bytes(&mut self, value: &[u8]) {
        self.buf.extend_from_slice(value);
    }

    pub fn str(&mut self, value: &str) {
        self.varint(value.len() as u64);
        self.buf.extend_from_slice(value.as_bytes());
    }

    /// `flat_set<string>`: sorted, deduplicated.
    pub fn string_set(&mut self, values: &[String]) {
        let mut sorted: Vec<&String> = values.iter().collect();
        sorted.sort();
        sorted.dedup();
        self.varint(sorted.len() as u64);
        for value in sorted {
            self.str(value);
        }
    }

    pub fn encode<T: Encode + ?Sized>(&mut self, value: &T) {
        value.encode(self);
    }
}

/// Encode a value into a fresh buffer.
pub fn to_bytes<T: Encode + ?Sized>(value: &T) -> Vec<u8> {
    let mut encoder = Encoder::new();
    value.encode(&mut encoder);
    encoder.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_varint() {
        let cases: [(u64, &[u8]); 4] = [
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (300, &[0xac, 0x02]),
        ];
        for (value, expected) in cases {
            let mut encoder = Encoder::new();
            encoder.varint(value);
            assert_eq!(encoder.into_bytes(), expected, "varint({})", value);
        }
    }

    #[test]
    fn test_string() {
        let mut encoder = Encoder::new();
        encoder.str("abc");
        assert_eq!(encoder.into_bytes(), vec![3, b'a', b'b', b'c']);
    }

    #[test]
    fn test_string_set_is_sorted_and_deduplicated() {
        let mut encoder = Encoder::new();
        encoder.string_set(&["b".to_string(), "a".to_string(), "b".to_string()]);
        assert_eq!(encoder.into_bytes(), vec![2, 1, b'a', 1, b'b']);
    }

    #[test]
    fn test_little_endian_integers() {
        let mut encoder = Encoder::new();
        encoder.u16(0x0102);
        encoder.u32(0x03040506);
        encoder.i16(-1);
        assert_eq!(
            encoder.into_bytes(),
            vec![0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 0xff, 0xff]
        );
    }
}
