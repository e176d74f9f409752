/// Packed null flags, one bit per row; a set bit marks a null row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NullBitmap {
    bits: Vec<u8>,
    len: usize,
}

impl NullBitmap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bitmap of `len` rows, none of them null.
    pub fn with_len(len: usize) -> Self {
        Self {
            bits: vec![0; len.div_ceil(8)],
            len,
        }
    }

    pub fn from_flags<I: IntoIterator<Item = bool>>(flags: I) -> Self {
        let mut bitmap = Self::new();
        for is_null in flags {
            bitmap.push(is_null);
        }
        bitmap
    }

    pub fn push(&mut self, is_null: bool) {
        if self.len % 8 == 0 {
            self.bits.push(0);
        }
        let idx = self.len;
        self.len += 1;
        if is_null {
            self.bits[idx / 8] |= 1 << (idx % 8);
        }
    }

    pub fn set(&mut self, idx: usize, is_null: bool) {
        if is_null {
            self.bits[idx / 8] |= 1 << (idx % 8);
        } else {
            self.bits[idx / 8] &= !(1 << (idx % 8));
        }
    }

    #[inline]
    pub fn is_null(&self, idx: usize) -> bool {
        (self.bits[idx / 8] & (1 << (idx % 8))) != 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn null_count(&self) -> usize {
        self.bits.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn has_nulls(&self) -> bool {
        self.bits.iter().any(|b| *b != 0)
    }

    pub fn data_size(&self) -> usize {
        self.bits.capacity()
    }
}
