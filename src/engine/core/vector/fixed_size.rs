/// Values stored with the narrowest byte-aligned width that fits the maximum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixedSizeByteAlignedVector {
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
}

impl FixedSizeByteAlignedVector {
    pub fn compress(values: &[u32]) -> Self {
        let max = values.iter().copied().max().unwrap_or(0);
        if max <= u8::MAX as u32 {
            Self::U8(values.iter().map(|&v| v as u8).collect())
        } else if max <= u16::MAX as u32 {
            Self::U16(values.iter().map(|&v| v as u16).collect())
        } else {
            Self::U32(values.to_vec())
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        match self {
            Self::U8(data) => data[i] as u32,
            Self::U16(data) => data[i] as u32,
            Self::U32(data) => data[i],
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::U8(data) => data.len(),
            Self::U16(data) => data.len(),
            Self::U32(data) => data.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn width_bytes(&self) -> usize {
        match self {
            Self::U8(_) => 1,
            Self::U16(_) => 2,
            Self::U32(_) => 4,
        }
    }

    pub fn data_size(&self) -> usize {
        self.len() * self.width_bytes()
    }

    pub fn create_decompressor(&self) -> FixedSizeDecompressor<'_> {
        FixedSizeDecompressor { vector: self }
    }
}

#[derive(Debug, Clone)]
pub struct FixedSizeDecompressor<'a> {
    vector: &'a FixedSizeByteAlignedVector,
}

impl FixedSizeDecompressor<'_> {
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        self.vector.get(i)
    }

    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}
