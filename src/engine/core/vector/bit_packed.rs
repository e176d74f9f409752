pub const BLOCK_LEN: usize = 128;

/// Blocks of 128 values packed with a per-block bit width.
///
/// Layout follows the SIMD-BP128 idea (one width per 128-value block) but
/// stores values sequentially in 64-bit words instead of interleaved lanes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitPacked128Vector {
    words: Vec<u64>,
    block_widths: Vec<u8>,
    block_word_offsets: Vec<usize>,
    len: usize,
}

impl BitPacked128Vector {
    pub fn compress(values: &[u32]) -> Self {
        let block_count = values.len().div_ceil(BLOCK_LEN);
        let mut words = Vec::new();
        let mut block_widths = Vec::with_capacity(block_count);
        let mut block_word_offsets = Vec::with_capacity(block_count);

        for block in values.chunks(BLOCK_LEN) {
            let max = block.iter().copied().max().unwrap_or(0);
            let width = (u32::BITS - max.leading_zeros()) as usize;
            let base = words.len();
            block_widths.push(width as u8);
            block_word_offsets.push(base);
            if width == 0 {
                continue;
            }

            words.resize(base + (block.len() * width).div_ceil(64), 0);
            for (j, &value) in block.iter().enumerate() {
                let bit = j * width;
                let word = base + bit / 64;
                let shift = bit % 64;
                words[word] |= (value as u64) << shift;
                if shift + width > 64 {
                    words[word + 1] |= (value as u64) >> (64 - shift);
                }
            }
        }

        Self {
            words,
            block_widths,
            block_word_offsets,
            len: values.len(),
        }
    }

    /// Reads one value without touching any cache.
    #[inline]
    pub fn get(&self, i: usize) -> u32 {
        let block = i / BLOCK_LEN;
        self.unpack(block, i % BLOCK_LEN)
    }

    #[inline]
    fn unpack(&self, block: usize, j: usize) -> u32 {
        let width = self.block_widths[block] as usize;
        if width == 0 {
            return 0;
        }
        let bit = j * width;
        let word = self.block_word_offsets[block] + bit / 64;
        let shift = bit % 64;
        let mut raw = self.words[word] >> shift;
        if shift + width > 64 {
            raw |= self.words[word + 1] << (64 - shift);
        }
        (raw & ((1u64 << width) - 1)) as u32
    }

    fn unpack_block(&self, block: usize, out: &mut [u32; BLOCK_LEN]) -> usize {
        let block_len = BLOCK_LEN.min(self.len - block * BLOCK_LEN);
        for (j, slot) in out.iter_mut().enumerate().take(block_len) {
            *slot = self.unpack(block, j);
        }
        block_len
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn block_width(&self, block: usize) -> Option<u8> {
        self.block_widths.get(block).copied()
    }

    pub fn data_size(&self) -> usize {
        self.words.len() * 8
            + self.block_widths.len()
            + self.block_word_offsets.len() * std::mem::size_of::<usize>()
    }

    pub fn create_decompressor(&self) -> BitPacked128Decompressor<'_> {
        BitPacked128Decompressor {
            vector: self,
            cached_block: None,
            buffer: [0; BLOCK_LEN],
        }
    }
}

/// Decompressor that keeps the most recently touched block unpacked.
#[derive(Debug, Clone)]
pub struct BitPacked128Decompressor<'a> {
    vector: &'a BitPacked128Vector,
    cached_block: Option<usize>,
    buffer: [u32; BLOCK_LEN],
}

impl BitPacked128Decompressor<'_> {
    #[inline]
    pub fn get(&mut self, i: usize) -> u32 {
        let block = i / BLOCK_LEN;
        if self.cached_block != Some(block) {
            self.vector.unpack_block(block, &mut self.buffer);
            self.cached_block = Some(block);
        }
        self.buffer[i % BLOCK_LEN]
    }

    pub fn len(&self) -> usize {
        self.vector.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vector.is_empty()
    }
}
