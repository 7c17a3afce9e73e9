//! Word Buffer Implementation.
//!
//! Zero-initialized storage for the flat backing store. Every word is
//! `data_width` bits wide; values are masked on write.
//!
//! Storage is allocated lazily in fixed-size pages: a page is only allocated
//! on the first write that lands in it, and reads of untouched pages return
//! zero. A store covering a 32-bit address space therefore costs one page
//! table entry per page up front, not the full word array.

/// Words per lazily allocated page.
pub const PAGE_WORDS: usize = 4096;

/// Fixed-capacity array of data words.
#[derive(Debug, Clone)]
pub struct WordBuffer {
    pages: Vec<Option<Box<[u64]>>>,
    len: usize,
    data_mask: u64,
}

impl WordBuffer {
    /// Creates a zeroed buffer of `len` words. No page is allocated yet.
    ///
    /// # Arguments
    ///
    /// * `len` - Capacity in words.
    /// * `data_mask` - Mask applied to every stored word.
    pub fn new(len: usize, data_mask: u64) -> Self {
        Self {
            pages: vec![None; len.div_ceil(PAGE_WORDS)],
            len,
            data_mask,
        }
    }

    /// Returns the capacity in words.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` for a zero-capacity buffer.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of pages allocated so far.
    pub fn resident_pages(&self) -> usize {
        self.pages.iter().filter(|p| p.is_some()).count()
    }

    #[inline(always)]
    fn locate(&self, index: u64) -> Option<(usize, usize)> {
        let i = usize::try_from(index).ok().filter(|&i| i < self.len)?;
        Some((i / PAGE_WORDS, i % PAGE_WORDS))
    }

    /// Reads one word, or `None` past the end of the buffer.
    #[inline]
    pub fn get(&self, index: u64) -> Option<u64> {
        let (page, word) = self.locate(index)?;
        Some(self.pages[page].as_ref().map_or(0, |p| p[word]))
    }

    /// Writes one word. Returns `false` (and stores nothing) past the end.
    #[inline]
    pub fn set(&mut self, index: u64, value: u64) -> bool {
        let Some((page, word)) = self.locate(index) else {
            return false;
        };
        let page = self.pages[page].get_or_insert_with(|| vec![0; PAGE_WORDS].into_boxed_slice());
        page[word] = value & self.data_mask;
        true
    }
}
