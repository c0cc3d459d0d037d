use std::mem;

use tracing::debug;

/// Dense index of a processor inside a [`ProcessorArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ProcessorHandle(u32);

impl ProcessorHandle {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Paged pool of per-group processors.
///
/// Processors are allocated one page at a time and are never freed individually;
/// dropping the arena releases all of them. Pages never reallocate once created.
#[derive(Debug)]
pub struct ProcessorArena<P> {
    pages: Vec<Vec<P>>,
    page_size: usize,
    len: usize,
}

impl<P: Default> ProcessorArena<P> {
    pub fn new(page_size: usize) -> Self {
        Self {
            pages: Vec::new(),
            page_size: page_size.max(1),
            len: 0,
        }
    }

    /// Allocates a fresh default processor.
    pub fn alloc(&mut self) -> ProcessorHandle {
        self.alloc_with(P::default())
    }

    /// Moves `processor` into the arena.
    pub fn alloc_with(&mut self, processor: P) -> ProcessorHandle {
        let needs_page = self
            .pages
            .last()
            .is_none_or(|page| page.len() == self.page_size);
        if needs_page {
            self.pages.push(Vec::with_capacity(self.page_size));
            debug!(
                target: "logagg::arena",
                pages = self.pages.len(),
                page_size = self.page_size,
                "Allocated processor page"
            );
        }
        if let Some(page) = self.pages.last_mut() {
            page.push(processor);
        }
        let handle = ProcessorHandle(self.len as u32);
        self.len += 1;
        handle
    }

    pub fn get(&self, handle: ProcessorHandle) -> &P {
        let idx = handle.index();
        &self.pages[idx / self.page_size][idx % self.page_size]
    }

    pub fn get_mut(&mut self, handle: ProcessorHandle) -> &mut P {
        let idx = handle.index();
        &mut self.pages[idx / self.page_size][idx % self.page_size]
    }

    /// Moves the processor out, leaving a default one behind.
    pub fn take(&mut self, handle: ProcessorHandle) -> P {
        mem::take(self.get_mut(handle))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Bytes reserved by pages, excluding heap data owned by the processors.
    pub fn bytes_allocated(&self) -> usize {
        self.pages.len() * self.page_size * mem::size_of::<P>()
    }
}
