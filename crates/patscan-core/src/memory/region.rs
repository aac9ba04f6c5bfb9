//! Module and section descriptors
//!
//! Both are plain `(start, size)` ranges supplied by a process backend. They
//! are taken as given: nothing checks that a section lies inside its module
//! or that ranges do not overlap.

use serde::{Deserialize, Serialize};

use crate::address::{Address, NativeWidth, Width};

/// A contiguous range of target memory
pub trait MemoryRegion<W: Width = NativeWidth> {
    fn start(&self) -> Address<W>;

    /// Length in bytes, address-sized
    fn size(&self) -> Address<W>;

    /// One past the last byte
    fn end(&self) -> Address<W> {
        self.start() + self.size()
    }

    fn contains(&self, address: Address<W>) -> bool {
        if self.size().is_null() {
            return false;
        }
        let last = self.end() - Address::truncating(1);
        address.is_in_range(self.start(), last)
    }
}

/// A loaded binary image
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Module<W: Width = NativeWidth> {
    pub name: String,
    pub start: Address<W>,
    pub size: Address<W>,
}

impl<W: Width> Module<W> {
    pub fn new(name: impl Into<String>, start: Address<W>, size: Address<W>) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }
}

impl<W: Width> MemoryRegion<W> for Module<W> {
    fn start(&self) -> Address<W> {
        self.start
    }

    fn size(&self) -> Address<W> {
        self.size
    }
}

/// A named sub-range of a module, such as `.text` or `.rdata`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct Section<W: Width = NativeWidth> {
    pub name: String,
    pub start: Address<W>,
    pub size: Address<W>,
}

impl<W: Width> Section<W> {
    pub fn new(name: impl Into<String>, start: Address<W>, size: Address<W>) -> Self {
        Self {
            name: name.into(),
            start,
            size,
        }
    }
}

impl<W: Width> MemoryRegion<W> for Section<W> {
    fn start(&self) -> Address<W> {
        self.start
    }

    fn size(&self) -> Address<W> {
        self.size
    }
}
