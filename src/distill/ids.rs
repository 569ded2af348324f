/// Identifier allocator for one distillation pass.
///
/// A single allocator is threaded through the whole multi-frame pass:
/// each frame's evaluation takes the allocator by value and returns it
/// updated alongside the frame's partial result. Keeping the counter an
/// explicit value (rather than shared mutable state) makes cross-frame
/// ordering deterministic and keeps a concurrent-frame variant safe to
/// reconcile afterwards.
///
/// Identifiers start at 1 and are never reissued within a pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: u32,
}

impl IdAllocator {
    pub fn new() -> Self {
        IdAllocator { next: 1 }
    }

    /// Issue the next identifier, returning it with the updated allocator.
    #[must_use]
    pub fn allocate(self) -> (u32, IdAllocator) {
        (self.next, IdAllocator { next: self.next + 1 })
    }

    /// Number of identifiers issued so far
    pub fn issued(&self) -> u32 {
        self.next - 1
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[path = "ids_test.rs"]
mod ids_test;
