use crate::ir::ast::MemSpace;

// Configuration of the transfer generation pass. The options are resolved once, when the pass is
// constructed; there is no ambient global state overriding them afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct TransferOptions {
    // Memory space the promoted arrays live in.
    pub slow_mem: MemSpace,

    // Memory space the staging buffers are allocated in.
    pub fast_mem: MemSpace,

    // Minimum transfer size supported by the target in bytes. Accepted as configuration but not
    // enforced yet; smaller transfers are still generated.
    pub min_transfer_bytes: i64,

    // Enable to make the pipeline print intermediate ASTs to standard output.
    pub debug_print: bool,
}

impl Default for TransferOptions {
    fn default() -> Self {
        TransferOptions {
            slow_mem: MemSpace(0),
            fast_mem: MemSpace(1),
            min_transfer_bytes: 1024,
            debug_print: false,
        }
    }
}

impl TransferOptions {
    pub fn with_slow_mem(self, slow_mem: MemSpace) -> Self {
        TransferOptions {slow_mem, ..self}
    }

    pub fn with_fast_mem(self, fast_mem: MemSpace) -> Self {
        TransferOptions {fast_mem, ..self}
    }

    // Layers an optional override for the fast memory space on top of the configured value. An
    // absent override leaves the configured fast memory space untouched.
    pub fn resolve_fast_mem(self, fast_mem: Option<MemSpace>) -> Self {
        match fast_mem {
            Some(fast_mem) => TransferOptions {fast_mem, ..self},
            None => self
        }
    }

    pub fn with_min_transfer_bytes(self, min_transfer_bytes: i64) -> Self {
        TransferOptions {min_transfer_bytes, ..self}
    }

    pub fn with_debug_print(self) -> Self {
        TransferOptions {debug_print: true, ..self}
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_memory_spaces() {
        let opts = TransferOptions::default();
        assert_eq!(opts.slow_mem, MemSpace(0));
        assert_eq!(opts.fast_mem, MemSpace(1));
        assert_eq!(opts.min_transfer_bytes, 1024);
    }

    #[test]
    fn fast_mem_override_wins() {
        let opts = TransferOptions::default()
            .with_fast_mem(MemSpace(2))
            .resolve_fast_mem(Some(MemSpace(3)));
        assert_eq!(opts.fast_mem, MemSpace(3));
    }

    #[test]
    fn absent_override_keeps_configured_value() {
        let opts = TransferOptions::default()
            .with_fast_mem(MemSpace(2))
            .resolve_fast_mem(None);
        assert_eq!(opts.fast_mem, MemSpace(2));
    }
}
