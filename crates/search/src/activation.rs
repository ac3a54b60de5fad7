use std::sync::atomic::{AtomicBool, Ordering};

static ACTIVE: AtomicBool = AtomicBool::new(false);

/// Process-wide marker for an open overlay. Released on drop.
#[derive(Debug)]
pub struct Activation {
    _private: (),
}

impl Activation {
    /// `None` when an overlay is already active.
    pub fn acquire() -> Option<Self> {
        ACTIVE
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { _private: () })
    }

    pub fn is_active() -> bool {
        ACTIVE.load(Ordering::Acquire)
    }
}

impl Drop for Activation {
    fn drop(&mut self) {
        ACTIVE.store(false, Ordering::Release);
    }
}
