use std::sync::atomic::{AtomicU64, AtomicU8, Ordering};

/// Acquire/release shorthands for the counters and flags shared between the
/// coordinator and its data workers.
pub trait AtomicExtension {
    type T;
    fn load_acquire(&self) -> Self::T;
    fn store_release(&self, val: Self::T);
    fn swap_acq_rel(&self, val: Self::T) -> Self::T;
    fn fetch_add_acq_rel(&self, val: Self::T) -> Self::T;
}

macro_rules! impl_atomic_extension {
    ($t:ty, $atomicType: ty) => {
        impl AtomicExtension for $atomicType {
            type T = $t;
            fn load_acquire(&self) -> $t {
                self.load(Ordering::Acquire)
            }
            fn store_release(&self, val: $t) {
                self.store(val, Ordering::Release);
            }
            fn swap_acq_rel(&self, val: $t) -> $t {
                self.swap(val, Ordering::AcqRel)
            }
            fn fetch_add_acq_rel(&self, val: $t) -> $t {
                self.fetch_add(val, Ordering::AcqRel)
            }
        }
    };
}

impl_atomic_extension!(u8, AtomicU8);
impl_atomic_extension!(u64, AtomicU64);
