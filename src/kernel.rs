//! Kernel capability layer.
//!
//! The logger needs three things from the RTOS: a blocking mutex, a
//! "schedulable thread context" query, and wall-clock time. On ESP-IDF
//! these map to FreeRTOS primitives; on the host they map to `std`, so
//! firmware logic built on the logger also runs under `cargo test`.

pub use imp::{Mutex, MutexGuard};

/// True when called from a schedulable task, false in ISR context or
/// before the scheduler has started.
pub fn in_thread() -> bool {
    imp::in_thread()
}

/// Wall-clock time as raw seconds since the Unix epoch. No timezone
/// adjustment, no sub-second resolution.
pub fn epoch_seconds() -> i64 {
    imp::epoch_seconds()
}

#[cfg(target_os = "espidf")]
mod imp {
    use core::cell::UnsafeCell;
    use core::ops::{Deref, DerefMut};

    use esp_idf_svc::sys;

    // FreeRTOS macro constants, not present in the generated bindings.
    const QUEUE_TYPE_MUTEX: u8 = 1;
    const SEND_TO_BACK: i32 = 0;
    const SCHEDULER_RUNNING: i32 = 2;
    const BLOCK: sys::TickType_t = sys::TickType_t::MAX;

    /// Blocking FreeRTOS mutex owning its data.
    ///
    /// Acquisition blocks the calling task until the holder releases.
    /// No timeout, no recursion.
    pub struct Mutex<T> {
        handle: sys::QueueHandle_t,
        value: UnsafeCell<T>,
    }

    // SAFETY: access to `value` is serialized by the FreeRTOS mutex; the
    // raw handle is only used through take/give/delete.
    unsafe impl<T: Send> Send for Mutex<T> {}
    unsafe impl<T: Send> Sync for Mutex<T> {}

    impl<T> Mutex<T> {
        pub fn new(value: T) -> Self {
            // SAFETY: mutex creation has no preconditions. A null handle
            // means heap exhaustion, which is fatal at the platform
            // level.
            let handle = unsafe { sys::xQueueCreateMutex(QUEUE_TYPE_MUTEX) };
            debug_assert!(!handle.is_null(), "mutex allocation failed");
            Self {
                handle,
                value: UnsafeCell::new(value),
            }
        }

        /// Acquire the mutex, blocking until available.
        pub fn lock(&self) -> MutexGuard<'_, T> {
            // SAFETY: handle is valid for the lifetime of self; entry
            // points assert thread context before reaching here.
            unsafe {
                sys::xQueueSemaphoreTake(self.handle, BLOCK);
            }
            MutexGuard { lock: self }
        }

        /// Access the data without locking. The exclusive borrow proves
        /// no guard exists.
        pub fn get_mut(&mut self) -> &mut T {
            // SAFETY: `&mut self` rules out concurrent holders.
            unsafe { &mut *self.value.get() }
        }
    }

    impl<T> Drop for Mutex<T> {
        fn drop(&mut self) {
            // SAFETY: exclusive access; no task can hold or wait on a
            // mutex that is being dropped.
            unsafe { sys::vQueueDelete(self.handle) };
        }
    }

    pub struct MutexGuard<'a, T> {
        lock: &'a Mutex<T>,
    }

    impl<T> Deref for MutexGuard<'_, T> {
        type Target = T;

        fn deref(&self) -> &T {
            // SAFETY: the guard's existence means the mutex is held.
            unsafe { &*self.lock.value.get() }
        }
    }

    impl<T> DerefMut for MutexGuard<'_, T> {
        fn deref_mut(&mut self) -> &mut T {
            // SAFETY: the guard's existence means the mutex is held.
            unsafe { &mut *self.lock.value.get() }
        }
    }

    impl<T> Drop for MutexGuard<'_, T> {
        fn drop(&mut self) {
            // SAFETY: the guard holds the mutex, so give cannot fail.
            unsafe {
                sys::xQueueGenericSend(self.lock.handle, core::ptr::null(), 0, SEND_TO_BACK);
            }
        }
    }

    pub fn in_thread() -> bool {
        // SAFETY: both queries are callable from any context.
        unsafe {
            sys::xPortInIsrContext() == 0
                && sys::xTaskGetSchedulerState() == SCHEDULER_RUNNING
        }
    }

    pub fn epoch_seconds() -> i64 {
        // SAFETY: newlib `time` with a null out-pointer just returns the
        // current time.
        unsafe { sys::time(core::ptr::null_mut()) as i64 }
    }
}

#[cfg(not(target_os = "espidf"))]
mod imp {
    use core::ops::{Deref, DerefMut};

    use std::sync::{Mutex as StdMutex, MutexGuard as StdMutexGuard};
    use std::time::{SystemTime, UNIX_EPOCH};

    /// Host stand-in for the FreeRTOS mutex.
    pub struct Mutex<T> {
        inner: StdMutex<T>,
    }

    impl<T> Mutex<T> {
        pub fn new(value: T) -> Self {
            Self {
                inner: StdMutex::new(value),
            }
        }

        /// Acquire the mutex, blocking until available.
        ///
        /// A panicked holder poisons the lock; the logger must keep
        /// working, so the poisoned state is entered anyway.
        pub fn lock(&self) -> MutexGuard<'_, T> {
            let guard = self
                .inner
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            MutexGuard { guard }
        }

        pub fn get_mut(&mut self) -> &mut T {
            self.inner
                .get_mut()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    pub struct MutexGuard<'a, T> {
        guard: StdMutexGuard<'a, T>,
    }

    impl<T> Deref for MutexGuard<'_, T> {
        type Target = T;

        fn deref(&self) -> &T {
            &self.guard
        }
    }

    impl<T> DerefMut for MutexGuard<'_, T> {
        fn deref_mut(&mut self) -> &mut T {
            &mut self.guard
        }
    }

    /// Host processes always run in schedulable thread context.
    pub fn in_thread() -> bool {
        true
    }

    pub fn epoch_seconds() -> i64 {
        match SystemTime::now().duration_since(UNIX_EPOCH) {
            Ok(elapsed) => elapsed.as_secs() as i64,
            Err(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutex_serializes_access() {
        use std::sync::Arc;
        use std::thread;

        let counter = Arc::new(Mutex::new(0u32));
        let mut handles = vec![];

        for _ in 0..4 {
            let counter = Arc::clone(&counter);
            handles.push(thread::spawn(move || {
                for _ in 0..1000 {
                    *counter.lock() += 1;
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(*counter.lock(), 4000);
    }

    #[test]
    fn test_get_mut_bypasses_lock() {
        let mut mutex = Mutex::new(7u32);
        *mutex.get_mut() = 11;
        assert_eq!(*mutex.lock(), 11);
    }

    #[test]
    fn test_host_is_thread_context() {
        assert!(in_thread());
    }

    #[test]
    fn test_epoch_seconds_is_current() {
        // Sanity bound: after 2020-01-01, before 2100-01-01.
        let now = epoch_seconds();
        assert!(now > 1_577_836_800);
        assert!(now < 4_102_444_800);
    }
}
