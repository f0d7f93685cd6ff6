use std::sync::atomic::{AtomicUsize, Ordering};

/// Keeps the device awake while a worker runs.
pub trait WakeLock: Send + Sync {
    /// Takes the lock.
    fn acquire(&self);
    /// Drops the lock.
    fn release(&self);
}

/// Wake lock that does nothing.
#[derive(Debug, Default)]
pub struct NoopWakeLock;

impl WakeLock for NoopWakeLock {
    fn acquire(&self) {}
    fn release(&self) {}
}

/// Wake lock that counts holders; useful to assert release on every path.
#[derive(Debug, Default)]
pub struct CountingWakeLock {
    held: AtomicUsize,
    acquired_total: AtomicUsize,
}

impl CountingWakeLock {
    /// Current holders.
    pub fn held(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    /// Acquisitions since creation.
    pub fn acquired_total(&self) -> usize {
        self.acquired_total.load(Ordering::SeqCst)
    }
}

impl WakeLock for CountingWakeLock {
    fn acquire(&self) {
        self.held.fetch_add(1, Ordering::SeqCst);
        self.acquired_total.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.held.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Holds a [`WakeLock`] until dropped.
pub struct WakeGuard<'a> {
    lock: &'a dyn WakeLock,
}

impl<'a> WakeGuard<'a> {
    /// Acquires `lock`.
    pub fn new(lock: &'a dyn WakeLock) -> Self {
        lock.acquire();
        Self { lock }
    }
}

impl Drop for WakeGuard<'_> {
    fn drop(&mut self) {
        self.lock.release();
    }
}
