//! An in-memory [`Channel`] for exchanger/supervisor tests, grounded in the
//! reference crate's `turnkey_hardware::mock::MockKeypad` pattern: a device
//! paired with a handle the test drives, wired together with `tokio::sync`
//! channels instead of real I/O.

use std::collections::VecDeque;
use std::sync::Arc;

use sdn_core::{Error, Result};
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use sdn_transport::Channel;

#[derive(Default)]
struct Inner {
    inbound: VecDeque<u8>,
    outbound: Vec<u8>,
    closed: bool,
}

/// A mock [`Channel`] backed by shared in-memory queues. `write_bytes`
/// appends to an outbound log a test can inspect; `read_byte` drains an
/// inbound queue a [`MockChannelHandle`] feeds.
pub struct MockChannel {
    inner: Arc<Mutex<Inner>>,
    wake: Arc<Notify>,
    last_activity: Instant,
}

/// The test-side handle for a [`MockChannel`]: pushes bytes for the channel
/// to "receive" and inspects what it "sent".
#[derive(Clone)]
pub struct MockChannelHandle {
    inner: Arc<Mutex<Inner>>,
    wake: Arc<Notify>,
}

impl MockChannel {
    #[must_use]
    pub fn new() -> (Self, MockChannelHandle) {
        let inner = Arc::new(Mutex::new(Inner::default()));
        let wake = Arc::new(Notify::new());
        let channel = Self { inner: Arc::clone(&inner), wake: Arc::clone(&wake), last_activity: Instant::now() };
        let handle = MockChannelHandle { inner, wake };
        (channel, handle)
    }
}

impl MockChannelHandle {
    /// Queue bytes for the channel's next `read_byte` calls to return.
    pub async fn push_inbound(&self, bytes: &[u8]) {
        let mut inner = self.inner.lock().await;
        inner.inbound.extend(bytes.iter().copied());
        self.wake.notify_waiters();
    }

    /// Returns everything written so far and clears the log.
    pub async fn take_outbound(&self) -> Vec<u8> {
        let mut inner = self.inner.lock().await;
        std::mem::take(&mut inner.outbound)
    }

    /// Simulates a transport failure: the channel's next I/O fails.
    pub async fn fail(&self) {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        self.wake.notify_waiters();
    }
}

impl Channel for MockChannel {
    async fn open(&mut self) -> Result<()> {
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        let mut inner = self.inner.lock().await;
        inner.closed = true;
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        loop {
            // Register interest before inspecting state: `Notified` is
            // guaranteed to observe a `notify_*` call made after this point
            // even though `.await` happens later (tokio::sync::Notify docs).
            let notified = self.wake.notified();
            {
                let mut inner = self.inner.lock().await;
                if inner.closed {
                    return Err(Error::ChannelClosed);
                }
                if let Some(byte) = inner.inbound.pop_front() {
                    drop(inner);
                    self.last_activity = Instant::now();
                    return Ok(byte);
                }
            }
            notified.await;
        }
    }

    async fn write_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock().await;
        if inner.closed {
            return Err(Error::ChannelClosed);
        }
        inner.outbound.extend_from_slice(bytes);
        drop(inner);
        self.last_activity = Instant::now();
        Ok(())
    }

    fn last_activity(&self) -> Instant {
        self.last_activity
    }
}
