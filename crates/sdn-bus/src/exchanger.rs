//! Foreground/background rendezvous over a single [`Channel`]: a background
//! drainer that continuously recognizes frames off the wire and hands
//! control to a foreground [`Exchanger::exchange`] call whenever one wants
//! to talk.
//!
//! Grounded in spec.md §4.4 / SPEC_FULL.md §4.4: the source's two locks
//! (`reader_lock`, `writer_lock`) and one-bit `need_to_talk` event become a
//! `tokio::sync::Mutex<C>` (acquiring it *is* holding the reader lock, since
//! there is exactly one physical channel to read from), a second
//! `tokio::sync::Mutex<()>` that only serializes concurrent foreground
//! exchanges with each other, and a `tokio::sync::Notify` for the event.

use std::sync::Arc;

use sdn_core::constants::{BUS_QUIET_TIME, COMM_TIMEOUT};
use sdn_core::Result;
use sdn_protocol::{Frame, Recognizer};
use sdn_transport::Channel;
use tokio::sync::{Mutex, Notify, watch};
use tokio::time::{self, Duration, Instant};
use tracing::{debug, warn};

/// A callback invoked with every frame the background drainer recognizes,
/// in arrival order.
pub type Sniffer = Arc<dyn Fn(Frame) + Send + Sync>;

/// Timing knobs broken out from the hard spec constants so tests can
/// shrink them without touching production defaults (SPEC_FULL.md §6).
#[derive(Debug, Clone, Copy)]
pub struct ExchangerConfig {
    pub comm_timeout: Duration,
    pub bus_quiet_time: Duration,
}

impl Default for ExchangerConfig {
    fn default() -> Self {
        Self { comm_timeout: COMM_TIMEOUT, bus_quiet_time: BUS_QUIET_TIME }
    }
}

/// Owns one [`Channel`] and arbitrates between the background drainer and
/// foreground exchanges.
pub struct Exchanger<C: Channel + 'static> {
    channel: Arc<Mutex<C>>,
    writer_lock: Mutex<()>,
    need_to_talk: Arc<Notify>,
    config: ExchangerConfig,
    done_rx: watch::Receiver<Option<String>>,
    drainer: tokio::task::JoinHandle<()>,
}

impl<C: Channel + 'static> Exchanger<C> {
    /// Opens `channel` and starts the background drainer. `sniffer`, if
    /// present, observes every frame the drainer recognizes.
    pub async fn start(mut channel: C, config: ExchangerConfig, sniffer: Option<Sniffer>) -> Result<Self> {
        channel.open().await?;
        let channel = Arc::new(Mutex::new(channel));
        let need_to_talk = Arc::new(Notify::new());
        let (done_tx, done_rx) = watch::channel(None);

        let drainer = tokio::spawn(run_drainer(
            Arc::clone(&channel),
            Arc::clone(&need_to_talk),
            config,
            sniffer,
            done_tx,
        ));

        Ok(Self { channel, writer_lock: Mutex::new(()), need_to_talk, config, done_rx, drainer })
    }

    /// Returns a clone of the failure-signal receiver. Cloning is cheap and
    /// takes no lock on the channel itself, so callers can watch for
    /// failure (see [`wait_for_failure`]) without holding the `Exchanger`
    /// for as long as the channel stays healthy.
    #[must_use]
    pub fn subscribe_failure(&self) -> watch::Receiver<Option<String>> {
        self.done_rx.clone()
    }

    /// Stops the drainer and releases the channel. Idempotent.
    pub async fn stop(&mut self) {
        self.drainer.abort();
        self.channel.lock().await.close().await.ok();
    }

    /// `exchange(outbound, consumer)`, spec.md §4.4 steps 1-8. Returns
    /// `true` on fire-and-forget or when `consumer` requested a stop by
    /// returning `false`; returns `false` on deadline expiry or I/O failure.
    pub async fn exchange<F>(&self, outbound: Option<Frame>, mut consumer: Option<F>) -> bool
    where
        F: FnMut(Frame) -> bool,
    {
        let _writer_guard = self.writer_lock.lock().await;
        self.need_to_talk.notify_one();
        let mut channel = self.channel.lock().await;

        let deadline = Instant::now() + self.config.comm_timeout;

        if let Some(frame) = &outbound {
            debug!(%frame, "exchange: writing outbound frame");
            let bytes = frame.encode();
            if channel.write_bytes(&bytes).await.is_err() {
                return false;
            }
        }

        let Some(consumer) = consumer.as_mut() else {
            return true;
        };

        let mut recognizer = Recognizer::new();
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("exchange: deadline expired waiting for a reply");
                return false;
            }
            let byte = match time::timeout(remaining, channel.read_byte()).await {
                Ok(Ok(byte)) => byte,
                Ok(Err(err)) => {
                    warn!(error = %err, "exchange: channel read failed");
                    return false;
                }
                Err(_) => {
                    warn!("exchange: deadline expired waiting for a reply");
                    return false;
                }
            };
            if let Some(frame) = recognizer.add_byte(byte)
                && !consumer(frame)
            {
                return true;
            }
        }
    }

    /// `fire_and_forget(frame)` = `exchange(Some(frame), None)`.
    pub async fn fire_and_forget(&self, frame: Frame) -> bool {
        self.exchange(Some(frame), None::<fn(Frame) -> bool>).await
    }
}

async fn run_drainer<C: Channel + 'static>(
    channel: Arc<Mutex<C>>,
    need_to_talk: Arc<Notify>,
    config: ExchangerConfig,
    sniffer: Option<Sniffer>,
    done_tx: watch::Sender<Option<String>>,
) {
    let mut recognizer = Recognizer::new();
    loop {
        let mut guard = channel.lock().await;
        'reading: loop {
            let quiet_elapsed = Instant::now().saturating_duration_since(guard.last_activity());

            if quiet_elapsed < config.bus_quiet_time {
                // Hold the lock through the quiet window regardless of
                // need_to_talk: a foreground write must never land inside
                // the bus's mandatory quiet time.
                let remaining = config.bus_quiet_time - quiet_elapsed;
                if let Ok(result) = time::timeout(remaining, guard.read_byte()).await {
                    match result {
                        Ok(byte) => feed(&mut recognizer, byte, &sniffer),
                        Err(err) => {
                            let _ = done_tx.send(Some(err.to_string()));
                            return;
                        }
                    }
                }
                continue 'reading;
            }

            tokio::select! {
                biased;
                result = guard.read_byte() => match result {
                    Ok(byte) => feed(&mut recognizer, byte, &sniffer),
                    Err(err) => {
                        let _ = done_tx.send(Some(err.to_string()));
                        return;
                    }
                },
                () = need_to_talk.notified() => break 'reading,
            }
        }
        drop(guard);
        tokio::task::yield_now().await;
    }
}

/// Awaits the next failure reported on a [`Exchanger::subscribe_failure`]
/// receiver. Never resolves on a clean shutdown (the sender side is only
/// dropped when the `Exchanger` itself is); resolves immediately if the
/// `Exchanger` failed before this receiver was subscribed.
pub async fn wait_for_failure(mut rx: watch::Receiver<Option<String>>) -> String {
    loop {
        if let Some(reason) = rx.borrow_and_update().clone() {
            return reason;
        }
        if rx.changed().await.is_err() {
            return "drainer task ended without reporting a failure".to_string();
        }
    }
}

fn feed(recognizer: &mut Recognizer, byte: u8, sniffer: &Option<Sniffer>) {
    if let Some(frame) = recognizer.add_byte(byte)
        && let Some(sniffer) = sniffer
    {
        sniffer(frame);
    }
}
