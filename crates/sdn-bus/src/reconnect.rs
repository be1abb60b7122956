//! The reconnecting supervisor: wraps an [`Exchanger`], watches its
//! done-future, and transparently reconnects on channel failure using a
//! [`BackoffPolicy`].
//!
//! Grounded in `examples/original_source/somfy/connector.py`'s top-level
//! reconnect loop (construct a connector, run until it dies, back off,
//! reconnect) combined with the teacher's `turnkey-hardware` convention of
//! a supervisor task driven by a `watch`/done-signal rather than polling.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use sdn_core::Result;
use sdn_protocol::Frame;
use sdn_transport::Channel;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::backoff::BackoffPolicy;
use crate::exchanger::{Exchanger, ExchangerConfig, Sniffer, wait_for_failure};

/// Constructs a fresh, not-yet-opened channel. Boxed so the supervisor can
/// reconnect without the caller's channel type leaking into its own type
/// parameters beyond `C`.
pub type ChannelFactory<C> = Arc<dyn Fn() -> Pin<Box<dyn Future<Output = Result<C>> + Send>> + Send + Sync>;

/// Wraps an [`Exchanger`] and keeps it alive across channel failures.
pub struct ReconnectingSupervisor<C: Channel + 'static> {
    exchanger: Arc<Mutex<Exchanger<C>>>,
    supervisor: JoinHandle<()>,
}

impl<C: Channel + 'static> ReconnectingSupervisor<C> {
    /// Opens the first channel via `factory`, starts its exchanger, and
    /// spawns the supervisor task.
    pub async fn start(
        factory: ChannelFactory<C>,
        config: ExchangerConfig,
        backoff: BackoffPolicy,
        sniffer: Option<Sniffer>,
    ) -> Result<Self> {
        let channel = factory().await?;
        let exchanger = Exchanger::start(channel, config, sniffer.clone()).await?;
        let exchanger = Arc::new(Mutex::new(exchanger));

        let supervisor = tokio::spawn(run_supervisor(Arc::clone(&exchanger), factory, config, backoff, sniffer));

        Ok(Self { exchanger, supervisor })
    }

    /// Passes through to [`Exchanger::exchange`], taking the supervisor's
    /// lock first. If a reconnect is in progress, the lock acquisition
    /// itself blocks, and the caller observes that as part of the same
    /// `COMM_TIMEOUT`-bounded wait rather than an indefinite hang, since a
    /// fresh exchanger installs a fresh deadline the moment it is reachable.
    pub async fn exchange<F>(&self, outbound: Option<Frame>, consumer: Option<F>) -> bool
    where
        F: FnMut(Frame) -> bool,
    {
        let exchanger = self.exchanger.lock().await;
        exchanger.exchange(outbound, consumer).await
    }

    pub async fn fire_and_forget(&self, frame: Frame) -> bool {
        let exchanger = self.exchanger.lock().await;
        exchanger.fire_and_forget(frame).await
    }

    /// Stops the supervisor task and the current exchanger.
    pub async fn stop(&mut self) {
        self.supervisor.abort();
        self.exchanger.lock().await.stop().await;
    }
}

async fn run_supervisor<C: Channel + 'static>(
    exchanger: Arc<Mutex<Exchanger<C>>>,
    factory: ChannelFactory<C>,
    config: ExchangerConfig,
    backoff: BackoffPolicy,
    sniffer: Option<Sniffer>,
) {
    let mut failures_since_success: u32 = 0;

    loop {
        // Subscribe and release the lock immediately: holding it while
        // waiting for a failure would starve every concurrent
        // `ReconnectingSupervisor::exchange`/`fire_and_forget` call for as
        // long as the channel stays healthy.
        let failure_rx = exchanger.lock().await.subscribe_failure();
        let reason = wait_for_failure(failure_rx).await;
        warn!(%reason, "exchanger failed, reconnecting");

        failures_since_success += 1;
        let wait = backoff.next_wait(failures_since_success);
        if !wait.is_zero() {
            tokio::time::sleep(wait).await;
        }

        loop {
            match factory().await {
                Ok(channel) => match Exchanger::start(channel, config, sniffer.clone()).await {
                    Ok(new_exchanger) => {
                        let mut guard = exchanger.lock().await;
                        guard.stop().await;
                        *guard = new_exchanger;
                        info!("reconnected");
                        failures_since_success = 0;
                        break;
                    }
                    Err(err) => {
                        warn!(error = %err, "reconnect attempt failed to start exchanger");
                    }
                },
                Err(err) => {
                    warn!(error = %err, "reconnect attempt failed to open channel");
                }
            }
            let retry_wait = backoff.next_wait(failures_since_success.max(2));
            tokio::time::sleep(retry_wait.max(std::time::Duration::from_millis(1))).await;
        }
    }
}
