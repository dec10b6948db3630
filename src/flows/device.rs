//! Device Code Flow
//!
//! Acquires a device code, then polls the token endpoint on a timer until the
//! user approves the device, the code expires, or the caller cancels.
//!
//! At most one poll session is live per client. A session settles exactly once,
//! as resolved, rejected or cancelled, and always releases its timer.

use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::AbortHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::instrument;

use super::handle_error;
use crate::auth::{
    now_millis, parse_auth_response, TraktAuthentication, TraktClientAuthentication,
    TraktDeviceAuthentication,
};
use crate::client::{lock, TraktClient};
use crate::endpoints::authentication;
use crate::error::{TraktError, TraktResult};
use crate::template::RequestParams;

/// Poll interval used when the server sends an unusable one.
const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

type Outcome = TraktResult<TraktClientAuthentication>;

/// Lifecycle of a device poll session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PollingState {
    #[default]
    Idle,
    Polling,
    Resolved,
    Rejected,
    Cancelled,
}

impl PollingState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Resolved | Self::Rejected | Self::Cancelled)
    }
}

#[derive(Debug)]
pub(crate) struct PollingSession {
    state: Mutex<PollingState>,
    sender: Mutex<Option<oneshot::Sender<Outcome>>>,
    task: Mutex<Option<AbortHandle>>,
}

impl PollingSession {
    fn new(sender: oneshot::Sender<Outcome>) -> Self {
        Self {
            state: Mutex::new(PollingState::Polling),
            sender: Mutex::new(Some(sender)),
            task: Mutex::new(None),
        }
    }

    fn state(&self) -> PollingState {
        *lock(&self.state)
    }

    /// Moves to a terminal state and delivers the outcome. Only the first call wins.
    fn settle(&self, outcome: Outcome, next: PollingState) -> bool {
        {
            let mut state = lock(&self.state);
            if state.is_terminal() {
                return false;
            }
            *state = next;
        }
        if let Some(sender) = lock(&self.sender).take() {
            // The receiver may already be gone.
            let _ = sender.send(outcome);
        }
        true
    }

    /// Aborts the timer task.
    fn stop(&self) {
        if let Some(task) = lock(&self.task).take() {
            task.abort();
        }
    }
}

/// Pending device authorization.
///
/// Resolves with the stored authentication once the user approves the device.
/// Dropping it does not stop the timer; use [`cancel`](Self::cancel).
#[derive(Debug)]
pub struct DevicePolling {
    receiver: oneshot::Receiver<Outcome>,
    handle: PollingCancelHandle,
}

impl DevicePolling {
    /// Stops polling; the future resolves with [`TraktError::PollingCancelled`].
    pub fn cancel(&self) {
        self.handle.cancel();
    }

    pub fn cancel_handle(&self) -> PollingCancelHandle {
        self.handle.clone()
    }

    pub fn state(&self) -> PollingState {
        self.handle.session.state()
    }
}

impl Future for DevicePolling {
    type Output = TraktResult<TraktClientAuthentication>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(TraktError::PollingCancelled)))
    }
}

/// Cloneable handle cancelling a device poll. Cancelling twice is harmless.
#[derive(Clone, Debug)]
pub struct PollingCancelHandle {
    client: TraktClient,
    session: Arc<PollingSession>,
}

impl PollingCancelHandle {
    pub fn cancel(&self) {
        if self
            .session
            .settle(Err(TraktError::PollingCancelled), PollingState::Cancelled)
        {
            tracing::warn!("Polling cancelled");
        }
        self.session.stop();
        self.client.release(&self.session);
    }

    pub fn is_cancelled(&self) -> bool {
        self.session.state() == PollingState::Cancelled
    }
}

impl TraktClient {
    /// Requests a device and user code pair.
    ///
    /// The code is kept for [`poll_with_device_code`](Self::poll_with_device_code);
    /// a failed request clears any kept code.
    #[instrument(skip_all)]
    pub async fn get_device_code(&self) -> TraktResult<TraktDeviceAuthentication> {
        let params = RequestParams::new().param("client_id", self.config().client_id.clone());

        let result = match self
            .call(&authentication::DEVICE_CODE, &params, None)
            .await
            .map_err(handle_error)
        {
            Ok(response) => response.json::<TraktDeviceAuthentication>(),
            Err(e) => Err(e),
        };

        let mut poll = lock(&self.inner.poll);
        match result {
            Ok(device) => {
                *poll = Some(device.clone());
                Ok(device)
            }
            Err(e) => {
                *poll = None;
                Err(e)
            }
        }
    }

    /// Starts polling with `poll`, or with the code kept by [`get_device_code`](Self::get_device_code).
    ///
    /// The first attempt happens one interval after the call and every attempt
    /// uses the device code captured here, so a later [`get_device_code`](Self::get_device_code)
    /// does not affect this session. A session already in progress is cancelled
    /// first. Must be called from within a tokio runtime.
    pub fn poll_with_device_code(
        &self,
        poll: Option<TraktDeviceAuthentication>,
    ) -> TraktResult<DevicePolling> {
        let poll = poll
            .or_else(|| lock(&self.inner.poll).clone())
            .filter(|poll| !poll.device_code.is_empty())
            .ok_or_else(|| TraktError::invalid_parameter("No device code found."))?;

        let runtime = Handle::try_current().map_err(|e| {
            TraktError::configuration(format!("Device polling requires a tokio runtime: {e}"))
        })?;

        let expires_in = i64::try_from(poll.expires_in).unwrap_or(i64::MAX);
        let deadline = now_millis().saturating_add(expires_in.saturating_mul(1000));
        let period = Duration::try_from_secs_f64(poll.interval)
            .ok()
            .filter(|period| !period.is_zero())
            .unwrap_or(DEFAULT_INTERVAL);

        let (sender, receiver) = oneshot::channel();
        let session = Arc::new(PollingSession::new(sender));

        let mut polling = lock(&self.inner.polling);
        if let Some(previous) = polling.take() {
            tracing::warn!("Polling already in progress, cancelling previous one...");
            previous.settle(Err(TraktError::PollingCancelled), PollingState::Cancelled);
            previous.stop();
        }
        let device_code = poll.device_code.clone();
        *lock(&self.inner.poll) = Some(poll);

        let task = runtime.spawn(run_session(
            self.clone(),
            session.clone(),
            device_code,
            deadline,
            period,
        ));
        *lock(&session.task) = Some(task.abort_handle());
        *polling = Some(session.clone());
        drop(polling);

        tracing::debug!(period = ?period, deadline, "Device polling started");
        Ok(DevicePolling {
            receiver,
            handle: PollingCancelHandle {
                client: self.clone(),
                session,
            },
        })
    }

    /// Whether a device poll timer is live.
    pub fn is_polling(&self) -> bool {
        lock(&self.inner.polling).is_some()
    }

    /// State of the live poll session, [`PollingState::Idle`] when there is none.
    pub fn polling_state(&self) -> PollingState {
        lock(&self.inner.polling)
            .as_ref()
            .map_or(PollingState::Idle, |session| session.state())
    }

    /// Cancels the live poll session, if any. Returns whether one was cancelled.
    pub fn cancel_polling(&self) -> bool {
        let session = lock(&self.inner.polling).clone();
        match session {
            Some(session) => {
                PollingCancelHandle {
                    client: self.clone(),
                    session,
                }
                .cancel();
                true
            }
            None => false,
        }
    }

    /// Clears the timer and poll record if `session` is still the live one.
    fn release(&self, session: &Arc<PollingSession>) {
        let mut polling = lock(&self.inner.polling);
        if polling.as_ref().is_some_and(|live| Arc::ptr_eq(live, session)) {
            *polling = None;
            *lock(&self.inner.poll) = None;
        }
    }

    /// One poll attempt. `Ok(None)` means the user has not answered yet.
    async fn poll_device_token(
        &self,
        device_code: &str,
        deadline: i64,
    ) -> TraktResult<Option<TraktClientAuthentication>> {
        if deadline <= now_millis() {
            return Err(TraktError::PollingExpired);
        }

        let config = self.config();
        let params = RequestParams::new()
            .param("client_id", config.client_id.clone())
            .param("client_secret", config.client_secret().to_string())
            .param("code", device_code.to_string());

        match self
            .call(&authentication::DEVICE_TOKEN, &params, None)
            .await
            .map_err(handle_error)
        {
            Ok(response) => {
                let body: TraktAuthentication = response.json()?;
                Ok(Some(self.update_auth(|auth| parse_auth_response(&body, auth))))
            }
            Err(e) if e.status() == Some(400) => {
                tracing::info!("Polling in progress...");
                Ok(None)
            }
            Err(e) if e.status() == Some(429) => {
                tracing::warn!("Polling too quickly, rate limit exceeded");
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Timer loop of one session. Ticks run one after another and never overlap.
async fn run_session(
    client: TraktClient,
    session: Arc<PollingSession>,
    device_code: String,
    deadline: i64,
    period: Duration,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match client.poll_device_token(&device_code, deadline).await {
            Ok(Some(auth)) => {
                session.settle(Ok(auth), PollingState::Resolved);
                break;
            }
            Ok(None) => {}
            Err(e) => {
                tracing::debug!(error = %e, "Device polling failed");
                session.settle(Err(e), PollingState::Rejected);
                break;
            }
        }
    }

    lock(&session.task).take();
    client.release(&session);
}
