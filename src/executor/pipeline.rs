//! The request executor: retry loop, single attempts and response parsing.

use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

use crate::config::ClientConfig;
use crate::envelope::ErrorEnvelope;
use crate::error::{ApiError, Error};
use crate::time::{Clock, Sleeper, SystemClock, TokioSleeper};
use crate::transport::{HttpClient, HttpRequest, HttpResponse};
use crate::validate::Validate;

use super::build::build_request;
use super::cancel::{CancelSource, CompositeCancellation};
use super::idempotency::{IdGenerator, UuidGenerator};
use super::retry::{RetryPolicy, classify, parse_retry_after};
use super::RequestDescriptor;

/// Executes requests against the payment platform.
///
/// Owns the read-only [`ClientConfig`] and the injected collaborators. Many
/// calls may run concurrently on one executor; no state is shared between
/// them.
///
/// # Type Parameters
///
/// - `H`: The HTTP client implementation
/// - `S`: The sleeper used for timeout timers and backoff waits (defaults to [`TokioSleeper`])
///
/// # Example
///
/// ```no_run
/// use paycore::config::ClientConfig;
/// use paycore::executor::{RequestDescriptor, RequestExecutor};
/// use paycore::transport::ReqwestClient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientConfig::new("https://api.example.com", "acc_123", "token")?;
/// let executor = RequestExecutor::new(ReqwestClient::new(), config);
///
/// let payout = executor
///     .execute(RequestDescriptor::get("/payouts/po_1"))
///     .await?;
/// println!("{payout}");
/// # Ok(())
/// # }
/// ```
pub struct RequestExecutor<H, S = TokioSleeper> {
    client: H,
    sleeper: S,
    config: ClientConfig,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
}

impl<H, S> std::fmt::Debug for RequestExecutor<H, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<H> RequestExecutor<H, TokioSleeper> {
    /// Creates an executor with the production sleeper, clock and key generator.
    #[must_use]
    pub fn new(client: H, config: ClientConfig) -> Self {
        Self {
            client,
            sleeper: TokioSleeper,
            config,
            ids: Arc::new(UuidGenerator),
            clock: Arc::new(SystemClock),
        }
    }
}

impl<H, S> RequestExecutor<H, S> {
    /// Sets a custom sleeper for timeout timers and retry delays.
    #[must_use]
    pub fn with_sleeper<S2>(self, sleeper: S2) -> RequestExecutor<H, S2> {
        RequestExecutor {
            client: self.client,
            sleeper,
            config: self.config,
            ids: self.ids,
            clock: self.clock,
        }
    }

    /// Sets the idempotency key generator.
    #[must_use]
    pub fn with_id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Arc::new(ids);
        self
    }

    /// Sets the clock used to interpret HTTP-date `Retry-After` values.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Runs caller-side validation when it is enabled in the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if validation is enabled and `input` is invalid.
    pub fn validate<T: Validate + ?Sized>(&self, input: &T) -> Result<(), Error> {
        if !self.config.validation_enabled() {
            return Ok(());
        }
        input.validate().map_err(|message| Error::Validation { message })
    }
}

impl<H: HttpClient, S: Sleeper> RequestExecutor<H, S> {
    /// Executes one logical call and returns the parsed JSON body.
    ///
    /// Retries network failures and API failures with status 429, 500, 502,
    /// 503 or 504 until the retry budget is spent. Timeouts and caller
    /// cancellation end the call immediately.
    ///
    /// # Errors
    ///
    /// Returns the classified [`Error`] of the last attempt, or
    /// [`Error::Validation`] if the request could not be built.
    pub async fn execute(&self, descriptor: RequestDescriptor) -> Result<serde_json::Value, Error> {
        let request = build_request(&self.config, &descriptor, self.ids.as_ref())?;
        let timeout = descriptor.timeout().unwrap_or_else(|| self.config.timeout());
        let max_retries = descriptor
            .max_retries()
            .unwrap_or_else(|| self.config.retry().max_retries());
        let total = RetryPolicy::total_attempts(max_retries);
        let cancellation = descriptor.cancellation();

        let mut attempt = 1;
        loop {
            tracing::debug!(
                method = %request.method,
                url = %request.url,
                attempt,
                total,
                "Sending request"
            );

            let error = match self.attempt(request.clone(), timeout, cancellation).await {
                Ok(body) => return Ok(body),
                Err(e) => e,
            };

            let decision = classify(&error);
            if !decision.retryable || attempt >= total {
                tracing::debug!(attempt, kind = ?error.kind(), "Request failed: {error}");
                return Err(error);
            }

            let delay = decision
                .delay_hint
                .unwrap_or_else(|| self.config.retry().backoff(attempt - 1));
            tracing::warn!(attempt, total, ?delay, "Attempt failed, retrying: {error}");

            self.backoff(delay, cancellation).await?;
            attempt += 1;
        }
    }

    /// Executes one logical call and deserializes the body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`execute`](Self::execute), or [`Error::Decode`]
    /// when the body does not match `T`.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        descriptor: RequestDescriptor,
    ) -> Result<T, Error> {
        let body = self.execute(descriptor).await?;
        serde_json::from_value(body).map_err(Error::Decode)
    }

    /// One network round-trip raced against the timeout timer and the caller token.
    async fn attempt(
        &self,
        request: HttpRequest,
        timeout: Duration,
        cancellation: Option<&CancellationToken>,
    ) -> Result<serde_json::Value, Error> {
        let mut signal = CompositeCancellation::new();
        if !timeout.is_zero() {
            signal = signal.with_source(CancelSource::Timeout, self.sleeper.sleep(timeout));
        }
        if let Some(token) = cancellation {
            signal = signal.with_source(CancelSource::Caller, token.cancelled());
        }

        // The composite, and with it the timer, is dropped when select! returns.
        let response = tokio::select! {
            biased;
            source = signal.tripped() => {
                return Err(cancellation_error(source, timeout, cancellation));
            }
            result = self.client.request(request) => result?,
        };

        self.interpret(&response)
    }

    /// Parses the body and maps non-2xx statuses to [`ApiError`].
    fn interpret(&self, response: &HttpResponse) -> Result<serde_json::Value, Error> {
        let retry_after = if response.is_success() {
            None
        } else {
            parse_retry_after(&response.headers, self.clock.now())
        };

        let Some(body) = parse_body(response) else {
            return Err(ApiError::invalid_json(response.status, retry_after).into());
        };

        if response.is_success() {
            return Ok(body);
        }

        let error = match ErrorEnvelope::from_value(&body) {
            Some(envelope) => ApiError::from_envelope(response.status, envelope, retry_after),
            None => ApiError::http_error(response.status, response.status_text(), retry_after),
        };
        Err(error.into())
    }

    /// Waits out a backoff delay unless the caller cancels first.
    async fn backoff(
        &self,
        delay: Duration,
        cancellation: Option<&CancellationToken>,
    ) -> Result<(), Error> {
        let Some(token) = cancellation else {
            self.sleeper.sleep(delay).await;
            return Ok(());
        };

        tokio::select! {
            biased;
            () = token.cancelled() => Err(Error::Cancelled),
            () = self.sleeper.sleep(delay) => Ok(()),
        }
    }
}

/// A timer trip only counts as a timeout if the caller did not also cancel.
fn cancellation_error(
    source: CancelSource,
    timeout: Duration,
    cancellation: Option<&CancellationToken>,
) -> Error {
    let caller_cancelled = cancellation.is_some_and(CancellationToken::is_cancelled);
    if source == CancelSource::Caller || caller_cancelled {
        Error::Cancelled
    } else {
        Error::Timeout { timeout }
    }
}

/// A body-less 204 is `null`; every other body must be valid JSON.
fn parse_body(response: &HttpResponse) -> Option<serde_json::Value> {
    if response.status == http::StatusCode::NO_CONTENT && response.body.is_empty() {
        return Some(serde_json::Value::Null);
    }
    serde_json::from_slice(&response.body).ok()
}
