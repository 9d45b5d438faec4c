use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

use super::retry::{retry_with_policy, RetryPolicy};

#[derive(Debug, Error)]
pub enum PaymentError {
    /// Connection refused, timeout, DNS failure. Retryable.
    #[error("payment transport error: {0}")]
    Transport(String),
    /// The provider answered with a non-success status.
    #[error("payment provider returned {status}: {body}")]
    Provider { status: u16, body: String },
    #[error("invalid payment provider response: {0}")]
    Decode(String),
    #[error("payment client misconfigured: {0}")]
    Config(String),
}

impl PaymentError {
    /// Transient failures worth another attempt; 4xx answers are definitive.
    pub fn is_retryable(&self) -> bool {
        match self {
            PaymentError::Transport(_) => true,
            PaymentError::Provider { status, .. } => *status >= 500,
            PaymentError::Decode(_) | PaymentError::Config(_) => false,
        }
    }
}

/// Order as registered with the payment provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    /// Amount in minor units (e.g. paise).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub status: String,
}

/// Client for the payment provider's order API.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Register an order with the provider. `amount_minor` is in minor units.
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RemoteOrder, PaymentError>;
}

#[derive(Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
}

/// reqwest-based gateway with basic auth, per-request timeout, and bounded
/// retries on transient failures.
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
    retry: RetryPolicy,
}

impl HttpPaymentGateway {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        request_timeout: Duration,
        retry: RetryPolicy,
    ) -> Result<Self, PaymentError> {
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| PaymentError::Config(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            retry,
        })
    }

    async fn post_order(
        &self,
        body: &CreateOrderRequest<'_>,
    ) -> Result<RemoteOrder, PaymentError> {
        let url = format!("{}/v1/orders", self.base_url);
        let resp = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(body)
            .send()
            .await
            .map_err(|e| PaymentError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PaymentError::Provider { status: status.as_u16(), body });
        }
        resp.json::<RemoteOrder>()
            .await
            .map_err(|e| PaymentError::Decode(e.to_string()))
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    #[instrument(skip(self), fields(amount_minor, currency, receipt))]
    async fn create_order(
        &self,
        amount_minor: i64,
        currency: &str,
        receipt: &str,
    ) -> Result<RemoteOrder, PaymentError> {
        let body = CreateOrderRequest { amount: amount_minor, currency, receipt };
        let order = retry_with_policy(&self.retry, PaymentError::is_retryable, || {
            self.post_order(&body)
        })
        .await?;
        debug!(remote_order_id = %order.id, "provider_order_created");
        Ok(order)
    }
}

/// Scripted gateway for tests: can fail the first N calls with a transient
/// error before succeeding.
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    pub struct MockPaymentGateway {
        pub fail_first: AtomicU32,
        pub created: Mutex<Vec<RemoteOrder>>,
        counter: AtomicU32,
    }

    impl Default for MockPaymentGateway {
        fn default() -> Self {
            Self {
                fail_first: AtomicU32::new(0),
                created: Mutex::new(Vec::new()),
                counter: AtomicU32::new(0),
            }
        }
    }

    impl MockPaymentGateway {
        pub fn failing_first(n: u32) -> Self {
            let gw = Self::default();
            gw.fail_first.store(n, Ordering::SeqCst);
            gw
        }
    }

    #[async_trait]
    impl PaymentGateway for MockPaymentGateway {
        async fn create_order(
            &self,
            amount_minor: i64,
            currency: &str,
            receipt: &str,
        ) -> Result<RemoteOrder, PaymentError> {
            if self.fail_first.load(Ordering::SeqCst) > 0 {
                self.fail_first.fetch_sub(1, Ordering::SeqCst);
                return Err(PaymentError::Transport("connection refused".into()));
            }
            let n = self.counter.fetch_add(1, Ordering::SeqCst);
            let order = RemoteOrder {
                id: format!("order_mock_{}", n),
                amount: amount_minor,
                currency: currency.to_string(),
                receipt: receipt.to_string(),
                status: "created".to_string(),
            };
            self.created.lock().unwrap().push(order.clone());
            Ok(order)
        }
    }
}
