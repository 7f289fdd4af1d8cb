//! Remote action invocation
//!
//! The transport that reaches the vehicle is behind [`ServiceCaller`], a
//! blocking request/response boundary. [`RemoteActionInvoker`] qualifies
//! service names against the vehicle namespace and runs every call on the
//! blocking pool so the interaction surface is never held up.

use nautilus_core::VehicleEndpoint;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

/// Named string parameters passed to a remote service
pub type ServiceParameters = BTreeMap<String, String>;

/// Invocation errors
#[derive(Debug, Clone, Error, PartialEq)]
pub enum InvocationError {
    /// The transport raised during the call
    #[error("Call to {service} failed: {reason}")]
    CallFailed {
        /// Fully qualified service name
        service: String,
        /// Failure reason reported by the transport
        reason: String,
    },

    /// The vehicle is not reachable
    #[error("Vehicle unreachable at {host}:{port}")]
    Unreachable {
        /// Host
        host: String,
        /// Port
        port: u16,
    },

    /// The worker running the call panicked or was cancelled
    #[error("Invocation worker failed: {0}")]
    Worker(String),
}

/// Response from a remote service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceResponse {
    /// Whether the service reports success
    pub success: bool,
    /// Human-readable message from the service
    pub message: String,
}

impl ServiceResponse {
    /// Successful response with a message
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    /// Failed response with a message
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Blocking request/response transport to the vehicle.
pub trait ServiceCaller: Send + Sync {
    /// Invoke `service` (fully qualified) with optional parameters.
    fn call(
        &self,
        host: &str,
        port: u16,
        service: &str,
        parameters: Option<&ServiceParameters>,
    ) -> Result<ServiceResponse, InvocationError>;
}

/// Boolean-style outcome of one invocation, surfaced to the operator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum InvocationOutcome {
    /// The service ran and reported success
    Success {
        /// Fully qualified service name
        service: String,
        /// Message returned by the service
        message: String,
    },
    /// The call raised or the service reported failure
    Failure {
        /// Fully qualified service name
        service: String,
        /// Failure reason
        reason: String,
    },
}

impl InvocationOutcome {
    /// Check if the invocation succeeded
    pub fn is_success(&self) -> bool {
        matches!(self, InvocationOutcome::Success { .. })
    }

    /// Get the fully qualified service name
    pub fn service(&self) -> &str {
        match self {
            InvocationOutcome::Success { service, .. } => service,
            InvocationOutcome::Failure { service, .. } => service,
        }
    }
}

/// Runs remote calls off the caller's task.
#[derive(Clone)]
pub struct RemoteActionInvoker {
    caller: Arc<dyn ServiceCaller>,
    endpoint: VehicleEndpoint,
}

impl RemoteActionInvoker {
    /// Create an invoker for the given endpoint
    pub fn new(caller: Arc<dyn ServiceCaller>, endpoint: VehicleEndpoint) -> Self {
        Self { caller, endpoint }
    }

    /// Endpoint calls are sent to
    pub fn endpoint(&self) -> &VehicleEndpoint {
        &self.endpoint
    }

    /// Call `service` and propagate transport errors.
    ///
    /// A response with `success == false` is still `Ok` here; use
    /// [`invoke`](Self::invoke) for the operator-facing boolean outcome.
    pub async fn call(
        &self,
        service: &str,
        parameters: Option<ServiceParameters>,
    ) -> Result<ServiceResponse, InvocationError> {
        let caller = Arc::clone(&self.caller);
        let endpoint = self.endpoint.clone();
        let qualified = self.endpoint.qualify(service);

        debug!(service = %qualified, "invoking remote service");
        tokio::task::spawn_blocking(move || {
            caller.call(&endpoint.host, endpoint.port, &qualified, parameters.as_ref())
        })
        .await
        .map_err(|e| InvocationError::Worker(e.to_string()))?
    }

    /// Call `service` and collapse the result into success or failure.
    ///
    /// Failures are never retried.
    pub async fn invoke(
        &self,
        service: &str,
        parameters: Option<ServiceParameters>,
    ) -> InvocationOutcome {
        let qualified = self.endpoint.qualify(service);

        match self.call(service, parameters).await {
            Ok(response) if response.success => InvocationOutcome::Success {
                service: qualified,
                message: response.message,
            },
            Ok(response) => {
                warn!(service = %qualified, message = %response.message, "service reported failure");
                InvocationOutcome::Failure {
                    service: qualified,
                    reason: response.message,
                }
            }
            Err(e) => {
                warn!(service = %qualified, error = %e, "service call failed");
                InvocationOutcome::Failure {
                    service: qualified,
                    reason: e.to_string(),
                }
            }
        }
    }
}
