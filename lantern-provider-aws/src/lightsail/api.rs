//! Lightsail API capability
//!
//! Data sources talk to Lightsail only through [`LightsailApi`], so the
//! lookup logic can run against a fake in tests.

use aws_sdk_lightsail::Client as LightsailClient;
use aws_sdk_lightsail::error::{ProvideErrorMetadata, SdkError};
use aws_sdk_lightsail::operation::get_instance::{GetInstanceError, GetInstanceOutput};
use lantern_core::provider::BoxFuture;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors returned by the Lightsail API
#[derive(Debug, Error)]
pub enum LightsailApiError {
    /// The requested entity does not exist
    #[error("Lightsail resource not found: {0}")]
    NotFound(String),

    /// Lightsail rejected the request (throttling, access denied, ...)
    #[error("Lightsail service error ({code}): {message}")]
    Service {
        code: String,
        message: String,
        #[source]
        source: BoxError,
    },

    /// The request did not get a service response (network, timeout, ...)
    #[error("Lightsail request failed")]
    Transport(#[source] BoxError),
}

impl LightsailApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LightsailApiError::NotFound(_))
    }
}

/// The subset of the Lightsail API used by data sources
pub trait LightsailApi: Send + Sync {
    /// Describe a single instance by name
    fn get_instance<'a>(
        &'a self,
        instance_name: &'a str,
    ) -> BoxFuture<'a, Result<GetInstanceOutput, LightsailApiError>>;
}

/// [`LightsailApi`] backed by the AWS SDK
pub struct SdkLightsailApi {
    client: LightsailClient,
}

impl SdkLightsailApi {
    pub fn new(client: LightsailClient) -> Self {
        Self { client }
    }
}

impl LightsailApi for SdkLightsailApi {
    fn get_instance<'a>(
        &'a self,
        instance_name: &'a str,
    ) -> BoxFuture<'a, Result<GetInstanceOutput, LightsailApiError>> {
        Box::pin(async move {
            self.client
                .get_instance()
                .instance_name(instance_name)
                .send()
                .await
                .map_err(|err| match err {
                    SdkError::ServiceError(service_err) => {
                        classify_get_instance_error(instance_name, service_err.into_err())
                    }
                    other => LightsailApiError::Transport(Box::new(other)),
                })
        })
    }
}

/// Map a GetInstance service error onto [`LightsailApiError`]
pub fn classify_get_instance_error(
    instance_name: &str,
    err: GetInstanceError,
) -> LightsailApiError {
    if err.is_not_found_exception() {
        return LightsailApiError::NotFound(instance_name.to_string());
    }

    let code = err.code().unwrap_or(variant_code(&err)).to_string();
    let message = error_message(&err)
        .map(str::to_string)
        .unwrap_or_else(|| err.to_string());
    LightsailApiError::Service {
        code,
        message,
        source: Box::new(err),
    }
}

fn variant_code(err: &GetInstanceError) -> &'static str {
    match err {
        GetInstanceError::AccessDeniedException(_) => "AccessDeniedException",
        GetInstanceError::AccountSetupInProgressException(_) => "AccountSetupInProgressException",
        GetInstanceError::InvalidInputException(_) => "InvalidInputException",
        GetInstanceError::OperationFailureException(_) => "OperationFailureException",
        GetInstanceError::ServiceException(_) => "ServiceException",
        GetInstanceError::UnauthenticatedException(_) => "UnauthenticatedException",
        _ => "Unknown",
    }
}

fn error_message(err: &GetInstanceError) -> Option<&str> {
    match err {
        GetInstanceError::AccessDeniedException(e) => e.message(),
        GetInstanceError::AccountSetupInProgressException(e) => e.message(),
        GetInstanceError::InvalidInputException(e) => e.message(),
        GetInstanceError::OperationFailureException(e) => e.message(),
        GetInstanceError::ServiceException(e) => e.message(),
        GetInstanceError::UnauthenticatedException(e) => e.message(),
        _ => err.message(),
    }
}
