//! Conversions from external infrastructure errors into domain errors.

use reqwest::Error as HttpError;
use vetra_domain::VetraError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub VetraError);

impl From<InfraError> for VetraError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<VetraError> for InfraError {
    fn from(value: VetraError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoVetraError {
    fn into_vetra(self) -> VetraError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → VetraError */
/* -------------------------------------------------------------------------- */

impl IntoVetraError for HttpError {
    fn into_vetra(self) -> VetraError {
        if self.is_timeout() {
            return VetraError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return VetraError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                400..=499 => VetraError::InvalidInput(message),
                _ => VetraError::Network(message),
            };
        }

        VetraError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_vetra())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use reqwest::{Client, StatusCode};
    use tokio::runtime::Runtime;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[test]
    fn http_status_422_maps_to_invalid_input() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::UNPROCESSABLE_ENTITY))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: VetraError = InfraError::from(error).into();
            match mapped {
                VetraError::InvalidInput(msg) => assert!(msg.contains("422")),
                other => panic!("expected invalid input, got {:?}", other),
            }
        });
    }

    #[test]
    fn http_status_503_maps_to_network_error() {
        Runtime::new().unwrap().block_on(async {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
                .mount(&server)
                .await;

            let client = Client::builder().no_proxy().build().unwrap();
            let error =
                client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

            let mapped: VetraError = InfraError::from(error).into();
            match mapped {
                VetraError::Network(msg) => assert!(msg.contains("503")),
                other => panic!("expected network error, got {:?}", other),
            }
        });
    }
}
