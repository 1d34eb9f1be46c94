//! Conversions from external infrastructure errors into domain errors.

use opsview_domain::OpsviewError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub OpsviewError);

impl From<InfraError> for OpsviewError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<OpsviewError> for InfraError {
    fn from(value: OpsviewError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoOpsviewError {
    fn into_opsview(self) -> OpsviewError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → OpsviewError */
/* -------------------------------------------------------------------------- */

impl IntoOpsviewError for HttpError {
    fn into_opsview(self) -> OpsviewError {
        if self.is_timeout() {
            return OpsviewError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return OpsviewError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return OpsviewError::Decode(format!("HTTP response body could not be decoded: {self}"));
        }

        if self.is_builder() {
            return OpsviewError::InvalidInput(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => OpsviewError::Auth(message),
                404 => OpsviewError::NotFound(message),
                400..=499 => OpsviewError::InvalidInput(message),
                _ => OpsviewError::Network(message),
            };
        }

        OpsviewError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_opsview())
    }
}

/* -------------------------------------------------------------------------- */
/* serde_json::Error → OpsviewError */
/* -------------------------------------------------------------------------- */

impl IntoOpsviewError for serde_json::Error {
    fn into_opsview(self) -> OpsviewError {
        OpsviewError::Decode(format!(
            "invalid JSON at line {} column {}: {self}",
            self.line(),
            self.column()
        ))
    }
}

impl From<serde_json::Error> for InfraError {
    fn from(value: serde_json::Error) -> Self {
        InfraError(value.into_opsview())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use std::net::TcpListener;

    use reqwest::{Client, StatusCode};
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    #[tokio::test]
    async fn http_status_401_maps_to_auth_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::UNAUTHORIZED))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: OpsviewError = InfraError::from(error).into();
        match mapped {
            OpsviewError::Auth(msg) => assert!(msg.contains("401")),
            other => panic!("expected auth error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn http_status_503_maps_to_network_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(StatusCode::SERVICE_UNAVAILABLE))
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(server.uri()).send().await.unwrap().error_for_status().unwrap_err();

        let mapped: OpsviewError = InfraError::from(error).into();
        assert!(matches!(mapped, OpsviewError::Network(msg) if msg.contains("503")));
    }

    #[tokio::test]
    async fn connection_refused_maps_to_network_error() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = Client::builder().no_proxy().build().unwrap();
        let error = client.get(format!("http://{addr}")).send().await.unwrap_err();

        let mapped: OpsviewError = InfraError::from(error).into();
        assert!(matches!(mapped, OpsviewError::Network(_)));
    }

    #[test]
    fn json_error_maps_to_decode_error() {
        let error = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let mapped: OpsviewError = InfraError::from(error).into();
        match mapped {
            OpsviewError::Decode(msg) => assert!(msg.contains("line 1")),
            other => panic!("expected decode error, got {:?}", other),
        }
    }

    #[test]
    fn domain_error_round_trips_through_newtype() {
        let original = OpsviewError::Config("bad".into());
        let wrapped = InfraError::from(original.clone());
        assert_eq!(OpsviewError::from(wrapped), original);
    }
}
