/// RESTful remote implementation of the lookup capability.
///
/// Forwards every query to a counterpart service as a JSON-bodied POST and
/// decodes the scalar/vector result from the response. One network exchange
/// per call; no caching, no retries, no timeout policy at this layer.
use reqwest::Url;
use reqwest::blocking::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LookupError, WordVectors};

/// A lightweight handle to a remote embedding service.
///
/// Carries no vocabulary of its own; the remote side's view of the
/// vocabulary is authoritative. The wire contract has no introspection
/// endpoint, so the vector dimensionality must be supplied at
/// construction.
#[derive(Debug)]
pub struct RestfulKeyedVectors {
    endpoint: Url,
    dimensions: usize,
    client: Client,
}

// ── Wire contract ────────────────────────────────────────────────────

#[derive(Serialize)]
struct TokenRequest<'a> {
    token: &'a str,
}

#[derive(Deserialize)]
struct VectorResponse {
    vector: Option<Vec<f32>>,
}

#[derive(Serialize)]
struct PairRequest<'a> {
    entity1: &'a str,
    entity2: &'a str,
}

#[derive(Deserialize)]
struct DistanceResponse {
    distance: f32,
}

#[derive(Serialize)]
struct DistancesRequest<'a> {
    entity1: &'a str,
    other_distances: &'a [&'a str],
}

#[derive(Deserialize)]
struct DistancesResponse {
    distances: Vec<f32>,
}

#[derive(Deserialize)]
struct CloserThanResponse {
    tokens: Vec<String>,
}

// ── Implementation ───────────────────────────────────────────────────

impl RestfulKeyedVectors {
    /// Create a handle for the service at `url` (scheme required) on the
    /// given port, serving vectors of `dimensions` values.
    pub fn new(url: &str, port: u16, dimensions: usize) -> Result<Self, LookupError> {
        let mut endpoint = Url::parse(url)
            .map_err(|e| LookupError::InvalidEndpoint(format!("{url}: {e}")))?;
        endpoint
            .set_port(Some(port))
            .map_err(|()| LookupError::InvalidEndpoint(format!("cannot set port on {url}")))?;
        // Ensure a trailing slash so relative path joins append instead of replace
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        Ok(Self {
            endpoint,
            dimensions,
            client: Client::new(),
        })
    }

    /// The resolved base address queries are issued against.
    #[must_use]
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Issue one JSON POST to `path` and decode the response body.
    ///
    /// Non-success statuses and undecodable bodies are protocol errors,
    /// never silently defaulted.
    fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, LookupError>
    where
        Req: Serialize,
        Resp: DeserializeOwned,
    {
        let url = self
            .endpoint
            .join(path)
            .map_err(|e| LookupError::InvalidEndpoint(format!("{path}: {e}")))?;
        debug!("POST {url}");

        let resp = self.client.post(url).json(body).send()?;
        if !resp.status().is_success() {
            return Err(LookupError::Protocol(format!(
                "/{path} returned status {}",
                resp.status()
            )));
        }
        resp.json()
            .map_err(|e| LookupError::Protocol(format!("/{path}: malformed response: {e}")))
    }
}

impl WordVectors for RestfulKeyedVectors {
    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn get_vector(&self, token: &str) -> Result<Vec<f32>, LookupError> {
        let resp: VectorResponse = self.post("get_vector", &TokenRequest { token })?;
        // An absent `vector` key means the token is unknown to the service
        let vector = resp.vector.ok_or_else(|| LookupError::TokenNotFound {
            token: token.to_string(),
        })?;
        if vector.len() != self.dimensions {
            return Err(LookupError::Protocol(format!(
                "/get_vector returned {} values for {token:?}, expected {}",
                vector.len(),
                self.dimensions
            )));
        }
        Ok(vector)
    }

    fn distance(&self, entity1: &str, entity2: &str) -> Result<f32, LookupError> {
        let resp: DistanceResponse = self.post("distance", &PairRequest { entity1, entity2 })?;
        Ok(resp.distance)
    }

    fn distances(&self, entity1: &str, others: &[&str]) -> Result<Vec<f32>, LookupError> {
        let resp: DistancesResponse = self.post(
            "distances",
            &DistancesRequest {
                entity1,
                other_distances: others,
            },
        )?;
        if resp.distances.len() != others.len() {
            return Err(LookupError::Protocol(format!(
                "/distances returned {} values for {} candidates",
                resp.distances.len(),
                others.len()
            )));
        }
        Ok(resp.distances)
    }

    fn closer_than(&self, entity1: &str, entity2: &str) -> Result<Vec<String>, LookupError> {
        let resp: CloserThanResponse =
            self.post("mostsimilarvector", &PairRequest { entity1, entity2 })?;
        Ok(resp.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Start a mock server on a dedicated runtime; the blocking client is
    /// exercised from the test thread while the server runs on the
    /// runtime's worker threads.
    fn start_server() -> (tokio::runtime::Runtime, MockServer) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        let server = rt.block_on(MockServer::start());
        (rt, server)
    }

    fn client_for(server: &MockServer, dimensions: usize) -> RestfulKeyedVectors {
        let uri = Url::parse(&server.uri()).unwrap();
        let base = format!("{}://{}", uri.scheme(), uri.host_str().unwrap());
        RestfulKeyedVectors::new(&base, uri.port().unwrap(), dimensions).unwrap()
    }

    #[test]
    fn test_new_requires_scheme() {
        let err = RestfulKeyedVectors::new("localhost", 5000, 2).unwrap_err();
        assert!(matches!(err, LookupError::InvalidEndpoint(_)), "{err:?}");
    }

    #[test]
    fn test_get_vector_well_formed() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/get_vector"))
                .and(body_json(json!({"token": "cat"})))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"vector": [3.0, 4.0]})),
                )
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let vector = client.get_vector("cat").unwrap();
        assert!((vector[0] - 3.0).abs() < 1e-6);
        assert!((vector[1] - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_get_vector_missing_key_is_not_found() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/get_vector"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let err = client.get_vector("xyzzy").unwrap_err();
        match err {
            LookupError::TokenNotFound { ref token } => assert_eq!(token, "xyzzy"),
            other => panic!("expected TokenNotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_get_vector_wrong_length_is_protocol_error() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/get_vector"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"vector": [1.0, 2.0, 3.0]})),
                )
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let err = client.get_vector("cat").unwrap_err();
        assert!(matches!(err, LookupError::Protocol(_)), "{err:?}");
    }

    #[test]
    fn test_contains_maps_not_found_to_false() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/get_vector"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
                .mount(&server),
        );

        let client = client_for(&server, 2);
        assert!(!client.contains("xyzzy").unwrap());
    }

    #[test]
    fn test_distance_extraction() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/distance"))
                .and(body_json(json!({"entity1": "cat", "entity2": "dog"})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"distance": 0.25})))
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let d = client.distance("cat", "dog").unwrap();
        assert!((d - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_distance_missing_field_is_protocol_error() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/distance"))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({"unexpected": 1})))
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let err = client.distance("cat", "dog").unwrap_err();
        assert!(matches!(err, LookupError::Protocol(_)), "{err:?}");
    }

    #[test]
    fn test_distances_ordered() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/distances"))
                .and(body_json(json!({
                    "entity1": "cat",
                    "other_distances": ["a", "b", "c"],
                })))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"distances": [0.1, 0.2, 0.3]})),
                )
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let ds = client.distances("cat", &["a", "b", "c"]).unwrap();
        assert_eq!(ds.len(), 3);
        assert!((ds[0] - 0.1).abs() < 1e-6);
        assert!((ds[1] - 0.2).abs() < 1e-6);
        assert!((ds[2] - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_distances_length_mismatch_is_protocol_error() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/distances"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"distances": [0.1, 0.2]})),
                )
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let err = client.distances("cat", &["a", "b", "c"]).unwrap_err();
        assert!(matches!(err, LookupError::Protocol(_)), "{err:?}");
    }

    #[test]
    fn test_closer_than_decodes_tokens() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/mostsimilarvector"))
                .and(body_json(json!({"entity1": "cat", "entity2": "fish"})))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({"tokens": ["dog", "kitten"]})),
                )
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let tokens = client.closer_than("cat", "fish").unwrap();
        assert_eq!(tokens, vec!["dog".to_string(), "kitten".to_string()]);
    }

    #[test]
    fn test_non_success_status_is_protocol_error() {
        let (rt, server) = start_server();
        rt.block_on(
            Mock::given(method("POST"))
                .and(path("/get_vector"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server),
        );

        let client = client_for(&server, 2);
        let err = client.get_vector("cat").unwrap_err();
        assert!(matches!(err, LookupError::Protocol(_)), "{err:?}");
    }
}
