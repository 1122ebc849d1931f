use std::sync::Arc;

use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::config::{CredentialSource, Environment};
use crate::error::{redact_secret, RelayError};
use crate::llm::{ProviderAdapter, UpstreamClient, UpstreamErrorClass, UpstreamReply};
use crate::models::NormalizedResponse;
use crate::telemetry;

/**
 * \brief Successful outcomes of one relay request.
 */
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome {
    /** \brief CORS preflight, answered without a body. */
    Preflight,
    Completed(NormalizedResponse),
}

/**
 * \brief Status plus optional JSON body, ready to be written to the caller.
 */
#[derive(Debug, Clone, PartialEq)]
pub struct RelayResponse {
    pub status: StatusCode,
    pub body: Option<Value>,
}

impl IntoResponse for RelayResponse {
    fn into_response(self) -> Response {
        match self.body {
            Some(body) => (self.status, Json(body)).into_response(),
            None => self.status.into_response(),
        }
    }
}

/**
 * \brief Stateless relay: one caller message in, one upstream chat completion out.
 * `handle` is the only place a `RelayError` becomes a status code and a JSON body.
 */
pub struct TutorRelay {
    adapter: Arc<dyn ProviderAdapter>,
    upstream: Arc<dyn UpstreamClient>,
    credentials: Arc<dyn CredentialSource>,
    environment: Environment,
}

impl TutorRelay {
    pub fn new(
        adapter: Arc<dyn ProviderAdapter>,
        upstream: Arc<dyn UpstreamClient>,
        credentials: Arc<dyn CredentialSource>,
        environment: Environment,
    ) -> Self {
        Self {
            adapter,
            upstream,
            credentials,
            environment,
        }
    }

    pub fn adapter(&self) -> &dyn ProviderAdapter {
        self.adapter.as_ref()
    }

    /** \brief Whether the provider credential is currently resolvable. Never returns the value. */
    pub fn credential_configured(&self) -> bool {
        self.credentials
            .credential(self.adapter.credential_key())
            .is_some()
    }

    /**
     * \brief Handles one request and converts any failure into a structured response.
     * \param method HTTP method of the inbound request
     * \param body   raw request body
     */
    pub async fn handle(&self, method: &Method, body: &[u8]) -> RelayResponse {
        match self.process(method, body).await {
            Ok(RelayOutcome::Preflight) => RelayResponse {
                status: StatusCode::OK,
                body: None,
            },
            Ok(RelayOutcome::Completed(normalized)) => {
                telemetry::log_event(
                    "relay.chat",
                    &format!("provider={} status=200", self.adapter.name()),
                );
                RelayResponse {
                    status: StatusCode::OK,
                    body: Some(
                        serde_json::to_value(&normalized)
                            .unwrap_or_else(|_| Value::Object(Default::default())),
                    ),
                }
            }
            Err(err) => self.error_response(&err),
        }
    }

    /**
     * \brief Sends `message` through the same path as a POST from a caller.
     */
    pub async fn ask(&self, message: &str) -> RelayResponse {
        let body = serde_json::json!({ "message": message }).to_string();
        self.handle(&Method::POST, body.as_bytes()).await
    }

    /**
     * \brief Formats an error raised before the pipeline ran, e.g. a body the
     * server refused to buffer.
     */
    pub fn reject(&self, err: &RelayError) -> RelayResponse {
        self.error_response(err)
    }

    /**
     * \brief Runs the relay pipeline without formatting errors.
     */
    pub async fn process(&self, method: &Method, body: &[u8]) -> Result<RelayOutcome, RelayError> {
        if method == Method::OPTIONS {
            return Ok(RelayOutcome::Preflight);
        }
        if method != Method::POST {
            return Err(RelayError::MethodNotAllowed {
                method: method.to_string(),
            });
        }

        let payload = parse_body(body)?;
        let message = extract_message(&payload)?;
        let credential = self
            .credentials
            .credential(self.adapter.credential_key())
            .ok_or_else(|| RelayError::Configuration {
                key: self.adapter.credential_key().to_string(),
            })?;

        let request = self.adapter.build_request(message);
        tracing::debug!(
            provider = self.adapter.name(),
            model = %request.model,
            "sending chat to upstream"
        );
        let reply = self
            .upstream
            .send(self.adapter.endpoint(), &credential, &request)
            .await?;

        if !reply.status.is_success() {
            return Err(self.classify_failure(&reply, &credential));
        }

        let raw = reply
            .body
            .as_deref()
            .and_then(|text| serde_json::from_str::<Value>(text).ok())
            .ok_or_else(|| RelayError::UpstreamMalformedResponse {
                reason: "response body is not JSON".to_string(),
            })?;
        let normalized = self.adapter.normalize_response(&raw)?;
        tracing::info!(
            provider = self.adapter.name(),
            model = %request.model,
            message_len = message.len(),
            status = StatusCode::OK.as_u16(),
            "chat relayed"
        );
        Ok(RelayOutcome::Completed(normalized))
    }

    // Upstream text may quote the key back, so it is masked before it reaches `details`.
    fn classify_failure(&self, reply: &UpstreamReply, credential: &str) -> RelayError {
        match self.adapter.classify_error(reply.status) {
            UpstreamErrorClass::Unauthorized => RelayError::UpstreamUnauthorized {
                hint: self.adapter.key_hint().to_string(),
            },
            UpstreamErrorClass::RateLimited => RelayError::UpstreamRateLimited,
            UpstreamErrorClass::Other => RelayError::Upstream {
                status: passthrough_status(reply.status),
                details: redact_secret(reply.text_or_placeholder(), credential),
            },
        }
    }

    fn error_response(&self, err: &RelayError) -> RelayResponse {
        let status = err.status();
        match err {
            RelayError::Internal(_) | RelayError::Configuration { .. } => {
                tracing::error!(kind = err.kind(), status = status.as_u16(), "{:#}", err);
                telemetry::log_error("relay.chat", &format!("{} {}", err.kind(), err));
            }
            RelayError::UpstreamUnauthorized { .. }
            | RelayError::UpstreamRateLimited
            | RelayError::Upstream { .. }
            | RelayError::UpstreamMalformedResponse { .. } => {
                tracing::warn!(
                    provider = self.adapter.name(),
                    kind = err.kind(),
                    status = status.as_u16(),
                    "upstream call failed"
                );
                telemetry::log_error("relay.upstream", &format!("{} {}", err.kind(), err));
            }
            _ => {
                tracing::debug!(kind = err.kind(), status = status.as_u16(), "request rejected");
            }
        }
        let body = err.to_body(self.environment);
        RelayResponse {
            status,
            body: serde_json::to_value(&body).ok(),
        }
    }
}

/**
 * \brief Parses the body as a JSON object. A JSON string is parsed a second time;
 * an empty body counts as `{}`.
 */
pub fn parse_body(body: &[u8]) -> Result<Value, RelayError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Default::default()));
    }
    let invalid = |reason: String| RelayError::InvalidRequestBody { reason };
    let value: Value = serde_json::from_slice(body).map_err(|e| invalid(e.to_string()))?;
    let value = match value {
        Value::String(raw) => {
            serde_json::from_str::<Value>(&raw).map_err(|e| invalid(e.to_string()))?
        }
        other => other,
    };
    if value.is_object() {
        Ok(value)
    } else {
        Err(invalid("request body must be a JSON object".to_string()))
    }
}

/**
 * \brief Returns the trimmed `message` field, rejecting missing, non-string and blank values.
 */
pub fn extract_message(payload: &Value) -> Result<&str, RelayError> {
    payload
        .get("message")
        .and_then(|m| m.as_str())
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .ok_or(RelayError::InvalidMessage)
}

// 1xx/3xx and out-of-range codes are not meaningful error statuses for the caller.
fn passthrough_status(status: StatusCode) -> StatusCode {
    if status.is_client_error() || status.is_server_error() {
        status
    } else {
        StatusCode::BAD_GATEWAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaticCredentials;
    use crate::llm::{OpenAiCompatible, ProviderKind};
    use crate::models::UpstreamChatRequest;
    use anyhow::anyhow;
    use async_trait::async_trait;
    use std::sync::Mutex;

    const KEY: &str = "sk-secret-value-123";

    /** \brief Records every outbound call and answers with a scripted reply. */
    struct RecordingUpstream {
        reply: Option<UpstreamReply>,
        calls: Mutex<Vec<(String, String, UpstreamChatRequest)>>,
    }

    impl RecordingUpstream {
        fn replying(status: StatusCode, body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(UpstreamReply::new(status, body)),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                reply: None,
                calls: Mutex::new(Vec::new()),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl UpstreamClient for RecordingUpstream {
        async fn send(
            &self,
            endpoint: &str,
            credential: &str,
            request: &UpstreamChatRequest,
        ) -> anyhow::Result<UpstreamReply> {
            self.calls.lock().unwrap().push((
                endpoint.to_string(),
                credential.to_string(),
                request.clone(),
            ));
            self.reply
                .clone()
                .ok_or_else(|| anyhow!("connection refused"))
        }
    }

    fn relay_with(upstream: Arc<RecordingUpstream>, with_key: bool) -> TutorRelay {
        relay_in(upstream, with_key, Environment::Production)
    }

    fn relay_in(upstream: Arc<RecordingUpstream>, with_key: bool, env: Environment) -> TutorRelay {
        let creds = if with_key {
            StaticCredentials::new().with("DEEPSEEK_API_KEY", KEY)
        } else {
            StaticCredentials::new()
        };
        TutorRelay::new(
            Arc::new(OpenAiCompatible::preset(ProviderKind::DeepSeek)),
            upstream,
            Arc::new(creds),
            env,
        )
    }

    const HELLO: &str = r#"{"choices":[{"message":{"role":"assistant","content":"Hello!"}}]}"#;

    #[tokio::test]
    async fn test_preflight_returns_empty_ok() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        let resp = relay.handle(&Method::OPTIONS, b"").await;
        assert_eq!(resp.status, StatusCode::OK);
        assert!(resp.body.is_none());
        assert_eq!(upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_other_methods_rejected() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        for method in [Method::GET, Method::PUT, Method::DELETE, Method::PATCH, Method::HEAD] {
            let resp = relay.handle(&method, br#"{"message":"hi"}"#).await;
            assert_eq!(resp.status, StatusCode::METHOD_NOT_ALLOWED, "{}", method);
            let body = resp.body.unwrap();
            assert_eq!(body["error"], "Method not allowed");
            assert_eq!(body["message"], "Expected POST");
        }
        assert_eq!(upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_messages_make_no_call() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        for body in [
            "{}",
            r#"{"message": ""}"#,
            r#"{"message": "   "}"#,
            r#"{"message": 42}"#,
            r#"{"message": null}"#,
            "",
        ] {
            let err = relay.process(&Method::POST, body.as_bytes()).await.unwrap_err();
            assert!(matches!(err, RelayError::InvalidMessage), "{}: {:?}", body, err);
            let resp = relay.handle(&Method::POST, body.as_bytes()).await;
            assert_eq!(resp.status, StatusCode::BAD_REQUEST);
            assert_eq!(resp.body.unwrap()["error"], "Invalid message");
        }
        assert_eq!(upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        for body in ["{not json", "[1, 2]", "\"plain text\"", "17"] {
            let err = relay.process(&Method::POST, body.as_bytes()).await.unwrap_err();
            assert!(
                matches!(err, RelayError::InvalidRequestBody { .. }),
                "{}: {:?}",
                body,
                err
            );
        }
        let resp = relay.handle(&Method::POST, b"{not json").await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(resp.body.unwrap()["error"], "Invalid JSON");
        assert_eq!(upstream.call_count(), 0);
    }

    #[tokio::test]
    async fn test_string_encoded_body_is_accepted() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        let body = serde_json::to_vec(&Value::String(r#"{"message":"Hi"}"#.into())).unwrap();
        let resp = relay.handle(&Method::POST, &body).await;
        assert_eq!(resp.status, StatusCode::OK);
        assert_eq!(upstream.call_count(), 1);
    }

    #[tokio::test]
    async fn test_ask_posts_message() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        let resp = relay.ask("Is \"goed\" a word?").await;
        assert_eq!(resp.status, StatusCode::OK);
        let calls = upstream.calls.lock().unwrap();
        assert_eq!(calls[0].2.messages[1].content, "Is \"goed\" a word?");
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), false);
        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = resp.body.unwrap();
        assert_eq!(body["error"], "Server configuration error");
        assert!(body["hint"].as_str().unwrap().contains("DEEPSEEK_API_KEY"));
        assert_eq!(upstream.call_count(), 0);
        assert!(!relay.credential_configured());
    }

    #[tokio::test]
    async fn test_single_call_with_trimmed_message() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream.clone(), true);
        let resp = relay
            .handle(&Method::POST, br#"{"message":"  I goed to school  "}"#)
            .await;
        assert_eq!(resp.status, StatusCode::OK);

        let calls = upstream.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        let (endpoint, credential, request) = &calls[0];
        assert_eq!(endpoint, "https://api.deepseek.com/chat/completions");
        assert_eq!(credential, KEY);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "I goed to school");
        assert!(!request.stream);
    }

    #[tokio::test]
    async fn test_success_is_normalized() {
        let upstream = RecordingUpstream::replying(StatusCode::OK, HELLO);
        let relay = relay_with(upstream, true);
        let outcome = relay
            .process(&Method::POST, br#"{"message":"Hi"}"#)
            .await
            .unwrap();
        match outcome {
            RelayOutcome::Completed(resp) => assert_eq!(resp.content(), Some("Hello!")),
            other => panic!("unexpected outcome: {:?}", other),
        }

        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        let body = resp.body.unwrap();
        assert_eq!(body["choices"][0]["message"]["content"], "Hello!");
        assert_eq!(body["choices"][0]["message"]["role"], "assistant");
        assert!(body.get("model").is_none());
    }

    #[tokio::test]
    async fn test_success_body_is_deterministic() {
        let raw = r#"{"id":"x","model":"deepseek-chat","choices":[{"message":{"role":"assistant","content":"Hello!"}}],"usage":{"total_tokens":5,"prompt_tokens":3}}"#;
        let first = relay_with(RecordingUpstream::replying(StatusCode::OK, raw), true)
            .handle(&Method::POST, br#"{"message":"Hi"}"#)
            .await;
        let second = relay_with(RecordingUpstream::replying(StatusCode::OK, raw), true)
            .handle(&Method::POST, br#"{"message":"Hi"}"#)
            .await;
        assert_eq!(
            serde_json::to_vec(&first.body).unwrap(),
            serde_json::to_vec(&second.body).unwrap()
        );
    }

    #[tokio::test]
    async fn test_upstream_unauthorized() {
        let upstream = RecordingUpstream::replying(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Authentication Fails"}}"#,
        );
        let relay = relay_with(upstream, true);
        let err = relay
            .process(&Method::POST, br#"{"message":"Hi"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::UpstreamUnauthorized { .. }));

        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::UNAUTHORIZED);
        let body = resp.body.unwrap();
        assert_eq!(body["error"], "Invalid API key");
        assert!(body["hint"].as_str().unwrap().contains("platform.deepseek.com"));
    }

    #[tokio::test]
    async fn test_upstream_rate_limited() {
        let upstream = RecordingUpstream::replying(StatusCode::TOO_MANY_REQUESTS, "slow down");
        let relay = relay_with(upstream, true);
        let err = relay
            .process(&Method::POST, br#"{"message":"Hi"}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, RelayError::UpstreamRateLimited));
        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(resp.body.unwrap()["error"], "Rate limit exceeded");
    }

    #[tokio::test]
    async fn test_other_upstream_status_passes_through_truncated() {
        let long = "x".repeat(2_000);
        let upstream = RecordingUpstream::replying(StatusCode::SERVICE_UNAVAILABLE, &long);
        let relay = relay_with(upstream, true);
        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::SERVICE_UNAVAILABLE);
        let body = resp.body.unwrap();
        assert_eq!(body["error"], "AI service error");
        assert_eq!(body["details"].as_str().unwrap().len(), 500);
    }

    #[tokio::test]
    async fn test_unreadable_error_body_uses_placeholder() {
        let upstream = Arc::new(RecordingUpstream {
            reply: Some(UpstreamReply {
                status: StatusCode::BAD_REQUEST,
                body: None,
            }),
            calls: Mutex::new(Vec::new()),
        });
        let relay = relay_with(upstream, true);
        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::BAD_REQUEST);
        assert_eq!(
            resp.body.unwrap()["details"],
            "Unable to read error response"
        );
    }

    #[tokio::test]
    async fn test_missing_choices_is_malformed() {
        for raw in [r#"{"model":"deepseek-chat"}"#, "<html>oops</html>"] {
            let relay = relay_with(RecordingUpstream::replying(StatusCode::OK, raw), true);
            let err = relay
                .process(&Method::POST, br#"{"message":"Hi"}"#)
                .await
                .unwrap_err();
            assert!(matches!(err, RelayError::UpstreamMalformedResponse { .. }));
            let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
            assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(resp.body.unwrap()["error"], "Invalid response format");
        }
    }

    #[tokio::test]
    async fn test_transport_failure_is_internal_error() {
        let prod = relay_with(RecordingUpstream::failing(), true);
        let resp = prod.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::INTERNAL_SERVER_ERROR);
        let body = resp.body.unwrap();
        assert_eq!(body["error"], "Internal server error");
        assert_eq!(body["details"], "connection refused");
        assert!(body.get("stack").is_none());

        let dev = relay_in(RecordingUpstream::failing(), true, Environment::Development);
        let resp = dev.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert!(resp.body.unwrap().get("stack").is_some());
    }

    #[tokio::test]
    async fn test_credential_never_echoed() {
        let cases = [
            RecordingUpstream::replying(StatusCode::UNAUTHORIZED, "bad key"),
            RecordingUpstream::replying(StatusCode::TOO_MANY_REQUESTS, ""),
            RecordingUpstream::replying(StatusCode::BAD_GATEWAY, "gateway"),
            RecordingUpstream::replying(StatusCode::FORBIDDEN, &format!("key {} denied", KEY)),
            RecordingUpstream::replying(StatusCode::OK, "{}"),
            RecordingUpstream::failing(),
        ];
        for upstream in cases {
            let relay = relay_in(upstream, true, Environment::Development);
            let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
            let text = serde_json::to_string(&resp.body).unwrap();
            assert!(!text.contains(KEY), "credential leaked: {}", text);
        }
    }

    #[tokio::test]
    async fn test_upstream_error_text_quoting_key_is_masked() {
        let echo = format!(r#"{{"error":"Incorrect API key provided: {}"}}"#, KEY);
        let upstream = RecordingUpstream::replying(StatusCode::FORBIDDEN, &echo);
        let relay = relay_with(upstream, true);
        let resp = relay.handle(&Method::POST, br#"{"message":"Hi"}"#).await;
        assert_eq!(resp.status, StatusCode::FORBIDDEN);
        let body = resp.body.unwrap();
        assert_eq!(body["error"], "AI service error");
        let details = body["details"].as_str().unwrap();
        assert!(!details.contains(KEY), "credential leaked: {}", details);
        assert!(details.contains("Incorrect API key provided: [REDACTED]"));
    }

    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_completed_chat_logs_one_event_with_message_len() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::INFO)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let relay = relay_with(RecordingUpstream::replying(StatusCode::OK, HELLO), true);
        let resp = relay
            .handle(&Method::POST, br#"{"message":"  I goed to school  "}"#)
            .await;
        assert_eq!(resp.status, StatusCode::OK);

        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(text.matches("chat relayed").count(), 1, "{}", text);
        assert!(text.contains("message_len=16"), "{}", text);
        assert!(text.contains("model=deepseek-chat"), "{}", text);
        assert!(text.contains("status=200"), "{}", text);
        assert!(!text.contains("goed"), "{}", text);
        assert!(!text.contains(KEY), "{}", text);
    }

    #[test]
    fn test_reject_formats_payload_too_large() {
        let relay = relay_with(RecordingUpstream::replying(StatusCode::OK, HELLO), true);
        let resp = relay.reject(&RelayError::PayloadTooLarge);
        assert_eq!(resp.status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(resp.body.unwrap()["error"], "Payload too large");
    }

    #[test]
    fn test_passthrough_status() {
        assert_eq!(
            passthrough_status(StatusCode::NOT_FOUND),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            passthrough_status(StatusCode::MOVED_PERMANENTLY),
            StatusCode::BAD_GATEWAY
        );
    }
}
