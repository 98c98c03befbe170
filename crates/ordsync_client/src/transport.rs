//! Transport layer abstraction for the storefront RPC protocol.

use std::collections::HashMap;
use std::collections::VecDeque;

use parking_lot::Mutex;
use serde_json::Value;

/// Fault code the storefront raises when a session token has expired.
pub const SESSION_EXPIRED: i32 = 5;

/// A fault returned by the remote RPC endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RpcFault {
    /// Numeric fault code; opaque except for the session-expired code.
    pub code: i32,
    /// Fault message.
    pub message: String,
}

impl RpcFault {
    /// Creates a new fault.
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// Returns true if this fault means the session has expired.
    pub fn is_session_expired(&self) -> bool {
        self.code == SESSION_EXPIRED
    }
}

/// A transport carries the storefront RPC session protocol.
///
/// This trait abstracts the network layer, allowing for different
/// implementations (HTTP, loopback for tests, mock).
pub trait RpcTransport: Send + Sync {
    /// Exchanges credentials for an opaque session token.
    fn login(&self, username: &str, api_key: &str) -> Result<String, RpcFault>;

    /// Invokes a named method within the given session.
    fn call(&self, session: &str, method: &str, params: Value) -> Result<Value, RpcFault>;

    /// Ends the session. Returns whether the remote acknowledged it.
    fn logout(&self, session: &str) -> Result<bool, RpcFault>;
}

/// A scripted transport for tests.
///
/// Responses are queued per method and consumed in order; an exhausted
/// queue yields a generic fault. Every call is recorded for assertions.
#[derive(Debug, Default)]
pub struct MockTransport {
    inner: Mutex<MockState>,
}

#[derive(Debug, Default)]
struct MockState {
    responses: HashMap<String, VecDeque<Result<Value, RpcFault>>>,
    calls: Vec<(String, Value)>,
    logins: u32,
    logouts: u32,
    fail_login: bool,
}

impl MockTransport {
    /// Creates a new mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response for `method`.
    pub fn push_response(&self, method: &str, response: Value) {
        self.inner
            .lock()
            .responses
            .entry(method.to_string())
            .or_default()
            .push_back(Ok(response));
    }

    /// Queues a fault for `method`.
    pub fn push_fault(&self, method: &str, fault: RpcFault) {
        self.inner
            .lock()
            .responses
            .entry(method.to_string())
            .or_default()
            .push_back(Err(fault));
    }

    /// Makes every subsequent login fail.
    pub fn fail_logins(&self) {
        self.inner.lock().fail_login = true;
    }

    /// Number of login exchanges performed.
    pub fn login_count(&self) -> u32 {
        self.inner.lock().logins
    }

    /// Number of logout exchanges performed.
    pub fn logout_count(&self) -> u32 {
        self.inner.lock().logouts
    }

    /// All `(method, params)` pairs invoked so far.
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.inner.lock().calls.clone()
    }

    /// Params of every recorded invocation of `method`.
    pub fn calls_for(&self, method: &str) -> Vec<Value> {
        self.inner
            .lock()
            .calls
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, p)| p.clone())
            .collect()
    }
}

impl RpcTransport for MockTransport {
    fn login(&self, _username: &str, _api_key: &str) -> Result<String, RpcFault> {
        let mut state = self.inner.lock();
        if state.fail_login {
            return Err(RpcFault::new(2, "Access denied."));
        }
        state.logins += 1;
        Ok(format!("session-{}", state.logins))
    }

    fn call(&self, _session: &str, method: &str, params: Value) -> Result<Value, RpcFault> {
        let mut state = self.inner.lock();
        state.calls.push((method.to_string(), params));
        state
            .responses
            .get_mut(method)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(RpcFault::new(0, format!("no mock response for {method}"))))
    }

    fn logout(&self, _session: &str) -> Result<bool, RpcFault> {
        self.inner.lock().logouts += 1;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn mock_replays_responses_in_order() {
        let transport = MockTransport::new();
        transport.push_response("order.info", json!({"increment_id": "1"}));
        transport.push_fault("order.info", RpcFault::new(100, "Requested order not exists."));

        let session = transport.login("u", "k").unwrap();
        assert!(transport.call(&session, "order.info", json!(["1"])).is_ok());
        let err = transport
            .call(&session, "order.info", json!(["2"]))
            .unwrap_err();
        assert_eq!(err.code, 100);
        assert_eq!(transport.calls_for("order.info").len(), 2);
    }

    #[test]
    fn exhausted_queue_is_a_fault() {
        let transport = MockTransport::new();
        let err = transport.call("s", "order.list", json!([])).unwrap_err();
        assert_eq!(err.code, 0);
    }

    #[test]
    fn session_expiry_predicate() {
        assert!(RpcFault::new(SESSION_EXPIRED, "Session expired.").is_session_expired());
        assert!(!RpcFault::new(1, "Internal error.").is_session_expired());
    }
}
