use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const SUBMIT_PATH: &str = "/api/submitDeployedContracts";

/// Answer submits carrying `token` with `status`, and expect exactly `times` of them.
#[allow(dead_code)]
pub async fn expect_submit(server: &MockServer, token: &str, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .and(body_partial_json(serde_json::json!({ "token": token })))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}

/// Answer every submit with `status`, whatever the token.
#[allow(dead_code)]
pub async fn expect_any_submit(server: &MockServer, status: u16, times: u64) {
    Mock::given(method("POST"))
        .and(path(SUBMIT_PATH))
        .respond_with(ResponseTemplate::new(status))
        .expect(times)
        .mount(server)
        .await;
}
