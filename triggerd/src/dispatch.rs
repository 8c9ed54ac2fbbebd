//! Request dispatch.
//!
//! A request moves through `received -> parsed -> authenticated -> routed`.
//! Parsing happens before the credential check, so a malformed body is
//! reported as 400 even when the `Authorization` header is also bad.

use tracing::{debug, info};
use trigger_common::{AuthToken, TestReport, TriggerError, TriggerRequest, TriggerResponse};

use crate::auth;
use crate::maintenance::MaintenanceRunner;

/// Routes authenticated requests to their action handlers.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    token: AuthToken,
    maintenance: MaintenanceRunner,
}

impl Dispatcher {
    pub fn new(token: AuthToken, maintenance: MaintenanceRunner) -> Self {
        Self { token, maintenance }
    }

    /// Handle one request body with its raw `Authorization` header.
    ///
    /// `Err` is a terminal 4xx failure. `Ok` is always sent with HTTP 200,
    /// including the soft error for unknown actions.
    pub async fn handle(
        &self,
        authorization: Option<&[u8]>,
        body: &[u8],
    ) -> Result<TriggerResponse, TriggerError> {
        let request = TriggerRequest::from_slice(body)?;
        debug!("Request parsed");

        auth::authenticate(authorization, &self.token)?;
        debug!("Request authenticated");

        info!(
            action = %request.action_label(),
            app = %request.app_label(),
            "Received request"
        );

        Ok(self.route(request).await)
    }

    async fn route(&self, request: TriggerRequest) -> TriggerResponse {
        if request.is_test_action() {
            self.run_tests(request).await
        } else {
            info!("Unknown action {}", request.action_label());
            TriggerResponse::unknown_action()
        }
    }

    /// Mock test run. Reports a fixed pass and runs host maintenance.
    async fn run_tests(&self, request: TriggerRequest) -> TriggerResponse {
        let label = request.app_label();
        info!("Running tests for {}...", label);

        let report = TestReport::PASSED;
        debug!(?report, "Test report");

        // Outcome is logged and dropped; maintenance cannot fail the run.
        self.maintenance.run().await.log();

        info!("Tests completed for {}", label);
        TriggerResponse::tests_passed(request.app)
    }
}
