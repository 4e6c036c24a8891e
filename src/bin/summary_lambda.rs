//! AWS Lambda handler for the detailed policy view
//!
//! Stateless: each POST carries the policy set, optional filter criteria and
//! an optional reference date, and receives the filtered policies with their
//! summary cards.

use chrono::NaiveDate;
use lambda_http::{http::Method, run, service_fn, Body, Error, Request, Response};
use policy_tracker::{policy::policies_from_values, Clock, DetailedView, PolicyFilter, TrackerError};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRequest {
    /// Raw records; malformed ones are skipped, not rejected
    #[serde(default)]
    policies: Vec<serde_json::Value>,
    #[serde(default)]
    filter: PolicyFilter,
    /// Pinned reference date; defaults to the function's local date
    #[serde(default)]
    today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
struct SummaryResponse {
    today: NaiveDate,
    #[serde(flatten)]
    view: DetailedView,
}

fn handle(body: &[u8]) -> Result<SummaryResponse, TrackerError> {
    let request: SummaryRequest = serde_json::from_slice(body)?;
    let filter = request.filter.normalized()?;
    let clock = request.today.map_or(Clock::System, Clock::Fixed);
    let today = clock.today();

    let received = request.policies.len();
    let policies = policies_from_values(request.policies);
    let view = DetailedView::build(&policies, &filter, today);
    log::info!(
        "Summarized {} of {} policies ({} received) as of {}",
        view.policies.len(),
        policies.len(),
        received,
        today
    );
    Ok(SummaryResponse { today, view })
}

fn json_response(status: u16, value: &serde_json::Value) -> Result<Response<Body>, Error> {
    let response = Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Body::from(value.to_string()))?;
    Ok(response)
}

async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
    if event.method() != Method::POST {
        return json_response(405, &json!({ "error": "Method not allowed" }));
    }

    match handle(event.body().as_ref()) {
        Ok(response) => json_response(200, &serde_json::to_value(&response)?),
        Err(e) => {
            log::warn!("Rejected request: {}", e);
            json_response(e.status_code(), &json!({ "error": e.to_string() }))
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(function_handler)).await
}
