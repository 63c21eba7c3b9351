//! Dispatch from tool operations to engine calls.
//!
//! Every call returns a JSON value: the operation's payload on success, or
//! a structured envelope `{"error": {"kind", "message"}}` on failure. No
//! error escapes as a panic or a raw string; the conversational layer is
//! expected to render the envelope, never to see an exception.

use serde_json::{json, Value};
use tracing::debug;

use noshow_contracts::{
    error::{EngineError, EngineResult},
    forecast::DateRange,
    ids::PatientId,
};
use noshow_core::RiskEngine;

use crate::ops::ToolOp;

/// Execute one tool operation against the engine.
pub fn dispatch(engine: &RiskEngine, op: ToolOp, params: &Value) -> Value {
    debug!(op = op.name(), "dispatching tool operation");
    let result = match op {
        ToolOp::GetNoShowRisk => get_no_show_risk(engine, params),
        ToolOp::GetSchedulingActions => get_scheduling_actions(engine, params),
        ToolOp::GetPatientRiskProfile => get_patient_risk_profile(engine, params),
    };
    result.unwrap_or_else(|err| error_envelope(&err))
}

fn get_no_show_risk(engine: &RiskEngine, params: &Value) -> EngineResult<Value> {
    let range = range_param(params)?;
    let card = engine.forecast(range)?;
    to_json(&card)
}

fn get_scheduling_actions(engine: &RiskEngine, params: &Value) -> EngineResult<Value> {
    let range = range_param(params)?;
    if !range.is_single_day() {
        return Err(EngineError::InvalidArgument {
            reason: "scheduling actions are planned per day, not per range".to_string(),
        });
    }
    let capacity = match params.get("capacity") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_u64().map(|c| c as u32).ok_or_else(|| {
            EngineError::InvalidArgument {
                reason: "capacity must be a non-negative integer".to_string(),
            }
        })?),
    };
    let actions = engine.plan_actions(range.start(), capacity)?;
    to_json(&actions)
}

fn get_patient_risk_profile(engine: &RiskEngine, params: &Value) -> EngineResult<Value> {
    let id = params
        .get("patientId")
        .and_then(Value::as_i64)
        .ok_or_else(|| EngineError::InvalidArgument {
            reason: "patientId must be an integer".to_string(),
        })?;
    let profile = engine.resolve_profile(PatientId(id), None)?;
    to_json(&profile)
}

/// Pull the date or date-range parameter. Accepts `"date": "YYYY-MM-DD"`
/// or `"dateRange": "start/end"`; either must parse or the call fails with
/// `InvalidArgument`.
fn range_param(params: &Value) -> EngineResult<DateRange> {
    let raw = params
        .get("dateRange")
        .or_else(|| params.get("date"))
        .and_then(Value::as_str)
        .ok_or_else(|| EngineError::InvalidArgument {
            reason: "missing 'date' or 'dateRange' parameter".to_string(),
        })?;
    raw.parse()
}

// A payload the engine built but cannot serialize is our fault, not the
// caller's; it surfaces in the operational envelope family.
fn to_json<T: serde::Serialize>(value: &T) -> EngineResult<Value> {
    serde_json::to_value(value).map_err(|e| EngineError::DataUnavailable {
        reason: format!("response not serializable: {}", e),
    })
}

/// Serialize an engine error into the wire envelope.
pub fn error_envelope(err: &EngineError) -> Value {
    let kind = match err {
        EngineError::NotFound { .. } => "notFound",
        EngineError::InvalidArgument { .. } => "invalidArgument",
        // Everything operational surfaces as data unavailability; the
        // caller cannot act on finer distinctions.
        EngineError::DataUnavailable { .. }
        | EngineError::InferenceUnavailable { .. }
        | EngineError::ConfigError { .. }
        | EngineError::LogWriteFailed { .. } => "dataUnavailable",
    };
    json!({
        "error": {
            "kind": kind,
            "message": err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use serde_json::json;

    use noshow_clinic::{seeded_store, SimulatedModelScorer};
    use noshow_core::{EngineConfig, RiskEngine};
    use noshow_heuristic::HeuristicEstimator;

    use super::{dispatch, error_envelope, to_json};
    use crate::ops::ToolOp;

    fn engine() -> RiskEngine {
        RiskEngine::new(
            Box::new(seeded_store()),
            Box::new(SimulatedModelScorer::new()),
            Box::new(HeuristicEstimator::with_defaults()),
            None,
            EngineConfig::default(),
        )
    }

    fn today() -> String {
        Utc::now().date_naive().to_string()
    }

    #[test]
    fn daily_forecast_payload_carries_the_discriminator() {
        let out = dispatch(&engine(), ToolOp::GetNoShowRisk, &json!({ "date": today() }));
        assert_eq!(out["$type"], "dailyForecast");
        assert_eq!(out["dateRange"], today());
        assert!(out["totalScheduled"].as_u64().unwrap() > 0);
        assert!(out["highestRiskDate"].is_null());
        assert_eq!(out["days"], json!([]));
    }

    #[test]
    fn weekly_forecast_payload_has_seven_days() {
        let start = Utc::now().date_naive();
        let end = start + Duration::days(6);
        let out = dispatch(
            &engine(),
            ToolOp::GetNoShowRisk,
            &json!({ "dateRange": format!("{}/{}", start, end) }),
        );
        assert_eq!(out["$type"], "weeklyForecast");
        assert_eq!(out["days"].as_array().unwrap().len(), 7);
        assert_eq!(out["totalScheduled"], 20);
    }

    #[test]
    fn scheduling_actions_come_back_as_an_ordered_array() {
        let out = dispatch(
            &engine(),
            ToolOp::GetSchedulingActions,
            &json!({ "date": today(), "capacity": 3 }),
        );
        let actions = out.as_array().expect("array payload");
        let priorities: Vec<u64> = actions
            .iter()
            .map(|a| a["priority"].as_u64().unwrap())
            .collect();
        let mut sorted = priorities.clone();
        sorted.sort_unstable();
        assert_eq!(priorities, sorted);
    }

    #[test]
    fn profile_payload_includes_history() {
        let out = dispatch(
            &engine(),
            ToolOp::GetPatientRiskProfile,
            &json!({ "patientId": 2 }),
        );
        assert_eq!(out["patientId"], 2);
        assert_eq!(out["history"]["total"], 5);
        assert!(out.get("error").is_none());
    }

    #[test]
    fn unknown_patient_maps_to_not_found_envelope() {
        let out = dispatch(
            &engine(),
            ToolOp::GetPatientRiskProfile,
            &json!({ "patientId": 999 }),
        );
        assert_eq!(out["error"]["kind"], "notFound");
        assert!(out["error"]["message"].as_str().unwrap().contains("999"));
    }

    #[test]
    fn unparseable_date_maps_to_invalid_argument() {
        for bad in ["March 5th", "2026-13-40", "2026/03/05"] {
            let out = dispatch(&engine(), ToolOp::GetNoShowRisk, &json!({ "date": bad }));
            assert_eq!(out["error"]["kind"], "invalidArgument", "input {:?}", bad);
        }
    }

    #[test]
    fn missing_date_maps_to_invalid_argument() {
        let out = dispatch(&engine(), ToolOp::GetNoShowRisk, &json!({}));
        assert_eq!(out["error"]["kind"], "invalidArgument");
    }

    #[test]
    fn range_rejected_for_scheduling_actions() {
        let out = dispatch(
            &engine(),
            ToolOp::GetSchedulingActions,
            &json!({ "dateRange": "2026-03-02/2026-03-08" }),
        );
        assert_eq!(out["error"]["kind"], "invalidArgument");
    }

    #[test]
    fn offline_store_maps_to_data_unavailable() {
        let store = seeded_store();
        store.set_offline(true);
        let engine = RiskEngine::new(
            Box::new(store),
            Box::new(SimulatedModelScorer::new()),
            Box::new(HeuristicEstimator::with_defaults()),
            None,
            EngineConfig::default(),
        );

        let out = dispatch(&engine, ToolOp::GetNoShowRisk, &json!({ "date": today() }));
        assert_eq!(out["error"]["kind"], "dataUnavailable");
    }

    #[test]
    fn unserializable_payload_is_an_operational_fault() {
        // JSON objects need string keys; byte-vector keys cannot convert.
        let mut weird = std::collections::HashMap::new();
        weird.insert(vec![0u8], 1);

        let err = to_json(&weird).unwrap_err();
        let env = error_envelope(&err);
        assert_eq!(env["error"]["kind"], "dataUnavailable");
    }

    #[test]
    fn envelope_shape_is_stable() {
        let err = noshow_contracts::error::EngineError::InvalidArgument {
            reason: "bad input".to_string(),
        };
        let env = error_envelope(&err);
        assert_eq!(env["error"]["kind"], "invalidArgument");
        assert!(env["error"]["message"].is_string());
        assert_eq!(env.as_object().unwrap().len(), 1);
    }
}
