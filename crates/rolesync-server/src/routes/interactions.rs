use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;

use discord_rest::commands;
use discord_rest::types::{
    Interaction, InteractionResponse, INTERACTION_TYPE_APPLICATION_COMMAND,
    INTERACTION_TYPE_PING,
};

use crate::error::AppError;
use crate::state::{AppState, RunRequest};
use crate::verify::verify_signature;

const DEFAULT_BATCH_SIZE: i64 = 5;
const DEFAULT_START_ROW: i64 = 2;

/// POST /interactions — Discord's interactions webhook.
///
/// The response acknowledges the command immediately; the run itself is
/// queued and its outcome is visible only through the narration sinks.
pub async fn post_interaction(
    State(app): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InteractionResponse>, AppError> {
    let signature = header(&headers, "x-signature-ed25519")?;
    let timestamp = header(&headers, "x-signature-timestamp")?;
    if !verify_signature(&app.verifying_key, signature, timestamp, &body) {
        return Err(AppError::unauthorized("invalid request signature"));
    }

    let interaction: Interaction = serde_json::from_slice(&body)
        .map_err(|e| AppError::bad_request(format!("malformed interaction: {e}")))?;

    match interaction.kind {
        INTERACTION_TYPE_PING => Ok(Json(InteractionResponse::pong())),
        INTERACTION_TYPE_APPLICATION_COMMAND => {
            let data = interaction
                .data
                .ok_or_else(|| AppError::bad_request("command interaction without data"))?;
            let request = match data.name.as_str() {
                commands::VERIFY_MEMBERS => RunRequest::VerifyMembers {
                    batch_size: positive(
                        data.integer_option("batchsize").unwrap_or(DEFAULT_BATCH_SIZE),
                    ),
                    dry_run: data.boolean_option("dryrun").unwrap_or(true),
                },
                commands::VERIFY_STUDENTS => RunRequest::VerifyStudents {
                    start_row: positive(
                        data.integer_option("start-row").unwrap_or(DEFAULT_START_ROW),
                    ) as u32,
                    batch_size: positive(
                        data.integer_option("batchsize").unwrap_or(DEFAULT_BATCH_SIZE),
                    ),
                },
                other => {
                    return Ok(Json(InteractionResponse::message(format!(
                        "Unknown command: {other}"
                    ))))
                }
            };

            match app.runs.try_send(request) {
                Ok(()) => Ok(Json(InteractionResponse::message("Command received."))),
                Err(_) => Ok(Json(InteractionResponse::message(
                    "A batch is already queued. Try again once it finishes.",
                ))),
            }
        }
        other => Err(AppError::bad_request(format!(
            "unsupported interaction type {other}"
        ))),
    }
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Result<&'a str, AppError> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| AppError::unauthorized(format!("missing {name} header")))
}

fn positive(value: i64) -> usize {
    value.max(1) as usize
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build_router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use ed25519_dalek::{Signer, SigningKey};
    use http_body_util::BodyExt;
    use tokio::sync::mpsc;
    use tower::util::ServiceExt;

    fn signing_key() -> SigningKey {
        SigningKey::from_bytes(&[42u8; 32])
    }

    fn router_with_queue() -> (axum::Router, mpsc::Receiver<RunRequest>) {
        let (tx, rx) = mpsc::channel(1);
        let state = AppState::new(signing_key().verifying_key(), tx);
        (build_router(state), rx)
    }

    fn signed(body: &str) -> Request<Body> {
        let timestamp = "1700000000";
        let signature = signing_key().sign(&[timestamp.as_bytes(), body.as_bytes()].concat());
        Request::post("/interactions")
            .header("content-type", "application/json")
            .header("x-signature-ed25519", hex::encode(signature.to_bytes()))
            .header("x-signature-timestamp", timestamp)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn json_of(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn ping_answers_pong() {
        let (router, _rx) = router_with_queue();
        let response = router.oneshot(signed(r#"{"type":1}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_of(response).await, serde_json::json!({"type": 1}));
    }

    #[tokio::test]
    async fn bad_signature_is_rejected() {
        let (router, _rx) = router_with_queue();
        let mut request = signed(r#"{"type":1}"#);
        request
            .headers_mut()
            .insert("x-signature-timestamp", "1700000001".parse().unwrap());
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn missing_headers_are_rejected() {
        let (router, _rx) = router_with_queue();
        let request = Request::post("/interactions")
            .body(Body::from(r#"{"type":1}"#))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn verify_members_acks_and_enqueues() {
        let (router, mut rx) = router_with_queue();
        let body = r#"{"type":2,"data":{"name":"verify-members","options":[
            {"name":"batchsize","type":4,"value":8},
            {"name":"dryrun","type":5,"value":false}
        ]}}"#;
        let response = router.oneshot(signed(body)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert_eq!(json["data"]["content"], "Command received.");
        assert_eq!(
            rx.try_recv().unwrap(),
            RunRequest::VerifyMembers {
                batch_size: 8,
                dry_run: false
            }
        );
    }

    #[tokio::test]
    async fn verify_members_defaults_to_small_dry_run() {
        let (router, mut rx) = router_with_queue();
        let body = r#"{"type":2,"data":{"name":"verify-members"}}"#;
        router.oneshot(signed(body)).await.unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            RunRequest::VerifyMembers {
                batch_size: 5,
                dry_run: true
            }
        );
    }

    #[tokio::test]
    async fn verify_students_enqueues_window() {
        let (router, mut rx) = router_with_queue();
        let body = r#"{"type":2,"data":{"name":"verify-students","options":[
            {"name":"start-row","type":4,"value":10},
            {"name":"batchsize","type":4,"value":3}
        ]}}"#;
        router.oneshot(signed(body)).await.unwrap();
        assert_eq!(
            rx.try_recv().unwrap(),
            RunRequest::VerifyStudents {
                start_row: 10,
                batch_size: 3
            }
        );
    }

    #[tokio::test]
    async fn unknown_command_is_acknowledged_with_explanation() {
        let (router, mut rx) = router_with_queue();
        let body = r#"{"type":2,"data":{"name":"mystery"}}"#;
        let response = router.oneshot(signed(body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = json_of(response).await;
        assert!(json["data"]["content"]
            .as_str()
            .unwrap()
            .contains("Unknown command"));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn full_queue_reports_busy() {
        let (router, mut rx) = router_with_queue();
        let body = r#"{"type":2,"data":{"name":"verify-members"}}"#;
        router.clone().oneshot(signed(body)).await.unwrap();
        // Queue capacity is 1 and nothing drains it: the second command is
        // turned away, not queued behind the first.
        let response = router.oneshot(signed(body)).await.unwrap();
        let json = json_of(response).await;
        assert!(json["data"]["content"]
            .as_str()
            .unwrap()
            .contains("already queued"));
        assert!(rx.try_recv().is_ok());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn healthz_is_public() {
        let (router, _rx) = router_with_queue();
        let response = router
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
