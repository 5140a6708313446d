use std::sync::Arc;

use axum::{
    extract::State,
    http::{
        header::{CONTENT_TYPE, COOKIE, SET_COOKIE},
        HeaderMap, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use derive_more::{Display, From};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use sim_rs::{Segment, SessionError, SessionId, SessionRegistry, TurnOutcome};
use tokio::task::{JoinError, JoinHandle};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::{error, info, warn};

use crate::config::GameSettings;

pub(crate) const SESSION_COOKIE: &str = "sim_session";

#[derive(Debug)]
pub(crate) struct AppState {
    pub registry: Mutex<SessionRegistry>,
    pub settings: GameSettings,
}

impl AppState {
    pub fn new(settings: GameSettings) -> Self {
        Self {
            registry: Mutex::new(SessionRegistry::new()),
            settings,
        }
    }
}

pub(crate) type SharedState = Arc<AppState>;

pub(crate) fn app(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([CONTENT_TYPE]);

    Router::new()
        .route("/start", post(route_start))
        .route("/respond", post(route_respond))
        .route("/dummy", get(route_dummy))
        .route("/session", delete(route_end_session))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Run a blocking closure on tokio's blocking pool inside the caller's span
pub(crate) fn spawn_blocking_with_tracing<F, R>(f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    let span = tracing::Span::current();
    tokio::task::spawn_blocking(move || span.in_scope(f))
}

type Pair = [usize; 2];

fn pair(segment: Segment) -> Pair {
    [segment.low(), segment.high()]
}

fn pairs(segments: impl IntoIterator<Item = Segment>) -> Vec<Pair> {
    segments.into_iter().map(pair).collect()
}

fn session_cookie(headers: &HeaderMap) -> Option<SessionId> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|cookie| cookie.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, id)| SessionId::from(id))
}

#[derive(Debug, Display, From)]
pub(crate) enum ApiError {
    #[display("no sim_session cookie, POST /start first")]
    MissingSession,
    #[display("{_0}")]
    #[from]
    Session(SessionError),
    #[display("search failed: {_0}")]
    #[from]
    Search(JoinError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingSession => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::UnknownSession { .. }) => StatusCode::NOT_FOUND,
            ApiError::Session(SessionError::GameOver { .. }) => StatusCode::CONFLICT,
            ApiError::Session(SessionError::MalformedMove { .. })
            | ApiError::Session(SessionError::IllegalMove(_)) => StatusCode::BAD_REQUEST,
            ApiError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, %status, "request rejected");
        }

        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct StartRequest {
    difficulty: Option<usize>,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartResponse {
    available: Vec<Pair>,
}

pub(crate) async fn route_start(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Option<Json<StartRequest>>,
) -> impl IntoResponse {
    let request = body.map(|Json(request)| request).unwrap_or_default();
    let config = state.settings.config_for(request.difficulty);

    let previous = session_cookie(&headers);
    let (id, session) = state.registry.lock().start(previous.as_ref(), config);
    let available = pairs(session.lock().available_moves());

    let cookie = format!("{SESSION_COOKIE}={id}; Path=/; HttpOnly; SameSite=Lax");

    ([(SET_COOKIE, cookie)], Json(StartResponse { available }))
}

#[derive(Debug, Deserialize)]
pub(crate) struct RespondRequest {
    response: String,
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(untagged)]
pub(crate) enum RespondResponse {
    Lost {
        lost: &'static str,
        #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
        ai_move: Option<Pair>,
    },
    Tie {
        tie: bool,
        #[serde(rename = "move", skip_serializing_if = "Option::is_none")]
        ai_move: Option<Pair>,
    },
    Continue {
        #[serde(rename = "move")]
        ai_move: Pair,
        available: Vec<Pair>,
    },
}

pub(crate) async fn route_respond(
    State(state): State<SharedState>,
    headers: HeaderMap,
    Json(request): Json<RespondRequest>,
) -> Result<Json<RespondResponse>, ApiError> {
    let id = session_cookie(&headers).ok_or(ApiError::MissingSession)?;
    let session = state.registry.lock().get(&id)?;

    let (outcome, available) = spawn_blocking_with_tracing(move || {
        let mut session = session.lock();
        let outcome = session.respond(&request.response)?;

        Ok::<_, SessionError>((outcome, session.available_moves()))
    })
    .await??;

    let response = match outcome {
        TurnOutcome::PlayerLost => RespondResponse::Lost {
            lost: "player",
            ai_move: None,
        },
        TurnOutcome::AiLost { ai_move } => RespondResponse::Lost {
            lost: "AI",
            ai_move: Some(pair(ai_move)),
        },
        TurnOutcome::Tie { ai_move } => RespondResponse::Tie {
            tie: true,
            ai_move: ai_move.map(pair),
        },
        TurnOutcome::Continue { ai_move, .. } => RespondResponse::Continue {
            ai_move: pair(ai_move),
            available: pairs(available),
        },
    };

    Ok(Json(response))
}

pub(crate) async fn route_dummy() -> impl IntoResponse {
    Json(serde_json::json!({ "result": 1 }))
}

pub(crate) async fn route_end_session(
    State(state): State<SharedState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    let id = session_cookie(&headers).ok_or(ApiError::MissingSession)?;

    if !state.registry.lock().end(&id) {
        return Err(SessionError::UnknownSession { id }.into());
    }
    info!(session = %id, "session torn down");

    let expired = format!("{SESSION_COOKIE}=; Path=/; Max-Age=0");

    Ok((StatusCode::NO_CONTENT, [(SET_COOKIE, expired)]))
}

#[cfg(test)]
mod test {
    use axum::{body::Body, http::Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    fn state(points: usize) -> SharedState {
        Arc::new(AppState::new(GameSettings {
            points,
            default_difficulty: 2,
            max_difficulty: 3,
        }))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn start(state: &SharedState, body: Value) -> (String, Value) {
        let response = app(state.clone())
            .oneshot(
                Request::post("/start")
                    .header(CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response.headers()[SET_COOKIE]
            .to_str()
            .unwrap()
            .split(';')
            .next()
            .unwrap()
            .to_owned();

        (cookie, body_json(response).await)
    }

    async fn respond(
        state: &SharedState,
        cookie: Option<&str>,
        response: &str,
    ) -> Response {
        let mut request =
            Request::post("/respond").header(CONTENT_TYPE, "application/json");
        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        app(state.clone())
            .oneshot(
                request
                    .body(Body::from(json!({ "response": response }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn registered_session(state: &SharedState, cookie: &str) -> sim_rs::SharedSession {
        let id = cookie.trim_start_matches("sim_session=");
        state.registry.lock().get(&SessionId::from(id)).unwrap()
    }

    #[test]
    fn test_session_cookie() {
        let mut headers = HeaderMap::new();
        assert_eq!(session_cookie(&headers), None);

        headers.insert(COOKIE, "theme=dark; sim_session=abc123".parse().unwrap());
        assert_eq!(session_cookie(&headers), Some(SessionId::from("abc123")));
    }

    #[test]
    fn test_respond_response_shapes() {
        let lost = RespondResponse::Lost {
            lost: "player",
            ai_move: None,
        };
        assert_eq!(serde_json::to_value(lost).unwrap(), json!({ "lost": "player" }));

        let lost = RespondResponse::Lost {
            lost: "AI",
            ai_move: Some([1, 2]),
        };
        assert_eq!(
            serde_json::to_value(lost).unwrap(),
            json!({ "lost": "AI", "move": [1, 2] })
        );

        let tie = RespondResponse::Tie {
            tie: true,
            ai_move: None,
        };
        assert_eq!(serde_json::to_value(tie).unwrap(), json!({ "tie": true }));
    }

    #[tokio::test]
    async fn test_dummy() {
        let response = app(state(6))
            .oneshot(Request::get("/dummy").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "result": 1 }));
    }

    #[tokio::test]
    async fn test_start_lists_every_segment() {
        let state = state(6);

        let (cookie, body) = start(&state, json!({})).await;

        assert!(cookie.starts_with("sim_session="));
        let available = body["available"].as_array().unwrap();
        assert_eq!(available.len(), 15);
        assert_eq!(available[0], json!([0, 1]));
        assert_eq!(available[14], json!([4, 5]));
        assert_eq!(registered_session(&state, &cookie).lock().config().difficulty, 2);
    }

    #[tokio::test]
    async fn test_start_clamps_difficulty() {
        let state = state(6);

        let (cookie, _) = start(&state, json!({ "difficulty": 40 })).await;

        assert_eq!(registered_session(&state, &cookie).lock().config().difficulty, 3);
    }

    #[tokio::test]
    async fn test_restart_replaces_session() {
        let state = state(6);
        let (first, _) = start(&state, json!({})).await;

        let response = app(state.clone())
            .oneshot(
                Request::post("/start")
                    .header(CONTENT_TYPE, "application/json")
                    .header(COOKIE, first.as_str())
                    .body(Body::from("{}"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.registry.lock().len(), 1);
        assert_eq!(
            respond(&state, Some(first.as_str()), "0,1").await.status(),
            StatusCode::NOT_FOUND
        );
    }

    #[tokio::test]
    async fn test_respond_without_session() {
        let state = state(6);

        let response = respond(&state, None, "0,1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = respond(&state, Some("sim_session=missing"), "0,1").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn test_turn_and_bad_moves() {
        let state = state(6);
        let (cookie, _) = start(&state, json!({ "difficulty": 1 })).await;

        let response = respond(&state, Some(cookie.as_str()), "0,1").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        let ai_move = body["move"].as_array().unwrap();
        assert_eq!(ai_move.len(), 2);
        assert_eq!(body["available"].as_array().unwrap().len(), 13);

        for bad in ["0,1", "3,3", "0,9", "nonsense"] {
            let response = respond(&state, Some(cookie.as_str()), bad).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{bad}");
        }
        assert_eq!(
            registered_session(&state, &cookie).lock().board().history().len(),
            2
        );
    }

    #[tokio::test]
    async fn test_finished_game_conflicts() {
        let state = state(3);
        let (cookie, _) = start(&state, json!({})).await;

        let body = body_json(respond(&state, Some(cookie.as_str()), "0,1").await).await;
        let last = body["available"].as_array().unwrap();
        assert_eq!(last.len(), 1);
        let last = format!("{},{}", last[0][0], last[0][1]);

        let response = respond(&state, Some(cookie.as_str()), &last).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!({ "tie": true }));

        let response = respond(&state, Some(cookie.as_str()), &last).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn test_end_session() {
        let state = state(6);
        let (cookie, _) = start(&state, json!({})).await;

        let end = || {
            app(state.clone()).oneshot(
                Request::delete("/session")
                    .header(COOKIE, cookie.as_str())
                    .body(Body::empty())
                    .unwrap(),
            )
        };

        assert_eq!(end().await.unwrap().status(), StatusCode::NO_CONTENT);
        assert_eq!(end().await.unwrap().status(), StatusCode::NOT_FOUND);
        assert!(state.registry.lock().is_empty());
    }
}
