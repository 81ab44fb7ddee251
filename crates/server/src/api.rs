//! JSON API for the sales portal.
//!
//! Session endpoints:
//! - `POST /api/v1/sessions`                   - log in with the portal password
//! - `GET  /api/v1/sessions/{id}`              - client, campaign and live totals
//! - `PUT  /api/v1/sessions/{id}/client`       - replace client details
//! - `POST /api/v1/sessions/{id}/updates`      - apply one campaign update
//! - `POST /api/v1/sessions/{id}/reset`        - start a new proposal
//! - `POST /api/v1/sessions/{id}/proposal`     - email the proposal
//! - `DELETE /api/v1/sessions/{id}`            - log out and drop the session
//!
//! Sessions idle for longer than the configured timeout are treated as gone
//! and are swept by [`ApiState::prune_idle`].
//!
//! Stateless pricing endpoints:
//! - `POST /api/v1/pricing/breakdown`
//! - `POST /api/v1/pricing/commission`

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{error, info, warn};
use uuid::Uuid;

use amplify_core::audit::{
    AuditCategory, AuditEvent, AuditOutcome, AuditSink, SESSION_LOGIN, SESSION_LOGOUT,
};
use amplify_core::cpq::validity::evaluate_validity;
use amplify_core::{
    compute_commission_breakdown, compute_priced_breakdown, ApplicationError, CampaignConfig,
    CampaignUpdate, ClientDetails, CommissionBreakdown, DomainError, InterfaceError,
    PortalSession, PricedBreakdown, SessionSnapshot, ValidityViolation,
};
use amplify_proposal::{
    DispatchContext, ProposalError, ProposalReceipt, ProposalRequest, ProposalService,
};

const CORRELATION_HEADER: &str = "x-correlation-id";

const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

struct StoredSession {
    session: PortalSession,
    last_seen: Instant,
}

impl StoredSession {
    fn new(session: PortalSession) -> Self {
        Self { session, last_seen: Instant::now() }
    }

    fn is_idle(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_seen) >= idle_timeout
    }
}

type Sessions = Arc<RwLock<HashMap<Uuid, StoredSession>>>;

#[derive(Clone)]
pub struct ApiState {
    sessions: Sessions,
    idle_timeout: Duration,
    portal_password: SecretString,
    proposals: Arc<ProposalService>,
    audit: Arc<dyn AuditSink>,
}

impl ApiState {
    pub fn new(
        portal_password: SecretString,
        proposals: Arc<ProposalService>,
        audit: Arc<dyn AuditSink>,
    ) -> Self {
        Self {
            sessions: Arc::default(),
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            portal_password,
            proposals,
            audit,
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Drops every session last used `idle_timeout` or more before `now`.
    /// Returns how many were removed.
    pub async fn prune_idle(&self, now: Instant) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, stored| !stored.is_idle(now, self.idle_timeout));
        let removed = before - sessions.len();
        if removed > 0 {
            info!(
                event_name = "session.expired",
                correlation_id = "session-sweep",
                removed,
                remaining = sessions.len(),
                "idle portal sessions dropped"
            );
        }
        removed
    }
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct SessionCreated {
    pub session_id: String,
}

#[derive(Debug, Deserialize)]
pub struct SendProposalRequest {
    pub recipient_email: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub correlation_id: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub violations: Vec<ValidityViolation>,
}

/// Interface error plus an optional caller-safe message that replaces the
/// generic one.
#[derive(Debug)]
pub struct ApiError {
    interface: InterfaceError,
    public_message: Option<String>,
    violations: Vec<ValidityViolation>,
}

impl ApiError {
    fn from_application(error: ApplicationError, correlation_id: &str) -> Self {
        Self {
            interface: error.into_interface(correlation_id),
            public_message: None,
            violations: Vec::new(),
        }
    }

    fn with_public_message(mut self, message: impl Into<String>) -> Self {
        self.public_message = Some(message.into());
        self
    }

    fn status(&self) -> StatusCode {
        match self.interface {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::BAD_GATEWAY,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                event_name = "api.request.failed",
                correlation_id = %self.interface.correlation_id(),
                error = %self.interface,
                "request failed"
            );
        } else {
            warn!(
                event_name = "api.request.rejected",
                correlation_id = %self.interface.correlation_id(),
                error = %self.interface,
                "request rejected"
            );
        }

        let body = ErrorBody {
            error: self
                .public_message
                .unwrap_or_else(|| self.interface.user_message().to_string()),
            correlation_id: self.interface.correlation_id().to_string(),
            violations: self.violations,
        };
        (status, Json(body)).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/sessions", post(create_session))
        .route("/api/v1/sessions/{id}", get(get_session).delete(delete_session))
        .route("/api/v1/sessions/{id}/client", put(update_client))
        .route("/api/v1/sessions/{id}/updates", post(apply_update))
        .route("/api/v1/sessions/{id}/reset", post(reset_session))
        .route("/api/v1/sessions/{id}/proposal", post(send_proposal))
        .route("/api/v1/pricing/breakdown", post(pricing_breakdown))
        .route("/api/v1/pricing/commission", post(pricing_commission))
        .with_state(state)
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}

fn parse_session_id(raw: &str, correlation_id: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| {
        ApiError::from_application(
            ApplicationError::NotFound(format!("session `{raw}`")),
            correlation_id,
        )
    })
}

fn session_not_found(session_id: Uuid, correlation_id: &str) -> ApiError {
    ApiError::from_application(
        ApplicationError::NotFound(format!("session `{session_id}`")),
        correlation_id,
    )
}

/// Looks up a live session and marks it as used. An idle session is removed
/// here even if the sweep has not reached it yet.
fn touch_session<'a>(
    sessions: &'a mut HashMap<Uuid, StoredSession>,
    session_id: Uuid,
    idle_timeout: Duration,
    correlation_id: &str,
) -> Result<&'a mut PortalSession, ApiError> {
    let now = Instant::now();
    if sessions.get(&session_id).is_some_and(|stored| stored.is_idle(now, idle_timeout)) {
        sessions.remove(&session_id);
    }
    let stored =
        sessions.get_mut(&session_id).ok_or_else(|| session_not_found(session_id, correlation_id))?;
    stored.last_seen = now;
    Ok(&mut stored.session)
}

/// Runs `mutate` against a stored session and returns the resulting snapshot.
async fn with_session<F>(
    state: &ApiState,
    raw_id: &str,
    correlation_id: &str,
    mutate: F,
) -> Result<SessionSnapshot, ApiError>
where
    F: FnOnce(&mut PortalSession) -> Result<(), DomainError>,
{
    let session_id = parse_session_id(raw_id, correlation_id)?;
    let mut sessions = state.sessions.write().await;
    let session = touch_session(&mut sessions, session_id, state.idle_timeout, correlation_id)?;

    mutate(session)
        .map_err(|error| ApiError::from_application(ApplicationError::from(error), correlation_id))?;
    Ok(session.snapshot())
}

// ---------------------------------------------------------------------------
// Session handlers
// ---------------------------------------------------------------------------

async fn create_session(
    State(state): State<ApiState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<(StatusCode, Json<SessionCreated>), ApiError> {
    let correlation_id = correlation_id(&headers);
    let mut session = PortalSession::new();

    if let Err(error) = session.login(&request.password, &state.portal_password) {
        state.audit.emit(AuditEvent::new(
            None,
            correlation_id.clone(),
            SESSION_LOGIN,
            AuditCategory::Session,
            "portal",
            AuditOutcome::Rejected,
        ));
        return Err(ApiError::from_application(ApplicationError::from(error), &correlation_id)
            .with_public_message("Incorrect password"));
    }

    let session_id = Uuid::new_v4();
    state.sessions.write().await.insert(session_id, StoredSession::new(session));
    state.audit.emit(AuditEvent::new(
        Some(session_id.to_string()),
        correlation_id.clone(),
        SESSION_LOGIN,
        AuditCategory::Session,
        "portal",
        AuditOutcome::Success,
    ));
    info!(
        event_name = SESSION_LOGIN,
        correlation_id = %correlation_id,
        session_id = %session_id,
        "portal session opened"
    );

    Ok((StatusCode::CREATED, Json(SessionCreated { session_id: session_id.to_string() })))
}

async fn get_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let correlation_id = correlation_id(&headers);
    with_session(&state, &id, &correlation_id, |_| Ok(())).await.map(Json)
}

async fn delete_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let correlation_id = correlation_id(&headers);
    let session_id = parse_session_id(&id, &correlation_id)?;
    let mut stored = state
        .sessions
        .write()
        .await
        .remove(&session_id)
        .ok_or_else(|| session_not_found(session_id, &correlation_id))?;
    stored.session.logout();

    state.audit.emit(AuditEvent::new(
        Some(session_id.to_string()),
        correlation_id.clone(),
        SESSION_LOGOUT,
        AuditCategory::Session,
        "portal",
        AuditOutcome::Success,
    ));
    info!(
        event_name = SESSION_LOGOUT,
        correlation_id = %correlation_id,
        session_id = %session_id,
        "portal session closed"
    );

    Ok(StatusCode::NO_CONTENT)
}

async fn update_client(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(client): Json<ClientDetails>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let correlation_id = correlation_id(&headers);
    with_session(&state, &id, &correlation_id, |session| session.update_client(client))
        .await
        .map(Json)
}

async fn apply_update(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(update): Json<CampaignUpdate>,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let correlation_id = correlation_id(&headers);
    with_session(&state, &id, &correlation_id, |session| session.apply(update)).await.map(Json)
}

async fn reset_session(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<SessionSnapshot>, ApiError> {
    let correlation_id = correlation_id(&headers);
    with_session(&state, &id, &correlation_id, PortalSession::reset).await.map(Json)
}

async fn send_proposal(
    State(state): State<ApiState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<SendProposalRequest>,
) -> Result<Json<ProposalReceipt>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let session_id = parse_session_id(&id, &correlation_id)?;

    // Copy the form state out so the lock is not held across the email round trip.
    let (client, campaign) = {
        let mut sessions = state.sessions.write().await;
        let session =
            touch_session(&mut sessions, session_id, state.idle_timeout, &correlation_id)?;
        if !session.is_authenticated() {
            return Err(ApiError::from_application(
                ApplicationError::from(DomainError::NotAuthenticated),
                &correlation_id,
            ));
        }
        (session.client().clone(), session.campaign().clone())
    };

    let validity = evaluate_validity(&client, &campaign);
    if !validity.submittable {
        let mut rejection = ApiError::from_application(
            ApplicationError::from(DomainError::InvariantViolation(
                "proposal is not ready to submit".to_string(),
            )),
            &correlation_id,
        )
        .with_public_message("Complete the client details and enable at least one priced service");
        rejection.violations = validity.violations;
        return Err(rejection);
    }

    let proposal_request =
        ProposalRequest { client, campaign, recipient_email: request.recipient_email };
    let context = DispatchContext::new(correlation_id.clone()).with_session(session_id.to_string());

    match state.proposals.dispatch(&proposal_request, &context).await {
        Ok(receipt) => Ok(Json(receipt)),
        Err(ProposalError::Validation(message)) => Err(ApiError::from_application(
            ProposalError::Validation(message.clone()).into(),
            &correlation_id,
        )
        .with_public_message(message)),
        Err(error) => Err(ApiError::from_application(error.into(), &correlation_id)),
    }
}

// ---------------------------------------------------------------------------
// Pricing handlers
// ---------------------------------------------------------------------------

async fn pricing_breakdown(Json(campaign): Json<CampaignConfig>) -> Json<PricedBreakdown> {
    Json(compute_priced_breakdown(&campaign.normalized()))
}

async fn pricing_commission(Json(campaign): Json<CampaignConfig>) -> Json<CommissionBreakdown> {
    Json(compute_commission_breakdown(&campaign.normalized()))
}
