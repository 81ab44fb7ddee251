use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};

use amplify_core::audit::{
    AuditCategory, AuditEvent, AuditOutcome, AuditSink, PROPOSAL_FAILED, PROPOSAL_GENERATED,
    PROPOSAL_LOGGED, PROPOSAL_SENT,
};
use amplify_core::config::AppConfig;
use amplify_core::domain::proposal::{ProposalId, ProposalRecord};
use amplify_db::repositories::ProposalLogRepository;

use crate::document::{DocumentSettings, ProposalDocument};
use crate::email::{EmailTransport, OutgoingEmail, ResendTransport};
use crate::error::ProposalError;
use crate::guard::{ContentGuard, GuardDecision};
use crate::llm::{OpenAiTextGenerator, TextGenerator};
use crate::request::ProposalRequest;
use crate::templates::{ProposalTemplates, SYSTEM_PROMPT};

const ACTOR: &str = "proposal-service";

/// Who asked for the proposal, carried into logs and audit events.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DispatchContext {
    pub correlation_id: String,
    pub session_id: Option<String>,
}

impl DispatchContext {
    pub fn new(correlation_id: impl Into<String>) -> Self {
        Self { correlation_id: correlation_id.into(), session_id: None }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProposalReceipt {
    pub proposal_id: ProposalId,
    pub email_id: String,
    pub total_amount: Decimal,
    pub commission_total: Decimal,
    pub used_fallback: bool,
    /// False when the email went out but the proposal log write failed.
    pub logged: bool,
}

pub struct ProposalService {
    templates: ProposalTemplates,
    generator: Option<Arc<dyn TextGenerator>>,
    transport: Arc<dyn EmailTransport>,
    log: Arc<dyn ProposalLogRepository>,
    audit: Arc<dyn AuditSink>,
    guard: ContentGuard,
    settings: DocumentSettings,
    from_address: String,
}

impl ProposalService {
    pub fn new(
        transport: Arc<dyn EmailTransport>,
        log: Arc<dyn ProposalLogRepository>,
        audit: Arc<dyn AuditSink>,
        settings: DocumentSettings,
        from_address: impl Into<String>,
    ) -> Result<Self, ProposalError> {
        Ok(Self {
            templates: ProposalTemplates::embedded()?,
            generator: None,
            transport,
            log,
            audit,
            guard: ContentGuard::default(),
            settings,
            from_address: from_address.into(),
        })
    }

    /// Wires the HTTP-backed generator and transport from configuration.
    pub fn from_config(
        config: &AppConfig,
        log: Arc<dyn ProposalLogRepository>,
        audit: Arc<dyn AuditSink>,
    ) -> Result<Self, ProposalError> {
        let transport = Arc::new(ResendTransport::from_config(&config.email)?);
        let service = Self::new(
            transport,
            log,
            audit,
            DocumentSettings::from(&config.proposal),
            config.email.from_address.clone(),
        )?;

        Ok(match OpenAiTextGenerator::from_config(&config.llm)? {
            Some(generator) => service.with_generator(Arc::new(generator)),
            None => service,
        })
    }

    pub fn with_generator(mut self, generator: Arc<dyn TextGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    pub fn with_guard(mut self, guard: ContentGuard) -> Self {
        self.guard = guard;
        self
    }

    pub fn has_generator(&self) -> bool {
        self.generator.is_some()
    }

    /// Validate, generate, send, then log. The request is only read; a failed
    /// dispatch leaves the caller's campaign exactly as it was.
    pub async fn dispatch(
        &self,
        request: &ProposalRequest,
        context: &DispatchContext,
    ) -> Result<ProposalReceipt, ProposalError> {
        let recipient = match request.validate() {
            Ok(recipient) => recipient,
            Err(error) => {
                self.emit(context, PROPOSAL_FAILED, AuditOutcome::Rejected, |event| {
                    event.with_metadata("stage", "validation").with_metadata("reason", error.to_string())
                });
                return Err(error);
            }
        };

        let campaign = request.campaign.clone().normalized();
        let document = ProposalDocument::build(
            &request.client,
            &campaign,
            &self.settings,
            Utc::now().date_naive(),
        );

        let (body, used_fallback) = match self.compose(&document, context).await {
            Ok(composed) => composed,
            Err(error) => {
                self.emit(context, PROPOSAL_FAILED, AuditOutcome::Failed, |event| {
                    event.with_metadata("stage", "generation").with_metadata("reason", error.to_string())
                });
                return Err(error);
            }
        };
        self.emit(context, PROPOSAL_GENERATED, AuditOutcome::Success, |event| {
            event.with_metadata("used_fallback", used_fallback.to_string())
        });

        let email = OutgoingEmail {
            from: self.from_address.clone(),
            to: vec![recipient.as_str().to_string()],
            subject: document.subject(),
            text: self.templates.render_email(&document, &body)?,
        };

        let email_id = match self.transport.send(&email).await {
            Ok(email_id) => email_id,
            Err(error) => {
                warn!(
                    event_name = PROPOSAL_FAILED,
                    correlation_id = %context.correlation_id,
                    error = %error,
                    "proposal email was not sent"
                );
                self.emit(context, PROPOSAL_FAILED, AuditOutcome::Failed, |event| {
                    event.with_metadata("stage", "transport").with_metadata("reason", error.to_string())
                });
                return Err(error);
            }
        };
        info!(
            event_name = PROPOSAL_SENT,
            correlation_id = %context.correlation_id,
            email_id = %email_id,
            total = %document.total_investment,
            used_fallback,
            "proposal email sent"
        );
        self.emit(context, PROPOSAL_SENT, AuditOutcome::Success, |event| {
            event
                .with_metadata("email_id", email_id.clone())
                .with_metadata("total_amount", document.total_investment.to_string())
        });

        let record = ProposalRecord {
            id: ProposalId::generate(),
            artist_name: request.client.artist_name.trim().to_string(),
            song_title: request.client.song_title.trim().to_string(),
            recipient_email: recipient.as_str().to_string(),
            total_amount: document.total_investment,
            commission_total: document.commission.total,
            services_included: campaign,
            email_id: email_id.clone(),
            used_fallback,
            created_at: Utc::now(),
        };
        let proposal_id = record.id.clone();

        let logged = match self.log.append(record).await {
            Ok(()) => {
                self.emit(context, PROPOSAL_LOGGED, AuditOutcome::Success, |event| {
                    event.with_metadata("proposal_id", proposal_id.0.clone())
                });
                true
            }
            Err(error) => {
                warn!(
                    event_name = PROPOSAL_LOGGED,
                    correlation_id = %context.correlation_id,
                    error = %error,
                    "proposal sent but could not be logged"
                );
                self.emit(context, PROPOSAL_LOGGED, AuditOutcome::Failed, |event| {
                    event.with_metadata("reason", error.to_string())
                });
                false
            }
        };

        Ok(ProposalReceipt {
            proposal_id,
            email_id,
            total_amount: document.total_investment,
            commission_total: document.commission.total,
            used_fallback,
            logged,
        })
    }

    async fn compose(
        &self,
        document: &ProposalDocument,
        context: &DispatchContext,
    ) -> Result<(String, bool), ProposalError> {
        if let Some(generator) = &self.generator {
            let prompt = self.templates.render_prompt(document)?;
            match generator.complete(SYSTEM_PROMPT, &prompt).await {
                Ok(content) => match self.guard.evaluate(document, &content) {
                    GuardDecision::Accept => return Ok((content, false)),
                    GuardDecision::Reject { reason_code, detail } => warn!(
                        event_name = PROPOSAL_GENERATED,
                        correlation_id = %context.correlation_id,
                        reason_code,
                        detail = %detail,
                        "generated proposal rejected, using local template"
                    ),
                },
                Err(error) => warn!(
                    event_name = PROPOSAL_GENERATED,
                    correlation_id = %context.correlation_id,
                    error = %error,
                    "text generation failed, using local template"
                ),
            }
        }

        Ok((self.templates.render_fallback(document)?, true))
    }

    fn emit(
        &self,
        context: &DispatchContext,
        event_type: &str,
        outcome: AuditOutcome,
        decorate: impl FnOnce(AuditEvent) -> AuditEvent,
    ) {
        let category = if event_type == PROPOSAL_LOGGED {
            AuditCategory::Persistence
        } else {
            AuditCategory::Proposal
        };
        let event = AuditEvent::new(
            context.session_id.clone(),
            context.correlation_id.clone(),
            event_type,
            category,
            ACTOR,
            outcome,
        );
        self.audit.emit(decorate(event));
    }
}
