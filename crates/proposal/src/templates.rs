use tera::{Context, Tera};

use crate::document::ProposalDocument;
use crate::error::ProposalError;

pub const SYSTEM_PROMPT: &str = include_str!("../../../templates/proposal/system.txt");

const DISCLAIMER_TEMPLATE: &str = "disclaimer.txt";
const PROMPT_TEMPLATE: &str = "prompt.txt";
const FALLBACK_TEMPLATE: &str = "fallback.txt";
const EMAIL_TEMPLATE: &str = "email.txt";

/// Proposal templates compiled into the binary. Template names end in `.txt`
/// so tera does not HTML-escape artist names.
#[derive(Clone, Debug)]
pub struct ProposalTemplates {
    tera: Tera,
}

impl ProposalTemplates {
    pub fn embedded() -> Result<Self, ProposalError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            (DISCLAIMER_TEMPLATE, include_str!("../../../templates/proposal/disclaimer.txt")),
            (PROMPT_TEMPLATE, include_str!("../../../templates/proposal/prompt.txt")),
            (FALLBACK_TEMPLATE, include_str!("../../../templates/proposal/fallback.txt")),
            (EMAIL_TEMPLATE, include_str!("../../../templates/proposal/email.txt")),
        ])?;
        Ok(Self { tera })
    }

    /// User prompt sent to the text generator.
    pub fn render_prompt(&self, document: &ProposalDocument) -> Result<String, ProposalError> {
        let context = Context::from_serialize(document.template_view())?;
        Ok(self.tera.render(PROMPT_TEMPLATE, &context)?)
    }

    /// Locally assembled proposal body used when generation is unavailable.
    pub fn render_fallback(&self, document: &ProposalDocument) -> Result<String, ProposalError> {
        let context = Context::from_serialize(document.template_view())?;
        Ok(self.tera.render(FALLBACK_TEMPLATE, &context)?)
    }

    pub fn render_disclaimer(&self, document: &ProposalDocument) -> Result<String, ProposalError> {
        let context = Context::from_serialize(document.template_view())?;
        Ok(self.tera.render(DISCLAIMER_TEMPLATE, &context)?)
    }

    /// Wraps a proposal body with the header, commission breakdown and footer.
    pub fn render_email(
        &self,
        document: &ProposalDocument,
        body: &str,
    ) -> Result<String, ProposalError> {
        let mut context = Context::from_serialize(document.template_view())?;
        context.insert("body", body.trim());
        Ok(self.tera.render(EMAIL_TEMPLATE, &context)?)
    }
}
