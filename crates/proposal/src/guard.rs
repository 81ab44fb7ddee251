use amplify_core::domain::money::{format_usd, round_cents};
use rust_decimal::Decimal;

use crate::document::ProposalDocument;

const DISCLAIMER_MARKER: &str = "reserves the right to adjust pricing";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Accept,
    Reject { reason_code: &'static str, detail: String },
}

impl GuardDecision {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accept)
    }
}

/// Checks generated proposal copy against the priced document. The generator
/// may reword prose but must never change a price or drop the disclaimer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContentGuard {
    pub require_service_prices: bool,
    pub require_disclaimer: bool,
}

impl Default for ContentGuard {
    fn default() -> Self {
        Self { require_service_prices: true, require_disclaimer: true }
    }
}

impl ContentGuard {
    pub fn evaluate(&self, document: &ProposalDocument, content: &str) -> GuardDecision {
        if content.trim().is_empty() {
            return GuardDecision::Reject {
                reason_code: "empty_content",
                detail: "generator returned no text".to_string(),
            };
        }

        let amounts = dollar_amounts(content);
        let quotes = |price: Decimal| amounts.contains(&round_cents(price));

        let total = document.total_investment_display();
        if !quotes(document.total_investment) {
            return GuardDecision::Reject {
                reason_code: "total_mismatch",
                detail: format!("total investment {total} missing from generated text"),
            };
        }

        if self.require_service_prices {
            if let Some(service) = document.services.iter().find(|service| !quotes(service.price)) {
                return GuardDecision::Reject {
                    reason_code: "service_price_mismatch",
                    detail: format!(
                        "{} price {} missing from generated text",
                        service.service.display_name(),
                        format_usd(service.price)
                    ),
                };
            }
        }

        if self.require_disclaimer && !content.contains(DISCLAIMER_MARKER) {
            return GuardDecision::Reject {
                reason_code: "disclaimer_missing",
                detail: "disclaimer was shortened or removed".to_string(),
            };
        }

        GuardDecision::Accept
    }
}

/// Every `$` amount written in `content`, read as a whole number so that
/// `$1,500` never matches inside `$11,500` or `$1,500,000`.
fn dollar_amounts(content: &str) -> Vec<Decimal> {
    content
        .split('$')
        .skip(1)
        .filter_map(|tail| {
            let figure: String = tail
                .chars()
                .take_while(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
                .filter(|c| *c != ',')
                .collect();
            figure.trim_end_matches('.').parse::<Decimal>().ok()
        })
        .collect()
}
