pub mod audit;
pub mod config;
pub mod cpq;
pub mod domain;
pub mod errors;
pub mod session;

pub use cpq::aggregate::{compute_priced_breakdown, LineItem, PricedBreakdown, PricingAdvisory};
pub use cpq::commission::{compute_commission_breakdown, CommissionBreakdown, CommissionCategory};
pub use cpq::validity::{evaluate_validity, is_submittable, ValidityResult, ValidityViolation};
pub use cpq::{CampaignEvaluation, CampaignEvaluationInput, CampaignRuntime, DeterministicCampaignRuntime};
pub use domain::campaign::{CampaignConfig, CampaignUpdate, ServiceKind};
pub use domain::client::{ArtistTier, ClientDetails};
pub use errors::{ApplicationError, DomainError, InterfaceError};
pub use session::{PortalSession, SessionSnapshot};
