use std::fs;
use std::path::Path;

use amplify_core::domain::money::format_usd;
use amplify_core::{compute_commission_breakdown, compute_priced_breakdown, CampaignConfig};
use anyhow::Context;

use crate::commands::CommandResult;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum InputFormat {
    Toml,
    Json,
}

impl InputFormat {
    fn detect(path: &Path) -> Self {
        match path.extension().and_then(|extension| extension.to_str()) {
            Some(extension) if extension.eq_ignore_ascii_case("json") => Self::Json,
            _ => Self::Toml,
        }
    }
}

/// Prices a campaign file offline. The campaign is normalized first so
/// out-of-range discounts and view floors behave as they do in the portal.
pub fn run(path: &Path) -> CommandResult {
    let raw = match read_input(path) {
        Ok(raw) => raw,
        Err(error) => return CommandResult::failure("price", "input_read", format!("{error:#}"), 2),
    };

    let campaign = match parse_campaign(&raw, InputFormat::detect(path)) {
        Ok(campaign) => campaign.normalized(),
        Err(error) => {
            return CommandResult::failure("price", "input_parse", format!("{error:#}"), 3);
        }
    };

    let breakdown = compute_priced_breakdown(&campaign);
    let commission = compute_commission_breakdown(&campaign);
    let advisories: Vec<String> =
        breakdown.advisories.iter().map(|advisory| advisory.message()).collect();

    let message = if breakdown.has_active_service() {
        format!(
            "priced {} line item(s), grand total {}",
            breakdown.line_items.len(),
            format_usd(breakdown.grand_total)
        )
    } else {
        "no service is enabled with a positive price".to_string()
    };

    let data = serde_json::json!({
        "has_active_service": breakdown.has_active_service(),
        "breakdown": breakdown,
        "commission": commission,
        "advisories": advisories,
    });

    CommandResult::success_with_data("price", message, Some(data))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path)
        .with_context(|| format!("could not read campaign file `{}`", path.display()))
}

fn parse_campaign(raw: &str, format: InputFormat) -> anyhow::Result<CampaignConfig> {
    match format {
        InputFormat::Json => {
            serde_json::from_str(raw).context("campaign file is not a valid JSON campaign")
        }
        InputFormat::Toml => toml::from_str(raw).context("campaign file is not a valid TOML campaign"),
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::{parse_campaign, InputFormat};

    #[test]
    fn format_follows_file_extension() {
        assert_eq!(InputFormat::detect(Path::new("campaign.JSON")), InputFormat::Json);
        assert_eq!(InputFormat::detect(Path::new("campaign.toml")), InputFormat::Toml);
        assert_eq!(InputFormat::detect(Path::new("campaign")), InputFormat::Toml);
    }

    #[test]
    fn empty_documents_parse_as_the_default_campaign() {
        let from_toml = parse_campaign("", InputFormat::Toml).expect("toml");
        let from_json = parse_campaign("{}", InputFormat::Json).expect("json");

        assert!(!from_toml.playlist_placement.enabled);
        assert!(!from_json.social_seeding.enabled);
    }

    #[test]
    fn unknown_package_shape_is_rejected() {
        let error = parse_campaign("playlist_placement = 5", InputFormat::Toml)
            .expect_err("scalar service table should fail");
        assert!(format!("{error:#}").contains("not a valid TOML campaign"));
    }
}
