use rust_decimal::Decimal;

use crate::domain::campaign::ServiceKind;
use crate::domain::money::round_cents;

/// Largest discount percentage a salesperson may grant on the service.
pub fn discount_ceiling(service: ServiceKind) -> Decimal {
    match service {
        ServiceKind::VideoAds
        | ServiceKind::PlaylistPlacement
        | ServiceKind::RepostNetwork
        | ServiceKind::UgcStandardClipping
        | ServiceKind::UgcCultureEdits => Decimal::from(20),
        ServiceKind::SocialSeeding | ServiceKind::PaidSocial => Decimal::from(5),
        ServiceKind::UgcTrendingPush | ServiceKind::UgcCreatorFlood => Decimal::from(10),
    }
}

pub fn clamp_discount(service: ServiceKind, percent: Decimal) -> Decimal {
    percent.max(Decimal::ZERO).min(discount_ceiling(service))
}

/// Cents taken off `price` by the (clamped) discount.
pub fn discount_amount(service: ServiceKind, price: Decimal, percent: Decimal) -> Decimal {
    round_cents(price * clamp_discount(service, percent) / Decimal::ONE_HUNDRED)
}

pub fn apply_discount(service: ServiceKind, price: Decimal, percent: Decimal) -> Decimal {
    price - discount_amount(service, price, percent)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::{apply_discount, clamp_discount, discount_amount, discount_ceiling};
    use crate::domain::campaign::ServiceKind;

    #[test]
    fn ceilings_follow_service_category() {
        assert_eq!(discount_ceiling(ServiceKind::RepostNetwork), Decimal::from(20));
        assert_eq!(discount_ceiling(ServiceKind::PaidSocial), Decimal::from(5));
        assert_eq!(discount_ceiling(ServiceKind::UgcCultureEdits), Decimal::from(20));
        assert_eq!(discount_ceiling(ServiceKind::UgcCreatorFlood), Decimal::from(10));
    }

    #[test]
    fn discount_beyond_ceiling_has_no_additional_effect() {
        for service in ServiceKind::ALL {
            let price = Decimal::from(1_000);
            let at_ceiling = apply_discount(service, price, discount_ceiling(service));
            assert_eq!(apply_discount(service, price, Decimal::from(99)), at_ceiling);
            assert_eq!(apply_discount(service, price, Decimal::from(-10)), price);
        }
    }

    #[test]
    fn discount_is_applied_to_cents() {
        assert_eq!(
            apply_discount(ServiceKind::PlaylistPlacement, Decimal::from(360), Decimal::from(10)),
            Decimal::from(324)
        );
        assert_eq!(
            discount_amount(ServiceKind::VideoAds, Decimal::new(5_250, 2), Decimal::from(15)),
            Decimal::new(788, 2)
        );
        assert_eq!(clamp_discount(ServiceKind::SocialSeeding, Decimal::new(25, 1)), Decimal::new(25, 1));
    }
}
