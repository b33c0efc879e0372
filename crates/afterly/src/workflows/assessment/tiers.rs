use serde::Serialize;

pub const PREPARED_THRESHOLD: u16 = 80;
pub const DEVELOPING_THRESHOLD: u16 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadinessTier {
    AtRisk,
    Developing,
    Prepared,
}

impl ReadinessTier {
    /// Lower bounds are inclusive.
    pub const fn from_score(score: u16) -> Self {
        if score >= PREPARED_THRESHOLD {
            Self::Prepared
        } else if score >= DEVELOPING_THRESHOLD {
            Self::Developing
        } else {
            Self::AtRisk
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::AtRisk => "At Risk",
            Self::Developing => "Developing",
            Self::Prepared => "Prepared",
        }
    }
}

/// Canned result copy for a tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierProfile {
    pub tier: ReadinessTier,
    pub label: &'static str,
    pub headline: &'static str,
    pub quick_wins: &'static [&'static str],
    pub next_level: &'static [&'static str],
}

static AT_RISK: TierProfile = TierProfile {
    tier: ReadinessTier::AtRisk,
    label: "At Risk",
    headline: "Important gaps remain — your loved ones may struggle to access your key assets.",
    quick_wins: &[
        "Start with a basic digital asset inventory",
        "Set up a simple password manager",
    ],
    next_level: &[
        "Create your first digital legacy plan",
        "Begin conversations with family about digital access",
    ],
};

static DEVELOPING: TierProfile = TierProfile {
    tier: ReadinessTier::Developing,
    label: "Developing",
    headline: "You're on the right path — tighten your digital security and sharing systems.",
    quick_wins: &[
        "Consolidate your passwords into a single encrypted vault",
        "Create one \"Crisis-Proof Binder\" with key access info",
    ],
    next_level: &[
        "Add digital clauses to your estate plan",
        "Record a short Message for the Future for each key contact",
    ],
};

static PREPARED: TierProfile = TierProfile {
    tier: ReadinessTier::Prepared,
    label: "Prepared",
    headline: "Your legacy is protected and future-ready.",
    quick_wins: &[
        "Maintain your current security practices",
        "Consider advanced quantum-resistant features",
    ],
    next_level: &[
        "Explore Afterly's premium features",
        "Share your success with family",
    ],
};

impl TierProfile {
    pub fn for_tier(tier: ReadinessTier) -> &'static TierProfile {
        match tier {
            ReadinessTier::AtRisk => &AT_RISK,
            ReadinessTier::Developing => &DEVELOPING,
            ReadinessTier::Prepared => &PREPARED,
        }
    }
}

pub fn classify(score: u16) -> &'static TierProfile {
    TierProfile::for_tier(ReadinessTier::from_score(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_are_inclusive_on_lower_bound() {
        assert_eq!(classify(80).tier, ReadinessTier::Prepared);
        assert_eq!(classify(79).tier, ReadinessTier::Developing);
        assert_eq!(classify(50).tier, ReadinessTier::Developing);
        assert_eq!(classify(49).tier, ReadinessTier::AtRisk);
        assert_eq!(classify(0).tier, ReadinessTier::AtRisk);
        assert_eq!(classify(180).tier, ReadinessTier::Prepared);
    }

    #[test]
    fn profiles_carry_two_recommendations_per_list() {
        for tier in [
            ReadinessTier::AtRisk,
            ReadinessTier::Developing,
            ReadinessTier::Prepared,
        ] {
            let profile = TierProfile::for_tier(tier);
            assert_eq!(profile.tier, tier);
            assert_eq!(profile.label, tier.label());
            assert_eq!(profile.quick_wins.len(), 2);
            assert_eq!(profile.next_level.len(), 2);
        }
    }
}
