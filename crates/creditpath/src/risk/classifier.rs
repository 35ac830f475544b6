use serde::Serialize;

/// Upper bound (exclusive) of the low-risk band, in percent.
pub const LOW_RISK_CEILING: f64 = 30.0;
/// Upper bound (exclusive) of the medium-risk band, in percent.
pub const MEDIUM_RISK_CEILING: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Medium,
    High,
}

impl RiskTier {
    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }

    pub const fn color(self) -> ColorTag {
        match self {
            RiskTier::Low => ColorTag::Green,
            RiskTier::Medium => ColorTag::Amber,
            RiskTier::High => ColorTag::Red,
        }
    }
}

/// Semantic color shared by the gauge, the model chart, and the narrative badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorTag {
    Green,
    Amber,
    Red,
}

impl ColorTag {
    pub const fn hex(self) -> &'static str {
        match self {
            ColorTag::Green => "#22c55e",
            ColorTag::Amber => "#f59e0b",
            ColorTag::Red => "#ef4444",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RiskClassification {
    pub tier: RiskTier,
    pub color: ColorTag,
}

impl RiskClassification {
    pub const fn label(&self) -> &'static str {
        self.tier.label()
    }
}

/// Map a default probability in percent onto a tier: `[0,30)` low, `[30,60)` medium, rest high.
pub fn classify(probability_percent: f64) -> RiskClassification {
    let tier = if probability_percent < LOW_RISK_CEILING {
        RiskTier::Low
    } else if probability_percent < MEDIUM_RISK_CEILING {
        RiskTier::Medium
    } else {
        RiskTier::High
    };

    RiskClassification {
        tier,
        color: tier.color(),
    }
}

/// Same as [`classify`] for a probability expressed in `[0, 1]`.
pub fn classify_probability(probability: f64) -> RiskClassification {
    classify(probability * 100.0)
}
