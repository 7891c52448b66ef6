use thiserror::Error;

/// Reasons a resolution request is refused before any math runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("not enough mana allocated: spend {spend} is below base cost {base}")]
    SpendBelowBaseCost { spend: i32, base: i32 },
    #[error("ability has no usable mana cost ({mana_cost})")]
    MisconfiguredAbility { mana_cost: i32 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("not enough mana: have {have}, need {need}")]
    InsufficientMana { have: i32, need: i32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpendError {
    #[error("unknown spend target '{0}'")]
    UnknownTarget(String),
}

#[derive(Debug, Error)]
pub enum TuningError {
    #[error("unknown tuning preset '{0}' (expected tier1 or legacy)")]
    UnknownPreset(String),
    #[error("invalid tuning document: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
