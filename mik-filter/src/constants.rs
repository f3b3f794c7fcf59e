//! Shared constants.

/// Field of the ambient request data that holds filters by default.
pub const DEFAULT_FILTERS_KEY: &str = "filters";

/// Prefix every operator token starts with.
pub const OPERATOR_PREFIX: char = '$';
