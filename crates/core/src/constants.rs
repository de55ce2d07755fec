/// Currency used when neither the row, the account nor the user provides one.
pub const DEFAULT_CURRENCY: &str = "USD";

/// Timezone assigned to new users.
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Language assigned to new users.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Fractional digits stored for every money amount.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Upper bound reported for budget progress percentages.
pub const MAX_BUDGET_PERCENTAGE: u32 = 999;

/// Row errors returned to the caller of a CSV import.
pub const MAX_REPORTED_IMPORT_ERRORS: usize = 5;
