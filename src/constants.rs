//! Constants module to avoid magic strings in the codebase

// Gateway
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
pub const ENV_PREFIX: &str = "MIFOS_";

// Endpoints outside the command table
pub const OPENAPI_PATH: &str = "/openapi.json";

// Gateway-side defaults mirrored as option defaults
pub const DEFAULT_OFFICE_ID: i64 = 1;
pub const DEFAULT_PRODUCT_ID: i64 = 1;
pub const DEFAULT_CHARGE_ID: i64 = 1;
pub const DEFAULT_CLOSURE_REASON_ID: i64 = 17;
pub const DEFAULT_REJECT_NOTE: &str = "Rejected via AI Agent due to risk profile";
pub const DEFAULT_WAIVER_NOTE: &str = "AI Authorized Waiver";

// Zero-valued required options count as "not supplied" (see schema::is_supplied)
pub const ZERO_MEANS_ABSENT: bool = true;
