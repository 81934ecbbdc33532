//! Stable identifiers shared by the settings, app, and CLI layers.

pub const TOOL_NAME: &str = "pushguard";

// Status strings returned to the invoker.
pub const STATUS_NO_COMMITS: &str = "no commits found in payload";
pub const STATUS_COMPLETED: &str = "receipt sent";

// Reserved metadata keys.
pub const METADATA_VERBOSE_RECEIPT: &str = "verbosereceipt";

// Tracing target for the always-on receipt trace.
pub const RECEIPT_TRACE_TARGET: &str = "pushguard::receipt";
