/// Maximum number of tool-call round trips before an adapter gives up and
/// returns the stable fallback text (§4.5).
pub const MAX_TOOL_ITERATIONS: u32 = 3;

/// Returned when the agentic loop exhausts its iteration budget without
/// producing a text turn.
pub const TOOL_LOOP_EXHAUSTED: &str = "I couldn't complete the request with the available tools.";
