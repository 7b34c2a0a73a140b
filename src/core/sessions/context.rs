/// System context attached to a message sent into another agent's session.
///
/// `requester` is the session the message originates from, when known.
pub fn build_agent_to_agent_context(requester: Option<&str>, target: &str) -> String {
    let mut lines = vec!["Agent-to-agent message context:".to_string()];
    if let Some(requester) = requester.map(str::trim).filter(|r| !r.is_empty()) {
        lines.push(format!("Agent 1 (requester) session: {}.", requester));
    }
    lines.push(format!("Agent 2 (target) session: {}.", target));
    lines.join("\n")
}
