/// Human-readable text for a notification `reason` code. Unknown codes map to "".
pub fn reason_text(reason: &str) -> &'static str {
    match reason {
        "subscribed" => "You are watching the repository",
        "manual" => "You are subscribed to this thread",
        "author" => "You created this thread",
        "comment" => "New comment",
        "mention" => "You were mentioned",
        "team_mention" => "Your team was mentioned",
        "state_change" => "Thread status changed",
        "assign" => "You were assigned to the issue",
        "security_alert" => "New security vulnerability found",
        "invitation" => "You accepted an invitation",
        "review_requested" => "PR Review Requested",
        "ci_activity" => "A workflow run you triggered completed",
        _ => "",
    }
}
