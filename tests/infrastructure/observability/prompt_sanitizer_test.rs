use metagrafi::infrastructure::observability::sanitize_prompt;

#[test]
fn given_empty_prompt_then_placeholder_is_returned() {
    assert_eq!(sanitize_prompt("   "), "[EMPTY]");
}

#[test]
fn given_short_prompt_then_it_is_returned_trimmed() {
    assert_eq!(sanitize_prompt("  fix the grammar  "), "fix the grammar");
}

#[test]
fn given_long_greek_prompt_then_truncation_respects_character_boundaries() {
    let prompt = "Καλημέρα ".repeat(50);
    let sanitized = sanitize_prompt(&prompt);

    assert!(sanitized.contains("chars total"));
    assert!(sanitized.starts_with("Καλημέρα"));
}

#[test]
fn given_bearer_token_then_it_is_redacted() {
    let sanitized = sanitize_prompt("use Bearer sk-abc123 for the call");
    assert!(sanitized.contains("Bearer [REDACTED]"));
    assert!(!sanitized.contains("sk-abc123"));
}

#[test]
fn given_api_key_parameter_then_it_is_redacted() {
    let sanitized = sanitize_prompt("call it with api_key=secret123 please");
    assert!(sanitized.contains("api_key=[REDACTED]"));
    assert!(!sanitized.contains("secret123"));
}
