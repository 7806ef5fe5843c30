/// Both subtitle formats wrap the whole transcript in one fixed cue; real
/// per-segment timing is not recoverable from refined text.
pub const CUE_SECONDS: u64 = 10;

pub fn render_srt(text: &str) -> Vec<u8> {
    format!(
        "1\n00:00:00,000 --> 00:00:{:02},000\n{}",
        CUE_SECONDS,
        escape_blank_lines(text)
    )
    .into_bytes()
}

pub fn render_vtt(text: &str) -> Vec<u8> {
    format!(
        "WEBVTT\n\n00:00:00.000 --> 00:00:{:02}.000\n{}",
        CUE_SECONDS,
        escape_blank_lines(text)
    )
    .into_bytes()
}

/// A bare newline would terminate the cue; double it so paragraph breaks
/// survive as blank lines.
fn escape_blank_lines(text: &str) -> String {
    text.replace('\n', "\n\n")
}
