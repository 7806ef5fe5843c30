use chrono::{TimeZone, Utc};

use metagrafi::domain::ExportFormat;
use metagrafi::infrastructure::rendering::render;

fn timestamp() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 12, 30, 0).unwrap()
}

#[test]
fn given_text_export_then_bytes_are_the_input_verbatim() {
    let text = "Καλημέρα σας.\nΤι κάνετε;";
    let bytes = render(ExportFormat::Txt, text, "Συνέντευξη", timestamp()).unwrap();
    assert_eq!(bytes, text.as_bytes());
}

#[test]
fn given_same_input_then_json_export_is_byte_identical() {
    let first = render(ExportFormat::Json, "some text", "Notes", timestamp()).unwrap();
    let second = render(ExportFormat::Json, "some text", "Notes", timestamp()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn given_json_export_then_fields_and_timestamp_round_trip() {
    let bytes = render(ExportFormat::Json, "the transcript", "Notes", timestamp()).unwrap();
    let parsed: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(parsed["title"], "Notes");
    assert_eq!(parsed["transcription"], "the transcript");
    let exported_at = parsed["exportedAt"].as_str().unwrap();
    assert!(exported_at.starts_with("2024-05-17T12:30:00"));
}

#[test]
fn given_srt_export_then_single_ten_second_cue_wraps_the_text() {
    let bytes = render(ExportFormat::Srt, "line one\nline two", "Notes", timestamp()).unwrap();
    let content = String::from_utf8(bytes).unwrap();

    assert!(content.starts_with("1\n00:00:00,000 --> 00:00:10,000\n"));
    // newlines are doubled so they read as blank-line separated cue text
    assert!(content.contains("line one\n\nline two"));
}

#[test]
fn given_vtt_export_then_header_and_single_cue_are_present() {
    let bytes = render(ExportFormat::Vtt, "only line", "Notes", timestamp()).unwrap();
    let content = String::from_utf8(bytes).unwrap();

    assert!(content.starts_with("WEBVTT\n\n00:00:00.000 --> 00:00:10.000\n"));
    assert!(content.ends_with("only line"));
}

#[test]
fn given_pdf_export_then_output_is_a_pdf_document() {
    let long_text = "a line of transcript\n".repeat(200);
    let bytes = render(ExportFormat::Pdf, &long_text, "Notes", timestamp()).unwrap();

    assert!(bytes.starts_with(b"%PDF"), "missing PDF magic");
    assert!(bytes.len() > 1000);
}

#[test]
fn given_docx_export_then_output_is_a_zip_container() {
    let bytes = render(ExportFormat::Docx, "line one\n\nline three", "Notes", timestamp()).unwrap();

    assert!(bytes.starts_with(b"PK"), "missing ZIP magic");
    assert!(bytes.len() > 500);
}
