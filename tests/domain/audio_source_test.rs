use metagrafi::domain::{StoragePath, is_supported_audio};

#[test]
fn given_recognized_mime_type_then_upload_is_accepted() {
    assert!(is_supported_audio("recording", "audio/mpeg"));
    assert!(is_supported_audio("recording", "audio/x-wav"));
    assert!(is_supported_audio("recording", "audio/3gpp"));
}

#[test]
fn given_recognized_extension_with_generic_mime_then_upload_is_accepted() {
    assert!(is_supported_audio("voice-memo.m4a", "application/octet-stream"));
    assert!(is_supported_audio("interview.flac", "application/octet-stream"));
}

#[test]
fn given_uppercase_extension_then_upload_is_accepted() {
    assert!(is_supported_audio("RECORDING.MP3", "application/octet-stream"));
    assert!(is_supported_audio("Voice.Wav", "AUDIO/WAV"));
}

#[test]
fn given_non_audio_file_then_upload_is_rejected() {
    assert!(!is_supported_audio("notes.txt", "text/plain"));
    assert!(!is_supported_audio("report.pdf", "application/pdf"));
    assert!(!is_supported_audio("noextension", "application/octet-stream"));
}

#[test]
fn given_unsafe_filename_then_storage_path_is_sanitized() {
    let path = StoragePath::for_upload("../../etc/passwd recording?.mp3");

    let as_str = path.as_str();
    assert!(as_str.ends_with("passwd_recording_.mp3"), "path: {}", as_str);
    // the only separator is the uuid prefix; traversal segments are gone
    assert_eq!(as_str.matches('/').count(), 1, "path: {}", as_str);
}

#[test]
fn given_empty_filename_then_storage_path_still_has_a_name() {
    let path = StoragePath::for_upload("");
    assert!(path.as_str().ends_with("/upload"), "path: {}", path);
}
