mod audio_source_test;
