mod soniox_recognizer_test;
