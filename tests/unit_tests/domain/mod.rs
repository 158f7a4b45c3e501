mod artifact_test;
