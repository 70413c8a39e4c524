//! Tests for error types

use std::path::PathBuf;

use fcm_sweep::Error;

#[test]
fn test_executable_not_found_error() {
    let error = Error::ExecutableNotFound { program: "./fcm".to_string() };
    let error_str = format!("{error}");
    assert!(error_str.contains("Executable not found"));
    assert!(error_str.contains("./fcm"));
    assert!(error.is_process_failure());
    assert!(!error.is_user_error());
}

#[test]
fn test_non_zero_exit_error_with_stderr() {
    let error = Error::NonZeroExit {
        program: "./src/bin/main.out".to_string(),
        code: 2,
        stderr: "  cannot open db\n".to_string(),
    };
    let error_str = format!("{error}");
    assert_eq!(error_str, "./src/bin/main.out exited with status 2: cannot open db");
    assert!(error.is_process_failure());
}

#[test]
fn test_non_zero_exit_error_without_stderr() {
    let error = Error::NonZeroExit { program: "fcm".to_string(), code: 1, stderr: "\n".to_string() };
    assert_eq!(format!("{error}"), "fcm exited with status 1");
}

#[test]
fn test_launch_failed_error_keeps_source() {
    let error = Error::LaunchFailed {
        program: "fcm".to_string(),
        source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Failed to launch fcm"));
    assert!(std::error::Error::source(&error).is_some());
    assert!(error.is_process_failure());
}

#[test]
fn test_invalid_input_error() {
    let error = Error::InvalidInput("k must be positive".to_string());
    let error_str = format!("{error}");
    assert!(error_str.contains("Invalid input"));
    assert!(error_str.contains("k must be positive"));
    assert!(error.is_user_error());
    assert!(!error.is_process_failure());
}

#[test]
fn test_config_error() {
    let error = Error::Config {
        path: PathBuf::from("sweep.json"),
        message: "unknown field `k_values`".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("sweep.json"));
    assert!(error_str.contains("k_values"));
    assert!(error.is_user_error());
}

#[test]
fn test_artifact_error() {
    let error = Error::Artifact {
        path: PathBuf::from("models_heat/k9.bin"),
        message: "trainer produced no model".to_string(),
    };
    let error_str = format!("{error}");
    assert!(error_str.contains("Model artifact error"));
    assert!(error_str.contains("k9.bin"));
    assert!(!error.is_process_failure());
}

#[test]
fn test_render_error() {
    let error = Error::Render("canvas too small".to_string());
    assert!(format!("{error}").contains("Render error"));
}

#[test]
fn test_io_error_conversion() {
    let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
    let error: Error = io_error.into();
    let error_str = format!("{error}");
    assert!(error_str.contains("IO error"));
    assert!(error_str.contains("file not found"));
}

#[test]
fn test_serialization_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: Error = json_error.into();
    assert!(format!("{error}").contains("Serialization error"));
}

#[test]
fn test_other_error() {
    let error = Error::Other("custom error message".to_string());
    assert_eq!(format!("{error}"), "custom error message");
}

#[test]
fn test_error_debug_format() {
    let error = Error::InvalidInput("bad alpha".to_string());
    let debug_str = format!("{error:?}");
    assert!(debug_str.contains("InvalidInput"));
}
