use std::path::PathBuf;

use kanban::error::{exit_codes, Error};

#[test]
fn exit_code_user_error() {
    let err = Error::InvalidArgument("bad input".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
    let err = Error::InvalidConfig("bad config".to_string());
    assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
}

#[test]
fn exit_code_operation_failed() {
    let err = Error::OperationFailed("boom".to_string());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    let err = Error::HttpStatus {
        url: "http://localhost/board".to_string(),
        status: 503,
    };
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}

#[test]
fn load_failures_are_classified() {
    let decode = Error::Decode {
        origin: "board.json".to_string(),
        message: "expected value".to_string(),
    };
    assert!(decode.is_load_failure());
    assert!(!Error::LockFailed(PathBuf::from("prefs.toml.lock")).is_load_failure());
}

#[test]
fn details_include_http_status_fields() {
    let err = Error::HttpStatus {
        url: "http://localhost/board".to_string(),
        status: 502,
    };
    let details = err.details().expect("details");
    assert_eq!(details["url"], "http://localhost/board");
    assert_eq!(details["status"], 502);
}

#[test]
fn details_include_lock_path() {
    let err = Error::LockFailed(PathBuf::from("/tmp/preferences.toml.lock"));
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
    let details = err.details().expect("details");
    assert_eq!(details["path"], "/tmp/preferences.toml.lock");
}

#[test]
fn io_errors_carry_no_details() {
    let err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
    assert!(err.details().is_none());
    assert_eq!(err.exit_code(), exit_codes::OPERATION_FAILED);
}
