use std::path::{Path, PathBuf};

use undox_core::errors::{ExError, ExErrorKind, FsFailure, UndoxError};
use undox_core_types::RunId;

#[test]
fn test_duplicate_field_verifiable_by_kind() {
    let err = UndoxError::DuplicateField {
        field: "MakeDirs_1".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::DuplicateField);
    assert_eq!(ex_err.code(), "ERR_DUPLICATE_FIELD");
    assert_eq!(ex_err.field(), Some("MakeDirs_1"));
    assert_eq!(ex_err.op(), Some("register_field"));
}

#[test]
fn test_field_not_registered_distinct_from_duplicate() {
    let err = UndoxError::FieldNotRegistered {
        field: "MakeDirs_2".to_string(),
    };

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::FieldNotFound);
    assert_ne!(ex_err.kind(), ExErrorKind::DuplicateField);
}

#[test]
fn test_fs_failures_map_to_distinct_kinds() {
    let cases = [
        (FsFailure::MissingParent, ExErrorKind::NotFound),
        (FsFailure::PermissionDenied, ExErrorKind::PermissionDenied),
        (FsFailure::AlreadyExists, ExErrorKind::AlreadyExists),
        (FsFailure::NotEmpty, ExErrorKind::NotEmpty),
        (FsFailure::NotADirectory, ExErrorKind::NotADirectory),
        (FsFailure::Other, ExErrorKind::Io),
    ];

    for (failure, expected) in cases {
        let err = UndoxError::CreateDirFailed {
            path: PathBuf::from("/tmp/x"),
            failure,
            message: "boom".to_string(),
        };
        let ex_err: ExError = err.into();
        assert_eq!(ex_err.kind(), expected, "Wrong kind for {:?}", failure);
        assert_eq!(ex_err.path(), Some(Path::new("/tmp/x")));
        assert_eq!(ex_err.message(), "boom");
    }
}

#[test]
fn test_remove_failure_records_operation() {
    let err = UndoxError::RemoveDirFailed {
        path: PathBuf::from("/tmp/full"),
        failure: FsFailure::NotEmpty,
        message: "Directory not empty".to_string(),
    };
    assert!(err.to_string().contains("/tmp/full"));

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.op(), Some("remove_dir"));
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::DuplicateField, "ERR_DUPLICATE_FIELD"),
        (ExErrorKind::FieldNotFound, "ERR_FIELD_NOT_FOUND"),
        (ExErrorKind::TypeMismatch, "ERR_TYPE_MISMATCH"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::AlreadyExists, "ERR_ALREADY_EXISTS"),
        (ExErrorKind::PermissionDenied, "ERR_PERMISSION_DENIED"),
        (ExErrorKind::NotEmpty, "ERR_NOT_EMPTY"),
        (ExErrorKind::NotADirectory, "ERR_NOT_A_DIRECTORY"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Serialization, "ERR_SERIALIZATION"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}

#[test]
fn test_run_id_context_is_carried() {
    let run_id = RunId::from_string("run-9".to_string());
    let err = ExError::new(ExErrorKind::Io).with_run_id(run_id.clone());

    assert_eq!(err.run_id(), Some(&run_id));
    assert!(err.to_string().contains("run-9"));
}

#[test]
fn test_serde_json_error_converts() {
    let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: UndoxError = parse_err.into();

    assert!(matches!(err, UndoxError::Serialization { .. }));
    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::Serialization);
}
