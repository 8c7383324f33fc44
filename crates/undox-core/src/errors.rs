use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use undox_core_types::RunId;

/// Result type alias using UndoxError
pub type Result<T> = std::result::Result<T, UndoxError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// tests and the CLI's error output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Shared state usage
    DuplicateField,
    FieldNotFound,
    TypeMismatch,

    // Filesystem
    NotFound,
    AlreadyExists,
    PermissionDenied,
    NotEmpty,
    NotADirectory,
    Io,

    // Encoding
    Serialization,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::DuplicateField => "ERR_DUPLICATE_FIELD",
            ExErrorKind::FieldNotFound => "ERR_FIELD_NOT_FOUND",
            ExErrorKind::TypeMismatch => "ERR_TYPE_MISMATCH",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::PermissionDenied => "ERR_PERMISSION_DENIED",
            ExErrorKind::NotEmpty => "ERR_NOT_EMPTY",
            ExErrorKind::NotADirectory => "ERR_NOT_A_DIRECTORY",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
        }
    }
}

/// Canonical structured error type
///
/// Classification fields for programmatic handling plus context for
/// debugging. Built from an `UndoxError` or directly through the builder.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    field: Option<String>,
    path: Option<PathBuf>,
    run_id: Option<RunId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            field: None,
            path: None,
            run_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add shared-state field context
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add run ID context
    pub fn with_run_id(mut self, run_id: RunId) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the shared-state field context, if any
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Get the filesystem path context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the run ID context, if any
    pub fn run_id(&self) -> Option<&RunId> {
        self.run_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(field) = &self.field {
            write!(f, " (field: {})", field)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(run_id) = &self.run_id {
            write!(f, " (run_id: {})", run_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Classification of a failed directory operation
///
/// Derived from `io::ErrorKind` so callers can branch on the failure without
/// holding on to the (non-`Clone`) `io::Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsFailure {
    /// A parent component of the path does not exist
    MissingParent,
    PermissionDenied,
    /// Something appeared at the path between the existence check and the call
    AlreadyExists,
    /// Directory still has entries
    NotEmpty,
    /// A path component is not a directory
    NotADirectory,
    Other,
}

impl From<io::ErrorKind> for FsFailure {
    fn from(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::NotFound => FsFailure::MissingParent,
            io::ErrorKind::PermissionDenied => FsFailure::PermissionDenied,
            io::ErrorKind::AlreadyExists => FsFailure::AlreadyExists,
            io::ErrorKind::DirectoryNotEmpty => FsFailure::NotEmpty,
            io::ErrorKind::NotADirectory => FsFailure::NotADirectory,
            _ => FsFailure::Other,
        }
    }
}

impl FsFailure {
    fn ex_kind(self) -> ExErrorKind {
        match self {
            FsFailure::MissingParent => ExErrorKind::NotFound,
            FsFailure::PermissionDenied => ExErrorKind::PermissionDenied,
            FsFailure::AlreadyExists => ExErrorKind::AlreadyExists,
            FsFailure::NotEmpty => ExErrorKind::NotEmpty,
            FsFailure::NotADirectory => ExErrorKind::NotADirectory,
            FsFailure::Other => ExErrorKind::Io,
        }
    }
}

/// Error taxonomy for undox operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum UndoxError {
    // ===== Shared State Usage Errors =====
    /// Field name was already registered in this run
    #[error("Field {field} already exists in shared state")]
    DuplicateField { field: String },

    /// Field name was never registered in this run
    #[error("Field {field} is not registered in shared state")]
    FieldNotRegistered { field: String },

    /// Stored value does not have the shape the caller asked for
    #[error("Value at {field}.{key} is not {expected}")]
    UnexpectedValueType {
        field: String,
        key: String,
        expected: &'static str,
    },

    // ===== Filesystem Errors =====
    /// Directory creation failed
    #[error("Failed to create directory {}: {message}", .path.display())]
    CreateDirFailed {
        path: PathBuf,
        failure: FsFailure,
        message: String,
    },

    /// Directory removal failed
    #[error("Failed to remove directory {}: {message}", .path.display())]
    RemoveDirFailed {
        path: PathBuf,
        failure: FsFailure,
        message: String,
    },

    // ===== Encoding Errors =====
    /// A value could not be converted to or from JSON
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl UndoxError {
    /// Build a `CreateDirFailed` from the underlying io error
    pub fn create_dir(path: &Path, err: &io::Error) -> Self {
        UndoxError::CreateDirFailed {
            path: path.to_path_buf(),
            failure: err.kind().into(),
            message: err.to_string(),
        }
    }

    /// Build a `RemoveDirFailed` from the underlying io error
    pub fn remove_dir(path: &Path, err: &io::Error) -> Self {
        UndoxError::RemoveDirFailed {
            path: path.to_path_buf(),
            failure: err.kind().into(),
            message: err.to_string(),
        }
    }

    /// Filesystem failure tag, if this is a filesystem error
    pub fn fs_failure(&self) -> Option<FsFailure> {
        match self {
            UndoxError::CreateDirFailed { failure, .. }
            | UndoxError::RemoveDirFailed { failure, .. } => Some(*failure),
            _ => None,
        }
    }

    /// Whether this is a caller usage error (as opposed to an environment failure)
    pub fn is_usage_error(&self) -> bool {
        matches!(
            self,
            UndoxError::DuplicateField { .. }
                | UndoxError::FieldNotRegistered { .. }
                | UndoxError::UnexpectedValueType { .. }
        )
    }
}

/// Conversion from UndoxError to the structured ExError
impl From<UndoxError> for ExError {
    fn from(err: UndoxError) -> Self {
        match err {
            UndoxError::DuplicateField { field } => ExError::new(ExErrorKind::DuplicateField)
                .with_op("register_field")
                .with_field(field)
                .with_message("Field already exists in shared state"),

            UndoxError::FieldNotRegistered { field } => ExError::new(ExErrorKind::FieldNotFound)
                .with_op("attach_field")
                .with_field(field)
                .with_message("Field is not registered in shared state"),

            UndoxError::UnexpectedValueType {
                field,
                key,
                expected,
            } => ExError::new(ExErrorKind::TypeMismatch)
                .with_field(field)
                .with_message(format!("Value at key '{}' is not {}", key, expected)),

            UndoxError::CreateDirFailed {
                path,
                failure,
                message,
            } => ExError::new(failure.ex_kind())
                .with_op("create_dir")
                .with_path(path)
                .with_message(message),

            UndoxError::RemoveDirFailed {
                path,
                failure,
                message,
            } => ExError::new(failure.ex_kind())
                .with_op("remove_dir")
                .with_path(path)
                .with_message(message),

            UndoxError::Serialization { message } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

/// Conversion from serde_json::Error to UndoxError
impl From<serde_json::Error> for UndoxError {
    fn from(err: serde_json::Error) -> Self {
        UndoxError::Serialization {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_failure_from_io_kind() {
        let cases = [
            (io::ErrorKind::NotFound, FsFailure::MissingParent),
            (io::ErrorKind::PermissionDenied, FsFailure::PermissionDenied),
            (io::ErrorKind::AlreadyExists, FsFailure::AlreadyExists),
            (io::ErrorKind::DirectoryNotEmpty, FsFailure::NotEmpty),
            (io::ErrorKind::NotADirectory, FsFailure::NotADirectory),
            (io::ErrorKind::Interrupted, FsFailure::Other),
        ];
        for (kind, expected) in cases {
            assert_eq!(FsFailure::from(kind), expected, "Wrong tag for {:?}", kind);
        }
    }

    #[test]
    fn test_create_dir_error_keeps_tag_and_path() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "no such parent");
        let err = UndoxError::create_dir(Path::new("/missing/child"), &io_err);

        assert_eq!(err.fs_failure(), Some(FsFailure::MissingParent));
        assert!(!err.is_usage_error());

        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::NotFound);
        assert_eq!(ex.op(), Some("create_dir"));
        assert_eq!(ex.path(), Some(Path::new("/missing/child")));
    }

    #[test]
    fn test_usage_errors_have_no_fs_failure() {
        let err = UndoxError::DuplicateField {
            field: "MakeDirs".to_string(),
        };
        assert!(err.is_usage_error());
        assert_eq!(err.fs_failure(), None);
    }

    #[test]
    fn test_ex_error_display_includes_context() {
        let err = ExError::new(ExErrorKind::NotEmpty)
            .with_op("remove_dir")
            .with_path("/tmp/a")
            .with_message("Directory not empty");
        let rendered = err.to_string();

        assert!(rendered.starts_with("[ERR_NOT_EMPTY]"));
        assert!(rendered.contains("remove_dir"));
        assert!(rendered.contains("/tmp/a"));
    }

    #[test]
    fn test_ex_error_source_chain() {
        let inner = ExError::new(ExErrorKind::Io).with_message("disk gone");
        let outer = ExError::new(ExErrorKind::NotFound).with_source(inner);

        assert_eq!(
            outer.source_error().map(|e| e.kind()),
            Some(ExErrorKind::Io)
        );
        assert!(std::error::Error::source(&outer).is_some());
    }
}
