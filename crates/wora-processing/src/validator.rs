use wora_core::AppError;

/// Upload request validation errors
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    #[error("Empty file")]
    EmptyFile,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::FileTooLarge { size, max } => AppError::FileTooLarge { size, max },
            ValidationError::InvalidFilename(_)
            | ValidationError::InvalidFolder(_)
            | ValidationError::EmptyFile => AppError::InvalidInput(err.to_string()),
        }
    }
}

/// Upload request validator
///
/// Checks what can be checked before the body is decoded: declared size,
/// emptiness and the client filename.
#[derive(Debug, Clone, Copy)]
pub struct UploadValidator {
    max_file_size: u64,
}

impl UploadValidator {
    pub fn new(max_file_size: u64) -> Self {
        Self { max_file_size }
    }

    pub fn max_file_size(&self) -> u64 {
        self.max_file_size
    }

    /// Validate the size declared by the client, before any bytes are read
    pub fn validate_declared_size(&self, size: u64) -> Result<(), ValidationError> {
        if size > self.max_file_size {
            return Err(ValidationError::FileTooLarge {
                size,
                max: self.max_file_size,
            });
        }
        Ok(())
    }

    /// Validate the received body
    pub fn validate_body(&self, data: &[u8]) -> Result<(), ValidationError> {
        if data.is_empty() {
            return Err(ValidationError::EmptyFile);
        }
        self.validate_declared_size(data.len() as u64)
    }

    /// Validate the client filename
    pub fn validate_filename(&self, filename: &str) -> Result<(), ValidationError> {
        if filename.trim().is_empty() {
            return Err(ValidationError::InvalidFilename(
                "filename must not be empty".to_string(),
            ));
        }
        if filename.contains('\0') {
            return Err(ValidationError::InvalidFilename(
                "filename contains a NUL byte".to_string(),
            ));
        }
        Ok(())
    }
}
