use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Storage backend types
///
/// Selected with `STORAGE_BACKEND`. `S3` covers every S3-compatible provider
/// (AWS, Cloudflare R2, MinIO); `Local` writes under a directory and is meant
/// for development.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    S3,
    Local,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s3" | "r2" => Ok(StorageBackend::S3),
            "local" => Ok(StorageBackend::Local),
            _ => Err(anyhow::anyhow!("Invalid storage backend: {}", s)),
        }
    }
}

impl Display for StorageBackend {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            StorageBackend::S3 => write!(f, "s3"),
            StorageBackend::Local => write!(f, "local"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_backend() {
        assert_eq!("s3".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!("R2".parse::<StorageBackend>().unwrap(), StorageBackend::S3);
        assert_eq!(
            "local".parse::<StorageBackend>().unwrap(),
            StorageBackend::Local
        );
        assert!("nfs".parse::<StorageBackend>().is_err());
    }

    #[test]
    fn test_display_roundtrips_through_parse() {
        for backend in [StorageBackend::S3, StorageBackend::Local] {
            assert_eq!(backend.to_string().parse::<StorageBackend>().unwrap(), backend);
        }
    }
}
