use boopblur_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_convert() {
        let err: ClientError = StoreError::NoDataDir.into();
        assert!(matches!(err, ClientError::Store(StoreError::NoDataDir)));
        assert_eq!(
            err.to_string(),
            "Store error: Could not determine application data directory"
        );
    }

    #[test]
    fn test_json_errors_convert() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err: ClientError = json_err.into();
        assert!(matches!(err, ClientError::Serialization(_)));
    }
}
