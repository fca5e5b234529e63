use thiserror::Error;

/// Everything an intent can fail with. All of these are recoverable: the
/// orchestrator turns them into a notice and the session carries on.
#[derive(Debug, Error)]
pub enum SpellError {
    #[error("word list \"{0}\" is empty")]
    EmptyList(String),
    #[error("no word to check")]
    NoActiveWord,
    #[error("a list named \"{0}\" already exists")]
    DuplicateName(String),
    #[error("\"{0}\" is the name of a built-in list")]
    ReservedName(String),
    #[error("built-in list \"{0}\" cannot be deleted")]
    NotDeletable(String),
    #[error("only built-in lists can be reset, \"{0}\" is a custom list")]
    NotResettable(String),
    #[error("{0} is not available")]
    CapabilityUnavailable(String),
    #[error("unknown word list \"{0}\"")]
    UnknownList(String),
    #[error("list name cannot be blank")]
    BlankName,
    #[error("{0} is not supported in single-list mode")]
    Unsupported(&'static str),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed data: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, SpellError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_list() {
        assert_eq!(
            SpellError::NotDeletable("grade1".into()).to_string(),
            "built-in list \"grade1\" cannot be deleted"
        );
        assert_eq!(
            SpellError::EmptyList("mine".into()).to_string(),
            "word list \"mine\" is empty"
        );
    }

    #[test]
    fn io_errors_convert() {
        let err: SpellError = std::io::Error::new(std::io::ErrorKind::Other, "disk").into();
        assert!(matches!(err, SpellError::Io(_)));
    }
}
