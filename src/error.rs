use crate::models::Edition;

#[derive(Debug, thiserror::Error)]
pub enum ComposeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Missing <{0}> root element")]
    MissingRoot(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Edition mismatch: renderer expects {expected}, card is {found}")]
    EditionMismatch { expected: Edition, found: Edition },
}

pub type Result<T> = std::result::Result<T, ComposeError>;
