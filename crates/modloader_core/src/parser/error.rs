use std::error::Error;
use std::fmt::{Display, Formatter};

pub type DescriptorResult<T> = Result<T, DescriptorError>;

/// Fatal descriptor problems; the module must not be loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptorError {
    InvalidEncoding(String),
    MalformedDocument(String),
    UnexpectedRoot(String),
    MissingConfigVersion,
    UnsupportedConfigVersion(String),
    MissingField(&'static str),
    MultipleConditionalResources(usize),
    UnexpectedConditionalResourceTag(String),
    UnexpectedConditionalResourceChild(String),
    BlankConditionalResourcePath,
    UnexpectedModulesChild(String),
    IncompleteModuleRequirement(&'static str),
}

impl Display for DescriptorError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidEncoding(reason) => write!(f, "descriptor is not valid UTF-8: {reason}"),
            Self::MalformedDocument(reason) => write!(f, "descriptor is not well-formed: {reason}"),
            Self::UnexpectedRoot(tag) => {
                write!(f, "descriptor root must be <module>, found <{tag}>")
            }
            Self::MissingConfigVersion => write!(f, "descriptor is missing configVersion"),
            Self::UnsupportedConfigVersion(value) => {
                write!(f, "descriptor configVersion is unsupported: {value}")
            }
            Self::MissingField(name) => write!(f, "descriptor missing required field: {name}"),
            Self::MultipleConditionalResources(count) => write!(
                f,
                "found {count} conditionalResources tags; at most one is allowed"
            ),
            Self::UnexpectedConditionalResourceTag(tag) => write!(
                f,
                "conditionalResources may only contain conditionalResource tags, found <{tag}>"
            ),
            Self::UnexpectedConditionalResourceChild(tag) => {
                write!(f, "conditionalResource contains unknown tag <{tag}>")
            }
            Self::BlankConditionalResourcePath => {
                write!(f, "conditionalResource path must not be blank")
            }
            Self::UnexpectedModulesChild(tag) => write!(
                f,
                "conditionalResource modules may only contain module tags, found <{tag}>"
            ),
            Self::IncompleteModuleRequirement(field) => {
                write!(f, "conditionalResource module is missing {field}")
            }
        }
    }
}

impl Error for DescriptorError {}

impl From<std::str::Utf8Error> for DescriptorError {
    fn from(value: std::str::Utf8Error) -> Self {
        Self::InvalidEncoding(value.to_string())
    }
}

impl From<roxmltree::Error> for DescriptorError {
    fn from(value: roxmltree::Error) -> Self {
        Self::MalformedDocument(value.to_string())
    }
}
