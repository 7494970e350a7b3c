use std::fmt;

/// The only payloads the runtime's command channel carries.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MessageParam {
    #[default]
    None,
    Str(String),
    Num(f64),
    Bool(bool),
}

impl MessageParam {
    pub fn is_none(&self) -> bool {
        matches!(self, MessageParam::None)
    }
}

impl From<&str> for MessageParam {
    fn from(value: &str) -> Self {
        MessageParam::Str(value.to_string())
    }
}

impl From<String> for MessageParam {
    fn from(value: String) -> Self {
        MessageParam::Str(value)
    }
}

impl From<f64> for MessageParam {
    fn from(value: f64) -> Self {
        MessageParam::Num(value)
    }
}

impl From<i32> for MessageParam {
    fn from(value: i32) -> Self {
        MessageParam::Num(value.into())
    }
}

impl From<bool> for MessageParam {
    fn from(value: bool) -> Self {
        MessageParam::Bool(value)
    }
}

impl<T: Into<MessageParam>> From<Option<T>> for MessageParam {
    fn from(value: Option<T>) -> Self {
        value.map_or(MessageParam::None, Into::into)
    }
}

impl fmt::Display for MessageParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageParam::None => Ok(()),
            MessageParam::Str(s) => write!(f, "{s:?}"),
            MessageParam::Num(n) => write!(f, "{n}"),
            MessageParam::Bool(b) => write!(f, "{b}"),
        }
    }
}
