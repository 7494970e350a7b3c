use std::fmt;

use super::param::MessageParam;
use crate::error::{Error, Result};

/// One fire-and-forget command: call `method` on the runtime-side object
/// named `object`, with at most one primitive argument.
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    object: String,
    method: String,
    param: MessageParam,
}

impl Message {
    pub fn new(
        object: impl Into<String>,
        method: impl Into<String>,
        param: impl Into<MessageParam>,
    ) -> Result<Self> {
        let object = object.into();
        let method = method.into();
        let param = param.into();

        if object.is_empty() {
            return Err(Error::InvalidMessage("object name is empty".into()));
        }
        if method.is_empty() {
            return Err(Error::InvalidMessage(format!("method name for `{object}` is empty")));
        }
        if let MessageParam::Num(n) = param
            && !n.is_finite()
        {
            return Err(Error::InvalidMessage(format!(
                "{object}.{method}: numeric parameter must be finite, got {n}"
            )));
        }
        Ok(Self { object, method, param })
    }

    pub fn object(&self) -> &str {
        &self.object
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn param(&self) -> &MessageParam {
        &self.param
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}({})", self.object, self.method, self.param)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_from_primitives() {
        let jump = Message::new("Player", "Jump", 3).unwrap();
        assert_eq!(jump.param(), &MessageParam::Num(3.0));
        assert_eq!(jump.to_string(), "Player.Jump(3)");

        let say = Message::new("Hud", "Say", "hi").unwrap();
        assert_eq!(say.to_string(), "Hud.Say(\"hi\")");

        let pause = Message::new("Game", "Pause", None::<bool>).unwrap();
        assert!(pause.param().is_none());
        assert_eq!(pause.to_string(), "Game.Pause()");
    }

    #[test]
    fn rejects_empty_names() {
        assert!(matches!(
            Message::new("", "Jump", MessageParam::None),
            Err(Error::InvalidMessage(_))
        ));
        assert!(matches!(
            Message::new("Player", "", MessageParam::None),
            Err(Error::InvalidMessage(_))
        ));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert!(Message::new("Player", "Jump", f64::NAN).is_err());
        assert!(Message::new("Player", "Jump", f64::NEG_INFINITY).is_err());
    }
}
