pub mod message;
pub mod param;

pub use message::Message;
pub use param::MessageParam;
