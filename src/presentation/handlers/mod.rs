mod chat;
mod export;
mod health;
mod transcribe;

pub use chat::{chat_handler, refine_handler};
pub use export::export_handler;
pub use health::health_handler;
pub use transcribe::transcribe_handler;
