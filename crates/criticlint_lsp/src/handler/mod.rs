//! LSP request/notification handlers.

mod configuration;
mod documents;
mod files;
mod initialize;

pub use configuration::handle_did_change_configuration;
pub use documents::{handle_did_close, handle_did_open, handle_did_save};
pub use files::handle_did_change_watched_files;
pub use initialize::{handle_initialize, handle_initialized, handle_shutdown};
