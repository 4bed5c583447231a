pub mod chat;
pub mod composer;
pub mod providers;
pub mod scorer;
pub mod selector;
