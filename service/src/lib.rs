pub mod error;
pub mod settings_service;
pub mod uninstall_service;
