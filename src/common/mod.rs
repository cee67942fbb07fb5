pub mod documento;
pub mod error;
pub mod i18n;
