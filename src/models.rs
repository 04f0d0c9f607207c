pub mod auth;
pub mod fiscal;
pub mod nfe_import;
