pub mod auth;
pub mod nfe_import_service;
pub mod supplier_service;
