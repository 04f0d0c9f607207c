pub mod fiscal_store;
pub use fiscal_store::FiscalStore;
pub mod fiscal_repo;
pub use fiscal_repo::FiscalRepository;

#[cfg(test)]
pub mod memory_store;
