pub mod store;

#[cfg(test)]
pub mod mem_store;
