pub mod order;
pub mod queue;
pub mod rider;

#[cfg(test)]
pub(crate) mod fixtures;
