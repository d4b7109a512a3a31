pub mod camera_manager;
pub mod coordinator;
pub(crate) mod decode_worker;
pub mod negotiator;

#[cfg(test)]
pub(crate) mod test_support;
