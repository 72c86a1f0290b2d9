pub mod battery;
pub mod boundary;
pub mod device;
pub mod distributions;
pub mod error;
pub mod payload;
pub mod records;
pub mod scenario;
pub mod service_day;
pub mod spatial;
pub mod trip;
pub mod validate;
pub mod version;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
