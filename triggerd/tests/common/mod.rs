pub mod logging;
pub mod server;

pub use logging::init_test_logging;
pub use server::DaemonProcess;
