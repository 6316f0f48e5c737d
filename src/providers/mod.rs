//! Provider implementations

pub mod console;
pub mod failed_queue;
pub mod local_buffer;
pub mod remote;

pub use console::{ConsoleFormat, ConsoleProvider, ConsoleStream, ConsoleWriter, StdConsole};
pub use failed_queue::FailedQueue;
pub use local_buffer::LocalBufferProvider;
pub use remote::{ProviderState, RemoteConfig, RemoteProvider, RemoteStats};

pub use crate::core::{Provider, ProviderCapabilities};
