pub mod duration;
pub mod model;
pub mod signal;
pub mod supervisor;
pub mod transport;
pub mod worker;

pub use model::{Config, Outcome};
pub use signal::Signal;
pub use supervisor::Supervisor;
pub use transport::{HttpTransport, RequestError, Transport};
