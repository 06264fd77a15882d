pub mod service_container;
pub mod session;
pub mod traits;
pub mod vocab_service;

pub use service_container::ServiceContainer;
pub use session::{Session, SessionCommand, SessionSettings, parse_command};
pub use vocab_service::{AddOptions, AddOutcome, VocabService};
