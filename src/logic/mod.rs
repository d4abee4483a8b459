pub mod radar;
pub mod refresh;
pub mod rules;
pub mod suitability;

pub use refresh::RefreshService;
pub use rules::AlertEngine;
