pub mod error;
pub mod feedback;
pub mod intent;
pub mod matching;
pub mod resolved;
pub mod verdict;

pub use error::*;
pub use feedback::*;
pub use intent::*;
pub use matching::*;
pub use resolved::*;
pub use verdict::*;
