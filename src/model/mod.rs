pub mod category;
pub mod payload;
pub mod record;
pub mod session;

pub use category::*;
pub use payload::*;
pub use record::*;
pub use session::*;
