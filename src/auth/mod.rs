pub mod guard;
pub mod session;
pub mod user;

pub use guard::*;
pub use session::*;
pub use user::*;
