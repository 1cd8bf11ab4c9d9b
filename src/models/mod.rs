pub mod card;
pub mod draw;
pub mod dynamic_enum;
pub mod fields;
pub mod layout;
pub mod session;

pub use card::*;
pub use draw::*;
pub use dynamic_enum::*;
pub use fields::*;
pub use layout::*;
pub use session::*;
