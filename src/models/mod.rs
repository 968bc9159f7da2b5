pub mod client;
pub mod interaction;
pub mod product;
pub mod stage;
pub mod user;

pub use client::*;
pub use interaction::*;
pub use product::*;
pub use stage::*;
pub use user::*;
