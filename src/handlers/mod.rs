// Handlers HTTP do pipeline de vendas
pub mod clients;
pub mod db_check;
pub mod health;
pub mod pipeline;
pub mod products;
pub mod reports;
pub mod stages;
pub mod users;

pub use clients::*;
pub use db_check::*;
pub use health::*;
pub use pipeline::*;
pub use products::*;
pub use reports::*;
pub use stages::*;
pub use users::*;
