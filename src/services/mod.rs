pub mod clients;
pub mod error;
pub mod interactions;
pub mod pipeline;
pub mod products;
pub mod reports;
pub mod stages;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;

pub use clients::ClientService;
pub use error::{ServiceError, ServiceResult};
pub use interactions::InteractionService;
pub use pipeline::PipelineService;
pub use products::ProductService;
pub use reports::ReportService;
pub use stages::StageService;
pub use users::UserService;
