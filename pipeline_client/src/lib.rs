//! Cliente do pipeline de vendas (quadro kanban)
//!
//! Este crate contém a metade "lado cliente" do fluxo de transição de etapas:
//!
//! - **board**: cache do quadro com movimentação otimista e recarga completa
//! - **interceptor**: decide no fim do arraste se a transição precisa de venda
//! - **dialog**: diálogo de captura de venda com validação por campo
//! - **executor**: aplica a transição, persiste e reverte em caso de falha
//! - **api**: cliente HTTP do servidor do CRM
//!
//! Os tipos em [`types`] definem o formato JSON compartilhado com o servidor.
//!
//! # Exemplo Básico
//!
//! ```rust,ignore
//! use pipeline_client::{HttpPipelineApi, PipelineController, DragResult};
//!
//! #[tokio::main]
//! async fn main() -> pipeline_client::Result<()> {
//!     let api = HttpPipelineApi::new("http://localhost:8080", "user-id")?;
//!     let catalog = api.list_products().await?;
//!
//!     let mut controller = PipelineController::new(api, catalog);
//!     controller.load().await?;
//!
//!     let outcome = controller.drag_end(DragResult {
//!         client_id: "c1".into(),
//!         source_stage_id: "s1".into(),
//!         source_index: 0,
//!         dest_stage_id: "s2".into(),
//!         dest_index: 0,
//!     }).await;
//!     println!("{:?}", outcome);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod board;
pub mod dialog;
pub mod error;
pub mod executor;
pub mod interceptor;
pub mod search;
pub mod types;

pub use api::{HttpPipelineApi, PipelineApi, SESSION_HEADER};
pub use board::{BoardState, BoardStore};
pub use dialog::{FieldErrors, SaleDialog};
pub use error::{ApiError, BoardError, Result, SaleConfirmError};
pub use executor::{DragOutcome, MoveExecutor, Notification, NotificationKind, PipelineController};
pub use interceptor::{DragDecision, DragResult, PendingMove, TransitionInterceptor, TransitionState};
pub use types::*;
