//! Executor de movimentação e controlador do quadro
//!
//! O executor aplica a transição já decidida: mexe no cache de forma
//! otimista, chama o endpoint de persistência e, se falhar, recarrega o
//! quadro do servidor. Não há retry; o usuário precisa arrastar de novo.

use crate::api::PipelineApi;
use crate::board::{BoardState, BoardStore};
use crate::dialog::SaleDialog;
use crate::error::{Result, SaleConfirmError};
use crate::interceptor::{DragDecision, DragResult, PendingMove, TransitionInterceptor};
use crate::types::{MoveRequest, Product};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// Mensagem exibida como toast depois da movimentação
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub message: String,
}

impl Notification {
    fn success(message: String) -> Self {
        Self {
            kind: NotificationKind::Success,
            message,
        }
    }

    fn error(message: String) -> Self {
        Self {
            kind: NotificationKind::Error,
            message,
        }
    }
}

pub struct MoveExecutor;

impl MoveExecutor {
    pub async fn execute<A: PipelineApi>(store: &mut BoardStore<A>, pending: &PendingMove) -> Notification {
        let client_name = store
            .state()
            .client(&pending.client_id)
            .map(|c| c.name.clone())
            .unwrap_or_else(|| pending.client_id.clone());
        let stage_name = store
            .state()
            .stage(&pending.dest_stage_id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| pending.dest_stage_id.clone());

        if let Err(e) = store.state_mut().apply_move(
            &pending.client_id,
            &pending.source_stage_id,
            &pending.dest_stage_id,
            pending.dest_index,
        ) {
            tracing::warn!("⚠️ Movimentação otimista recusada: {}", e);
            return Notification::error(format!("Não foi possível mover {}: {}", client_name, e));
        }

        let request = MoveRequest {
            client_id: pending.client_id.clone(),
            new_stage_id: pending.dest_stage_id.clone(),
            sale_data: pending.sale.clone(),
        };

        match store.api().move_client(&request).await {
            Ok(_) => {
                tracing::info!("✅ Cliente {} movido para '{}'", pending.client_id, stage_name);
                match &pending.sale {
                    Some(sale) => Notification::success(format!(
                        "Venda de {} registrada! Cliente movido para {}",
                        format_brl(sale.sale_value),
                        stage_name
                    )),
                    None => Notification::success(format!("{} movido para {}", client_name, stage_name)),
                }
            }
            Err(e) => {
                tracing::error!("❌ Falha ao mover cliente {}: {}", pending.client_id, e);
                if let Err(reload_err) = store.rollback().await {
                    tracing::error!("❌ Falha ao recarregar o quadro após erro: {}", reload_err);
                }
                Notification::error(format!(
                    "Erro ao mover {}. A alteração foi revertida.",
                    client_name
                ))
            }
        }
    }
}

/// Formata valores em reais: 1234.5 → "R$ 1.234,50"
pub fn format_brl(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let int_part = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, cents % 100)
}

/// Resultado de um gesto de arraste do ponto de vista da UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    Ignored,
    AwaitingSale,
    Completed(Notification),
}

/// Liga interceptador, diálogo e executor sobre um único quadro
pub struct PipelineController<A> {
    store: BoardStore<A>,
    interceptor: TransitionInterceptor,
    catalog: Vec<Product>,
}

impl<A: PipelineApi> PipelineController<A> {
    pub fn new(api: A, catalog: Vec<Product>) -> Self {
        Self {
            store: BoardStore::new(api),
            interceptor: TransitionInterceptor::new(),
            catalog,
        }
    }

    pub async fn load(&mut self) -> Result<()> {
        self.store.load().await
    }

    pub fn board(&self) -> &BoardState {
        self.store.state()
    }

    pub fn interceptor(&self) -> &TransitionInterceptor {
        &self.interceptor
    }

    pub fn dialog_mut(&mut self) -> Option<&mut SaleDialog> {
        self.interceptor.dialog_mut()
    }

    pub async fn drag_end(&mut self, drag: DragResult) -> DragOutcome {
        match self.interceptor.on_drag_end(self.store.state(), drag, &self.catalog) {
            DragDecision::Noop => DragOutcome::Ignored,
            DragDecision::AwaitSale => DragOutcome::AwaitingSale,
            DragDecision::Proceed(pending) => {
                let notification = MoveExecutor::execute(&mut self.store, &pending).await;
                self.interceptor.finish();
                DragOutcome::Completed(notification)
            }
        }
    }

    /// Confirma a venda; com erros de campo nada é enviado e o diálogo segue aberto
    pub async fn confirm_sale(&mut self) -> std::result::Result<Notification, SaleConfirmError> {
        let pending = self.interceptor.confirm_sale()?;
        let notification = MoveExecutor::execute(&mut self.store, &pending).await;
        self.interceptor.finish();
        Ok(notification)
    }

    pub fn cancel_sale(&mut self) {
        self.interceptor.cancel_sale();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::fixtures::sample_board;
    use crate::error::ApiError;
    use crate::types::{MoveResponse, MovedClient, StageColumn, StageSummary};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    /// API falsa: devolve um quadro fixo e registra as movimentações recebidas
    #[derive(Clone)]
    struct FakeApi {
        board: Arc<Mutex<Vec<StageColumn>>>,
        moves: Arc<Mutex<Vec<MoveRequest>>>,
        fetches: Arc<Mutex<usize>>,
        fail_moves: bool,
    }

    impl FakeApi {
        fn new(fail_moves: bool) -> Self {
            Self {
                board: Arc::new(Mutex::new(sample_board())),
                moves: Arc::new(Mutex::new(Vec::new())),
                fetches: Arc::new(Mutex::new(0)),
                fail_moves,
            }
        }

        fn moves(&self) -> Vec<MoveRequest> {
            self.moves.lock().unwrap().clone()
        }

        fn fetches(&self) -> usize {
            *self.fetches.lock().unwrap()
        }
    }

    #[async_trait]
    impl PipelineApi for FakeApi {
        async fn fetch_board(&self) -> Result<Vec<StageColumn>> {
            *self.fetches.lock().unwrap() += 1;
            Ok(self.board.lock().unwrap().clone())
        }

        async fn move_client(&self, request: &MoveRequest) -> Result<MoveResponse> {
            self.moves.lock().unwrap().push(request.clone());
            if self.fail_moves {
                return Err(ApiError::Status {
                    status: 500,
                    message: "Internal error".to_string(),
                });
            }

            let mut board = self.board.lock().unwrap();
            let mut state = BoardState::new(board.clone());
            let (source, _) = state.locate(&request.client_id).unwrap();
            let source = source.to_string();
            state
                .apply_move(&request.client_id, &source, &request.new_stage_id, 0)
                .unwrap();
            *board = state.stages().to_vec();

            let card = state.client(&request.client_id).unwrap().clone();
            let stage = state.stage(&request.new_stage_id).unwrap();
            Ok(MoveResponse {
                success: true,
                client: MovedClient {
                    card,
                    stage: StageSummary {
                        id: stage.id.clone(),
                        name: stage.name.clone(),
                        color: stage.color.clone(),
                        is_closing: stage.is_closing,
                    },
                },
            })
        }
    }

    fn drag(client: &str, from: &str, from_idx: usize, to: &str, to_idx: usize) -> DragResult {
        DragResult {
            client_id: client.to_string(),
            source_stage_id: from.to_string(),
            source_index: from_idx,
            dest_stage_id: to.to_string(),
            dest_index: to_idx,
        }
    }

    fn catalog() -> Vec<Product> {
        vec![Product {
            id: "P1".to_string(),
            name: "Plano Pro".to_string(),
            code: Some("PRO".to_string()),
            price: 250.0,
        }]
    }

    async fn loaded(api: FakeApi) -> PipelineController<FakeApi> {
        let mut controller = PipelineController::new(api, catalog());
        controller.load().await.unwrap();
        controller
    }

    #[tokio::test]
    async fn test_noop_drag_makes_no_calls() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;
        let before = controller.board().clone();

        let outcome = controller.drag_end(drag("c1", "s1", 0, "s1", 0)).await;

        assert_eq!(outcome, DragOutcome::Ignored);
        assert!(api.moves().is_empty());
        assert_eq!(api.fetches(), 1);
        assert_eq!(controller.board(), &before);
    }

    #[tokio::test]
    async fn test_plain_move_posts_without_sale() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;

        let outcome = controller.drag_end(drag("c1", "s1", 0, "s2", 0)).await;

        let moves = api.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].new_stage_id, "s2");
        assert!(moves[0].sale_data.is_none());
        match outcome {
            DragOutcome::Completed(n) => {
                assert_eq!(n.kind, NotificationKind::Success);
                assert!(n.message.contains("Negociação"));
                assert!(n.message.contains("Cliente c1"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(controller.board().locate("c1"), Some(("s2", 0)));
        assert!(controller.interceptor().is_idle());
    }

    #[tokio::test]
    async fn test_closing_move_waits_for_dialog_and_cancel_restores_nothing() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;
        let snapshot = controller.board().clone();

        let outcome = controller.drag_end(drag("c1", "s1", 0, "s3", 0)).await;
        assert_eq!(outcome, DragOutcome::AwaitingSale);
        assert_eq!(controller.board(), &snapshot);

        controller.cancel_sale();

        assert_eq!(controller.board(), &snapshot);
        assert!(api.moves().is_empty());
        assert!(controller.interceptor().is_idle());
    }

    #[tokio::test]
    async fn test_invalid_sale_is_not_sent() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;
        let snapshot = controller.board().clone();

        controller.drag_end(drag("c1", "s1", 0, "s3", 0)).await;
        let dialog = controller.dialog_mut().unwrap();
        dialog.select_product("P1");
        dialog.set_quantity("1");
        dialog.set_sale_value("0");

        let error = controller.confirm_sale().await.unwrap_err();
        assert!(error.field_errors().unwrap().sale_value.is_some());
        assert!(api.moves().is_empty());
        assert_eq!(controller.board(), &snapshot);
        assert!(controller.dialog_mut().is_some());
    }

    #[tokio::test]
    async fn test_confirmed_sale_is_sent_with_payload() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;

        controller.drag_end(drag("c1", "s1", 0, "s3", 0)).await;
        let dialog = controller.dialog_mut().unwrap();
        dialog.set_query("pro");
        dialog.select_product("P1");
        dialog.set_quantity("2");
        dialog.set_sale_value("500");

        let notification = controller.confirm_sale().await.unwrap();

        assert_eq!(notification.kind, NotificationKind::Success);
        assert!(notification.message.contains("R$ 500,00"));
        assert!(notification.message.contains("Fechado"));

        let moves = api.moves();
        assert_eq!(moves.len(), 1);
        let sale = moves[0].sale_data.as_ref().unwrap();
        assert_eq!(sale.product_id, "P1");
        assert_eq!(sale.quantity, 2);
        assert_eq!(sale.sale_value, 500.0);
        assert_eq!(controller.board().locate("c1"), Some(("s3", 0)));
    }

    #[tokio::test]
    async fn test_failed_move_rolls_back_to_server_state() {
        let api = FakeApi::new(true);
        let mut controller = loaded(api.clone()).await;

        let outcome = controller.drag_end(drag("c2", "s1", 1, "s2", 0)).await;

        match outcome {
            DragOutcome::Completed(n) => {
                assert_eq!(n.kind, NotificationKind::Error);
                assert!(n.message.contains("revertida"));
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(api.fetches(), 2);
        assert_eq!(controller.board(), &BoardState::new(sample_board()));
        assert!(controller.board().check_invariant());
    }

    #[tokio::test]
    async fn test_reorder_is_persisted_as_plain_move() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;

        let outcome = controller.drag_end(drag("c1", "s1", 0, "s1", 1)).await;

        let moves = api.moves();
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].new_stage_id, "s1");
        assert!(moves[0].sale_data.is_none());
        assert!(matches!(outcome, DragOutcome::Completed(ref n) if n.kind == NotificationKind::Success));
        assert_eq!(controller.board().locate("c1"), Some(("s1", 1)));
        assert!(controller.interceptor().is_idle());
    }

    #[tokio::test]
    async fn test_confirm_without_dialog_sends_nothing() {
        let api = FakeApi::new(false);
        let mut controller = loaded(api.clone()).await;

        let error = controller.confirm_sale().await.unwrap_err();

        assert_eq!(error, SaleConfirmError::NoPendingSale);
        assert!(api.moves().is_empty());
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(500.0), "R$ 500,00");
        assert_eq!(format_brl(1234.5), "R$ 1.234,50");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-12.5), "-R$ 12,50");
    }
}
