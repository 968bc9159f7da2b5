//! Interceptação do fim do arraste
//!
//! Decide se a transição pode seguir direto para o executor ou se precisa
//! antes do diálogo de venda (etapa de fechamento). Máquina de estados por gesto:
//!
//! ```text
//! Idle --drag end--> Persisting                 (etapa comum ou reordenação na coluna)
//! Idle --drag end--> AwaitingSaleInput          (etapa de fechamento)
//! AwaitingSaleInput --confirm válido--> Persisting
//! AwaitingSaleInput --cancel--> Idle            (nada é aplicado)
//! Persisting --finish--> Idle
//! ```

use crate::board::BoardState;
use crate::dialog::SaleDialog;
use crate::error::SaleConfirmError;
use crate::types::{Product, SaleData};

/// Resultado do drag-and-drop como entregue pela UI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DragResult {
    pub client_id: String,
    pub source_stage_id: String,
    pub source_index: usize,
    pub dest_stage_id: String,
    pub dest_index: usize,
}

/// Transição já decidida, pronta para o executor
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMove {
    pub client_id: String,
    pub source_stage_id: String,
    pub dest_stage_id: String,
    pub dest_index: usize,
    pub sale: Option<SaleData>,
}

impl PendingMove {
    fn from_drag(drag: DragResult) -> Self {
        Self {
            client_id: drag.client_id,
            source_stage_id: drag.source_stage_id,
            dest_stage_id: drag.dest_stage_id,
            dest_index: drag.dest_index,
            sale: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DragDecision {
    /// Nada a fazer
    Noop,
    /// Etapa comum ou reordenação na mesma coluna: segue direto para o executor
    Proceed(PendingMove),
    /// Etapa de fechamento: diálogo de venda aberto, transição suspensa
    AwaitSale,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum TransitionState {
    #[default]
    Idle,
    AwaitingSaleInput {
        pending: PendingMove,
        dialog: SaleDialog,
    },
    Persisting {
        pending: PendingMove,
    },
}

#[derive(Debug, Default)]
pub struct TransitionInterceptor {
    state: TransitionState,
}

impl TransitionInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, TransitionState::Idle)
    }

    /// Avalia o fim do arraste contra os metadados da coluna de destino
    pub fn on_drag_end(
        &mut self,
        board: &BoardState,
        drag: DragResult,
        catalog: &[Product],
    ) -> DragDecision {
        if !self.is_idle() {
            tracing::warn!(
                "⚠️ Arraste de {} ignorado: transição anterior ainda pendente",
                drag.client_id
            );
            return DragDecision::Noop;
        }

        let same_stage = drag.source_stage_id == drag.dest_stage_id;
        if same_stage && drag.source_index == drag.dest_index {
            return DragDecision::Noop;
        }

        let Some(dest) = board.stage(&drag.dest_stage_id) else {
            tracing::warn!("⚠️ Etapa de destino {} não está no quadro", drag.dest_stage_id);
            return DragDecision::Noop;
        };

        let pending = PendingMove::from_drag(drag);

        // o cliente já está na etapa de fechamento: reordenar não registra nova venda
        if dest.is_closing && !same_stage {
            tracing::debug!(
                "Etapa '{}' é de fechamento, aguardando dados da venda de {}",
                dest.name,
                pending.client_id
            );
            self.state = TransitionState::AwaitingSaleInput {
                pending,
                dialog: SaleDialog::open(catalog.to_vec()),
            };
            DragDecision::AwaitSale
        } else {
            self.state = TransitionState::Persisting {
                pending: pending.clone(),
            };
            DragDecision::Proceed(pending)
        }
    }

    /// Diálogo aberto, se houver uma transição suspensa
    pub fn dialog_mut(&mut self) -> Option<&mut SaleDialog> {
        match &mut self.state {
            TransitionState::AwaitingSaleInput { dialog, .. } => Some(dialog),
            _ => None,
        }
    }

    /// Confirma o diálogo. Com campos válidos a transição retoma com a venda
    /// anexada; com erros o diálogo continua aberto.
    pub fn confirm_sale(&mut self) -> Result<PendingMove, SaleConfirmError> {
        let TransitionState::AwaitingSaleInput { pending, dialog } = &mut self.state else {
            return Err(SaleConfirmError::NoPendingSale);
        };

        let sale = dialog.confirm().map_err(SaleConfirmError::InvalidFields)?;
        let mut pending = pending.clone();
        pending.sale = Some(sale);

        self.state = TransitionState::Persisting {
            pending: pending.clone(),
        };
        Ok(pending)
    }

    /// Descarta a transição suspensa sem tocar no quadro
    pub fn cancel_sale(&mut self) -> Option<PendingMove> {
        match std::mem::take(&mut self.state) {
            TransitionState::AwaitingSaleInput { pending, .. } => {
                tracing::debug!("Venda cancelada, transição de {} descartada", pending.client_id);
                Some(pending)
            }
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Executor terminou (com sucesso ou não)
    pub fn finish(&mut self) {
        self.state = TransitionState::Idle;
    }
}
