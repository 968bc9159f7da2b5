//! Cache do quadro (board) do pipeline
//!
//! Mantém a visão das etapas e seus clientes como recebida na última busca
//! completa. Movimentações otimistas mexem apenas neste cache; o servidor
//! continua sendo a única autoridade.
//!
//! Invariante: cada cliente aparece em exatamente uma coluna. `apply_move`
//! remove e depois insere, nunca copia.

use std::collections::HashSet;

use crate::api::PipelineApi;
use crate::error::{BoardError, Result};
use crate::types::{ClientCard, StageColumn};

/// Estado do quadro com as duas operações de escrita: `reset` e `apply_move`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoardState {
    stages: Vec<StageColumn>,
}

impl BoardState {
    pub fn new(stages: Vec<StageColumn>) -> Self {
        let mut state = Self::default();
        state.reset(stages);
        state
    }

    /// Substitui o quadro inteiro pela versão do servidor
    pub fn reset(&mut self, mut stages: Vec<StageColumn>) {
        stages.sort_by_key(|s| s.order);
        self.stages = stages;
    }

    pub fn stages(&self) -> &[StageColumn] {
        &self.stages
    }

    pub fn stage(&self, stage_id: &str) -> Option<&StageColumn> {
        self.stages.iter().find(|s| s.id == stage_id)
    }

    /// Retorna (id da etapa, posição) do cliente no quadro
    pub fn locate(&self, client_id: &str) -> Option<(&str, usize)> {
        self.stages.iter().find_map(|stage| {
            stage
                .clients
                .iter()
                .position(|c| c.id == client_id)
                .map(|idx| (stage.id.as_str(), idx))
        })
    }

    pub fn client(&self, client_id: &str) -> Option<&ClientCard> {
        self.stages
            .iter()
            .flat_map(|s| s.clients.iter())
            .find(|c| c.id == client_id)
    }

    /// Move o cliente da etapa de origem para a posição `dest_index` da etapa de destino
    ///
    /// Índices além do fim da coluna são ajustados para o final. Em caso de
    /// erro o estado não é alterado.
    pub fn apply_move(
        &mut self,
        client_id: &str,
        source_stage_id: &str,
        dest_stage_id: &str,
        dest_index: usize,
    ) -> std::result::Result<(), BoardError> {
        let source_idx = self
            .stage_index(source_stage_id)
            .ok_or_else(|| BoardError::StageNotFound(source_stage_id.to_string()))?;
        let dest_idx = self
            .stage_index(dest_stage_id)
            .ok_or_else(|| BoardError::StageNotFound(dest_stage_id.to_string()))?;

        let position = self.stages[source_idx]
            .clients
            .iter()
            .position(|c| c.id == client_id)
            .ok_or_else(|| BoardError::ClientNotInStage {
                client_id: client_id.to_string(),
                stage_id: source_stage_id.to_string(),
            })?;

        let mut card = self.stages[source_idx].clients.remove(position);
        card.stage_id = dest_stage_id.to_string();

        let dest = &mut self.stages[dest_idx].clients;
        let insert_at = dest_index.min(dest.len());
        dest.insert(insert_at, card);

        Ok(())
    }

    /// Verifica se nenhum cliente aparece em mais de uma coluna
    pub fn check_invariant(&self) -> bool {
        let mut seen = HashSet::new();
        self.stages
            .iter()
            .flat_map(|s| s.clients.iter().map(move |c| (s, c)))
            .all(|(stage, card)| card.stage_id == stage.id && seen.insert(card.id.as_str()))
    }

    fn stage_index(&self, stage_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id == stage_id)
    }
}

/// Cache do quadro ligado à API: sabe buscar a verdade e desfazer palpites
pub struct BoardStore<A> {
    api: A,
    state: BoardState,
}

impl<A: PipelineApi> BoardStore<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            state: BoardState::default(),
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut BoardState {
        &mut self.state
    }

    /// Busca todas as etapas com seus clientes e substitui o cache inteiro
    pub async fn load(&mut self) -> Result<()> {
        let stages = self.api.fetch_board().await?;
        tracing::debug!("Quadro carregado: {} etapas", stages.len());
        self.state.reset(stages);
        Ok(())
    }

    /// Descarta o estado otimista e recarrega do servidor
    pub async fn rollback(&mut self) -> Result<()> {
        tracing::info!("↩️ Revertendo quadro para o estado do servidor");
        self.load().await
    }
}
