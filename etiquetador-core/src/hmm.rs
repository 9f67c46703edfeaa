//! # Estados Latentes (HMM)
//!
//! Mapeamento somente-leitura de forma de palavra (case-folded) para um
//! identificador discreto de estado, produzido por um HMM não supervisionado
//! treinado fora deste sistema. O estado funciona como feature auxiliar para
//! palavras raras: palavras distribucionalmente parecidas caem no mesmo
//! estado, e o classificador generaliza por aí.
//!
//! O treinamento não acontece aqui: o modelo só é carregado (JSON) e
//! consultado. Palavras fora do mapa recebem o estado reservado `0`
//! ("desconhecida/rara").

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Estado reservado para palavras fora do vocabulário do HMM.
pub const UNKNOWN_STATE: u32 = 0;

/// Modelo de estados latentes carregado de artefato.
///
/// Compartilhado entre requisições concorrentes atrás de `Arc`; depois de
/// construído, nenhum método muta o mapa.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HmmModel {
    /// Número de estados do modelo original (inclui o estado 0).
    n_states: usize,
    /// Forma case-folded → id de estado.
    word_to_state: HashMap<String, u32>,
}

impl HmmModel {
    pub fn new(n_states: usize) -> Self {
        Self {
            n_states,
            word_to_state: HashMap::new(),
        }
    }

    /// Constrói o modelo a partir de pares (palavra, estado) já treinados.
    pub fn from_entries(n_states: usize, entries: impl IntoIterator<Item = (String, u32)>) -> Self {
        Self {
            n_states,
            word_to_state: entries.into_iter().collect(),
        }
    }

    /// Estado da palavra; [`UNKNOWN_STATE`] quando fora do vocabulário.
    pub fn state(&self, word: &str) -> u32 {
        self.word_to_state
            .get(&word.to_lowercase())
            .copied()
            .unwrap_or(UNKNOWN_STATE)
    }

    pub fn n_states(&self) -> usize {
        self.n_states
    }
}
