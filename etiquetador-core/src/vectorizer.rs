//! # Vetorizador de Dicionários
//!
//! Converte registros de features (chave → valor escalar) em linhas esparsas
//! indexadas pelo vocabulário aprendido no treinamento. O esquema de nomes é o
//! do `DictVectorizer` clássico:
//!
//! - valor textual: a coluna se chama `chave=valor` e recebe 1.0 (one-hot);
//! - valor booleano/numérico: a coluna se chama `chave` e recebe o número.
//!
//! Nomes ausentes do vocabulário são descartados em silêncio: um vocabulário
//! que não casa com o extrator é falha de integração entre versões de
//! artefatos, não algo detectável aqui.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::features::{FeatureRecord, FeatureValue};

/// Linha esparsa: pares (coluna, valor), ordenados por coluna.
pub type SparseRow = Vec<(usize, f64)>;

/// Vocabulário treinado: nome de coluna → índice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DictVectorizer {
    vocabulary: HashMap<String, usize>,
}

impl DictVectorizer {
    pub fn new(vocabulary: HashMap<String, usize>) -> Self {
        Self { vocabulary }
    }

    /// Dimensão do espaço de saída.
    pub fn n_features(&self) -> usize {
        self.vocabulary.len()
    }

    /// Vetoriza uma sequência de registros, um por token, na mesma ordem.
    pub fn transform(&self, records: &[FeatureRecord]) -> Vec<SparseRow> {
        records.iter().map(|r| self.transform_one(r)).collect()
    }

    fn transform_one(&self, record: &FeatureRecord) -> SparseRow {
        let mut row: SparseRow = Vec::new();
        for (key, value) in record.iter() {
            let (name, weight) = match value {
                FeatureValue::Text(s) => (format!("{key}={s}"), 1.0),
                FeatureValue::Bool(b) => (key.clone(), if *b { 1.0 } else { 0.0 }),
                FeatureValue::Int(n) => (key.clone(), f64::from(*n)),
                FeatureValue::Num(x) => (key.clone(), *x),
            };
            if let Some(&column) = self.vocabulary.get(&name) {
                row.push((column, weight));
            }
        }
        row.sort_by_key(|&(column, _)| column);
        row
    }
}
