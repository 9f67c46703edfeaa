//! # Classificador Linear
//!
//! Forma concreta do classificador opaco do pipeline: um modelo linear
//! multiclasse exportado como JSON (classes, matriz de pesos e interceptos).
//! Para o restante do sistema o modelo é uma caixa-preta que recebe linhas
//! esparsas e devolve um rótulo por token; qualquer outro classificador com o
//! mesmo contrato serviria.
//!
//! As classes podem ser rótulos BIO textuais (`"B-PER"`) ou ids numéricos,
//! conforme o exportador; ver [`crate::label::Label`].

use serde::{Deserialize, Serialize};

use crate::label::Label;
use crate::vectorizer::SparseRow;

/// Modelo linear multiclasse carregado de artefato.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearModel {
    /// Uma entrada por classe, na ordem das linhas de `coef`.
    pub classes: Vec<Label>,
    /// `coef[c]` é o vetor de pesos da classe `c`, na dimensão do vetorizador.
    pub coef: Vec<Vec<f64>>,
    /// Intercepto por classe; ausente no JSON vale zero para todas.
    #[serde(default)]
    pub intercept: Vec<f64>,
}

impl LinearModel {
    /// Prediz um rótulo por linha, na mesma ordem da entrada.
    pub fn predict(&self, rows: &[SparseRow]) -> Vec<Label> {
        rows.iter().map(|row| self.predict_one(row)).collect()
    }

    /// Argmax de `coef[c]·x + intercept[c]` sobre as classes.
    fn predict_one(&self, row: &SparseRow) -> Label {
        let mut best = 0usize;
        let mut best_score = f64::NEG_INFINITY;

        for (c, weights) in self.coef.iter().enumerate() {
            let mut score = self.intercept.get(c).copied().unwrap_or(0.0);
            for &(column, value) in row {
                score += value * weights.get(column).copied().unwrap_or(0.0);
            }
            if score > best_score {
                best_score = score;
                best = c;
            }
        }

        self.classes
            .get(best)
            .cloned()
            .unwrap_or_else(|| Label::from("O"))
    }
}
