//! # Tokenizador
//!
//! Divide o texto bruto em tokens (palavras, números, pontuações), preservando
//! a posição original de cada um (offsets de byte). Os offsets permitem destacar
//! entidades na interface web sem alterar a formatação do texto.
//!
//! A segmentação usa as fronteiras de palavra do padrão Unicode (UAX #29), via
//! `unicode-segmentation`. Números com separador interno ("1.234", "3,14")
//! permanecem como um único token; pontuação vira token próprio; espaços são
//! descartados.
//!
//! O restante do pipeline trata o tokenizador como uma folha opaca: qualquer
//! sequência de tokens com a forma certa funciona, e trocar a estratégia de
//! segmentação não exige mudanças nos demais módulos.

use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

/// Um token extraído do texto original.
///
/// O `Token` é a unidade atômica de processamento do pipeline. Ele mantém a
/// referência exata de sua posição no texto original (`start` e `end`), o que
/// é crucial para:
/// 1. Extração de features baseada no texto cru.
/// 2. Destaque (highlight) das entidades na interface gráfica.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Token {
    /// O texto do token (ex: "Lula", ",", "presidente").
    pub text: String,
    /// Índice de byte inicial no texto original (inclusive).
    pub start: usize,
    /// Índice de byte final no texto original (exclusivo).
    pub end: usize,
    /// Índice sequencial do token na lista (0, 1, 2...).
    pub index: usize,
}

/// Tokeniza um texto em palavras, números e pontuações.
///
/// Texto vazio (ou só espaços) produz uma lista vazia, nunca um erro.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens: Vec<Token> = text
        .split_word_bound_indices()
        .filter(|(_, segment)| !segment.trim().is_empty())
        .map(|(start, segment)| Token {
            text: segment.to_string(),
            start,
            end: start + segment.len(),
            index: 0,
        })
        .collect();

    // Re-indexa os tokens
    for (i, token) in tokens.iter_mut().enumerate() {
        token.index = i;
    }
    tokens
}
