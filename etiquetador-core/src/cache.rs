//! # Cache de Novidade
//!
//! Registra quais formas de palavra (case-folded) já apareceram na sequência
//! de tokens de UMA requisição. A pertinência ao cache vira a feature binária
//! `in_cache`: palavras repetidas tendem a manter a mesma tag, e a repetição é
//! um sinal barato de familiaridade.

use std::collections::HashSet;

/// Conjunto de palavras já vistas na requisição corrente.
///
/// Criado vazio no início da extração de features, mutado token a token na
/// ordem da sentença e descartado ao fim da requisição. Nunca é compartilhado
/// nem reaproveitado entre requisições concorrentes.
#[derive(Debug, Default)]
pub struct WordCache {
    seen: HashSet<String>,
}

impl WordCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// A palavra (case-insensitive) já apareceu antes?
    pub fn contains(&self, word: &str) -> bool {
        self.seen.contains(&word.to_lowercase())
    }

    /// Registra a forma case-folded da palavra.
    pub fn add(&mut self, word: &str) {
        self.seen.insert(word.to_lowercase());
    }

    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_membership() {
        let mut cache = WordCache::new();
        assert!(!cache.contains("Paris"));
        cache.add("Paris");
        assert!(cache.contains("paris"));
        assert!(cache.contains("PARIS"));
    }

    #[test]
    fn test_reset() {
        let mut cache = WordCache::new();
        cache.add("brasil");
        cache.reset();
        assert!(!cache.contains("brasil"));
    }
}
