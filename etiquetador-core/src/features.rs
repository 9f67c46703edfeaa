//! # Engenharia de Features para NER
//!
//! Para cada token, monta um registro estruturado de features que o
//! classificador externo consome. As features capturam informação ortográfica
//! (caixa, prefixos, sufixos), lexical (forma minúscula), contextual (janela
//! deslizante de raio 2), de novidade (cache de palavras da requisição) e de
//! estados latentes (HMM).
//!
//! ## Vocabulário de chaves
//!
//! As chaves dos registros formam um vocabulário fixo e determinístico que
//! precisa casar exatamente com o esperado pelo vetorizador treinado; daí os
//! nomes herdados do treinamento (`word.lower()`, `prefix-2`, `-1:pos`...).
//! Um descasamento de versão entre extrator e vetorizador é falha de
//! integração, indetectável daqui de dentro.
//!
//! ## Chaves sempre presentes
//!
//! `bias`, `word.lower()`, `word.isupper()`, `word.istitle()`,
//! `word.isdigit()`, `pos`, `prefix-2`, `prefix-3`, `suffix-2`, `suffix-3`.
//!
//! ## Chaves condicionais
//!
//! - Janela: `-{w}:word.lower()` / `-{w}:pos` e `+{w}:word.lower()` /
//!   `+{w}:pos` para `w` em 1..=2. Na borda da sentença a chave de forma
//!   recebe a sentinela `BOS`/`EOS` e a chave de POS é OMITIDA; a assimetria
//!   é contrato com o vetorizador.
//! - `in_cache`: só quando um [`WordCache`] é fornecido.
//! - `hmm_state`, `hmm_state-1`, `hmm_state+1`: só quando um [`HmmModel`] é
//!   fornecido; nas bordas a chave do vizinho é simplesmente omitida, sem
//!   sentinela.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::cache::WordCache;
use crate::error::Error;
use crate::hmm::HmmModel;
use crate::tokenizer::Token;

/// Raio da janela de contexto.
const WINDOW: usize = 2;

/// Valor escalar de uma feature: booleano, inteiro pequeno, número ou texto.
///
/// A serialização é `untagged`: um registro vira um objeto JSON plano
/// (`{"bias": 1.0, "word.lower()": "lula", "word.istitle()": true}`), o mesmo
/// formato que o vetorizador espera.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeatureValue {
    Bool(bool),
    Int(u32),
    Num(f64),
    Text(String),
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<u32> for FeatureValue {
    fn from(v: u32) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Num(v)
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Text(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Text(v.to_string())
    }
}

/// Registro de features de um único token.
///
/// Mapa esparso chave → valor. Um registro existe por token, produzido
/// independentemente mas usando os vizinhos para contexto.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    #[serde(flatten)]
    features: HashMap<String, FeatureValue>,
}

impl FeatureRecord {
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<FeatureValue>) {
        self.features.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&FeatureValue> {
        self.features.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FeatureValue)> {
        self.features.iter()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Gera os registros de features para toda a sequência de tokens.
///
/// # Parâmetros
/// - `tokens`: a lista completa de tokens da sentença.
/// - `pos_tags`: tags POS alinhadas uma-a-uma com `tokens`.
/// - `hmm`: modelo de estados latentes opcional (compartilhado, somente-leitura).
/// - `cache`: cache de novidade opcional, exclusivo desta requisição. O cache é
///   consultado ANTES de registrar a palavra corrente: um token nunca conta a
///   própria ocorrência, mas uma ocorrência anterior da mesma forma conta.
///
/// # Erros
/// [`Error::ShapeMismatch`] quando `tokens` e `pos_tags` diferem em tamanho.
/// Entrada vazia produz saída vazia, não erro.
pub fn extract_features(
    tokens: &[Token],
    pos_tags: &[String],
    hmm: Option<&HmmModel>,
    mut cache: Option<&mut WordCache>,
) -> Result<Vec<FeatureRecord>, Error> {
    if tokens.len() != pos_tags.len() {
        return Err(Error::ShapeMismatch {
            tokens: tokens.len(),
            tags: pos_tags.len(),
        });
    }

    let mut records = Vec::with_capacity(tokens.len());
    for i in 0..tokens.len() {
        let mut record = extract_for_token(tokens, pos_tags, i, hmm);

        if let Some(cache) = cache.as_deref_mut() {
            let word = &tokens[i].text;
            // Consulta antes da inserção: a ordem é contrato.
            record.insert("in_cache", cache.contains(word));
            cache.add(word);
        }

        records.push(record);
    }
    Ok(records)
}

/// Extrai as features de um único token em seu contexto.
fn extract_for_token(
    tokens: &[Token],
    pos_tags: &[String],
    i: usize,
    hmm: Option<&HmmModel>,
) -> FeatureRecord {
    let word = &tokens[i].text;
    let chars: Vec<char> = word.chars().collect();
    let mut record = FeatureRecord::default();

    // === Features do token atual ===
    record.insert("bias", 1.0);
    record.insert("word.lower()", word.to_lowercase());
    record.insert("word.isupper()", is_upper(word));
    record.insert("word.istitle()", is_title(word));
    record.insert("word.isdigit()", is_digit(word));
    record.insert("pos", pos_tags[i].clone());
    record.insert("prefix-2", prefix(&chars, 2));
    record.insert("prefix-3", prefix(&chars, 3));
    record.insert("suffix-2", suffix(&chars, 2));
    record.insert("suffix-3", suffix(&chars, 3));

    // === Janela de contexto ===
    for w in 1..=WINDOW {
        if i >= w {
            record.insert(format!("-{w}:word.lower()"), tokens[i - w].text.to_lowercase());
            record.insert(format!("-{w}:pos"), pos_tags[i - w].clone());
        } else {
            // Início de sentença: só a forma recebe a sentinela, sem chave de POS.
            record.insert(format!("-{w}:word.lower()"), "BOS");
        }

        if i + w < tokens.len() {
            record.insert(format!("+{w}:word.lower()"), tokens[i + w].text.to_lowercase());
            record.insert(format!("+{w}:pos"), pos_tags[i + w].clone());
        } else {
            record.insert(format!("+{w}:word.lower()"), "EOS");
        }
    }

    // === Estados latentes ===
    if let Some(hmm) = hmm {
        record.insert("hmm_state", hmm.state(word));
        if i > 0 {
            record.insert("hmm_state-1", hmm.state(&tokens[i - 1].text));
        }
        if i + 1 < tokens.len() {
            record.insert("hmm_state+1", hmm.state(&tokens[i + 1].text));
        }
    }

    record
}

/// Primeiros `n` caracteres (menos, se a palavra for mais curta).
fn prefix(chars: &[char], n: usize) -> String {
    chars.iter().take(n).collect()
}

/// Últimos `n` caracteres (menos, se a palavra for mais curta).
fn suffix(chars: &[char], n: usize) -> String {
    chars[chars.len().saturating_sub(n)..].iter().collect()
}

/// Semântica de `str.isupper()` do treinamento: existe ao menos um caractere
/// com caixa e nenhum deles é minúsculo.
fn is_upper(word: &str) -> bool {
    let mut has_cased = false;
    for c in word.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}

/// Semântica de `str.istitle()`: cada trecho com caixa começa em maiúscula
/// seguida apenas de minúsculas.
fn is_title(word: &str) -> bool {
    let mut has_cased = false;
    let mut prev_cased = false;
    for c in word.chars() {
        if c.is_uppercase() {
            if prev_cased {
                return false;
            }
            has_cased = true;
            prev_cased = true;
        } else if c.is_lowercase() {
            if !prev_cased {
                return false;
            }
            has_cased = true;
        } else {
            prev_cased = false;
        }
    }
    has_cased
}

/// Semântica de `str.isdigit()`: não-vazia e só dígitos.
fn is_digit(word: &str) -> bool {
    !word.is_empty() && word.chars().all(|c| c.is_numeric())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    fn tags_for(tokens: &[Token]) -> Vec<String> {
        vec!["N".to_string(); tokens.len()]
    }

    fn text_value(record: &FeatureRecord, key: &str) -> String {
        match record.get(key) {
            Some(FeatureValue::Text(s)) => s.clone(),
            other => panic!("esperava texto em {key}, veio {other:?}"),
        }
    }

    #[test]
    fn test_output_length_matches_input() {
        let tokens = tokenize("O Brasil venceu a Argentina ontem");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();
        assert_eq!(records.len(), tokens.len());
    }

    #[test]
    fn test_empty_input_is_not_an_error() {
        let records = extract_features(&[], &[], None, None).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_shape_mismatch_is_rejected() {
        let tokens = tokenize("Lula viajou");
        let err = extract_features(&tokens, &["N".to_string()], None, None).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { tokens: 2, tags: 1 }));
    }

    #[test]
    fn test_sentence_start_sentinels() {
        let tokens = tokenize("Lula viajou ontem cedo");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();

        // Primeiro token: BOS nas duas distâncias, sem chave de POS à esquerda.
        assert_eq!(text_value(&records[0], "-1:word.lower()"), "BOS");
        assert_eq!(text_value(&records[0], "-2:word.lower()"), "BOS");
        assert!(!records[0].contains("-1:pos"));
        assert!(!records[0].contains("-2:pos"));

        // Segundo token: vizinho real a distância 1, BOS a distância 2.
        assert_eq!(text_value(&records[1], "-1:word.lower()"), "lula");
        assert!(records[1].contains("-1:pos"));
        assert_eq!(text_value(&records[1], "-2:word.lower()"), "BOS");
        assert!(!records[1].contains("-2:pos"));
    }

    #[test]
    fn test_sentence_end_sentinels() {
        let tokens = tokenize("Lula viajou ontem cedo");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();
        let last = records.len() - 1;

        assert_eq!(text_value(&records[last], "+1:word.lower()"), "EOS");
        assert_eq!(text_value(&records[last], "+2:word.lower()"), "EOS");
        assert!(!records[last].contains("+1:pos"));
        assert!(!records[last].contains("+2:pos"));

        assert_eq!(text_value(&records[last - 1], "+1:word.lower()"), "cedo");
        assert!(records[last - 1].contains("+1:pos"));
        assert_eq!(text_value(&records[last - 1], "+2:word.lower()"), "EOS");
    }

    #[test]
    fn test_shape_features() {
        let tokens = tokenize("Petrobras");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();

        assert_eq!(records[0].get("bias"), Some(&FeatureValue::Num(1.0)));
        assert_eq!(text_value(&records[0], "word.lower()"), "petrobras");
        assert_eq!(text_value(&records[0], "prefix-2"), "Pe");
        assert_eq!(text_value(&records[0], "prefix-3"), "Pet");
        assert_eq!(text_value(&records[0], "suffix-2"), "as");
        assert_eq!(text_value(&records[0], "suffix-3"), "ras");
        assert_eq!(records[0].get("word.istitle()"), Some(&FeatureValue::Bool(true)));
        assert_eq!(records[0].get("word.isupper()"), Some(&FeatureValue::Bool(false)));
        assert_eq!(records[0].get("word.isdigit()"), Some(&FeatureValue::Bool(false)));
    }

    #[test]
    fn test_short_word_prefix_suffix_without_padding() {
        let tokens = tokenize("ir");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();
        assert_eq!(text_value(&records[0], "prefix-3"), "ir");
        assert_eq!(text_value(&records[0], "suffix-3"), "ir");
    }

    #[test]
    fn test_novelty_cache_counts_earlier_occurrences_only() {
        let tokens = tokenize("Paris ama paris");
        let tags = tags_for(&tokens);
        let mut cache = WordCache::new();
        let records = extract_features(&tokens, &tags, None, Some(&mut cache)).unwrap();

        assert_eq!(records[0].get("in_cache"), Some(&FeatureValue::Bool(false)));
        assert_eq!(records[1].get("in_cache"), Some(&FeatureValue::Bool(false)));
        // Repetição case-insensitive: "paris" já tinha aparecido como "Paris".
        assert_eq!(records[2].get("in_cache"), Some(&FeatureValue::Bool(true)));
    }

    #[test]
    fn test_no_cache_means_no_in_cache_key() {
        let tokens = tokenize("Paris ama paris");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();
        assert!(records.iter().all(|r| !r.contains("in_cache")));
    }

    #[test]
    fn test_hmm_states_default_to_zero() {
        let tokens = tokenize("Lula viajou ontem");
        let tags = tags_for(&tokens);
        let hmm = HmmModel::new(10);
        let records = extract_features(&tokens, &tags, Some(&hmm), None).unwrap();

        for record in &records {
            assert_eq!(record.get("hmm_state"), Some(&FeatureValue::Int(0)));
        }
        // Bordas: a chave do vizinho inexistente é omitida, sem sentinela.
        assert!(!records[0].contains("hmm_state-1"));
        assert!(records[0].contains("hmm_state+1"));
        assert!(records[2].contains("hmm_state-1"));
        assert!(!records[2].contains("hmm_state+1"));
    }

    #[test]
    fn test_hmm_neighbor_states() {
        let tokens = tokenize("em Brasília hoje");
        let tags = tags_for(&tokens);
        let hmm = HmmModel::from_entries(10, [("brasília".to_string(), 4)]);
        let records = extract_features(&tokens, &tags, Some(&hmm), None).unwrap();

        assert_eq!(records[0].get("hmm_state+1"), Some(&FeatureValue::Int(4)));
        assert_eq!(records[1].get("hmm_state"), Some(&FeatureValue::Int(4)));
        assert_eq!(records[2].get("hmm_state-1"), Some(&FeatureValue::Int(4)));
    }

    #[test]
    fn test_record_serializes_flat() {
        let tokens = tokenize("Oi");
        let tags = tags_for(&tokens);
        let records = extract_features(&tokens, &tags, None, None).unwrap();
        let json = serde_json::to_value(&records[0]).unwrap();
        assert_eq!(json["word.lower()"], "oi");
        assert_eq!(json["bias"], 1.0);
        assert_eq!(json["word.istitle()"], true);
    }
}
