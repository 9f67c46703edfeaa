//! # Etiquetador Morfossintático (POS)
//!
//! Atribui a cada token uma classe gramatical aproximada, combinando um léxico
//! de palavras de classe fechada (artigos, preposições, pronomes...) com
//! heurísticas de sufixo para as classes abertas. O conjunto de tags segue, de
//! forma solta, o do corpus Mac-Morpho (`N`, `NPROP`, `V`, `ADJ`, `ADV`,
//! `ART`, `PREP`, `PRON`, `CONJ`, `NUM`, `PONT`).
//!
//! O extrator de features nunca interpreta as tags: elas são copiadas como
//! strings opacas para os registros de features. Isso permite substituir este
//! módulo por um tagger treinado sem tocar no restante do pipeline.

use std::collections::HashMap;

use regex::Regex;

use crate::tokenizer::Token;

/// Palavras de classe fechada do PT-BR, com suas tags.
const CLOSED_CLASS: &[(&str, &str)] = &[
    // Artigos
    ("o", "ART"), ("a", "ART"), ("os", "ART"), ("as", "ART"),
    ("um", "ART"), ("uma", "ART"), ("uns", "ART"), ("umas", "ART"),
    // Preposições (e contrações comuns)
    ("de", "PREP"), ("do", "PREP"), ("da", "PREP"), ("dos", "PREP"), ("das", "PREP"),
    ("em", "PREP"), ("no", "PREP"), ("na", "PREP"), ("nos", "PREP"), ("nas", "PREP"),
    ("para", "PREP"), ("por", "PREP"), ("pelo", "PREP"), ("pela", "PREP"),
    ("com", "PREP"), ("sem", "PREP"), ("sobre", "PREP"), ("entre", "PREP"),
    ("até", "PREP"), ("após", "PREP"), ("desde", "PREP"), ("contra", "PREP"),
    // Pronomes
    ("eu", "PRON"), ("tu", "PRON"), ("ele", "PRON"), ("ela", "PRON"),
    ("nós", "PRON"), ("eles", "PRON"), ("elas", "PRON"), ("você", "PRON"),
    ("se", "PRON"), ("lhe", "PRON"), ("me", "PRON"), ("te", "PRON"),
    ("seu", "PRON"), ("sua", "PRON"), ("este", "PRON"), ("esta", "PRON"),
    ("esse", "PRON"), ("essa", "PRON"), ("isso", "PRON"), ("isto", "PRON"),
    ("aquele", "PRON"), ("aquela", "PRON"), ("quem", "PRON"),
    // Conjunções
    ("e", "CONJ"), ("ou", "CONJ"), ("mas", "CONJ"), ("porém", "CONJ"),
    ("porque", "CONJ"), ("que", "CONJ"), ("quando", "CONJ"), ("como", "CONJ"),
    ("embora", "CONJ"), ("pois", "CONJ"),
    // Advérbios frequentes
    ("não", "ADV"), ("já", "ADV"), ("ainda", "ADV"), ("também", "ADV"),
    ("muito", "ADV"), ("pouco", "ADV"), ("sempre", "ADV"), ("nunca", "ADV"),
    ("hoje", "ADV"), ("ontem", "ADV"), ("amanhã", "ADV"), ("aqui", "ADV"),
    ("ali", "ADV"), ("lá", "ADV"),
    // Formas verbais irregulares frequentes (ser/estar/ter/haver)
    ("é", "V"), ("são", "V"), ("foi", "V"), ("foram", "V"), ("era", "V"),
    ("eram", "V"), ("será", "V"), ("serão", "V"), ("está", "V"), ("estão", "V"),
    ("estava", "V"), ("estavam", "V"), ("tem", "V"), ("têm", "V"),
    ("tinha", "V"), ("há", "V"),
];

/// Sufixos nominais (substantivos derivados)
const NOUN_SUFFIXES: &[&str] = &[
    "ção", "ções", "dade", "dades", "agem", "agens", "ismo", "ista",
    "ência", "ância", "eza", "ura",
];

/// Sufixos adjetivais
const ADJ_SUFFIXES: &[&str] = &["oso", "osa", "ível", "ável", "ico", "ica", "ante", "ense"];

/// Sufixos e desinências verbais
const VERB_SUFFIXES: &[&str] = &[
    "ar", "er", "ir", "ou", "aram", "eram", "iram", "ava", "avam",
    "iam", "ando", "endo", "indo", "eu", "iu",
];

/// Tagger morfossintático heurístico.
///
/// Construído uma vez e compartilhado entre requisições: não guarda estado
/// mutável, apenas o léxico e os padrões compilados.
pub struct PosTagger {
    closed_class: HashMap<&'static str, &'static str>,
    numeric: Regex,
}

impl PosTagger {
    pub fn new() -> Self {
        Self {
            closed_class: CLOSED_CLASS.iter().copied().collect(),
            // Padrão fixo; só falha por erro de escrita no próprio fonte.
            numeric: Regex::new(r"^\d+([.,]\d+)*$").expect("regex numérica válida"),
        }
    }

    /// Etiqueta uma sequência de tokens. A saída tem sempre o mesmo tamanho
    /// da entrada, na mesma ordem.
    pub fn tag(&self, tokens: &[Token]) -> Vec<String> {
        tokens
            .iter()
            .map(|token| self.tag_word(&token.text).to_string())
            .collect()
    }

    /// Decide a tag de uma única palavra, nesta ordem:
    /// pontuação → número → léxico fechado → sufixo → capitalização.
    fn tag_word(&self, word: &str) -> &'static str {
        if word.chars().all(|c| !c.is_alphanumeric()) {
            return "PONT";
        }
        if self.numeric.is_match(word) {
            return "NUM";
        }

        let lower = word.to_lowercase();
        if let Some(&tag) = self.closed_class.get(lower.as_str()) {
            return tag;
        }

        if lower.ends_with("mente") {
            return "ADV";
        }
        for suffix in NOUN_SUFFIXES {
            if lower.ends_with(suffix) {
                return "N";
            }
        }
        for suffix in ADJ_SUFFIXES {
            if lower.ends_with(suffix) {
                return "ADJ";
            }
        }
        for suffix in VERB_SUFFIXES {
            if lower.ends_with(suffix) {
                return "V";
            }
        }

        if word.chars().next().map(|c| c.is_uppercase()).unwrap_or(false) {
            return "NPROP";
        }
        "N"
    }
}

impl Default for PosTagger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;

    #[test]
    fn test_tag_alignment() {
        let tagger = PosTagger::new();
        let tokens = tokenize("O presidente visitou Brasília em 2023.");
        let tags = tagger.tag(&tokens);
        assert_eq!(tags.len(), tokens.len());
    }

    #[test]
    fn test_closed_class_and_heuristics() {
        let tagger = PosTagger::new();
        let tokens = tokenize("A inflação caiu rapidamente");
        let tags = tagger.tag(&tokens);
        assert_eq!(tags, vec!["ART", "N", "V", "ADV"]);
    }

    #[test]
    fn test_proper_noun_by_capitalization() {
        let tagger = PosTagger::new();
        let tokens = tokenize("Petrobras anunciou lucro");
        let tags = tagger.tag(&tokens);
        assert_eq!(tags[0], "NPROP");
    }

    #[test]
    fn test_numbers_and_punctuation() {
        let tagger = PosTagger::new();
        let tokens = tokenize("Cresceu 1.234 , certo ?");
        let tags = tagger.tag(&tokens);
        assert_eq!(tags[1], "NUM");
        assert_eq!(tags[2], "PONT");
        assert_eq!(tags[4], "PONT");
    }
}
