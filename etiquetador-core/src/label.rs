//! # Rótulos do classificador
//!
//! A saída crua do classificador pode vir como string BIO (`"B-PER"`) ou como
//! id numérico de classe, dependendo de como o modelo foi exportado. Em vez de
//! inspecionar tipos em tempo de execução, o sistema carrega a distinção no
//! próprio tipo: [`Label`] é uma variante etiquetada, resolvida para texto
//! antes de o decodificador de spans entrar em cena.

use serde::{Deserialize, Serialize};

/// Rótulo cru emitido pelo classificador.
///
/// `untagged` no serde: em JSON, um id numérico desserializa como `Numeric` e
/// uma string como `Text`; o formato dos artefatos continua plano.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Numeric(i64),
    Text(String),
}

impl Label {
    /// Resolve o rótulo para texto.
    ///
    /// Ids numéricos passam pelo [`LabelEncoder`] quando disponível; sem
    /// encoder (ou com id fora da tabela), o id é convertido para string como
    /// último recurso, e a entidade resultante fica tipada pelo número literal.
    pub fn resolve(self, encoder: Option<&LabelEncoder>) -> String {
        match self {
            Label::Text(s) => s,
            Label::Numeric(id) => encoder
                .and_then(|enc| enc.inverse_transform(id))
                .unwrap_or_else(|| id.to_string()),
        }
    }
}

impl From<&str> for Label {
    fn from(s: &str) -> Self {
        Label::Text(s.to_string())
    }
}

/// Tabela id de classe → rótulo textual, exportada junto com o classificador.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    /// Rótulo textual do id, se o id estiver na tabela.
    pub fn inverse_transform(&self, id: i64) -> Option<String> {
        usize::try_from(id)
            .ok()
            .and_then(|i| self.classes.get(i))
            .cloned()
    }
}

/// Normaliza variantes `O-<TIPO>` para `O` simples.
///
/// O sufixo não carrega semântica adicional; a normalização acontece antes da
/// decodificação de spans.
pub fn normalize(label: &str) -> &str {
    if label.starts_with("O-") {
        "O"
    } else {
        label
    }
}
