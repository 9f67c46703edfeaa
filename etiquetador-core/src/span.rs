//! # Decodificador de Spans BIO
//!
//! Converte a sequência ordenada de pares (token, rótulo) de uma requisição em
//! entidades estruturadas, percorrendo-a uma única vez com um acumulador de
//! span pendente:
//!
//! - `B-<TIPO>` fecha o span aberto (se houver) e abre um novo com este tipo.
//! - `I-<TIPO>` anexa o token ao span aberto SEM atualizar o tipo: o tipo
//!   registrado pelo `B-` vence, mesmo em desacordo. Sem span aberto, o token
//!   é descartado e o estado não muda.
//! - Qualquer outro rótulo (`O` incluso) fecha o span aberto.
//! - O fim da sequência fecha o span aberto.
//!
//! A reconstrução é deliberadamente leniente: não valida a boa-formação da
//! sequência BIO (um `I-PER` depois de `B-LOC` continua o span de LOC).
//! Validação mais estrita fica como revisão futura (ver DESIGN.md).

use serde::{Deserialize, Serialize};

/// Um token com seu rótulo final (já textual e normalizado).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenLabel {
    pub token: String,
    pub label: String,
}

impl TokenLabel {
    pub fn new(token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            label: label.into(),
        }
    }
}

/// Uma entidade reconstruída a partir da sequência BIO.
///
/// O texto é a junção por espaço das formas cruas dos tokens, na ordem da
/// requisição; o tipo vem do `B-` que abriu o span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Reconstrói as entidades de uma sequência rotulada.
pub fn labels_to_spans(predictions: &[TokenLabel]) -> Vec<Entity> {
    let mut entities = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut current_kind = String::new();

    for item in predictions {
        if let Some(kind) = item.label.strip_prefix("B-") {
            if !current.is_empty() {
                entities.push(Entity {
                    text: current.join(" "),
                    kind: std::mem::take(&mut current_kind),
                });
            }
            current = vec![item.token.as_str()];
            current_kind = kind.to_string();
        } else if item.label.starts_with("I-") {
            if !current.is_empty() {
                current.push(item.token.as_str());
            }
            // `I-` órfão: descartado, sem abrir span.
        } else {
            if !current.is_empty() {
                entities.push(Entity {
                    text: current.join(" "),
                    kind: std::mem::take(&mut current_kind),
                });
                current.clear();
            }
        }
    }

    if !current.is_empty() {
        entities.push(Entity {
            text: current.join(" "),
            kind: current_kind,
        });
    }

    entities
}
