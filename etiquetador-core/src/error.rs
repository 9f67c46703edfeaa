//! Erros do pipeline de inferência.
//!
//! Todos os erros têm escopo de requisição: uma análise que falha não corrompe
//! nenhum estado compartilhado (os artefatos são somente-leitura e o estado
//! mutável vive dentro da própria requisição).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// As sequências de tokens e de tags POS devem estar alinhadas uma-a-uma.
    #[error("sequências desalinhadas: {tokens} tokens para {tags} tags POS")]
    ShapeMismatch { tokens: usize, tags: usize },

    /// Sem o vetorizador não há como montar a entrada do classificador;
    /// a falha é detectada antes de qualquer tokenização.
    #[error("vetorizador não carregado; impossível processar o texto")]
    VectorizerMissing,

    #[error("modelo não encontrado: {0}")]
    ModelNotFound(String),

    #[error("erro de E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("artefato inválido: {0}")]
    Json(#[from] serde_json::Error),
}
