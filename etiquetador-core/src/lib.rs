//! # etiquetador-core — Pipeline de inferência NER
//!
//! Este crate implementa o caminho de inferência de um sistema de
//! Reconhecimento de Entidades Nomeadas (NER) sobre um classificador
//! sequencial pré-treinado. O coração do sistema é a dupla extração de
//! features / decodificação de spans: converter texto bruto numa
//! representação por token que o classificador entende, e converter a
//! sequência de rótulos de volta em entidades legíveis.
//!
//! ## Arquitetura
//!
//! O dado flui por um pipeline estritamente sequencial por requisição:
//!
//! 1. **Tokenização** ([`tokenizer`]): texto → tokens com offsets.
//! 2. **Etiquetagem POS** ([`postag`]): uma tag opaca por token.
//! 3. **Extração de features** ([`features`]): forma do token, janela de
//!    contexto de raio 2, cache de novidade ([`cache`]) e estados latentes
//!    ([`hmm`]).
//! 4. **Vetorização** ([`vectorizer`]) e **classificação** ([`model`]):
//!    artefatos treinados fora, carregados de JSON ([`artifacts`]).
//! 5. **Rótulos** ([`label`]) e **spans** ([`span`]): ids resolvidos para
//!    texto, `O-<TIPO>` normalizado e a sequência BIO reconstruída em
//!    entidades.
//!
//! Nenhum componente retém estado entre requisições, exceto os artefatos
//! compartilhados (somente-leitura após a carga, com gancho explícito de
//! recarga).
//!
//! ## Exemplo de Uso
//!
//! ```no_run
//! use std::sync::Arc;
//! use etiquetador_core::{ArtifactStore, ModelRegistry, NerPipeline};
//!
//! // 1. Aponta para o diretório com os artefatos JSON
//! let store = Arc::new(ArtifactStore::open("saved_models"));
//! let registry = ModelRegistry::new("saved_models");
//!
//! // 2. Monta o pipeline e analisa
//! let pipeline = NerPipeline::new(store, registry);
//! let analysis = pipeline.analyze(
//!     "Lula visitou a Petrobras no Rio de Janeiro.",
//!     "modelo_heuristico.json",
//! )?;
//!
//! for entity in &analysis.entities {
//!     println!("{} ({})", entity.text, entity.kind);
//! }
//! # Ok::<(), etiquetador_core::Error>(())
//! ```

pub mod artifacts;
pub mod cache;
pub mod error;
pub mod features;
pub mod hmm;
pub mod label;
pub mod model;
pub mod pipeline;
pub mod postag;
pub mod span;
pub mod tokenizer;
pub mod vectorizer;

pub use artifacts::{ArtifactStore, ModelRegistry};
pub use cache::WordCache;
pub use error::{Error, Result};
pub use features::{extract_features, FeatureRecord, FeatureValue};
pub use hmm::HmmModel;
pub use label::{Label, LabelEncoder};
pub use model::LinearModel;
pub use pipeline::{Analysis, NerPipeline};
pub use span::{labels_to_spans, Entity, TokenLabel};
pub use tokenizer::{tokenize, Token};
pub use vectorizer::DictVectorizer;
