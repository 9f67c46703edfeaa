//! # Pipeline de Inferência NER
//!
//! Orquestra o fluxo completo de uma requisição, estritamente sequencial:
//!
//! 1. **Pré-condição**: o vetorizador precisa estar carregado; a falha é
//!    detectada antes de tokenizar qualquer coisa.
//! 2. **Tokenização** e **etiquetagem POS** (colaboradores folha).
//! 3. **Extração de features**, com cache de novidade recém-criado para a
//!    requisição e o HMM compartilhado somente-leitura.
//! 4. **Vetorização** e **classificação** pelo modelo selecionado.
//! 5. **Resolução de rótulos**: ids numéricos viram texto (label encoder, com
//!    fallback para o número literal) e variantes `O-<TIPO>` são normalizadas.
//! 6. **Decodificação de spans** BIO em entidades.
//!
//! Nenhum componente retém estado entre requisições fora do que é
//! explicitamente compartilhado ([`ArtifactStore`]); uma requisição que falha
//! não deixa nada para trás.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::artifacts::{ArtifactStore, ModelRegistry};
use crate::cache::WordCache;
use crate::error::{Error, Result};
use crate::features::extract_features;
use crate::label::normalize;
use crate::postag::PosTagger;
use crate::span::{labels_to_spans, Entity, TokenLabel};
use crate::tokenizer::tokenize;

/// Resultado completo de uma análise: rótulo por token e entidades derivadas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Analysis {
    pub predictions: Vec<TokenLabel>,
    pub entities: Vec<Entity>,
}

impl Analysis {
    fn empty() -> Self {
        Self {
            predictions: Vec::new(),
            entities: Vec::new(),
        }
    }
}

/// O pipeline NER completo, pronto para servir requisições concorrentes.
pub struct NerPipeline {
    store: Arc<ArtifactStore>,
    registry: ModelRegistry,
    tagger: PosTagger,
}

impl NerPipeline {
    pub fn new(store: Arc<ArtifactStore>, registry: ModelRegistry) -> Self {
        Self {
            store,
            registry,
            tagger: PosTagger::new(),
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Analisa um texto com o classificador indicado.
    ///
    /// Texto vazio produz uma análise vazia, não um erro. Erros possíveis:
    /// [`Error::VectorizerMissing`], [`Error::ModelNotFound`] e
    /// [`Error::ShapeMismatch`], todos com escopo de requisição.
    pub fn analyze(&self, text: &str, model_name: &str) -> Result<Analysis> {
        let vectorizer = self.store.vectorizer().ok_or(Error::VectorizerMissing)?;

        let tokens = tokenize(text);
        if tokens.is_empty() {
            return Ok(Analysis::empty());
        }

        let pos_tags = self.tagger.tag(&tokens);

        // Estado exclusivo da requisição: nasce aqui, morre aqui.
        let mut cache = WordCache::new();
        let hmm = self.store.hmm();
        let records = extract_features(&tokens, &pos_tags, hmm.as_deref(), Some(&mut cache))?;

        let rows = vectorizer.transform(&records);
        let model = self.registry.get(model_name)?;
        let raw_labels = model.predict(&rows);

        let encoder = self.store.label_encoder();
        let predictions: Vec<TokenLabel> = tokens
            .iter()
            .zip(raw_labels)
            .map(|(token, label)| {
                let resolved = label.resolve(encoder.as_deref());
                TokenLabel::new(token.text.clone(), normalize(&resolved))
            })
            .collect();

        let entities = labels_to_spans(&predictions);
        Ok(Analysis {
            predictions,
            entities,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::path::Path;

    use crate::hmm::HmmModel;
    use crate::label::{Label, LabelEncoder};
    use crate::model::LinearModel;
    use crate::vectorizer::DictVectorizer;

    /// Vocabulário mínimo: só a caixa do token decide o rótulo.
    fn write_shared_artifacts(dir: &Path) {
        let vectorizer = DictVectorizer::new(HashMap::from([
            ("word.istitle()".to_string(), 0),
            ("bias".to_string(), 1),
        ]));
        fs::write(
            dir.join("vectorizer.json"),
            serde_json::to_string(&vectorizer).unwrap(),
        )
        .unwrap();
    }

    /// Classes textuais: título → B-PER, resto → O.
    fn write_text_model(dir: &Path, name: &str) {
        let model = LinearModel {
            classes: vec![Label::from("B-PER"), Label::from("O")],
            coef: vec![vec![5.0, 0.0], vec![0.0, 1.0]],
            intercept: vec![0.0, 0.0],
        };
        fs::write(dir.join(name), serde_json::to_string(&model).unwrap()).unwrap();
    }

    /// Mesma geometria, mas com ids numéricos de classe.
    fn write_numeric_model(dir: &Path, name: &str) {
        let model = LinearModel {
            classes: vec![Label::Numeric(0), Label::Numeric(1)],
            coef: vec![vec![5.0, 0.0], vec![0.0, 1.0]],
            intercept: vec![0.0, 0.0],
        };
        fs::write(dir.join(name), serde_json::to_string(&model).unwrap()).unwrap();
    }

    fn pipeline_for(dir: &Path) -> NerPipeline {
        let store = Arc::new(ArtifactStore::open(dir));
        let registry = ModelRegistry::new(dir);
        NerPipeline::new(store, registry)
    }

    #[test]
    fn test_analyze_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        write_shared_artifacts(dir.path());
        write_text_model(dir.path(), "modelo.json");

        let pipeline = pipeline_for(dir.path());
        let analysis = pipeline.analyze("Lula discursou ontem", "modelo.json").unwrap();

        assert_eq!(analysis.predictions.len(), 3);
        assert_eq!(analysis.predictions[0].label, "B-PER");
        assert_eq!(analysis.predictions[1].label, "O");
        assert_eq!(
            analysis.entities,
            vec![Entity { text: "Lula".into(), kind: "PER".into() }]
        );
    }

    #[test]
    fn test_missing_vectorizer_is_fatal_precondition() {
        let dir = tempfile::tempdir().unwrap();
        write_text_model(dir.path(), "modelo.json");

        let pipeline = pipeline_for(dir.path());
        let err = pipeline.analyze("Lula discursou", "modelo.json").unwrap_err();
        assert!(matches!(err, Error::VectorizerMissing));
    }

    #[test]
    fn test_empty_text_yields_empty_analysis() {
        let dir = tempfile::tempdir().unwrap();
        write_shared_artifacts(dir.path());
        write_text_model(dir.path(), "modelo.json");

        let pipeline = pipeline_for(dir.path());
        let analysis = pipeline.analyze("   ", "modelo.json").unwrap();
        assert!(analysis.predictions.is_empty());
        assert!(analysis.entities.is_empty());
    }

    #[test]
    fn test_unknown_model_is_request_scoped_error() {
        let dir = tempfile::tempdir().unwrap();
        write_shared_artifacts(dir.path());

        let pipeline = pipeline_for(dir.path());
        let err = pipeline.analyze("Lula discursou", "nao_existe.json").unwrap_err();
        assert!(matches!(err, Error::ModelNotFound(_)));
    }

    #[test]
    fn test_numeric_labels_resolved_by_encoder() {
        let dir = tempfile::tempdir().unwrap();
        write_shared_artifacts(dir.path());
        write_numeric_model(dir.path(), "numerico.json");
        let encoder = LabelEncoder::new(vec!["B-LOC".into(), "O".into()]);
        fs::write(
            dir.path().join("label_encoder.json"),
            serde_json::to_string(&encoder).unwrap(),
        )
        .unwrap();

        let pipeline = pipeline_for(dir.path());
        let analysis = pipeline.analyze("Brasília acordou cedo", "numerico.json").unwrap();
        assert_eq!(analysis.predictions[0].label, "B-LOC");
        assert_eq!(
            analysis.entities,
            vec![Entity { text: "Brasília".into(), kind: "LOC".into() }]
        );
    }

    #[test]
    fn test_numeric_labels_without_encoder_are_stringified() {
        let dir = tempfile::tempdir().unwrap();
        write_shared_artifacts(dir.path());
        write_numeric_model(dir.path(), "numerico.json");

        let pipeline = pipeline_for(dir.path());
        let analysis = pipeline.analyze("Brasília acordou cedo", "numerico.json").unwrap();
        // Sem label encoder: o id vira string e nenhum span BIO se forma.
        assert_eq!(analysis.predictions[0].label, "0");
        assert_eq!(analysis.predictions[1].label, "1");
        assert!(analysis.entities.is_empty());
    }

    #[test]
    fn test_hmm_is_optional_and_shared() {
        let dir = tempfile::tempdir().unwrap();
        write_shared_artifacts(dir.path());
        write_text_model(dir.path(), "modelo.json");
        fs::write(
            dir.path().join("hmm_model.json"),
            serde_json::to_string(&HmmModel::new(10)).unwrap(),
        )
        .unwrap();

        let pipeline = pipeline_for(dir.path());
        let analysis = pipeline.analyze("Lula discursou", "modelo.json").unwrap();
        assert_eq!(analysis.predictions.len(), 2);
    }
}
