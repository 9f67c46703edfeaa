//! # Artefatos Compartilhados e Registro de Modelos
//!
//! Os artefatos treinados (vetorizador, label encoder, HMM e classificadores)
//! vivem num diretório de modelos como arquivos JSON. Este módulo é o dono
//! explícito desses dados em memória, com ciclo de vida definido:
//!
//! - [`ArtifactStore`]: carrega os três artefatos compartilhados na partida,
//!   serve leituras baratas (`Arc` clonado sob `RwLock`) e expõe [`reload`]
//!   como gancho explícito de invalidação. Nada de estado global ambiente.
//! - [`ModelRegistry`]: lista e carrega classificadores sob demanda, com cache
//!   em memória; [`preload`] aquece o cache em paralelo na partida.
//!
//! Artefato compartilhado ausente é tolerado no carregamento (fica `None` e é
//! registrado no log); a ausência do vetorizador só vira erro na hora de
//! analisar; ver [`crate::pipeline`].
//!
//! [`reload`]: ArtifactStore::reload
//! [`preload`]: ModelRegistry::preload

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use rayon::prelude::*;
use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::hmm::HmmModel;
use crate::label::LabelEncoder;
use crate::model::LinearModel;
use crate::vectorizer::DictVectorizer;

/// Nomes reservados dos artefatos compartilhados dentro do diretório.
const VECTORIZER_FILE: &str = "vectorizer.json";
const LABEL_ENCODER_FILE: &str = "label_encoder.json";
const HMM_FILE: &str = "hmm_model.json";

fn is_shared_artifact(name: &str) -> bool {
    matches!(name, VECTORIZER_FILE | LABEL_ENCODER_FILE | HMM_FILE)
}

#[derive(Default)]
struct SharedArtifacts {
    vectorizer: Option<Arc<DictVectorizer>>,
    label_encoder: Option<Arc<LabelEncoder>>,
    hmm: Option<Arc<HmmModel>>,
}

/// Serviço dono dos artefatos compartilhados entre todas as requisições.
pub struct ArtifactStore {
    dir: PathBuf,
    shared: RwLock<SharedArtifacts>,
}

impl ArtifactStore {
    /// Abre o diretório e carrega o que existir.
    pub fn open(dir: impl Into<PathBuf>) -> Self {
        let store = Self {
            dir: dir.into(),
            shared: RwLock::new(SharedArtifacts::default()),
        };
        store.reload();
        store
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Relê os artefatos compartilhados do disco.
    ///
    /// Gancho explícito de invalidação: chamado na partida e quando os
    /// artefatos mudam no disco. Leitores concorrentes continuam enxergando a
    /// versão antiga até a troca, nunca um estado parcial.
    pub fn reload(&self) {
        let fresh = SharedArtifacts {
            vectorizer: load_json(&self.dir.join(VECTORIZER_FILE)).map(Arc::new),
            label_encoder: load_json(&self.dir.join(LABEL_ENCODER_FILE)).map(Arc::new),
            hmm: load_json(&self.dir.join(HMM_FILE)).map(Arc::new),
        };
        info!(
            vectorizer = fresh.vectorizer.is_some(),
            label_encoder = fresh.label_encoder.is_some(),
            hmm = fresh.hmm.is_some(),
            "artefatos compartilhados carregados de {}",
            self.dir.display()
        );
        *self.shared.write().unwrap_or_else(PoisonError::into_inner) = fresh;
    }

    pub fn vectorizer(&self) -> Option<Arc<DictVectorizer>> {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .vectorizer
            .clone()
    }

    pub fn label_encoder(&self) -> Option<Arc<LabelEncoder>> {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .label_encoder
            .clone()
    }

    pub fn hmm(&self) -> Option<Arc<HmmModel>> {
        self.shared
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .hmm
            .clone()
    }
}

/// Desserializa um artefato JSON; ausência ou conteúdo inválido viram `None`
/// (com aviso no log).
fn load_json<T: DeserializeOwned>(path: &Path) -> Option<T> {
    if !path.exists() {
        return None;
    }
    let parsed = fs::read_to_string(path)
        .map_err(Error::from)
        .and_then(|raw| serde_json::from_str(&raw).map_err(Error::from));
    match parsed {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("falha ao carregar {}: {err}", path.display());
            None
        }
    }
}

/// Registro de classificadores disponíveis no diretório de modelos.
pub struct ModelRegistry {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<LinearModel>>>,
}

impl ModelRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Nomes dos classificadores disponíveis (arquivos `.json` que não são
    /// artefatos compartilhados), em ordem alfabética.
    pub fn available(&self) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = fs::read_dir(&self.dir) {
            for entry in entries.flatten() {
                let name = entry.file_name().to_string_lossy().into_owned();
                if name.ends_with(".json") && !is_shared_artifact(&name) {
                    names.push(name);
                }
            }
        }
        names.sort();
        names
    }

    /// Carrega um modelo do cache ou do disco.
    pub fn get(&self, name: &str) -> Result<Arc<LinearModel>> {
        if let Some(model) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
        {
            return Ok(model.clone());
        }

        // O nome vira componente de caminho: separadores e ".." são rejeitados.
        if !name.ends_with(".json")
            || is_shared_artifact(name)
            || name.contains('/')
            || name.contains('\\')
            || name.contains("..")
        {
            return Err(Error::ModelNotFound(name.to_string()));
        }
        let path = self.dir.join(name);
        if !path.exists() {
            return Err(Error::ModelNotFound(name.to_string()));
        }

        info!("carregando modelo do disco: {name}");
        let raw = fs::read_to_string(&path)?;
        let model: Arc<LinearModel> = Arc::new(serde_json::from_str(&raw)?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_string(), model.clone());
        Ok(model)
    }

    /// Aquece o cache carregando todos os modelos disponíveis em paralelo.
    /// Retorna quantos carregaram com sucesso.
    pub fn preload(&self) -> usize {
        self.available()
            .par_iter()
            .filter(|name| match self.get(name) {
                Ok(_) => true,
                Err(err) => {
                    warn!("modelo {name} ignorado no preload: {err}");
                    false
                }
            })
            .count()
    }

    /// Esvazia o cache; os modelos serão relidos do disco na próxima consulta.
    pub fn clear(&self) {
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}
