//! # Camadas de Anotação
//!
//! Uma página tem no máximo três camadas, sempre nesta ordem de prioridade:
//!
//! | Camada          | Nome lógico | Esquema de tags |
//! |-----------------|-------------|-----------------|
//! | Part-Of-Speech  | `pos`       | Continuação     |
//! | Chunking        | `chunking`  | BIO2            |
//! | Named Entity    | `ner`       | BIO2            |
//!
//! [`LayerMapping`] liga cada camada à coluna do corpus (ou à camada do documento)
//! que a contém. A tabela é explícita e passada ao exportador.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::tagger::TagScheme;

/// Camada lógica de anotação. A ordem das variantes é a ordem das abas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    Pos,
    Chunking,
    Ner,
}

impl LayerKind {
    /// Todas as camadas, em ordem de prioridade.
    pub const ALL: [LayerKind; 3] = [LayerKind::Pos, LayerKind::Chunking, LayerKind::Ner];

    /// Nome exibido na aba
    pub fn display_name(&self) -> &'static str {
        match self {
            LayerKind::Pos => "Part-Of-Speech",
            LayerKind::Chunking => "Chunking",
            LayerKind::Ner => "Named Entity",
        }
    }

    /// Nome lógico usado na configuração
    pub fn logical_name(&self) -> &'static str {
        match self {
            LayerKind::Pos => "pos",
            LayerKind::Chunking => "chunking",
            LayerKind::Ner => "ner",
        }
    }

    /// Resolve um nome lógico sem diferenciar maiúsculas (`"NER"`, `"Chunk"`...).
    pub fn from_logical_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "pos" => Some(LayerKind::Pos),
            "chunking" | "chunk" => Some(LayerKind::Chunking),
            "ner" => Some(LayerKind::Ner),
            _ => None,
        }
    }

    /// Esquema da coluna de tags desta camada no corpus.
    pub fn scheme(&self) -> TagScheme {
        match self {
            LayerKind::Pos => TagScheme::Continuation,
            LayerKind::Chunking | LayerKind::Ner => TagScheme::Bio,
        }
    }
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.logical_name())
    }
}

/// Tabela camada lógica -> chave da coluna/camada.
///
/// Em JSON é um objeto `{"POS": "pos", "ner": "NE"}`; nomes lógicos desconhecidos
/// são ignorados.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct LayerMapping {
    columns: BTreeMap<LayerKind, String>,
}

impl LayerMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adiciona (ou substitui) a chave de uma camada.
    pub fn with(mut self, kind: LayerKind, key: impl Into<String>) -> Self {
        self.insert(kind, key);
        self
    }

    pub fn insert(&mut self, kind: LayerKind, key: impl Into<String>) {
        self.columns.insert(kind, key.into());
    }

    pub fn get(&self, kind: LayerKind) -> Option<&str> {
        self.columns.get(&kind).map(String::as_str)
    }

    /// Pares em ordem de prioridade.
    pub fn iter(&self) -> impl Iterator<Item = (LayerKind, &str)> {
        self.columns.iter().map(|(k, v)| (*k, v.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

impl From<BTreeMap<String, String>> for LayerMapping {
    fn from(raw: BTreeMap<String, String>) -> Self {
        let mut mapping = LayerMapping::new();
        for (name, key) in raw {
            match LayerKind::from_logical_name(&name) {
                Some(kind) => mapping.insert(kind, key),
                None => debug!(layer = %name, "nome de camada desconhecido ignorado"),
            }
        }
        mapping
    }
}

impl From<LayerMapping> for BTreeMap<String, String> {
    fn from(mapping: LayerMapping) -> Self {
        mapping
            .columns
            .into_iter()
            .map(|(kind, key)| (kind.logical_name().to_string(), key))
            .collect()
    }
}

impl<K: AsRef<str>, V: Into<String>> FromIterator<(K, V)> for LayerMapping {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let raw: BTreeMap<String, String> = iter
            .into_iter()
            .map(|(k, v)| (k.as_ref().to_string(), v.into()))
            .collect();
        raw.into()
    }
}
