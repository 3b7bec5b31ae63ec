//! # Configuração da Exportação
//!
//! Tudo o que o motor precisa saber além dos dados: o mapeamento das camadas, a
//! codificação de saída e as duas folhas de estilo referenciadas pela página.
//!
//! ```json
//! {
//!   "layers": {"pos": "POS", "chunking": "chunk", "ner": "NE"},
//!   "encoding": "utf-8",
//!   "stylesheets": {"tabs": "tabs.css", "lang": "default.css"},
//!   "token_field": "word"
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layers::LayerMapping;

/// Folhas de estilo referenciadas pelo cabeçalho da página.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Stylesheets {
    /// Folha fixa que implementa as abas
    pub tabs: String,
    /// Folha de idioma/tema fornecida pelo chamador
    pub lang: String,
}

impl Default for Stylesheets {
    fn default() -> Self {
        Self {
            tabs: "tabs.css".to_string(),
            lang: "default.css".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub layers: LayerMapping,
    /// Rótulo da codificação de saída (ex: "utf-8", "iso-8859-1")
    pub encoding: String,
    pub stylesheets: Stylesheets,
    /// Coluna com o texto dos tokens; `None` usa a primeira coluna.
    pub token_field: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layers: LayerMapping::default(),
            encoding: "utf-8".to_string(),
            stylesheets: Stylesheets::default(),
            token_field: None,
        }
    }
}

impl ExportConfig {
    pub fn with_layers(mut self, layers: LayerMapping) -> Self {
        self.layers = layers;
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
