//! # Exportador HTML — Orquestrador
//!
//! Conecta os estágios do motor:
//!
//! 1. Resolve o [`LayerMapping`] para cada camada lógica (POS, Chunking, NER).
//! 2. Renderiza cada camada presente com o injetor adequado:
//!    - documentos: [`inject_spans`] sobre o conteúdo bruto;
//!    - corpus: [`inject_corpus_column`] com o esquema de tags da camada.
//! 3. Monta a página com [`assemble`].
//!
//! Camadas sem chave no mapeamento, ou cuja chave não existe nos dados, são
//! simplesmente omitidas.

use tracing::debug;

use crate::assembler::{assemble, RenderedLayer};
use crate::config::ExportConfig;
use crate::corpus::Corpus;
use crate::document::Document;
use crate::encoding::{encode_page, resolve_encoding};
use crate::error::{RenderError, Result};
use crate::inject::{inject_corpus_column, inject_spans};
use crate::layers::{LayerKind, LayerMapping};

/// Exportador de documentos e corpora para HTML com abas.
///
/// Não guarda estado entre chamadas: o mesmo exportador pode ser compartilhado
/// entre threads.
#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    pub config: ExportConfig,
}

/// Página renderizada e a codificação declarada no `<meta charset>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    pub html: String,
    pub charset: &'static str,
}

impl RenderedPage {
    /// Bytes na codificação declarada.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(encode_page(&self.html, self.charset)?.into_owned())
    }
}

impl HtmlExporter {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn layers(&self) -> &LayerMapping {
        &self.config.layers
    }

    /// Renderiza as camadas de um documento presentes no mapeamento.
    pub fn render_document_layers(&self, document: &Document) -> Result<Vec<RenderedLayer>> {
        let mut rendered = Vec::new();
        for kind in LayerKind::ALL {
            let Some(key) = self.config.layers.get(kind) else {
                continue;
            };
            let Some(layer) = document.annotation_layer(key) else {
                debug!(layer = %kind, key, "camada ausente no documento, omitida");
                continue;
            };
            let markup = inject_spans(&document.content, layer.disjoint_annotations())
                .map_err(|e| e.in_layer(key))?;
            rendered.push(RenderedLayer::new(kind, markup));
        }
        Ok(rendered)
    }

    /// Renderiza as camadas de um corpus presentes no mapeamento.
    ///
    /// Tokens de uma sentença são unidos por espaço; sentenças, por quebra de linha.
    pub fn render_corpus_layers(&self, corpus: &Corpus) -> Result<Vec<RenderedLayer>> {
        let token_field = match &self.config.token_field {
            Some(name) => corpus
                .field_index(name)
                .ok_or_else(|| RenderError::UnknownField(name.clone()))?,
            None => 0,
        };

        let mut rendered = Vec::new();
        for kind in LayerKind::ALL {
            let Some(key) = self.config.layers.get(kind) else {
                continue;
            };
            let Some(tag_field) = corpus.field_index(key) else {
                debug!(layer = %kind, key, "coluna ausente no corpus, omitida");
                continue;
            };
            let sentences = inject_corpus_column(corpus, token_field, tag_field, kind.scheme())
                .map_err(|e| e.in_layer(key))?;
            let markup = sentences
                .iter()
                .map(|tokens| tokens.join(" "))
                .collect::<Vec<_>>()
                .join("\n");
            rendered.push(RenderedLayer::new(kind, markup));
        }
        Ok(rendered)
    }

    /// Página HTML de um documento; o nome do documento é o título.
    pub fn document_to_html(&self, document: &Document) -> Result<RenderedPage> {
        let charset = resolve_encoding(&self.config.encoding)?.name();
        let layers = self.render_document_layers(document)?;
        debug!(document = %document.name, layers = layers.len(), "documento renderizado");
        Ok(RenderedPage {
            html: assemble(&document.name, &layers, &self.config.stylesheets, charset),
            charset,
        })
    }

    /// Página HTML de um corpus, com título opcional.
    pub fn corpus_to_html(&self, corpus: &Corpus, name: Option<&str>) -> Result<RenderedPage> {
        let charset = resolve_encoding(&self.config.encoding)?.name();
        let layers = self.render_corpus_layers(corpus)?;
        debug!(sentences = corpus.len(), layers = layers.len(), "corpus renderizado");
        Ok(RenderedPage {
            html: assemble(name.unwrap_or(""), &layers, &self.config.stylesheets, charset),
            charset,
        })
    }
}
