//! # Documento Anotado
//!
//! Um documento guarda o conteúdo bruto (imutável), segmentações nomeadas (ex:
//! `"tokens"`) e camadas de anotação por offset de caracteres.
//!
//! Depois que o etiquetador externo rotula os tokens, as tags BIO de cada sentença
//! são convertidas em anotações de documento por [`Document::add_annotation_from_tags`].

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::span::{Annotation, Span};
use crate::tagger::TagScheme;

/// Nome da segmentação de tokens.
pub const TOKENS: &str = "tokens";

/// Conjunto de anotações disjuntas, em ordem crescente de `lower`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationLayer {
    pub name: String,
    pub annotations: Vec<Annotation>,
}

impl AnnotationLayer {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            annotations: Vec::new(),
        }
    }

    /// Insere mantendo a ordem por `lower`.
    pub fn push(&mut self, annotation: Annotation) {
        let pos = self
            .annotations
            .partition_point(|a| a.span.lower <= annotation.span.lower);
        self.annotations.insert(pos, annotation);
    }

    pub fn disjoint_annotations(&self) -> &[Annotation] {
        &self.annotations
    }

    pub fn len(&self) -> usize {
        self.annotations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.annotations.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub name: String,
    pub content: String,
    #[serde(default)]
    pub segmentations: BTreeMap<String, Vec<Span>>,
    #[serde(default)]
    pub annotations: BTreeMap<String, AnnotationLayer>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn segmentation(&self, name: &str) -> Option<&[Span]> {
        self.segmentations.get(name).map(Vec::as_slice)
    }

    pub fn add_segmentation(&mut self, name: impl Into<String>, spans: Vec<Span>) {
        self.segmentations.insert(name.into(), spans);
    }

    pub fn annotation_layer(&self, name: &str) -> Option<&AnnotationLayer> {
        self.annotations.get(name)
    }

    pub fn has_annotation(&self, name: &str) -> bool {
        self.annotations.contains_key(name)
    }

    pub fn add_annotation_layer(&mut self, layer: AnnotationLayer) {
        self.annotations.insert(layer.name.clone(), layer);
    }

    /// Cria a camada `name` a partir das tags de cada sentença.
    ///
    /// As sentenças são concatenadas na ordem da segmentação `"tokens"`; o total de
    /// tags deve ser igual ao número de tokens. Cada trecho vira uma anotação que vai
    /// do início do primeiro token ao fim do último.
    pub fn add_annotation_from_tags<S: AsRef<str>>(
        &mut self,
        tags: &[Vec<S>],
        name: &str,
        scheme: TagScheme,
    ) -> Result<()> {
        let tokens = self
            .segmentation(TOKENS)
            .ok_or_else(|| RenderError::MissingSegmentation(TOKENS.to_string()))?;
        let total: usize = tags.iter().map(Vec::len).sum();
        if total != tokens.len() {
            return Err(RenderError::TokenTagMismatch {
                tokens: tokens.len(),
                tags: total,
            });
        }

        let mut layer = AnnotationLayer::new(name);
        let mut offset = 0;
        for (i, sentence) in tags.iter().enumerate() {
            for run in scheme.decode(sentence, i)? {
                let span = Span {
                    lower: tokens[offset + run.start].lower,
                    upper: tokens[offset + run.end - 1].upper,
                };
                layer.annotations.push(Annotation::new(run.label, span));
            }
            offset += sentence.len();
        }

        self.add_annotation_layer(layer);
        Ok(())
    }
}
