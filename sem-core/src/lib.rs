//! # sem-core — Renderização de Anotações Linguísticas em HTML
//!
//! Este crate converte anotações linguísticas (classes gramaticais, chunking e entidades
//! nomeadas) em uma única página HTML com abas. Ele não decide *quais* rótulos atribuir;
//! isso é trabalho do etiquetador externo. Aqui só transformamos rótulos prontos em
//! marcação corretamente escapada e aninhada.
//!
//! ## Arquitetura do Sistema
//!
//! Duas representações de entrada, um único formato de saída:
//!
//! 1.  **Documento** ([`document`]): texto bruto + anotações por offset de caracteres
//!     ([`span`]). Renderizado por [`inject::inject_spans`].
//! 2.  **Corpus** ([`corpus`]): sentenças tokenizadas com uma coluna de tags por camada
//!     ([`tagger`]: BIO2 ou continuação). Renderizado por [`inject::inject_tag_spans`].
//! 3.  **Escape** ([`escape`]): aplicado antes de qualquer marcação estrutural.
//! 4.  **Montagem** ([`assembler`]): até três camadas viram abas em CSS puro.
//! 5.  **Saída**: [`exporter::RenderedPage`], convertida para a codificação pedida
//!     ([`encoding`]).
//!
//! ## Exemplo de Uso
//!
//! ```rust
//! use sem_core::{Corpus, ExportConfig, HtmlExporter, LayerKind, LayerMapping};
//!
//! let text = "Lula\tB-PER\nvisitou\tO\nBrasília\tB-LOC\n";
//! let corpus = Corpus::from_tabular(text, vec!["word".into(), "ner".into()]).unwrap();
//!
//! let config = ExportConfig::default()
//!     .with_layers(LayerMapping::new().with(LayerKind::Ner, "ner"));
//! let page = HtmlExporter::new(config)
//!     .corpus_to_html(&corpus, Some("Exemplo"))
//!     .unwrap();
//!
//! assert!(page.html.contains(r#"<span id="PER" title="PER">Lula</span>"#));
//! assert!(page.html.contains(r#"<label for="tab1">Named Entity</label>"#));
//! ```
//!
//! ## Módulos Principais
//!
//! - [`exporter`]: Orquestrador que conecta mapeamento, injetores e montagem.
//! - [`inject`]: Algoritmos de injeção de marcação.
//! - [`assembler`]: Página com abas.

pub mod assembler;
pub mod config;
pub mod corpus;
pub mod document;
pub mod encoding;
pub mod error;
pub mod escape;
pub mod exporter;
pub mod inject;
pub mod layers;
pub mod span;
pub mod tagger;

pub use assembler::{assemble, RenderedLayer, DEFAULT_CSS, TABS_CSS};
pub use config::{ExportConfig, Stylesheets};
pub use corpus::Corpus;
pub use document::{AnnotationLayer, Document};
pub use error::{RenderError, Result};
pub use exporter::{HtmlExporter, RenderedPage};
pub use inject::{inject_spans, inject_tag_spans};
pub use layers::{LayerKind, LayerMapping};
pub use span::{Annotation, Span};
pub use tagger::{BioTag, TagRun, TagScheme};
