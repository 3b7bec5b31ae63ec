//! # Corpus Tabular
//!
//! Um corpus é uma sequência de sentenças; cada sentença é uma sequência de tokens e
//! cada token é uma lista de valores indexada por uma lista de campos compartilhada
//! (ex: `["word", "pos", "chunk", "ner"]`).
//!
//! ## Formato Tabular
//!
//! É o formato de linha usado pelo etiquetador CRF externo: um token por linha,
//! colunas separadas por tabulação ou espaços, linha em branco entre sentenças.
//!
//! ```text
//! Lula     PROPN  B-NP  B-PER
//! visitou  VERB   B-VP  O
//!
//! Brasília PROPN  B-NP  B-LOC
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};
use crate::layers::{LayerKind, LayerMapping};

/// Valores de um token, na ordem de [`Corpus::fields`].
pub type TokenRecord = Vec<String>;

/// Tokens de uma sentença.
pub type Sentence = Vec<TokenRecord>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Corpus {
    /// Nomes das colunas
    pub fields: Vec<String>,
    pub sentences: Vec<Sentence>,
}

impl Corpus {
    pub fn new(fields: Vec<String>) -> Self {
        Self {
            fields,
            sentences: Vec::new(),
        }
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field_index(name).is_some()
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f == name)
    }

    pub fn push_sentence(&mut self, sentence: Sentence) {
        self.sentences.push(sentence);
    }

    pub fn len(&self) -> usize {
        self.sentences.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sentences.is_empty()
    }

    /// Valores de um campo para todos os tokens de uma sentença.
    pub fn column(&self, sentence: usize, field: usize) -> Result<Vec<&str>> {
        let tokens = self.sentences.get(sentence).map(Vec::as_slice).unwrap_or(&[]);
        tokens
            .iter()
            .enumerate()
            .map(|(token, record)| {
                record.get(field).map(String::as_str).ok_or(RenderError::MissingValue {
                    sentence,
                    token,
                    field,
                })
            })
            .collect()
    }

    /// Lê um corpus no formato tabular.
    ///
    /// Cada linha não vazia deve ter exatamente `fields.len()` colunas.
    /// Linhas em branco consecutivas não geram sentenças vazias.
    pub fn from_tabular(text: &str, fields: Vec<String>) -> Result<Self> {
        let mut corpus = Corpus::new(fields);
        let mut current: Sentence = Vec::new();

        for (n, line) in text.lines().enumerate() {
            let values: Vec<&str> = line.split_whitespace().collect();
            if values.is_empty() {
                if !current.is_empty() {
                    corpus.push_sentence(std::mem::take(&mut current));
                }
                continue;
            }
            if values.len() != corpus.fields.len() {
                return Err(RenderError::CorpusFormat {
                    line: n + 1,
                    reason: format!(
                        "{} colunas, esperado {}",
                        values.len(),
                        corpus.fields.len()
                    ),
                });
            }
            current.push(values.into_iter().map(str::to_string).collect());
        }
        if !current.is_empty() {
            corpus.push_sentence(current);
        }
        Ok(corpus)
    }

    /// Serializa de volta para o formato tabular (colunas separadas por tabulação).
    pub fn to_tabular(&self) -> String {
        self.sentences
            .iter()
            .map(|sentence| {
                sentence
                    .iter()
                    .map(|record| record.join("\t") + "\n")
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Corpus de demonstração: palavra, classe gramatical, chunk e entidade.
///
/// A coluna `pos` usa o esquema de continuação para nomes compostos.
pub fn demo_corpus() -> Corpus {
    const SENTENCES: &[&[(&str, &str, &str, &str)]] = &[
        &[
            ("O", "DET", "B-NP", "O"),
            ("Hospital", "PROPN", "I-NP", "B-ORG"),
            ("Albert", "_", "I-NP", "I-ORG"),
            ("Einstein", "_", "I-NP", "I-ORG"),
            ("fica", "VERB", "B-VP", "O"),
            ("em", "ADP", "B-PP", "O"),
            ("São", "PROPN", "B-NP", "B-LOC"),
            ("Paulo", "_", "I-NP", "I-LOC"),
            (".", "PUNCT", "O", "O"),
        ],
        &[
            ("Dom", "PROPN", "B-NP", "B-PER"),
            ("Pedro", "_", "I-NP", "I-PER"),
            ("I", "_", "I-NP", "I-PER"),
            ("proclamou", "VERB", "B-VP", "O"),
            ("a", "DET", "B-NP", "O"),
            ("Independência", "NOUN", "I-NP", "B-MISC"),
            ("em", "ADP", "B-PP", "O"),
            ("1822", "NUM", "B-NP", "O"),
            (".", "PUNCT", "O", "O"),
        ],
        &[
            ("A", "DET", "B-NP", "O"),
            ("Petrobras", "PROPN", "I-NP", "B-ORG"),
            ("&", "CCONJ", "I-NP", "O"),
            ("a", "DET", "I-NP", "O"),
            ("Shell", "PROPN", "I-NP", "B-ORG"),
            ("assinaram", "VERB", "B-VP", "O"),
            ("o", "DET", "B-NP", "O"),
            ("acordo", "NOUN", "I-NP", "O"),
            ("\"", "PUNCT", "O", "O"),
            ("Bacia", "PROPN", "B-NP", "B-LOC"),
            ("de", "_", "I-NP", "I-LOC"),
            ("Santos", "_", "I-NP", "I-LOC"),
            ("\"", "PUNCT", "O", "O"),
            (".", "PUNCT", "O", "O"),
        ],
    ];

    let mut corpus = Corpus::new(
        ["word", "pos", "chunk", "ner"]
            .iter()
            .map(|f| f.to_string())
            .collect(),
    );
    for sentence in SENTENCES {
        corpus.push_sentence(
            sentence
                .iter()
                .map(|(w, p, c, n)| vec![w.to_string(), p.to_string(), c.to_string(), n.to_string()])
                .collect(),
        );
    }
    corpus
}

/// Mapeamento das camadas para as colunas de [`demo_corpus`].
pub fn demo_mapping() -> LayerMapping {
    LayerMapping::new()
        .with(LayerKind::Pos, "pos")
        .with(LayerKind::Chunking, "chunk")
        .with(LayerKind::Ner, "ner")
}
