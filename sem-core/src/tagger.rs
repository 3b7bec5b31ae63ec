//! # Esquemas de Tags por Token
//!
//! Um corpus anotado traz uma coluna de tags por token. Dois esquemas são suportados:
//!
//! ## BIO2 (chunking e entidades nomeadas)
//!
//! - `B-TIPO` (Begin): primeiro token de um trecho
//! - `I-TIPO` (Inside): continuação do trecho do mesmo tipo
//! - `O` (Outside): fora de qualquer trecho
//!
//! ## Continuação (classes gramaticais)
//!
//! Um rótulo literal inicia um trecho e `_` estende o trecho anterior. É uma
//! codificação run-length implícita: `["PROPN", "_", "VERB"]` -> `São Paulo` forma
//! um único trecho PROPN. `O` significa "sem rótulo", como no BIO2.
//!
//! Os dois esquemas são decodificados em [`TagRun`]s numa única passada.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{RenderError, Result};

/// Marcador de continuação do esquema de classes gramaticais.
pub const CONTINUATION: &str = "_";

/// Tag BIO2 de um token, com tipo livre (ex: "PER", "NP").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BioTag {
    /// **Begin**: Marca o INÍCIO de um trecho. Ex: **São** (B-LOC) Paulo.
    Begin(String),
    /// **Inside**: Marca a CONTINUAÇÃO de um trecho. Ex: São **Paulo** (I-LOC).
    Inside(String),
    /// **Outside**: O token não faz parte de nenhum trecho.
    Outside,
}

impl BioTag {
    /// Representação textual da tag (ex: "B-PER", "I-NP", "O")
    pub fn label(&self) -> String {
        match self {
            BioTag::Begin(t) => format!("B-{t}"),
            BioTag::Inside(t) => format!("I-{t}"),
            BioTag::Outside => "O".to_string(),
        }
    }

    /// Tipo do trecho (se for B- ou I-)
    pub fn kind(&self) -> Option<&str> {
        match self {
            BioTag::Begin(t) | BioTag::Inside(t) => Some(t),
            BioTag::Outside => None,
        }
    }

    /// Verifica se `next` continua o trecho aberto por `prev`.
    ///
    /// Só `I-X` depois de `B-X` ou `I-X` (mesmo tipo) continua um trecho.
    pub fn continues(prev: &BioTag, next: &BioTag) -> bool {
        match (prev, next) {
            (BioTag::Begin(p) | BioTag::Inside(p), BioTag::Inside(n)) => p == n,
            _ => false,
        }
    }

    /// Parseia uma tag a partir de string (ex: "B-PER" → Begin("PER"))
    pub fn from_label(s: &str) -> Option<Self> {
        if s == "O" {
            return Some(BioTag::Outside);
        }
        let (prefix, kind) = s.split_once('-')?;
        if kind.is_empty() {
            return None;
        }
        match prefix {
            "B" => Some(BioTag::Begin(kind.to_string())),
            "I" => Some(BioTag::Inside(kind.to_string())),
            _ => None,
        }
    }
}

impl std::fmt::Display for BioTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Tag do esquema de continuação.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContinuationTag {
    /// Rótulo literal: inicia um novo trecho.
    Label(String),
    /// `_`: herda o trecho do token anterior.
    Continue,
    /// `O`: token sem rótulo.
    Outside,
}

impl ContinuationTag {
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "" => None,
            CONTINUATION => Some(ContinuationTag::Continue),
            "O" => Some(ContinuationTag::Outside),
            _ => Some(ContinuationTag::Label(s.to_string())),
        }
    }
}

/// Trecho contíguo de tokens `[start, end)` com um rótulo.
///
/// # Exemplo
/// `[B-PER, I-PER, O, B-LOC]` -> `TagRun { 0, 2, "PER" }`, `TagRun { 3, 4, "LOC" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagRun {
    /// Índice do token inicial (inclusivo)
    pub start: usize,
    /// Índice do token final (exclusivo)
    pub end: usize,
    pub label: String,
}

impl TagRun {
    fn new(start: usize, end: usize, label: &str) -> Self {
        Self {
            start,
            end,
            label: label.to_string(),
        }
    }
}

/// Esquema de codificação de uma coluna de tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagScheme {
    /// `B-`/`I-`/`O` (chunking, entidades nomeadas)
    Bio,
    /// Rótulo literal + `_` (classes gramaticais)
    Continuation,
}

impl TagScheme {
    /// Decodifica as tags de uma sentença em trechos.
    ///
    /// `sentence` só é usado nas mensagens de erro.
    pub fn decode<S: AsRef<str>>(&self, tags: &[S], sentence: usize) -> Result<Vec<TagRun>> {
        match self {
            TagScheme::Bio => Ok(bio_runs(&parse_bio(tags, sentence)?)),
            TagScheme::Continuation => Ok(continuation_runs(&parse_continuation(tags, sentence)?)),
        }
    }
}

/// Parseia uma coluna BIO2. Qualquer valor fora de `O`/`B-X`/`I-X` é rejeitado.
pub fn parse_bio<S: AsRef<str>>(tags: &[S], sentence: usize) -> Result<Vec<BioTag>> {
    tags.iter()
        .enumerate()
        .map(|(token, tag)| {
            BioTag::from_label(tag.as_ref()).ok_or_else(|| RenderError::InvalidTagEncoding {
                sentence,
                token,
                value: tag.as_ref().to_string(),
            })
        })
        .collect()
}

/// Parseia uma coluna no esquema de continuação.
///
/// Valores vazios e um `_` no primeiro token (nada a herdar) são rejeitados.
pub fn parse_continuation<S: AsRef<str>>(tags: &[S], sentence: usize) -> Result<Vec<ContinuationTag>> {
    tags.iter()
        .enumerate()
        .map(|(token, tag)| {
            let invalid = || RenderError::InvalidTagEncoding {
                sentence,
                token,
                value: tag.as_ref().to_string(),
            };
            match ContinuationTag::from_label(tag.as_ref()) {
                Some(ContinuationTag::Continue) if token == 0 => Err(invalid()),
                Some(parsed) => Ok(parsed),
                None => Err(invalid()),
            }
        })
        .collect()
}

/// Converte tags BIO2 em trechos.
///
/// Máquina de estados do BIO2:
/// - `B-X` fecha o trecho aberto e inicia outro do tipo X.
/// - `I-X` continua o trecho aberto se ele for do tipo X.
/// - `I-X` sem trecho compatível aberto é tratado como um `B-X` implícito.
/// - `O` fecha o trecho aberto.
pub fn bio_runs(tags: &[BioTag]) -> Vec<TagRun> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, &str)> = None;

    for (i, tag) in tags.iter().enumerate() {
        match tag {
            BioTag::Outside => {
                if let Some((start, label)) = current.take() {
                    runs.push(TagRun::new(start, i, label));
                }
            }
            BioTag::Begin(kind) => {
                if let Some((start, label)) = current.take() {
                    runs.push(TagRun::new(start, i, label));
                }
                current = Some((i, kind.as_str()));
            }
            BioTag::Inside(kind) => {
                let continues = matches!(current, Some((_, label)) if label == kind.as_str());
                if !continues {
                    debug!(token = i, tag = %tag, "I- sem B- correspondente, tratado como início");
                    if let Some((start, label)) = current.take() {
                        runs.push(TagRun::new(start, i, label));
                    }
                    current = Some((i, kind.as_str()));
                }
            }
        }
    }

    // Fecha o último trecho se aberto
    if let Some((start, label)) = current {
        runs.push(TagRun::new(start, tags.len(), label));
    }
    runs
}

/// Converte tags de continuação em trechos.
///
/// Um `_` depois de `O` continua "fora" e não gera trecho.
pub fn continuation_runs(tags: &[ContinuationTag]) -> Vec<TagRun> {
    let mut runs = Vec::new();
    let mut current: Option<(usize, &str)> = None;

    for (i, tag) in tags.iter().enumerate() {
        match tag {
            ContinuationTag::Continue => {}
            ContinuationTag::Label(label) => {
                if let Some((start, open)) = current.take() {
                    runs.push(TagRun::new(start, i, open));
                }
                current = Some((i, label.as_str()));
            }
            ContinuationTag::Outside => {
                if let Some((start, open)) = current.take() {
                    runs.push(TagRun::new(start, i, open));
                }
            }
        }
    }

    if let Some((start, label)) = current {
        runs.push(TagRun::new(start, tags.len(), label));
    }
    runs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_labels() {
        assert_eq!(BioTag::Outside.label(), "O");
        assert_eq!(BioTag::Begin("PER".into()).label(), "B-PER");
        assert_eq!(BioTag::Inside("LOC".into()).to_string(), "I-LOC");
    }

    #[test]
    fn test_tag_from_label() {
        assert_eq!(BioTag::from_label("O"), Some(BioTag::Outside));
        assert_eq!(BioTag::from_label("B-PER"), Some(BioTag::Begin("PER".into())));
        // o tipo pode conter hífens
        assert_eq!(BioTag::from_label("I-B-X"), Some(BioTag::Inside("B-X".into())));
        assert_eq!(BioTag::from_label("B-"), None);
        assert_eq!(BioTag::from_label("E-PER"), None);
        assert_eq!(BioTag::from_label("PER"), None);
    }

    #[test]
    fn test_continues() {
        let b_per = BioTag::Begin("PER".into());
        let i_per = BioTag::Inside("PER".into());
        assert!(BioTag::continues(&b_per, &i_per));
        assert!(BioTag::continues(&i_per, &i_per));
        assert!(!BioTag::continues(&BioTag::Outside, &i_per));
        assert!(!BioTag::continues(&BioTag::Begin("ORG".into()), &i_per));
        assert!(!BioTag::continues(&b_per, &BioTag::Begin("PER".into())));
    }

    #[test]
    fn test_bio_runs() {
        let runs = TagScheme::Bio
            .decode(&["O", "B-PER", "I-PER", "O", "B-LOC"], 0)
            .unwrap();
        assert_eq!(
            runs,
            vec![TagRun::new(1, 3, "PER"), TagRun::new(4, 5, "LOC")]
        );
    }

    #[test]
    fn test_bio_adjacent_begins() {
        let runs = TagScheme::Bio.decode(&["B-NP", "B-NP", "I-NP"], 0).unwrap();
        assert_eq!(runs, vec![TagRun::new(0, 1, "NP"), TagRun::new(1, 3, "NP")]);
    }

    #[test]
    fn test_mismatched_inside_opens_new_run() {
        let runs = TagScheme::Bio
            .decode(&["B-ORG", "I-PER", "I-PER", "O", "I-LOC"], 0)
            .unwrap();
        assert_eq!(
            runs,
            vec![
                TagRun::new(0, 1, "ORG"),
                TagRun::new(1, 3, "PER"),
                TagRun::new(4, 5, "LOC"),
            ]
        );
    }

    #[test]
    fn test_bio_rejects_unknown_prefix() {
        let err = TagScheme::Bio.decode(&["O", "S-PER"], 7).unwrap_err();
        match err {
            RenderError::InvalidTagEncoding { sentence, token, value } => {
                assert_eq!((sentence, token, value.as_str()), (7, 1, "S-PER"));
            }
            other => panic!("erro inesperado: {other:?}"),
        }
    }

    #[test]
    fn test_continuation_runs() {
        let runs = TagScheme::Continuation.decode(&["NOUN", "_", "O"], 0).unwrap();
        assert_eq!(runs, vec![TagRun::new(0, 2, "NOUN")]);
    }

    #[test]
    fn test_continuation_literal_labels() {
        let runs = TagScheme::Continuation
            .decode(&["DET", "ADJ", "NOUN"], 0)
            .unwrap();
        assert_eq!(
            runs,
            vec![
                TagRun::new(0, 1, "DET"),
                TagRun::new(1, 2, "ADJ"),
                TagRun::new(2, 3, "NOUN"),
            ]
        );
    }

    #[test]
    fn test_continuation_after_outside_stays_outside() {
        let runs = TagScheme::Continuation.decode(&["O", "_", "VERB"], 0).unwrap();
        assert_eq!(runs, vec![TagRun::new(2, 3, "VERB")]);
    }

    #[test]
    fn test_continuation_rejects_leading_marker() {
        assert!(TagScheme::Continuation.decode(&["_", "NOUN"], 0).is_err());
        assert!(TagScheme::Continuation.decode(&["NOUN", ""], 0).is_err());
    }

    #[test]
    fn test_empty_sentence() {
        let empty: [&str; 0] = [];
        assert!(TagScheme::Bio.decode(&empty, 0).unwrap().is_empty());
        assert!(TagScheme::Continuation.decode(&empty, 0).unwrap().is_empty());
    }
}
