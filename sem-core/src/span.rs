//! # Spans e Anotações por Offset de Caracteres
//!
//! Uma anotação de documento é um intervalo semiaberto `[lower, upper)` sobre o
//! conteúdo bruto, medido em **caracteres** (Unicode scalar values), mais um rótulo.
//!
//! Strings em Rust são indexadas por byte, então a conversão caractere -> byte é
//! feita uma única vez por renderização via [`CharIndex`].
//!
//! ## Exemplo
//! Em "Lula visitou São Paulo", a anotação de "São Paulo":
//! `Annotation { span: Span { lower: 13, upper: 22 }, value: "LOC" }`

use serde::{Deserialize, Serialize};

use crate::error::{RenderError, Result};

/// Intervalo semiaberto `[lower, upper)` de caracteres.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Span {
    /// Offset do primeiro caractere (inclusivo)
    pub lower: usize,
    /// Offset final (exclusivo)
    pub upper: usize,
}

impl Span {
    /// Cria um span não vazio. Retorna `None` se `lower >= upper`.
    pub fn new(lower: usize, upper: usize) -> Option<Self> {
        (lower < upper).then_some(Self { lower, upper })
    }

    /// Número de caracteres cobertos.
    pub fn len(&self) -> usize {
        self.upper.saturating_sub(self.lower)
    }

    pub fn is_empty(&self) -> bool {
        self.lower >= self.upper
    }

    /// Verifica se dois spans compartilham algum caractere.
    /// Spans adjacentes (`a.upper == b.lower`) não se sobrepõem.
    pub fn overlaps(&self, other: &Span) -> bool {
        self.lower < other.upper && other.lower < self.upper
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {})", self.lower, self.upper)
    }
}

/// Um span com o rótulo atribuído pelo etiquetador (ex: "PER", "NP", "NOUN").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    #[serde(flatten)]
    pub span: Span,
    pub value: String,
}

impl Annotation {
    pub fn new(value: impl Into<String>, span: Span) -> Self {
        Self {
            span,
            value: value.into(),
        }
    }
}

/// Tabela de conversão de offsets de caracteres para offsets de bytes.
///
/// `offsets[i]` é o byte onde começa o i-ésimo caractere; a última entrada é
/// `text.len()`, o que permite fatiar até o fim do texto.
pub struct CharIndex<'a> {
    text: &'a str,
    offsets: Vec<usize>,
}

impl<'a> CharIndex<'a> {
    pub fn new(text: &'a str) -> Self {
        let mut offsets: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        offsets.push(text.len());
        Self { text, offsets }
    }

    /// Tamanho do texto em caracteres.
    pub fn char_len(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Fatia `[lower, upper)` em caracteres. Retorna `None` fora dos limites.
    pub fn get(&self, lower: usize, upper: usize) -> Option<&'a str> {
        if lower > upper {
            return None;
        }
        let start = *self.offsets.get(lower)?;
        let end = *self.offsets.get(upper)?;
        Some(&self.text[start..end])
    }

    /// Fatia validada de antemão (ver [`validate_disjoint`]).
    pub(crate) fn slice(&self, lower: usize, upper: usize) -> &'a str {
        &self.text[self.offsets[lower]..self.offsets[upper]]
    }
}

/// Valida que as anotações são não vazias, cabem em `char_len` caracteres e estão
/// em ordem crescente sem sobreposição.
///
/// Anotações adjacentes são válidas.
pub fn validate_disjoint(annotations: &[Annotation], char_len: usize) -> Result<()> {
    for annotation in annotations {
        let span = annotation.span;
        if span.is_empty() {
            return Err(RenderError::MalformedAnnotations(format!(
                "span vazio ou invertido {span} ({:?})",
                annotation.value
            )));
        }
        if span.upper > char_len {
            return Err(RenderError::MalformedAnnotations(format!(
                "span {span} excede o conteúdo ({char_len} caracteres)"
            )));
        }
    }
    for pair in annotations.windows(2) {
        let (prev, next) = (pair[0].span, pair[1].span);
        if prev.upper > next.lower {
            return Err(RenderError::MalformedAnnotations(format!(
                "spans {prev} e {next} se sobrepõem ou estão fora de ordem"
            )));
        }
    }
    Ok(())
}
