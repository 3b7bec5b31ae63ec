//! # Injeção de Marcação
//!
//! Envolve cada trecho anotado num contêiner inline rotulado:
//! `<span id="RÓTULO" title="RÓTULO">…</span>`.
//!
//! ## Documentos (offsets de caracteres)
//!
//! [`inject_spans`] percorre as anotações **do fim para o começo**. Cada fatia é
//! recortada do conteúdo original imutável, então os offsets das anotações
//! anteriores nunca são invalidados pelas inserções já feitas à direita. As partes
//! são acumuladas ao contrário e invertidas no final.
//!
//! ## Corpus (tags por token)
//!
//! [`inject_tag_spans`] decodifica a coluna de tags em [`TagRun`]s e, numa passada,
//! abre o contêiner no primeiro token de cada trecho e fecha no último.

use rayon::prelude::*;

use crate::corpus::Corpus;
use crate::error::{RenderError, Result};
use crate::escape::{escape, escape_content};
use crate::span::{validate_disjoint, Annotation, CharIndex};
use crate::tagger::{TagRun, TagScheme};

/// Marcador de fechamento de um trecho.
pub const CLOSE_MARKER: &str = "</span>";

/// Marcador de abertura com o rótulo como identificador e como título.
pub fn open_marker(label: &str) -> String {
    let label = escape(label);
    format!(r#"<span id="{label}" title="{label}">"#)
}

/// Gera a marcação de um documento a partir das anotações de uma camada.
///
/// As anotações devem estar em ordem crescente e sem sobreposição; caso contrário
/// retorna [`RenderError::MalformedAnnotations`]
/// em vez de produzir HTML mal aninhado. Sem anotações, o conteúdo inteiro é apenas
/// escapado.
pub fn inject_spans(content: &str, annotations: &[Annotation]) -> Result<String> {
    let index = CharIndex::new(content);
    validate_disjoint(annotations, index.char_len())?;

    let mut parts: Vec<String> = Vec::with_capacity(annotations.len() * 4 + 1);
    let mut last = index.char_len();
    for annotation in annotations.iter().rev() {
        let span = annotation.span;
        parts.push(escape_content(index.slice(span.upper, last)));
        parts.push(CLOSE_MARKER.to_string());
        parts.push(escape_content(index.slice(span.lower, span.upper)));
        parts.push(open_marker(&annotation.value));
        last = span.lower;
    }
    parts.push(escape_content(index.slice(0, last)));

    parts.reverse();
    Ok(parts.concat())
}

/// Gera a marcação de uma sentença: uma string por token.
///
/// O chamador junta os tokens com os separadores originais.
pub fn inject_tag_spans<S, T>(tokens: &[S], tags: &[T], scheme: TagScheme) -> Result<Vec<String>>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    inject_sentence(0, tokens, tags, scheme)
}

pub(crate) fn inject_sentence<S, T>(
    sentence: usize,
    tokens: &[S],
    tags: &[T],
    scheme: TagScheme,
) -> Result<Vec<String>>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    if tokens.len() != tags.len() {
        return Err(RenderError::TokenTagMismatch {
            tokens: tokens.len(),
            tags: tags.len(),
        });
    }
    let runs = scheme.decode(tags, sentence)?;
    Ok(wrap_runs(tokens, &runs))
}

/// Escapa cada token e envolve os trechos: abertura antes do primeiro token do
/// trecho, fechamento depois do último. Tokens fora de trechos passam intactos.
pub fn wrap_runs<S: AsRef<str>>(tokens: &[S], runs: &[TagRun]) -> Vec<String> {
    let mut markup: Vec<String> = tokens.iter().map(|t| escape(t.as_ref())).collect();
    for run in runs {
        debug_assert!(run.start < run.end && run.end <= markup.len());
        markup[run.start].insert_str(0, &open_marker(&run.label));
        markup[run.end - 1].push_str(CLOSE_MARKER);
    }
    markup
}

/// Gera a marcação de uma coluna inteira do corpus, sentença por sentença.
///
/// As sentenças são independentes e processadas em paralelo; a ordem é preservada.
pub fn inject_corpus_column(
    corpus: &Corpus,
    token_field: usize,
    tag_field: usize,
    scheme: TagScheme,
) -> Result<Vec<Vec<String>>> {
    (0..corpus.sentences.len())
        .into_par_iter()
        .map(|i| {
            let tokens = corpus.column(i, token_field)?;
            let tags = corpus.column(i, tag_field)?;
            inject_sentence(i, &tokens, &tags, scheme)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::escape::unescape;
    use crate::span::Span;
    use proptest::prelude::*;

    fn ann(value: &str, lower: usize, upper: usize) -> Annotation {
        Annotation::new(value, Span { lower, upper })
    }

    /// Remove todos os marcadores e decodifica as entidades.
    fn plain_text(markup: &str) -> String {
        let mut out = String::new();
        let mut in_tag = false;
        for c in markup.chars() {
            match c {
                '<' => in_tag = true,
                '>' if in_tag => in_tag = false,
                _ if !in_tag => out.push(c),
                _ => {}
            }
        }
        unescape(&out)
    }

    /// Profundidade máxima de aninhamento; `None` se algum fechamento não tiver abertura.
    fn max_depth(markup: &str) -> Option<usize> {
        let mut depth = 0usize;
        let mut max = 0usize;
        let mut rest = markup;
        while let Some(pos) = rest.find('<') {
            rest = &rest[pos..];
            if rest.starts_with("<span ") {
                depth += 1;
                max = max.max(depth);
            } else if rest.starts_with(CLOSE_MARKER) {
                depth = depth.checked_sub(1)?;
            }
            rest = &rest[1..];
        }
        (depth == 0).then_some(max)
    }

    #[test]
    fn test_no_annotations_only_escapes() {
        let out = inject_spans("a < b\nc", &[]).unwrap();
        assert_eq!(out, "a &lt; b<br />\nc");
    }

    #[test]
    fn test_single_annotation() {
        let out = inject_spans("Lula visitou Paris.", &[ann("PER", 0, 4), ann("LOC", 13, 18)]).unwrap();
        assert_eq!(
            out,
            r#"<span id="PER" title="PER">Lula</span> visitou <span id="LOC" title="LOC">Paris</span>."#
        );
    }

    #[test]
    fn test_adjacent_annotations_have_no_gap() {
        let out = inject_spans("ab", &[ann("X", 0, 1), ann("Y", 1, 2)]).unwrap();
        assert_eq!(
            out,
            r#"<span id="X" title="X">a</span><span id="Y" title="Y">b</span>"#
        );
    }

    #[test]
    fn test_char_offsets_with_multibyte_text() {
        let out = inject_spans("Em São Paulo", &[ann("LOC", 3, 12)]).unwrap();
        assert_eq!(out, r#"Em <span id="LOC" title="LOC">São Paulo</span>"#);
    }

    #[test]
    fn test_annotation_across_newline() {
        let out = inject_spans("a\r\nb", &[ann("X", 0, 4)]).unwrap();
        assert_eq!(out, r#"<span id="X" title="X">a<br />"#.to_string() + "\r\nb</span>");
    }

    #[test]
    fn test_label_is_escaped() {
        let out = inject_spans("x", &[ann(r#"a"b"#, 0, 1)]).unwrap();
        assert_eq!(out, r#"<span id="a&quot;b" title="a&quot;b">x</span>"#);
    }

    #[test]
    fn test_overlap_fails_fast() {
        let err = inject_spans("abcdef", &[ann("A", 0, 3), ann("B", 2, 5)]).unwrap_err();
        assert!(matches!(err, RenderError::MalformedAnnotations(_)));
    }

    #[test]
    fn test_bio_example() {
        let out = inject_tag_spans(
            &["John", "likes", "Paris"],
            &["B-PER", "O", "B-LOC"],
            TagScheme::Bio,
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                r#"<span id="PER" title="PER">John</span>"#.to_string(),
                "likes".to_string(),
                r#"<span id="LOC" title="LOC">Paris</span>"#.to_string(),
            ]
        );
    }

    #[test]
    fn test_bio_multi_token_run() {
        let out = inject_tag_spans(
            &["o", "Rio", "de", "Janeiro", "<3"],
            &["O", "B-LOC", "I-LOC", "I-LOC", "O"],
            TagScheme::Bio,
        )
        .unwrap();
        assert_eq!(out[1], r#"<span id="LOC" title="LOC">Rio"#);
        assert_eq!(out[2], "de");
        assert_eq!(out[3], "Janeiro</span>");
        assert_eq!(out[4], "&lt;3");
    }

    #[test]
    fn test_continuation_example() {
        let out = inject_tag_spans(
            &["New", "York", "."],
            &["NOUN", "_", "O"],
            TagScheme::Continuation,
        )
        .unwrap();
        assert_eq!(
            out,
            vec![
                r#"<span id="NOUN" title="NOUN">New"#.to_string(),
                "York</span>".to_string(),
                ".".to_string(),
            ]
        );
    }

    #[test]
    fn test_continuation_single_token_runs() {
        let out = inject_tag_spans(
            &["the", "big", "dog"],
            &["DET", "ADJ", "NOUN"],
            TagScheme::Continuation,
        )
        .unwrap();
        assert_eq!(out[1], r#"<span id="ADJ" title="ADJ">big</span>"#);
    }

    #[test]
    fn test_token_tag_length_mismatch() {
        let err = inject_tag_spans(&["a", "b"], &["O"], TagScheme::Bio).unwrap_err();
        assert!(matches!(err, RenderError::TokenTagMismatch { tokens: 2, tags: 1 }));
    }

    #[test]
    fn test_corpus_column_keeps_sentence_order() {
        let corpus = crate::corpus::demo_corpus();
        let word = corpus.field_index("word").unwrap();
        let ner = corpus.field_index("ner").unwrap();
        let rendered = inject_corpus_column(&corpus, word, ner, TagScheme::Bio).unwrap();
        assert_eq!(rendered.len(), corpus.sentences.len());
        for (i, sentence) in rendered.iter().enumerate() {
            assert_eq!(sentence.len(), corpus.sentences[i].len());
        }
    }

    /// Conteúdo arbitrário e anotações disjuntas em ordem crescente.
    fn content_and_annotations() -> impl Strategy<Value = (String, Vec<Annotation>)> {
        "[a-zé&<>\"' \r\n]{0,40}".prop_flat_map(|content| {
            let len = content.chars().count();
            (
                Just(content),
                prop::collection::vec(0..=len, 0..12),
                prop::collection::vec("[A-Z]{1,4}", 6),
            )
                .prop_map(|(content, mut cuts, labels)| {
                    cuts.sort_unstable();
                    cuts.dedup();
                    let annotations = cuts
                        .chunks_exact(2)
                        .zip(labels.iter().cycle())
                        .map(|(pair, label)| ann(label, pair[0], pair[1]))
                        .collect();
                    (content, annotations)
                })
        })
    }

    proptest! {
        #[test]
        fn prop_unwrapped_text_round_trips(content in "[a-zé&<>\"' \r\n]{0,40}") {
            let out = inject_spans(&content, &[]).unwrap();
            prop_assert_eq!(unescape(&out), content);
        }

        #[test]
        fn prop_one_marker_pair_per_annotation((content, annotations) in content_and_annotations()) {
            let out = inject_spans(&content, &annotations).unwrap();
            prop_assert_eq!(out.matches("<span ").count(), annotations.len());
            prop_assert_eq!(out.matches(CLOSE_MARKER).count(), annotations.len());
            let depth = max_depth(&out);
            prop_assert!(depth.is_some());
            prop_assert!(depth.unwrap_or(0) <= 1);
        }

        #[test]
        fn prop_text_order_is_preserved((content, annotations) in content_and_annotations()) {
            let out = inject_spans(&content, &annotations).unwrap();
            prop_assert_eq!(plain_text(&out), content);
        }
    }
}
