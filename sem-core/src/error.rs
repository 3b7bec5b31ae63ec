//! # Erros do Renderizador
//!
//! Todas as falhas do motor são representadas por [`RenderError`]. As funções de
//! renderização são puras: um erro significa que a entrada viola alguma pré-condição
//! (spans sobrepostos, tag desconhecida, coluna ausente), nunca uma falha transitória.

use thiserror::Error;

/// Erro de renderização de anotações.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Spans vazios, fora dos limites do conteúdo, fora de ordem ou sobrepostos.
    #[error("anotações malformadas: {0}")]
    MalformedAnnotations(String),

    /// Valor de tag que não pertence ao esquema esperado (BIO2 ou continuação).
    #[error("tag inválida {value:?} (sentença {sentence}, token {token})")]
    InvalidTagEncoding {
        sentence: usize,
        token: usize,
        value: String,
    },

    /// Colunas de tokens e de tags com tamanhos diferentes.
    #[error("{tokens} tokens para {tags} tags")]
    TokenTagMismatch { tokens: usize, tags: usize },

    /// Campo (coluna) inexistente no corpus.
    #[error("campo desconhecido: {0}")]
    UnknownField(String),

    /// Token sem valor para um dos campos declarados.
    #[error("valor ausente para o campo {field} (sentença {sentence}, token {token})")]
    MissingValue {
        sentence: usize,
        token: usize,
        field: usize,
    },

    /// Segmentação ausente no documento (ex: "tokens").
    #[error("segmentação ausente: {0}")]
    MissingSegmentation(String),

    /// Rótulo de codificação de saída desconhecido ou não utilizável para HTML.
    #[error("codificação de saída não suportada: {0}")]
    UnsupportedEncoding(String),

    /// Linha inválida ao ler um corpus tabular.
    #[error("corpus malformado na linha {line}: {reason}")]
    CorpusFormat { line: usize, reason: String },

    /// Erro ocorrido ao renderizar uma camada específica.
    #[error("camada {layer:?}: {source}")]
    Layer {
        layer: String,
        #[source]
        source: Box<RenderError>,
    },

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),

    #[error("erro de I/O: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Anexa o nome da camada ao erro.
    pub fn in_layer(self, layer: impl Into<String>) -> Self {
        RenderError::Layer {
            layer: layer.into(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_context_in_message() {
        let err = RenderError::MalformedAnnotations("spans [0, 3) e [2, 4) se sobrepõem".into())
            .in_layer("NER");
        let msg = err.to_string();
        assert!(msg.starts_with("camada \"NER\""));
        assert!(msg.contains("se sobrepõem"));
    }

    #[test]
    fn test_invalid_tag_message() {
        let err = RenderError::InvalidTagEncoding {
            sentence: 2,
            token: 5,
            value: "X-PER".into(),
        };
        assert_eq!(err.to_string(), "tag inválida \"X-PER\" (sentença 2, token 5)");
    }
}
