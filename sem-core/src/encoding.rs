//! Codificação de saída da página.
//!
//! A página é montada como `String` (UTF-8) e só convertida no fim. Caracteres que a
//! codificação de destino não representa viram referências numéricas (`&#12354;`),
//! então o HTML continua válido.

use std::borrow::Cow;

use encoding_rs::Encoding;
use tracing::debug;

use crate::error::{RenderError, Result};

/// Resolve um rótulo de codificação (`"utf-8"`, `"latin1"`, `"windows-1252"`...).
///
/// Codificações que o `encoding_rs` não sabe produzir (UTF-16, replacement) são
/// rejeitadas, pois o `<meta charset>` mentiria sobre os bytes gerados.
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding> {
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| RenderError::UnsupportedEncoding(label.to_string()))?;
    if encoding.output_encoding() != encoding {
        return Err(RenderError::UnsupportedEncoding(label.to_string()));
    }
    Ok(encoding)
}

/// Converte a página para a codificação pedida.
pub fn encode_page<'a>(page: &'a str, label: &str) -> Result<Cow<'a, [u8]>> {
    let encoding = resolve_encoding(label)?;
    let (bytes, _, unmappable) = encoding.encode(page);
    if unmappable {
        debug!(encoding = encoding.name(), "caracteres substituídos por referências numéricas");
    }
    Ok(bytes)
}
