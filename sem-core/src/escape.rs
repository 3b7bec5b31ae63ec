//! # Escape de Texto
//!
//! Converte texto bruto em texto seguro para HTML **antes** da inserção de qualquer
//! marcação estrutural, de modo que os marcadores `<span>` inseridos depois nunca
//! sejam escapados.
//!
//! Dois passos distintos:
//! - [`escape`]: substitui os cinco caracteres reservados (`&`, `<`, `>`, `"`, `'`).
//! - [`break_lines`]: quebra de linha visual (`<br />`) antes de cada `\n`, mantendo o
//!   `\n` original para que copiar/colar preserve o texto.
//!
//! Apenas o caminho de documentos (offsets de caracteres) usa [`break_lines`]; tokens
//! de corpus nunca contêm quebras de linha.

/// Marcador de quebra de linha visual.
pub const LINE_BREAK: &str = "<br />";

/// Escapa os cinco caracteres reservados do HTML.
///
/// # Exemplo
/// `Tom & "Jerry"` -> `Tom &amp; &quot;Jerry&quot;`
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + text.len() / 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Insere `<br />` antes de cada `\n` de um texto já escapado.
///
/// Em quebras `\r\n` o `\r` é movido para depois do marcador (`<br />\r\n`), assim o
/// marcador nunca separa o par CR/LF.
pub fn break_lines(escaped: &str) -> String {
    if !escaped.contains('\n') {
        return escaped.to_string();
    }
    escaped
        .replace('\n', "<br />\n")
        .replace("\r<br />", "<br />\r")
}

/// Escape completo usado pelo caminho de documentos: [`escape`] seguido de [`break_lines`].
pub fn escape_content(text: &str) -> String {
    break_lines(&escape(text))
}

/// Inverso de [`escape_content`]: remove os `<br />` inseridos e decodifica as entidades.
///
/// `&amp;` é decodificado por último para não produzir entidades novas.
pub fn unescape(markup: &str) -> String {
    markup
        .replace(LINE_BREAK, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#x27;", "'")
        .replace("&amp;", "&")
}
