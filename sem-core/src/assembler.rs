//! # Montagem da Página com Abas
//!
//! Combina até três camadas já renderizadas numa única página HTML. A troca de abas
//! é feita só com CSS: cada aba é um `<input type="radio">` + `<label>`, e as
//! seções de conteúdo vêm depois de todos os controles (ver [`TABS_CSS`]).
//!
//! Camadas com marcação vazia são omitidas. A primeira aba presente é marcada como
//! selecionada. Sem nenhuma camada, a página ainda tem o contêiner de abas vazio.

use crate::config::Stylesheets;
use crate::escape::escape;
use crate::layers::LayerKind;

/// Folha de estilo das abas (referenciada como `tabs.css` por padrão).
pub const TABS_CSS: &str = include_str!("../assets/tabs.css");

/// Tema padrão para os trechos anotados (referenciado como `default.css`).
pub const DEFAULT_CSS: &str = include_str!("../assets/default.css");

/// Marcação de uma camada pronta para ir numa aba.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLayer {
    pub kind: LayerKind,
    pub markup: String,
}

impl RenderedLayer {
    pub fn new(kind: LayerKind, markup: impl Into<String>) -> Self {
        Self {
            kind,
            markup: markup.into(),
        }
    }
}

fn checked(position: usize) -> &'static str {
    if position == 1 {
        r#" checked="true""#
    } else {
        ""
    }
}

/// Monta a página.
///
/// As camadas são ordenadas por prioridade (POS, Chunking, NER) e numeradas a partir
/// de 1 na ordem em que aparecem; `title` vai no `<title>` e no `<h1>`.
pub fn assemble(
    title: &str,
    layers: &[RenderedLayer],
    stylesheets: &Stylesheets,
    encoding: &str,
) -> String {
    let title = escape(title);
    let mut present: Vec<&RenderedLayer> = layers.iter().filter(|l| !l.markup.is_empty()).collect();
    present.sort_by_key(|l| l.kind);

    let mut page = format!(
        r#"<html>
    <head>
        <meta charset="{encoding}" />
        <title>{title}</title>
        <link rel="stylesheet" href="{tabs}" />
        <link rel="stylesheet" href="{lang}" />
    </head>
    <body>
        <div class="wrapper">
            <h1>{title}</h1>
            <div class="tab_container">"#,
        encoding = escape(encoding),
        tabs = escape(&stylesheets.tabs),
        lang = escape(&stylesheets.lang),
    );

    // controles das abas primeiro, conteúdos depois
    for (i, layer) in present.iter().enumerate() {
        let n = i + 1;
        page.push_str(&format!(
            r#"
                <input id="tab{n}" type="radio" name="tabs"{checked} />
                <label for="tab{n}">{name}</label>"#,
            checked = checked(n),
            name = layer.kind.display_name(),
        ));
    }
    for (i, layer) in present.iter().enumerate() {
        page.push_str(&format!(
            r#"
                <section id="content{n}" class="tab-content">
{markup}
                </section>"#,
            n = i + 1,
            markup = layer.markup,
        ));
    }

    page.push_str(
        r#"
            </div>
        </div>
    </body>
</html>
"#,
    );
    page
}
