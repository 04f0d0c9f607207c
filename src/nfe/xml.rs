// src/nfe/xml.rs

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::common::error::AppError;

/// Profundidade máxima aceita; NF-e reais não passam de uns 10 níveis.
pub const MAX_XML_DEPTH: usize = 128;

/// Um elemento XML já materializado em árvore.
///
/// As buscas (`scalar`, `all_scalars`, `blocks`) olham apenas para os
/// descendentes deste elemento: um bloco devolvido por `blocks` serve de nova
/// raiz e nunca "vaza" para os irmãos.
///
/// Elementos sem a própria tag de fechamento ficam na árvore com
/// `closed == false` e nunca são devolvidos pelas buscas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub text: String,
    pub children: Vec<XmlElement>,
    pub closed: bool,
}

impl XmlElement {
    fn from_start(e: &BytesStart) -> Self {
        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();

        let attributes = e
            .attributes()
            .flatten()
            .map(|attr| {
                let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                let value = attr
                    .unescape_value()
                    .map(|v| v.into_owned())
                    .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                (key, value)
            })
            .collect();

        Self { name, attributes, ..Default::default() }
    }

    /// Lê o documento inteiro e devolve uma raiz sintética (nome vazio)
    /// contendo os elementos de topo.
    ///
    /// Uma tag sem fechamento não é erro: ela só deixa de casar nas buscas.
    /// Isso vale para as que sobram abertas no fim do arquivo e para as que
    /// são atropeladas pelo fechamento de uma tag externa. Um fechamento que
    /// não corresponde a nenhuma tag aberta é ignorado.
    pub fn parse(text: &str) -> Result<XmlElement, AppError> {
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(true);
        reader.config_mut().check_end_names = false;
        reader.config_mut().allow_unmatched_ends = true;

        // stack[0] é a raiz sintética
        let mut stack: Vec<XmlElement> = vec![XmlElement { closed: true, ..Default::default() }];

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    if stack.len() > MAX_XML_DEPTH {
                        return Err(AppError::XmlTooDeep);
                    }
                    stack.push(XmlElement::from_start(e));
                }
                Event::Empty(ref e) => {
                    let element = XmlElement { closed: true, ..XmlElement::from_start(e) };
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(element);
                    }
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map(|t| t.into_owned())
                        .unwrap_or_else(|_| String::from_utf8_lossy(e).into_owned());
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    if let Some(current) = stack.last_mut() {
                        current.text.push_str(&text);
                    }
                }
                Event::End(ref e) => {
                    let name = e.name();
                    let name = String::from_utf8_lossy(name.as_ref());
                    // Procura a tag aberta mais interna com esse nome
                    let open_at = stack
                        .iter()
                        .skip(1)
                        .rposition(|el| el.name == name)
                        .map(|pos| pos + 1);

                    if let Some(depth) = open_at {
                        // As internas ficam sem fechamento próprio
                        while stack.len() > depth + 1 {
                            close_top(&mut stack);
                        }
                        if let Some(current) = stack.last_mut() {
                            current.closed = true;
                        }
                        close_top(&mut stack);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        while stack.len() > 1 {
            close_top(&mut stack);
        }

        Ok(stack.pop().unwrap_or_default())
    }

    /// Texto (trim) do primeiro descendente chamado `tag`, ou "" se não existir.
    pub fn scalar(&self, tag: &str) -> String {
        self.find_first(tag)
            .map(|el| el.text.trim().to_string())
            .unwrap_or_default()
    }

    /// Textos de todos os descendentes chamados `tag`, em ordem de documento.
    pub fn all_scalars(&self, tag: &str) -> Vec<String> {
        let mut out = Vec::new();
        self.walk(tag, false, |el| {
            out.push(el.text.trim().to_string());
            true
        });
        out
    }

    /// Todos os blocos `tag` mais externos (sem sobreposição).
    pub fn blocks(&self, tag: &str) -> Vec<&XmlElement> {
        let mut out = Vec::new();
        self.walk(tag, true, |el| {
            out.push(el);
            true
        });
        out
    }

    pub fn block(&self, tag: &str) -> Option<&XmlElement> {
        self.find_first(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    fn find_first(&self, tag: &str) -> Option<&XmlElement> {
        let mut found = None;
        self.walk(tag, true, |el| {
            found = Some(el);
            false
        });
        found
    }

    // Percorre os descendentes em ordem de documento com pilha explícita.
    // Com `outermost`, não desce dentro de um elemento que casou.
    // `visit` devolve false para encerrar a busca.
    fn walk<'a>(&'a self, tag: &str, outermost: bool, mut visit: impl FnMut(&'a XmlElement) -> bool) {
        let mut pending: Vec<&'a XmlElement> = self.children.iter().rev().collect();

        while let Some(el) = pending.pop() {
            let matched = el.closed && el.name == tag;
            if matched {
                if !visit(el) {
                    return;
                }
                if outermost {
                    continue;
                }
            }
            pending.extend(el.children.iter().rev());
        }
    }
}

fn close_top(stack: &mut Vec<XmlElement>) {
    if let Some(done) = stack.pop() {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(done);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scalar_returns_first_match_trimmed() {
        let root = XmlElement::parse("<a><b> um </b><b>dois</b></a>").unwrap();
        assert_eq!(root.scalar("b"), "um");
        assert_eq!(root.scalar("c"), "");
    }

    #[test]
    fn all_scalars_keeps_document_order() {
        let root = XmlElement::parse("<a><x><v>1</v></x><v>2</v><y><v>3</v></y></a>").unwrap();
        assert_eq!(root.all_scalars("v"), vec!["1", "2", "3"]);
    }

    #[test]
    fn search_inside_block_does_not_leak_to_siblings() {
        let xml = "<root><det><prod><cProd>A</cProd></prod></det>\
                   <det><prod></prod><extra><cProd>B</cProd></extra></det></root>";
        let root = XmlElement::parse(xml).unwrap();
        let dets = root.blocks("det");
        assert_eq!(dets.len(), 2);

        let second_prod = dets[1].block("prod").unwrap();
        assert_eq!(second_prod.scalar("cProd"), "");
        assert_eq!(dets[1].scalar("cProd"), "B");
    }

    #[test]
    fn blocks_are_outermost_only() {
        let root = XmlElement::parse("<r><g><g><v>in</v></g></g><g/></r>").unwrap();
        let groups = root.blocks("g");
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].scalar("v"), "in");
    }

    #[test]
    fn attributes_and_self_closing_elements() {
        let root = XmlElement::parse(r#"<infNFe Id="NFe123" versao="4.00"><vazio/></infNFe>"#).unwrap();
        let inf = root.block("infNFe").unwrap();
        assert_eq!(inf.attr("Id"), Some("NFe123"));
        assert_eq!(inf.attr("x"), None);
        assert!(inf.block("vazio").is_some());
    }

    #[test]
    fn entities_and_cdata_are_decoded() {
        let root = XmlElement::parse("<a><n>A &amp; B</n><c><![CDATA[<cru>]]></c></a>").unwrap();
        assert_eq!(root.scalar("n"), "A & B");
        assert_eq!(root.scalar("c"), "<cru>");
    }

    #[test]
    fn unclosed_tags_yield_no_match() {
        let root = XmlElement::parse("<a><b>valor</b><c>aberto").unwrap();
        assert_eq!(root.scalar("b"), "valor");
        assert_eq!(root.scalar("c"), "");
        assert!(root.block("a").is_none());
        assert!(root.all_scalars("c").is_empty());
    }

    #[test]
    fn tag_cut_off_by_an_outer_closing_tag_yields_no_match() {
        let root = XmlElement::parse("<a><b>solto<c>1</c></a><b>2</b>").unwrap();
        assert_eq!(root.scalar("c"), "1");
        assert_eq!(root.all_scalars("b"), vec!["2"]);
        assert_eq!(root.blocks("a").len(), 1);
    }

    #[test]
    fn nesting_is_limited() {
        let ok = format!("{}{}", "<a>".repeat(MAX_XML_DEPTH), "</a>".repeat(MAX_XML_DEPTH));
        assert_eq!(XmlElement::parse(&ok).unwrap().blocks("a").len(), 1);

        let too_deep = "<a>".repeat(MAX_XML_DEPTH + 1);
        assert!(matches!(XmlElement::parse(&too_deep), Err(AppError::XmlTooDeep)));

        assert!(matches!(XmlElement::parse(&"<a>".repeat(200_000)), Err(AppError::XmlTooDeep)));
    }

    #[test]
    fn stray_closing_tag_is_ignored() {
        let root = XmlElement::parse("<a><b>1</b></zzz><c>2</c></a>").unwrap();
        assert_eq!(root.scalar("c"), "2");
        assert_eq!(root.blocks("a").len(), 1);
    }
}
