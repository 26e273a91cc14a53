#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkMatch {
    #[default]
    Substring,
    Exact,
}

impl LinkMatch {
    pub fn has_link(self, content: &str, name: &str) -> bool {
        match self {
            LinkMatch::Substring => has_link(content, name),
            LinkMatch::Exact => find_wikilink(content, name).is_some(),
        }
    }

    pub fn replace_link(self, content: &str, old_name: &str, new_name: &str) -> String {
        match self {
            LinkMatch::Substring => replace_link(content, old_name, new_name),
            LinkMatch::Exact => match find_wikilink(content, old_name) {
                Some((start, end)) => {
                    format!("{}{}{}", &content[..start], new_name, &content[end..])
                }
                None => content.to_string(),
            },
        }
    }
}

pub fn link_marker(name: &str) -> String {
    format!("[[{name}]]")
}

pub fn has_link(content: &str, name: &str) -> bool {
    content.contains(&link_marker(name))
}

pub fn prepend_link(content: &str, name: &str) -> String {
    format!("{}\n\n{content}", link_marker(name))
}

/// Rewrites the first `[[old_name]]` to `[[new_name]]`; later ones are kept.
pub fn replace_link(content: &str, old_name: &str, new_name: &str) -> String {
    content.replacen(&link_marker(old_name), &link_marker(new_name), 1)
}

struct WikiLink<'a> {
    target: &'a str,
    target_start: usize,
}

/// Byte range of the first link to `name`. A `#heading` suffix is only split
/// off after the full name, so names that contain `#` still match themselves.
fn find_wikilink(text: &str, name: &str) -> Option<(usize, usize)> {
    scan_wikilinks(text).into_iter().find_map(|link| {
        let rest = link.target.strip_prefix(name)?;
        if rest.is_empty() || rest.trim_start().starts_with('#') {
            Some((link.target_start, link.target_start + name.len()))
        } else {
            None
        }
    })
}

fn scan_wikilinks(text: &str) -> Vec<WikiLink<'_>> {
    let mut links = Vec::new();
    let mut cursor = 0;
    while let Some(start) = text[cursor..].find("[[") {
        let inner_start = cursor + start + 2;
        let Some(end_rel) = text[inner_start..].find("]]") else {
            break;
        };
        let inner_end = inner_start + end_rel;
        let inner = &text[inner_start..inner_end];
        let raw = inner.split_once('|').map(|(raw, _)| raw).unwrap_or(inner);
        let target = raw.trim();
        if !target.is_empty() {
            links.push(WikiLink {
                target,
                target_start: inner_start + (raw.len() - raw.trim_start().len()),
            });
        }
        cursor = inner_end + 2;
    }
    links
}
