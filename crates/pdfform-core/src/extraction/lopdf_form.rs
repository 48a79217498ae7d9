use lopdf::{Dictionary, Document, Object, ObjectId};
use std::collections::HashSet;
use tracing::debug;

use crate::error::FormDiagnostic;
use crate::extraction::FormReader;
use crate::model::FieldEntry;

/// Field hierarchies deeper than this are treated as corrupt.
const MAX_FIELD_DEPTH: usize = 32;

/// Form-reading backend built on lopdf.
///
/// Walks the AcroForm `Fields` array in document order. Non-terminal fields
/// (those whose `Kids` are named fields) are flattened into fully qualified
/// names such as `address.city`.
pub struct LopdfFormReader;

impl LopdfFormReader {
    pub fn new() -> Self {
        LopdfFormReader
    }
}

impl Default for LopdfFormReader {
    fn default() -> Self {
        Self::new()
    }
}

impl FormReader for LopdfFormReader {
    fn read_fields(
        &self,
        source: &str,
        pdf_bytes: &[u8],
    ) -> Result<Vec<FieldEntry>, Vec<FormDiagnostic>> {
        let doc = Document::load_mem(pdf_bytes).map_err(|e| {
            debug!(file = source, error = %e, "lopdf could not load document");
            vec![FormDiagnostic::Unreadable {
                file: source.to_string(),
            }]
        })?;

        let acroform = find_acroform(&doc, source).map_err(|d| vec![d])?;

        let roots: &[Object] = match acroform.get(b"Fields") {
            Ok(obj) => resolve(&doc, obj)
                .and_then(|o| o.as_array())
                .map_err(|_| {
                    vec![FormDiagnostic::FormUnreadable {
                        file: source.to_string(),
                    }]
                })?
                .as_slice(),
            Err(_) => {
                debug!(file = source, "AcroForm has no Fields entry");
                &[]
            }
        };

        let mut walker = FieldWalker {
            doc: &doc,
            source,
            visited: HashSet::new(),
            fields: Vec::new(),
            diagnostics: Vec::new(),
        };
        for (index, entry) in roots.iter().enumerate() {
            if let Some(dict) = walker.field_dict(entry, index) {
                walker.visit(dict, index, None, None, 0);
            }
        }

        if walker.diagnostics.is_empty() {
            Ok(walker.fields)
        } else {
            Err(walker.diagnostics)
        }
    }

    fn backend_name(&self) -> &str {
        "lopdf"
    }
}

fn find_acroform<'a>(doc: &'a Document, source: &str) -> Result<&'a Dictionary, FormDiagnostic> {
    let catalog = doc
        .trailer
        .get(b"Root")
        .and_then(|root| resolve(doc, root))
        .and_then(|root| root.as_dict())
        .map_err(|_| FormDiagnostic::NoCatalog {
            file: source.to_string(),
        })?;

    let acroform = catalog
        .get(b"AcroForm")
        .map_err(|_| FormDiagnostic::NoForm {
            file: source.to_string(),
        })?;

    resolve(doc, acroform)
        .and_then(|form| form.as_dict())
        .map_err(|_| FormDiagnostic::FormUnreadable {
            file: source.to_string(),
        })
}

fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> lopdf::Result<&'a Object> {
    match obj {
        Object::Reference(id) => doc.get_object(*id),
        other => Ok(other),
    }
}

fn format_ref(id: ObjectId) -> String {
    format!("{} {} R", id.0, id.1)
}

struct FieldWalker<'a> {
    doc: &'a Document,
    source: &'a str,
    /// Field objects already reached; a second visit means a reference cycle.
    visited: HashSet<ObjectId>,
    fields: Vec<FieldEntry>,
    diagnostics: Vec<FormDiagnostic>,
}

impl<'a> FieldWalker<'a> {
    /// Resolve one entry of a `Fields` or `Kids` array to its dictionary,
    /// recording a diagnostic when it cannot be resolved or was already seen.
    fn field_dict(&mut self, entry: &'a Object, index: usize) -> Option<&'a Dictionary> {
        let (reference, obj) = match entry {
            Object::Reference(id) if !self.visited.insert(*id) => {
                self.diagnostics.push(FormDiagnostic::Cycle {
                    file: self.source.to_string(),
                    reference: format_ref(*id),
                });
                return None;
            }
            Object::Reference(id) => match self.doc.get_object(*id) {
                Ok(obj) => (format_ref(*id), obj),
                Err(_) => {
                    self.diagnostics.push(FormDiagnostic::MissingXref {
                        file: self.source.to_string(),
                        reference: format_ref(*id),
                    });
                    return None;
                }
            },
            other => (format!("#{index}"), other),
        };

        match obj.as_dict() {
            Ok(dict) => Some(dict),
            Err(_) => {
                self.diagnostics.push(FormDiagnostic::NotADictionary {
                    file: self.source.to_string(),
                    reference,
                });
                None
            }
        }
    }

    fn visit(
        &mut self,
        dict: &'a Dictionary,
        index: usize,
        parent: Option<&str>,
        inherited_value: Option<&'a Object>,
        depth: usize,
    ) {
        let partial = dict
            .get(b"T")
            .and_then(|t| resolve(self.doc, t))
            .ok()
            .and_then(|t| match t {
                Object::String(bytes, _) => Some(decode_text_string(bytes)),
                _ => None,
            });

        let Some(partial) = partial else {
            self.diagnostics.push(FormDiagnostic::MissingName {
                file: self.source.to_string(),
                index,
            });
            return;
        };

        let name = match parent {
            Some(parent) => format!("{parent}.{partial}"),
            None => partial,
        };
        let value = dict.get(b"V").ok().or(inherited_value);

        // Kids without a name are widget annotations of this field, not fields.
        let mut named_kids = Vec::new();
        if let Ok(kids) = dict
            .get(b"Kids")
            .and_then(|k| resolve(self.doc, k))
            .and_then(|k| k.as_array())
        {
            for kid in kids {
                if let Some(kid_dict) = self.field_dict(kid, index) {
                    if kid_dict.has(b"T") {
                        named_kids.push(kid_dict);
                    }
                }
            }
        }

        if named_kids.is_empty() {
            let value = value
                .map(|v| render_value(self.doc, v))
                .unwrap_or_default();
            debug!(file = self.source, field = %name, value = %value, "read form field");
            self.fields.push(FieldEntry { name, value });
            return;
        }

        if depth + 1 >= MAX_FIELD_DEPTH {
            self.diagnostics.push(FormDiagnostic::TooDeep {
                file: self.source.to_string(),
                index,
                limit: MAX_FIELD_DEPTH,
            });
            return;
        }

        for kid in named_kids {
            self.visit(kid, index, Some(&name), value, depth + 1);
        }
    }
}

/// Render a field value (`V`) as the text that goes into the summary.
pub fn render_value(doc: &Document, value: &Object) -> String {
    let value = match resolve(doc, value) {
        Ok(v) => v,
        Err(_) => return String::new(),
    };
    let text = match value {
        Object::Array(items) => items
            .iter()
            .filter_map(|item| resolve(doc, item).ok())
            .map(render_scalar)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(", "),
        other => render_scalar(other),
    };
    strip_wrapping_parens(&text).to_string()
}

fn render_scalar(value: &Object) -> String {
    match value {
        Object::String(bytes, _) => decode_text_string(bytes),
        Object::Name(name) => String::from_utf8_lossy(name).into_owned(),
        Object::Integer(i) => i.to_string(),
        Object::Real(r) => r.to_string(),
        Object::Boolean(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Decode a PDF text string: UTF-16BE with BOM, UTF-8 (with or without BOM),
/// falling back to Latin-1.
pub fn decode_text_string(bytes: &[u8]) -> String {
    if let Some(utf16) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = utf16
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Strip one pair of parentheses wrapping the whole value: `(Smith)` becomes
/// `Smith`, while `(a) or (b)` is left alone.
pub fn strip_wrapping_parens(value: &str) -> &str {
    let Some(inner) = value
        .strip_prefix('(')
        .and_then(|v| v.strip_suffix(')'))
    else {
        return value;
    };

    // The opening paren must close at the very end.
    let mut depth = 0usize;
    for c in inner.chars() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return value,
            ')' => depth -= 1,
            _ => {}
        }
    }
    inner
}
