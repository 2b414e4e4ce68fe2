//! Just enough of an mmCIF reader to pull atoms out of `_atom_site`.
//!
//! Author-assigned identifiers (`auth_*`) are preferred over label ones,
//! which is what structure viewers show and what residue numbering in the
//! literature refers to.

use std::collections::HashMap;
use std::path::Path;

use crate::error::{ContactsError, Result};

/// A single atom record.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub resname: String,
    pub chain: String,
    pub resseq: i32,
    pub icode: String,
    pub coord: [f64; 3],
    pub model: u32,
}

/// Atoms grouped by residue, in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub resname: String,
    pub chain: String,
    pub resseq: i32,
    pub icode: String,
    pub atoms: Vec<[f64; 3]>,
}

#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub atoms: Vec<Atom>,
}

impl Structure {
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        parse(&content)
    }

    /// Residues of the first model.
    pub fn residues(&self) -> Vec<Residue> {
        let Some(first_model) = self.atoms.first().map(|a| a.model) else {
            return Vec::new();
        };

        let mut residues: Vec<Residue> = Vec::new();
        let mut index: HashMap<(&str, i32, &str, &str), usize> = HashMap::new();
        for atom in self.atoms.iter().filter(|a| a.model == first_model) {
            let key = (atom.chain.as_str(), atom.resseq, atom.icode.as_str(), atom.resname.as_str());
            let slot = *index.entry(key).or_insert_with(|| {
                residues.push(Residue {
                    resname: atom.resname.clone(),
                    chain: atom.chain.clone(),
                    resseq: atom.resseq,
                    icode: atom.icode.clone(),
                    atoms: Vec::new(),
                });
                residues.len() - 1
            });
            residues[slot].atoms.push(atom.coord);
        }
        residues
    }
}

/// Column positions inside the `_atom_site` loop.
struct Columns {
    resname: usize,
    chain: usize,
    resseq: usize,
    icode: Option<usize>,
    x: usize,
    y: usize,
    z: usize,
    model: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &[String]) -> Result<Self> {
        let find = |name: &str| headers.iter().position(|h| h == name);
        let either = |auth: &'static str, label: &'static str| {
            find(auth).or_else(|| find(label)).ok_or(ContactsError::MissingColumn(auth))
        };
        let required = |name: &'static str| find(name).ok_or(ContactsError::MissingColumn(name));

        Ok(Self {
            resname: either("auth_comp_id", "label_comp_id")?,
            chain: either("auth_asym_id", "label_asym_id")?,
            resseq: either("auth_seq_id", "label_seq_id")?,
            icode: find("pdbx_PDB_ins_code"),
            x: required("Cartn_x")?,
            y: required("Cartn_y")?,
            z: required("Cartn_z")?,
            model: find("pdbx_PDB_model_num"),
        })
    }

    fn atom(&self, row: &[String], line: usize) -> Result<Atom> {
        let err = |message: String| ContactsError::Parse { line, message };
        let float = |i: usize| {
            row[i]
                .parse::<f64>()
                .map_err(|_| err(format!("bad coordinate '{}'", row[i])))
        };
        let optional = |i: Option<usize>| i.map(|i| row[i].as_str()).filter(|v| !is_null(v));

        let resseq = row[self.resseq]
            .parse::<i32>()
            .map_err(|_| err(format!("bad residue number '{}'", row[self.resseq])))?;
        let model = match optional(self.model) {
            Some(m) => m.parse::<u32>().map_err(|_| err(format!("bad model number '{}'", m)))?,
            None => 1,
        };

        Ok(Atom {
            resname: row[self.resname].to_uppercase(),
            chain: row[self.chain].clone(),
            resseq,
            icode: optional(self.icode).unwrap_or_default().to_string(),
            coord: [float(self.x)?, float(self.y)?, float(self.z)?],
            model,
        })
    }
}

fn is_null(value: &str) -> bool {
    value == "?" || value == "."
}

/// Parse the `_atom_site` loop out of mmCIF text.
pub fn parse(content: &str) -> Result<Structure> {
    let mut headers: Vec<String> = Vec::new();
    let mut in_loop_header = false;
    let mut columns: Option<Columns> = None;
    let mut pending: Vec<String> = Vec::new();
    let mut text_field: Option<String> = None;
    let mut atoms = Vec::new();

    for (i, raw) in content.lines().enumerate() {
        let line_no = i + 1;

        // Semicolon-delimited text fields may span lines.
        if let Some(field) = text_field.as_mut() {
            if raw.starts_with(';') {
                let value = text_field.take().unwrap_or_default();
                if columns.is_some() {
                    pending.push(value);
                }
            } else {
                if !field.is_empty() {
                    field.push('\n');
                }
                field.push_str(raw);
            }
            continue;
        }
        if let Some(rest) = raw.strip_prefix(';') {
            text_field = Some(rest.to_string());
            continue;
        }

        let line = raw.trim();
        if let Some(cols) = &columns {
            if line.is_empty() {
                continue;
            }
            if line.starts_with('#') || line.starts_with('_') || line == "loop_" || line.starts_with("data_") {
                break;
            }
            read_rows(line, line_no, cols, headers.len(), &mut pending, &mut atoms)?;
            continue;
        }

        if line == "loop_" {
            in_loop_header = true;
            headers.clear();
            continue;
        }
        if in_loop_header {
            if let Some(name) = line.strip_prefix('_') {
                headers.push(name.split_whitespace().next().unwrap_or_default().to_string());
                continue;
            }
            in_loop_header = false;
            if headers.first().is_some_and(|h| h.starts_with("atom_site.")) {
                let names: Vec<String> = headers
                    .iter()
                    .map(|h| h.trim_start_matches("atom_site.").to_string())
                    .collect();
                headers = names;
                let cols = Columns::from_headers(&headers)?;
                if !line.is_empty() && !line.starts_with('#') {
                    read_rows(line, line_no, &cols, headers.len(), &mut pending, &mut atoms)?;
                }
                columns = Some(cols);
            }
        }
    }

    if columns.is_none() {
        return Err(ContactsError::NoAtomSite);
    }
    if !pending.is_empty() {
        return Err(ContactsError::Parse {
            line: content.lines().count(),
            message: format!("{} trailing value(s) in _atom_site", pending.len()),
        });
    }
    Ok(Structure { atoms })
}

/// Tokenize a data line and turn every complete row into an atom; values
/// of an incomplete row stay in `pending` for the next line.
fn read_rows(
    line: &str,
    line_no: usize,
    cols: &Columns,
    width: usize,
    pending: &mut Vec<String>,
    atoms: &mut Vec<Atom>,
) -> Result<()> {
    let tokens = tokenize(line).map_err(|message| ContactsError::Parse { line: line_no, message })?;
    pending.extend(tokens);
    while pending.len() >= width {
        let row: Vec<String> = pending.drain(..width).collect();
        atoms.push(cols.atom(&row, line_no)?);
    }
    Ok(())
}

/// Split one CIF data line into values, honouring single and double quotes.
///
/// A quote only closes a value when followed by whitespace or end of line,
/// so `'N1'' '` style embedded quotes survive.
pub fn tokenize(line: &str) -> std::result::Result<Vec<String>, String> {
    let chars: Vec<char> = line.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        let quote = chars[i];
        if quote == '\'' || quote == '"' {
            let start = i + 1;
            let mut j = start;
            loop {
                if j >= chars.len() {
                    return Err(format!("unterminated quoted value in '{}'", line));
                }
                if chars[j] == quote && chars.get(j + 1).map_or(true, |c| c.is_whitespace()) {
                    break;
                }
                j += 1;
            }
            tokens.push(chars[start..j].iter().collect());
            i = j + 1;
        } else {
            let start = i;
            while i < chars.len() && !chars[i].is_whitespace() {
                i += 1;
            }
            tokens.push(chars[start..i].iter().collect());
        }
    }
    Ok(tokens)
}
