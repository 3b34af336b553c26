use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use flate2::read::GzDecoder;

pub mod console;
pub mod gene_scores;
pub mod json_writer;
pub mod summary_writer;
pub mod table;

pub(crate) const IO_BUF_CAPACITY: usize = 1 << 20; // 1 MiB

pub(crate) fn open_maybe_gz(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    if path.extension().and_then(|s| s.to_str()) == Some("gz") {
        let decoder = GzDecoder::new(file);
        Ok(Box::new(decoder))
    } else {
        Ok(Box::new(file))
    }
}

pub(crate) fn create_buffered(path: &Path) -> Result<BufWriter<File>> {
    let file =
        File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    Ok(BufWriter::with_capacity(IO_BUF_CAPACITY, file))
}

/// Plain text, one gene identifier per line.
pub fn write_gene_lines(path: &Path, genes: &[String]) -> Result<()> {
    let mut w = create_buffered(path)?;
    for gene in genes {
        writeln!(w, "{}", gene)?;
    }
    w.flush()?;
    Ok(())
}

/// Accepts a literal single-byte separator or one of `tab`, `\t`, `comma`.
pub fn parse_delimiter(raw: &str) -> Result<u8> {
    match raw {
        "\\t" | "tab" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        s if s.len() == 1 => Ok(s.as_bytes()[0]),
        other => bail!("unsupported field separator '{}'", other),
    }
}

/// `['g1', 'g2']`, the list literal used throughout the summary tables.
/// Backslash, quote and line breaks inside an identifier are escaped so the
/// scorer lexer reads it back unchanged.
pub fn format_gene_list(genes: &[String]) -> String {
    let quoted: Vec<String> = genes.iter().map(|g| format!("'{}'", escape_gene(g))).collect();
    format!("[{}]", quoted.join(", "))
}

fn escape_gene(gene: &str) -> String {
    let mut out = String::with_capacity(gene.len());
    for c in gene.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out
}

pub fn format_pvalue(p: f64) -> String {
    if p.is_nan() {
        "nan".to_string()
    } else {
        format!("{}", p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimiter_aliases() {
        assert_eq!(parse_delimiter("\\t").unwrap(), b'\t');
        assert_eq!(parse_delimiter(",").unwrap(), b',');
        assert_eq!(parse_delimiter(";").unwrap(), b';');
        assert!(parse_delimiter("::").is_err());
    }

    #[test]
    fn gene_list_literal() {
        assert_eq!(format_gene_list(&[]), "[]");
        assert_eq!(
            format_gene_list(&["A".to_string(), "B".to_string()]),
            "['A', 'B']"
        );
    }

    #[test]
    fn gene_list_escapes_quote_and_backslash() {
        assert_eq!(
            format_gene_list(&["5'UTR-X".to_string(), r"A\B".to_string()]),
            r"['5\'UTR-X', 'A\\B']"
        );
    }
}
