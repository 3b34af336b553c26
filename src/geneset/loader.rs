use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::geneset::ModuleDefinition;
use crate::io::create_buffered;

pub fn load_module_file(path: &Path) -> Result<Vec<ModuleDefinition>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read module file {}", path.display()))?;
    parse_module_text(&content, &path.display().to_string())
}

/// Whitespace-delimited, one module per line: `index weight gene...`.
pub fn parse_module_text(content: &str, source: &str) -> Result<Vec<ModuleDefinition>> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let line_no = idx + 1;
        let mut fields = line.split_whitespace();
        let Some(index) = fields.next() else {
            continue;
        };
        if !seen.insert(index) {
            bail!("{}:{} duplicate module index '{}'", source, line_no, index);
        }
        // weight
        fields.next();
        out.push(ModuleDefinition {
            index: index.to_string(),
            genes: fields.map(str::to_string).collect(),
        });
    }

    Ok(out)
}

/// `index<TAB>gene<TAB>gene...`; a module without genes keeps its index line.
pub fn write_module_file(path: &Path, defs: &[ModuleDefinition]) -> Result<()> {
    let mut w = create_buffered(path)?;
    for def in defs {
        write!(w, "{}", def.index)?;
        for gene in &def.genes {
            write!(w, "\t{}", gene)?;
        }
        writeln!(w)?;
    }
    w.flush()?;
    Ok(())
}

/// Union of every member gene across all modules.
pub fn module_gene_universe(defs: &[ModuleDefinition]) -> HashSet<String> {
    defs.iter()
        .flat_map(|def| def.genes.iter().cloned())
        .collect()
}

/// A single module file, or every `*.txt` file in a directory, sorted
/// by file name.
pub fn list_module_files(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }
    if !path.is_dir() {
        bail!("module path {} does not exist", path.display());
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(path)
        .with_context(|| format!("failed to list module directory {}", path.display()))?
    {
        let entry = entry?;
        let p = entry.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("txt") {
            files.push(p);
        }
    }
    files.sort();
    if files.is_empty() {
        bail!("no *.txt module files found in {}", path.display());
    }
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weight_column_is_discarded() {
        let defs = parse_module_text("1\t1.0\tA\tB\n\n2 1.0 C\n3\n", "test").unwrap();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].genes, vec!["A", "B"]);
        assert_eq!(defs[1].index, "2");
        assert!(defs[2].is_empty());
    }

    #[test]
    fn duplicate_index_is_rejected() {
        let err = parse_module_text("1 1.0 A\n1 1.0 B\n", "dup").unwrap_err();
        assert!(err.to_string().contains("duplicate module index"));
    }
}
