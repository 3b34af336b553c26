mod loader;
mod reconcile;

pub use loader::{
    list_module_files, load_module_file, module_gene_universe, parse_module_text, write_module_file,
};
pub use reconcile::{Reconciled, reconcile};

/// One line of a module file: index, then member genes. The constant
/// weight column is not kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDefinition {
    pub index: String,
    pub genes: Vec<String>,
}

impl ModuleDefinition {
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }
}
