// src/lib.rs
pub mod types;
pub mod error;
pub mod impute;
pub mod sort;
pub mod resolve;
pub mod taxdb;
pub mod lineage;
pub mod dump;

use std::fs;
use std::path::{Path, PathBuf};

use crate::dump::{create_names_dump, create_nodes_dump, render_names, render_nodes, NameDedup};
use crate::error::Result;
use crate::impute::impute_taxons;
use crate::resolve::Resolver;
use crate::sort::sort_taxonomy_table;
use crate::types::{NameLine, NodeLine, RankTable};

pub const NAMES_DUMP_FILE: &str = "names.dmp";
pub const NODES_DUMP_FILE: &str = "nodes.dmp";

/// Knobs for one taxdump run.
#[derive(Debug, Clone, Copy, Default)]
pub struct TaxdumpConfig {
    /// Fill missing ranks with `unknownN` placeholders before building the tree.
    pub impute: bool,
    pub name_dedup: NameDedup,
}

/// Both dumps as structured lines; text is generated on demand.
pub struct TaxdumpResults {
    pub names: Vec<NameLine>,
    pub nodes: Vec<NodeLine>,
}

impl TaxdumpResults {
    /// Generate names.dmp text on demand
    pub fn get_names_dump(&self) -> String {
        render_names(&self.names)
    }

    /// Generate nodes.dmp text on demand
    pub fn get_nodes_dump(&self) -> String {
        render_nodes(&self.nodes)
    }

    /// Write `names.dmp` and `nodes.dmp` into `dir`, creating it if needed.
    /// Returns the two paths (names, nodes).
    pub fn write_to_dir<P: AsRef<Path>>(&self, dir: P) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            fs::create_dir_all(dir)?;
            log::info!("Created output directory: {}", dir.display());
        }

        let names_path = dir.join(NAMES_DUMP_FILE);
        let nodes_path = dir.join(NODES_DUMP_FILE);
        fs::write(&names_path, self.get_names_dump())?;
        fs::write(&nodes_path, self.get_nodes_dump())?;
        Ok((names_path, nodes_path))
    }
}

/// Impute (optionally), sort, then build both dumps from `table`.
pub fn build_taxdump(
    table: &RankTable,
    resolver: &dyn Resolver,
    config: &TaxdumpConfig,
) -> Result<TaxdumpResults> {
    // 1. Fill gaps if requested
    let table = if config.impute {
        log::info!("Imputing missing taxonomic ranks...");
        impute_taxons(table)
    } else {
        table.clone()
    };

    // 2. Group records by lineage
    let sorted = sort_taxonomy_table(table);

    // 3. Both passes read the same sorted table
    let names = create_names_dump(&sorted, resolver, config.name_dedup)?;
    let nodes = create_nodes_dump(&sorted, resolver)?;

    Ok(TaxdumpResults { names, nodes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::MapResolver;
    use crate::types::Rank;

    fn row(cells: &[Option<&str>]) -> Vec<Option<String>> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn test_build_taxdump_sorts_before_emitting() {
        let mut table = RankTable::new(&[Rank::Kingdom, Rank::Genus]);
        table.rows.push(row(&[Some("Animalia"), Some("Panthera")]));
        table.rows.push(row(&[Some("Plantae"), Some("Quercus")]));
        table.rows.push(row(&[Some("Animalia"), Some("Canis")]));

        let results = build_taxdump(&table, &MapResolver::new(), &TaxdumpConfig::default()).unwrap();
        let labels: Vec<String> = results.names.iter().map(NameLine::label).collect();
        // unsorted input would have named Animalia twice
        assert_eq!(
            labels,
            vec!["root", "k__Animalia", "g__Canis", "g__Panthera", "k__Plantae", "g__Quercus"]
        );
    }

    #[test]
    fn test_build_taxdump_with_imputation() {
        let mut table = RankTable::new(&[Rank::Kingdom, Rank::Phylum, Rank::Class]);
        table.rows.push(row(&[Some("A"), None, Some("B")]));

        let plain = build_taxdump(&table, &MapResolver::new(), &TaxdumpConfig::default()).unwrap();
        assert_eq!(plain.nodes.len(), 2);

        let config = TaxdumpConfig {
            impute: true,
            ..TaxdumpConfig::default()
        };
        let imputed = build_taxdump(&table, &MapResolver::new(), &config).unwrap();
        assert_eq!(
            imputed.get_nodes_dump(),
            "1\t|\t1\t|\tno rank\t|\n\
             A\t|\t1\t|\tkingdom\t|\n\
             unknown1\t|\tA\t|\tphylum\t|\n\
             B\t|\tunknown1\t|\tclass\t|\n"
        );
        // caller's table is not modified
        assert_eq!(table.rows[0][1], None);
    }

    #[test]
    fn test_write_to_dir_creates_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("nested").join("taxdump");

        let mut table = RankTable::new(&[Rank::Kingdom]);
        table.rows.push(row(&[Some("Fungi")]));
        let resolver: MapResolver = [("Fungi", "4751")].into_iter().collect();
        let results = build_taxdump(&table, &resolver, &TaxdumpConfig::default()).unwrap();

        let (names_path, nodes_path) = results.write_to_dir(&out).unwrap();
        assert_eq!(
            fs::read_to_string(names_path).unwrap(),
            "1\t|\troot\t|\t\t|\tscientific name\n4751\t|\tk__Fungi\t|\t\t|\tscientific name\n"
        );
        assert_eq!(
            fs::read_to_string(nodes_path).unwrap(),
            "1\t|\t1\t|\tno rank\t|\n4751\t|\t1\t|\tkingdom\t|\n"
        );
    }
}
