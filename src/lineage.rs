// src/lineage.rs

use std::collections::BTreeMap;
use std::io::BufRead;
use std::path::Path;

use crate::error::{Result, TaxdumpError};
use crate::taxdb::{open_reader, TaxDb};
use crate::types::{Rank, RankTable};

/// Reads one species name per line, ignoring blank lines.
pub fn read_species_list<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let mut species = Vec::new();
    for line in open_reader(path)?.lines() {
        let line = line?;
        let name = line.trim();
        if !name.is_empty() {
            species.push(name.to_string());
        }
    }
    if species.is_empty() {
        return Err(TaxdumpError::EmptySpeciesList(path.to_path_buf()));
    }
    Ok(species)
}

/// Looks up each species in the taxonomy and collects its lineage ranks.
/// Species the taxonomy does not know are reported and skipped.
pub fn build_rank_table(species: &[String], db: &TaxDb) -> Result<RankTable> {
    let mut records = Vec::with_capacity(species.len());
    let mut not_found = Vec::new();

    for name in species {
        match db.taxid_for_name(name) {
            Some(taxid) => records.push(db.rank_record(taxid)),
            None => not_found.push(name.as_str()),
        }
    }

    if !not_found.is_empty() {
        log::warn!(
            "{} species not found in the taxonomy: {}",
            not_found.len(),
            not_found.join(", ")
        );
    }
    if records.is_empty() {
        return Err(TaxdumpError::NoTaxaFound);
    }

    log::info!("Collected lineages for {} of {} species", records.len(), species.len());
    Ok(RankTable::from_records(&records))
}

/// Reads a tab-separated rank table whose header names the rank columns,
/// e.g. `kingdom\tphylum\tspecies`. Columns outside the rank vocabulary
/// are ignored; empty cells and `NA` are missing.
pub fn read_rank_table<P: AsRef<Path>>(path: P) -> Result<RankTable> {
    let path = path.as_ref();
    let mut lines = open_reader(path)?.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => {
            return Err(TaxdumpError::InvalidRankTable {
                path: path.to_path_buf(),
                message: "missing header line".to_string(),
            })
        }
    };

    let mut columns: Vec<(usize, Rank)> = Vec::new();
    for (idx, label) in header.split('\t').enumerate() {
        match Rank::from_label(label) {
            Some(rank) if columns.iter().any(|&(_, r)| r == rank) => {
                return Err(TaxdumpError::InvalidRankTable {
                    path: path.to_path_buf(),
                    message: format!("duplicate column '{rank}'"),
                });
            }
            Some(rank) => columns.push((idx, rank)),
            None => log::warn!("Ignoring non-rank column '{}'", label.trim()),
        }
    }

    let ranks: Vec<Rank> = columns.iter().map(|&(_, r)| r).collect();
    let mut table = RankTable::new(&ranks);

    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let cells: Vec<&str> = line.split('\t').collect();
        let record: BTreeMap<Rank, String> = columns
            .iter()
            .filter_map(|&(idx, rank)| {
                let value = cells.get(idx)?.trim();
                if value.is_empty() || value == "NA" {
                    None
                } else {
                    Some((rank, value.to_string()))
                }
            })
            .collect();
        table.push_record(&record);
    }

    log::info!("Read {} record(s) with {} rank column(s)", table.len(), table.ranks.len());
    Ok(table)
}
