//src/taxdb.rs

use ahash::{AHashMap, AHashSet};
use flate2::read::MultiGzDecoder;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::Result;
use crate::resolve::{Resolution, Resolver};
use crate::types::{Rank, UNKNOWN_RANK_NAME};

pub type ParentMap = AHashMap<u32, u32>;
pub type NameMap = AHashMap<u32, String>;
pub type RankMap = AHashMap<u32, String>;

/// Open a text file, transparently decoding it if it ends with ".gz".
pub fn open_reader<P: AsRef<Path>>(path: P) -> io::Result<Box<dyn BufRead>> {
    let path = path.as_ref();
    let f = File::open(path)?;

    let is_gz = path
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    Ok(if is_gz {
        Box::new(BufReader::new(MultiGzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    })
}

/// A local taxonomy: parent links, scientific names and ranks per taxid,
/// plus a reverse index from scientific name to taxid.
#[derive(Debug, Clone, Default)]
pub struct TaxDb {
    pub parent_map: ParentMap,
    pub name_map: NameMap,
    pub rank_map: RankMap,
    name_index: AHashMap<String, u32>,
}

impl TaxDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one taxon. On homonyms the first taxid inserted keeps the name.
    pub fn insert(&mut self, taxid: u32, parent_id: u32, name: &str, rank: &str) {
        self.parent_map.insert(taxid, parent_id);
        self.rank_map.insert(taxid, rank.to_string());
        self.set_name(taxid, name);
    }

    fn set_name(&mut self, taxid: u32, name: &str) {
        self.name_map.insert(taxid, name.to_string());
        self.name_index.entry(name.to_string()).or_insert(taxid);
    }

    pub fn len(&self) -> usize {
        self.parent_map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_map.is_empty()
    }

    pub fn taxid_for_name(&self, name: &str) -> Option<u32> {
        self.name_index.get(name).copied()
    }

    /// Taxids from the root down to `taxid` (inclusive). Empty when `taxid`
    /// is unknown. Stops at a self-parented node, a dangling parent, or a cycle.
    pub fn lineage(&self, taxid: u32) -> Vec<u32> {
        if !self.parent_map.contains_key(&taxid) {
            return Vec::new();
        }
        let mut path = Vec::new();
        let mut seen = AHashSet::new();
        let mut cur = taxid;
        while seen.insert(cur) {
            path.push(cur);
            match self.parent_map.get(&cur) {
                Some(&parent) if parent != cur && parent != 0 => cur = parent,
                _ => break,
            }
        }
        path.reverse();
        path
    }

    /// Rank -> name over the fixed rank vocabulary for one taxid's lineage.
    /// Ancestors without a name are recorded as `unknown_rank_name`.
    pub fn rank_record(&self, taxid: u32) -> BTreeMap<Rank, String> {
        let mut record = BTreeMap::new();
        for t in self.lineage(taxid) {
            let Some(rank) = self.rank_map.get(&t).and_then(|r| Rank::from_label(r)) else {
                continue;
            };
            let name = self
                .name_map
                .get(&t)
                .cloned()
                .unwrap_or_else(|| UNKNOWN_RANK_NAME.to_string());
            record.insert(rank, name);
        }
        record
    }
}

impl Resolver for TaxDb {
    fn resolve(&self, name: &str) -> Result<Resolution> {
        Ok(match self.taxid_for_name(name) {
            Some(taxid) => Resolution::Resolved(taxid.to_string()),
            None => Resolution::Fallback(name.to_string()),
        })
    }
}

/// Parses a taxDB file in the format:
/// ```text
/// <taxid>\t<parentid>\t<taxname>\t<rank>
/// ```
pub fn parse_taxdb<P: AsRef<Path>>(filepath: P) -> io::Result<TaxDb> {
    let reader = open_reader(filepath)?;
    let mut db = TaxDb::new();

    for line_result in reader.lines() {
        let line = line_result?;
        let parts: Vec<&str> = line.split('\t').collect();

        // Skip malformed lines
        if parts.len() < 4 {
            continue;
        }

        let taxid: u32 = parts[0].trim().parse().unwrap_or(0);
        let parentid: u32 = parts[1].trim().parse().unwrap_or(0);

        if taxid != 0 {
            db.insert(taxid, parentid, parts[2].trim(), parts[3].trim());
        }
    }
    log::info!("Loaded taxDB with {} taxa", db.len());
    Ok(db)
}

/// Split an NCBI `.dmp` line (`a\t|\tb\t|\t...\t|`) into trimmed fields.
fn dmp_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end();
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

/// Parses an NCBI taxdump pair. Only `scientific name` entries of
/// `names.dmp` are indexed.
pub fn parse_ncbi_dump<P: AsRef<Path>, Q: AsRef<Path>>(
    nodes_path: P,
    names_path: Q,
) -> io::Result<TaxDb> {
    let mut db = TaxDb::new();

    for line_result in open_reader(nodes_path)?.lines() {
        let line = line_result?;
        let fields = dmp_fields(&line);
        if fields.len() < 3 {
            continue;
        }
        let taxid: u32 = fields[0].parse().unwrap_or(0);
        let parentid: u32 = fields[1].parse().unwrap_or(0);
        if taxid != 0 {
            db.parent_map.insert(taxid, parentid);
            db.rank_map.insert(taxid, fields[2].to_string());
        }
    }

    for line_result in open_reader(names_path)?.lines() {
        let line = line_result?;
        let fields = dmp_fields(&line);
        if fields.len() < 4 || fields[3] != "scientific name" {
            continue;
        }
        let taxid: u32 = fields[0].parse().unwrap_or(0);
        if taxid != 0 {
            db.set_name(taxid, fields[1]);
        }
    }

    log::info!(
        "Loaded NCBI taxdump with {} nodes and {} scientific names",
        db.parent_map.len(),
        db.name_map.len()
    );
    Ok(db)
}
