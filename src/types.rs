//src/types.rs

use std::collections::BTreeMap;
use std::fmt;

/// Identifier of the synthetic root node in both dumps.
pub const ROOT_ID: &str = "1";
/// Label of the root entry in names.dmp (no rank prefix).
pub const ROOT_NAME: &str = "root";
/// Placeholder written by lineage lookups when an ancestor has no name.
/// Treated as missing by the imputer.
pub const UNKNOWN_RANK_NAME: &str = "unknown_rank_name";

/// The ranks that make up a taxdump lineage, in precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Rank {
    Kingdom,
    Phylum,
    Class,
    Order,
    Family,
    Genus,
    Species,
}

impl Rank {
    pub const ALL: [Rank; 7] = [
        Rank::Kingdom,
        Rank::Phylum,
        Rank::Class,
        Rank::Order,
        Rank::Family,
        Rank::Genus,
        Rank::Species,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Rank::Kingdom => "kingdom",
            Rank::Phylum => "phylum",
            Rank::Class => "class",
            Rank::Order => "order",
            Rank::Family => "family",
            Rank::Genus => "genus",
            Rank::Species => "species",
        }
    }

    /// Single-letter prefix used in names.dmp labels, e.g. `s` in `s__Homo sapiens`.
    pub fn prefix(&self) -> char {
        match self {
            Rank::Kingdom => 'k',
            Rank::Phylum => 'p',
            Rank::Class => 'c',
            Rank::Order => 'o',
            Rank::Family => 'f',
            Rank::Genus => 'g',
            Rank::Species => 's',
        }
    }

    /// Case-insensitive lookup; anything outside the vocabulary
    /// (`no rank`, `domain`, `subspecies`, ...) yields `None`.
    pub fn from_label(label: &str) -> Option<Rank> {
        let label = label.trim();
        Rank::ALL
            .iter()
            .copied()
            .find(|r| r.as_str().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row per organism, one column per rank present in the dataset.
///
/// `ranks` is always kept in precedence order, and every row has exactly
/// `ranks.len()` cells. `None` marks a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankTable {
    pub ranks: Vec<Rank>,
    pub rows: Vec<Vec<Option<String>>>,
}

impl RankTable {
    pub fn new(ranks: &[Rank]) -> Self {
        let mut ranks = ranks.to_vec();
        ranks.sort();
        ranks.dedup();
        Self {
            ranks,
            rows: Vec::new(),
        }
    }

    /// Builds a table from rank->name records. The column set is the union
    /// of ranks seen across all records.
    pub fn from_records(records: &[BTreeMap<Rank, String>]) -> Self {
        let ranks: Vec<Rank> = Rank::ALL
            .iter()
            .copied()
            .filter(|r| records.iter().any(|rec| rec.contains_key(r)))
            .collect();
        let mut table = RankTable::new(&ranks);
        for rec in records {
            table.push_record(rec);
        }
        table
    }

    /// Appends a record; ranks not in the column set are dropped.
    pub fn push_record(&mut self, record: &BTreeMap<Rank, String>) {
        let row = self
            .ranks
            .iter()
            .map(|r| record.get(r).cloned())
            .collect();
        self.rows.push(row);
    }

    pub fn column(&self, rank: Rank) -> Option<usize> {
        self.ranks.iter().position(|&r| r == rank)
    }

    pub fn get(&self, row: usize, rank: Rank) -> Option<&str> {
        let col = self.column(rank)?;
        self.rows.get(row)?.get(col)?.as_deref()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// A structured representation of one names.dmp line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameLine {
    pub tax_id: String,
    /// `None` for the root entry.
    pub rank: Option<Rank>,
    pub name: String,
}

impl NameLine {
    pub fn root() -> Self {
        Self {
            tax_id: ROOT_ID.to_string(),
            rank: None,
            name: ROOT_NAME.to_string(),
        }
    }

    /// `k__Animalia`, or the bare `root` for the root entry.
    pub fn label(&self) -> String {
        match self.rank {
            Some(rank) => format!("{}__{}", rank.prefix(), self.name),
            None => self.name.clone(),
        }
    }
}

impl fmt::Display for NameLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t|\t{}\t|\t\t|\tscientific name", self.tax_id, self.label())
    }
}

/// A structured representation of one nodes.dmp line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeLine {
    pub tax_id: String,
    pub parent_tax_id: String,
    /// `None` renders as `no rank` (root).
    pub rank: Option<Rank>,
}

impl NodeLine {
    pub fn root() -> Self {
        Self {
            tax_id: ROOT_ID.to_string(),
            parent_tax_id: ROOT_ID.to_string(),
            rank: None,
        }
    }
}

impl fmt::Display for NodeLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rank = self.rank.map(|r| r.as_str()).unwrap_or("no rank");
        write!(f, "{}\t|\t{}\t|\t{}\t|", self.tax_id, self.parent_tax_id, rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rank_labels_are_case_insensitive() {
        assert_eq!(Rank::from_label("Species"), Some(Rank::Species));
        assert_eq!(Rank::from_label(" order "), Some(Rank::Order));
        assert_eq!(Rank::from_label("no rank"), None);
        assert_eq!(Rank::from_label("domain"), None);
    }

    #[test]
    fn table_columns_follow_precedence() {
        let table = RankTable::new(&[Rank::Species, Rank::Kingdom, Rank::Genus, Rank::Kingdom]);
        assert_eq!(table.ranks, vec![Rank::Kingdom, Rank::Genus, Rank::Species]);
    }

    #[test]
    fn from_records_unions_columns() {
        let mut a = BTreeMap::new();
        a.insert(Rank::Kingdom, "Animalia".to_string());
        let mut b = BTreeMap::new();
        b.insert(Rank::Species, "Canis lupus".to_string());

        let table = RankTable::from_records(&[a, b]);
        assert_eq!(table.ranks, vec![Rank::Kingdom, Rank::Species]);
        assert_eq!(table.get(0, Rank::Kingdom), Some("Animalia"));
        assert_eq!(table.get(0, Rank::Species), None);
        assert_eq!(table.get(1, Rank::Species), Some("Canis lupus"));
        assert_eq!(table.get(1, Rank::Phylum), None);
    }

    #[test]
    fn line_rendering() {
        assert_eq!(
            NameLine::root().to_string(),
            "1\t|\troot\t|\t\t|\tscientific name"
        );
        assert_eq!(NodeLine::root().to_string(), "1\t|\t1\t|\tno rank\t|");

        let name = NameLine {
            tax_id: "9606".to_string(),
            rank: Some(Rank::Species),
            name: "Homo sapiens".to_string(),
        };
        assert_eq!(name.to_string(), "9606\t|\ts__Homo sapiens\t|\t\t|\tscientific name");

        let node = NodeLine {
            tax_id: "9606".to_string(),
            parent_tax_id: "9605".to_string(),
            rank: Some(Rank::Species),
        };
        assert_eq!(node.to_string(), "9606\t|\t9605\t|\tspecies\t|");
    }
}
