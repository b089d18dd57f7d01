// src/sort.rs

use std::cmp::Ordering;

use crate::types::RankTable;

/// Sort rows by (kingdom, phylum, ..., species), considering only the
/// columns present. Missing cells sort after every named value in their
/// column. Rows that tie on every column keep no particular order.
pub fn sort_taxonomy_table(mut table: RankTable) -> RankTable {
    if table.ranks.is_empty() {
        log::warn!("Cannot sort rank table: no standard rank columns are present");
        return table;
    }
    log::info!("Sorting {} record(s) by {} rank column(s)", table.len(), table.ranks.len());

    // columns are already in precedence order, so row order is a plain
    // lexicographic compare over the cells
    table.rows.sort_by(|a, b| compare_rows(a, b));
    table
}

fn compare_rows(a: &[Option<String>], b: &[Option<String>]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x, y) {
            (Some(x), Some(y)) => x.cmp(y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Rank;

    fn row(cells: &[Option<&str>]) -> Vec<Option<String>> {
        cells.iter().map(|c| c.map(str::to_string)).collect()
    }

    #[test]
    fn sorts_by_rank_precedence() {
        let mut table = RankTable::new(&[Rank::Kingdom, Rank::Genus]);
        table.rows.push(row(&[Some("Plantae"), Some("Quercus")]));
        table.rows.push(row(&[Some("Animalia"), Some("Panthera")]));
        table.rows.push(row(&[Some("Animalia"), Some("Canis")]));

        let sorted = sort_taxonomy_table(table);
        assert_eq!(
            sorted.rows,
            vec![
                row(&[Some("Animalia"), Some("Canis")]),
                row(&[Some("Animalia"), Some("Panthera")]),
                row(&[Some("Plantae"), Some("Quercus")]),
            ]
        );
    }

    #[test]
    fn missing_cells_sort_last() {
        let mut table = RankTable::new(&[Rank::Kingdom, Rank::Phylum]);
        table.rows.push(row(&[Some("Animalia"), None]));
        table.rows.push(row(&[None, Some("Chordata")]));
        table.rows.push(row(&[Some("Animalia"), Some("Chordata")]));

        let sorted = sort_taxonomy_table(table);
        assert_eq!(
            sorted.rows,
            vec![
                row(&[Some("Animalia"), Some("Chordata")]),
                row(&[Some("Animalia"), None]),
                row(&[None, Some("Chordata")]),
            ]
        );
    }

    #[test]
    fn placeholders_sort_by_text() {
        let mut table = RankTable::new(&[Rank::Phylum]);
        table.rows.push(row(&[Some("unknown2")]));
        table.rows.push(row(&[Some("unknown10")]));
        table.rows.push(row(&[Some("Chordata")]));

        let sorted = sort_taxonomy_table(table);
        assert_eq!(
            sorted.rows,
            vec![row(&[Some("Chordata")]), row(&[Some("unknown10")]), row(&[Some("unknown2")])]
        );
    }

    #[test]
    fn no_rank_columns_is_a_no_op() {
        let mut table = RankTable::default();
        table.rows.push(Vec::new());
        table.rows.push(Vec::new());
        let sorted = sort_taxonomy_table(table.clone());
        assert_eq!(sorted, table);
    }
}
