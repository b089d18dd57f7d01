// src/impute.rs

use crate::types::{RankTable, UNKNOWN_RANK_NAME};

/// Replace missing cells (and `unknown_rank_name` sentinels) with
/// `unknown1`, `unknown2`, ... scanning row by row, left to right.
///
/// The counter is local to one call, so every placeholder is unique within
/// the returned table. The input is left untouched.
pub fn impute_taxons(table: &RankTable) -> RankTable {
    let mut imputed = table.clone();
    let mut next = 1usize;

    for row in imputed.rows.iter_mut() {
        for cell in row.iter_mut() {
            let missing = match cell.as_deref() {
                None => true,
                Some(v) => v == UNKNOWN_RANK_NAME,
            };
            if missing {
                *cell = Some(format!("unknown{next}"));
                next += 1;
            }
        }
    }

    log::debug!("Imputed {} missing rank cell(s)", next - 1);
    imputed
}
