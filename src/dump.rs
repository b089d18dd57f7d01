// src/dump.rs

use ahash::AHashSet;
use std::fmt::Write as FmtWrite;

use crate::error::Result;
use crate::resolve::{resolve_id, Resolver};
use crate::types::{NameLine, NodeLine, RankTable, ROOT_ID};

/// How the names pass decides that a taxon has already been written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NameDedup {
    /// Write a name whenever a cell differs from the same column of the
    /// previous row. Relies on the table being sorted; a taxon separated
    /// from its earlier occurrence is written again.
    #[default]
    Predecessor,
    /// Write each resolved identifier at most once, whatever the row order.
    /// Produces different output from `Predecessor` on unsorted input.
    Global,
}

/// Build the names.dmp entries for a (sorted) rank table.
///
/// The root entry always comes first. A record's walk stops at its first
/// missing cell, so nothing below a gap is ever named.
pub fn create_names_dump(
    table: &RankTable,
    resolver: &dyn Resolver,
    dedup: NameDedup,
) -> Result<Vec<NameLine>> {
    let mut lines = vec![NameLine::root()];
    let mut written_ids: AHashSet<String> = AHashSet::new();
    written_ids.insert(ROOT_ID.to_string());

    // the previous row, cut at its first gap: cells past it were never named
    let mut previous: Option<&[Option<String>]> = None;
    for row in &table.rows {
        for (col, &rank) in table.ranks.iter().enumerate() {
            let Some(name) = row.get(col).and_then(Option::as_deref) else {
                break;
            };

            let id = match dedup {
                NameDedup::Predecessor => {
                    let unchanged = previous
                        .map(|prev| prev.get(col).and_then(Option::as_deref) == Some(name))
                        .unwrap_or(false);
                    if unchanged {
                        continue;
                    }
                    resolve_id(resolver, name)?
                }
                NameDedup::Global => {
                    let id = resolve_id(resolver, name)?;
                    if !written_ids.insert(id.clone()) {
                        continue;
                    }
                    id
                }
            };

            lines.push(NameLine {
                tax_id: id,
                rank: Some(rank),
                name: name.to_string(),
            });
        }
        let reached = row.iter().take_while(|c| c.is_some()).count();
        previous = Some(&row[..reached]);
    }

    log::info!("Built {} names.dmp entries", lines.len());
    Ok(lines)
}

/// Build the nodes.dmp entries for a (sorted) rank table.
///
/// Each distinct (child id, parent id) edge is written once, root first.
/// A record's walk starts at the root and stops at its first missing cell.
pub fn create_nodes_dump(table: &RankTable, resolver: &dyn Resolver) -> Result<Vec<NodeLine>> {
    let mut lines = vec![NodeLine::root()];
    let mut written_nodes: AHashSet<(String, String)> = AHashSet::new();
    written_nodes.insert((ROOT_ID.to_string(), ROOT_ID.to_string()));

    for row in &table.rows {
        // the previous step's child id is this step's parent id
        let mut parent_id = ROOT_ID.to_string();
        for (col, &rank) in table.ranks.iter().enumerate() {
            let Some(name) = row.get(col).and_then(Option::as_deref) else {
                break;
            };
            let child_id = resolve_id(resolver, name)?;

            let node_pair = (child_id.clone(), parent_id.clone());
            if !written_nodes.contains(&node_pair) {
                lines.push(NodeLine {
                    tax_id: child_id.clone(),
                    parent_tax_id: parent_id,
                    rank: Some(rank),
                });
                written_nodes.insert(node_pair);
            }
            parent_id = child_id;
        }
    }

    log::info!("Built {} nodes.dmp entries", lines.len());
    Ok(lines)
}

pub fn render_names(lines: &[NameLine]) -> String {
    let mut output = String::new();
    for line in lines {
        writeln!(output, "{line}").unwrap();
    }
    output
}

pub fn render_nodes(lines: &[NodeLine]) -> String {
    let mut output = String::new();
    for line in lines {
        writeln!(output, "{line}").unwrap();
    }
    output
}
