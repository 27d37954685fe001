//! Tabular statistics report, one row per codec tag, matching the shape
//! of the original tool's `Statistics::PrintHead`/`Print` output.

use comfy_table::{Cell, ContentArrangement, Table};
use humansize::{format_size, DECIMAL};
use resemblance_core::{CodecStats, CodecTag};

/// Render a [`comfy_table::Table`] with one row per dispatchable codec
/// tag from `stats`, in tag order.
pub fn render(stats: &std::collections::BTreeMap<CodecTag, CodecStats>) -> Table {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        "codec",
        "attempted",
        "accepted",
        "before",
        "after",
        "ratio",
        "compress time",
        "uncompress time",
    ]);

    for tag in CodecTag::dispatchable() {
        let Some(s) = stats.get(&tag) else { continue };
        table.add_row(vec![
            Cell::new(tag.label()),
            Cell::new(s.attempted),
            Cell::new(s.accepted),
            Cell::new(format_size(s.total_original_bytes, DECIMAL)),
            Cell::new(format_size(s.total_compressed_bytes, DECIMAL)),
            Cell::new(format!("{:.3}", s.ratio())),
            Cell::new(format!("{:.3}s", s.compress_time.as_secs_f64())),
            Cell::new(format!("{:.3}s", s.uncompress_time.as_secs_f64())),
        ]);
    }

    table
}
