// Thu Oct 15 2026 - Alex

use crate::symbol::export::ExportedSymbol;
use goblin::pe::export::{ExportAddressTableEntry, Reexport};
use goblin::pe::PE;
use std::collections::HashSet;

/// Reads the export directory of a PE image. `None` when the bytes are not a
/// PE image or carry no export directory.
pub fn read_pe_exports(bytes: &[u8]) -> Option<Vec<ExportedSymbol>> {
    let pe = match PE::parse(bytes) {
        Ok(pe) => pe,
        Err(e) => {
            log::debug!("Not a PE image: {}", e);
            return None;
        }
    };

    let export_data = pe.export_data.as_ref()?;
    let ordinal_base = export_data.export_directory_table.ordinal_base;
    let ordinals = &export_data.export_ordinal_table;
    let aligned = ordinals.len() == pe.exports.len();

    let mut symbols = Vec::with_capacity(export_data.export_address_table.len());
    for (idx, export) in pe.exports.iter().enumerate() {
        let Some(name) = export.name else {
            continue;
        };

        let mut symbol = ExportedSymbol::new(name).with_hint(idx as u32);
        if aligned {
            if let Some(ordinal) = ordinals.get(idx).and_then(|&o| biased_ordinal(ordinal_base, o.into())) {
                symbol = symbol.with_ordinal(ordinal);
            }
        }

        match &export.reexport {
            Some(Reexport::DLLName { export: target, lib }) => {
                symbol = symbol.with_forward(&format!("{}.{}", lib, target));
            }
            Some(Reexport::DLLOrdinal { ordinal, lib }) => {
                symbol = symbol.with_forward(&format!("{}.#{}", lib, ordinal));
            }
            None => {
                symbol = symbol.with_rva(export.rva as u64);
            }
        }

        symbols.push(symbol);
    }

    symbols.extend(unnamed_exports(ordinal_base, &export_data.export_address_table, ordinals));
    Some(symbols)
}

/// Ordinal as a caller would use it: the table index plus the directory's
/// ordinal base. `None` when a malformed base pushes it past `u32::MAX`.
pub fn biased_ordinal(ordinal_base: u32, index: u32) -> Option<u32> {
    let ordinal = ordinal_base.checked_add(index);
    if ordinal.is_none() {
        log::warn!("Export ordinal overflows: base {} + index {}", ordinal_base, index);
    }
    ordinal
}

/// Address-table slots no name points at. Empty slots (RVA 0) are gaps in the
/// ordinal range and are not exports.
pub fn unnamed_exports(
    ordinal_base: u32,
    address_table: &[ExportAddressTableEntry],
    named_indices: &[u16],
) -> Vec<ExportedSymbol> {
    let named: HashSet<usize> = named_indices.iter().map(|&i| usize::from(i)).collect();

    address_table
        .iter()
        .enumerate()
        .filter(|(idx, _)| !named.contains(idx))
        .filter_map(|(idx, entry)| {
            let ordinal = biased_ordinal(ordinal_base, u32::try_from(idx).ok()?)?;
            let symbol = ExportedSymbol::new(&format!("Ordinal{}", ordinal)).with_ordinal(ordinal);
            match *entry {
                ExportAddressTableEntry::ExportRVA(0) => None,
                ExportAddressTableEntry::ExportRVA(rva) => Some(symbol.with_rva(u64::from(rva))),
                ExportAddressTableEntry::ForwarderRVA(_) => Some(symbol),
            }
        })
        .collect()
}
