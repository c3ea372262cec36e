//! Header handling: canonical field names from raw sheet headers.

use std::collections::BTreeMap;

use crate::config::HeaderMode;
use crate::types::Table;

/// Produce a table whose headers follow the tenant's convention. The source
/// table is left untouched.
pub fn apply_header_mode(table: &Table, mode: &HeaderMode) -> Table {
    match mode {
        HeaderMode::Rename(tables) => match tables.get(&table.name) {
            Some(renames) => rename_headers(table, renames),
            None => table.clone(),
        },
        HeaderMode::Normalize => Table::new(
            table.name.clone(),
            table.headers.iter().map(|h| normalize_header(h)).collect(),
            table.rows.clone(),
        ),
    }
}

/// Replace every header that has a mapping; unmapped headers pass through.
pub fn rename_headers(table: &Table, renames: &BTreeMap<String, String>) -> Table {
    Table::new(
        table.name.clone(),
        table
            .headers
            .iter()
            .map(|h| renames.get(h).cloned().unwrap_or_else(|| h.clone()))
            .collect(),
        table.rows.clone(),
    )
}

/// Tolerant header transform for sheets without rename tables: strip the
/// Spanish accented characters, lower-case, capitalize the first letter.
pub fn normalize_header(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.trim().chars() {
        let plain = match c {
            'á' | 'Á' => 'a',
            'é' | 'É' => 'e',
            'í' | 'Í' => 'i',
            'ó' | 'Ó' => 'o',
            'ú' | 'Ú' | 'ü' | 'Ü' => 'u',
            'ñ' | 'Ñ' => 'n',
            _ => c,
        };
        for lower in plain.to_lowercase() {
            out.push(lower);
        }
    }
    let mut chars = out.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => out,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> Table {
        Table::new("Receptor", headers.iter().map(|h| h.to_string()).collect(), vec![])
    }

    #[test]
    fn normalize_strips_accents_and_capitalizes() {
        assert_eq!(normalize_header("DESCRIPCIÓN"), "Descripcion");
        assert_eq!(normalize_header("teléfono"), "Telefono");
        assert_eq!(normalize_header("IDDTE"), "Iddte");
        assert_eq!(normalize_header("Año"), "Ano");
        assert_eq!(normalize_header(" Correo "), "Correo");
    }

    #[test]
    fn rename_replaces_only_mapped_headers() {
        let renames = BTreeMap::from([("NRC".to_string(), "Nrc".to_string())]);
        let renamed = rename_headers(&table(&["NRC", "Correo"]), &renames);
        assert_eq!(renamed.headers, vec!["Nrc", "Correo"]);
    }

    #[test]
    fn rename_mode_skips_sheets_without_tables() {
        let mode = HeaderMode::Rename(BTreeMap::new());
        let out = apply_header_mode(&table(&["NRC"]), &mode);
        assert_eq!(out.headers, vec!["NRC"]);
    }

    #[test]
    fn normalize_mode_applies_to_every_header() {
        let out = apply_header_mode(&table(&["DIRECCIÓN", "Correo"]), &HeaderMode::Normalize);
        assert_eq!(out.headers, vec!["Direccion", "Correo"]);
    }
}
