use savedsearch_core::fields::FieldMap;
use savedsearch_core::store::ResourceState;
use serde::Serialize;

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{}", json);
    Ok(())
}

pub fn print_table(headers: &[&str], rows: Vec<Vec<String>>) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in &rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.len());
            }
        }
    }

    let render = |cells: Vec<String>| {
        cells
            .iter()
            .enumerate()
            .map(|(i, cell)| {
                let w = widths.get(i).copied().unwrap_or(0);
                format!("{:width$}", cell, width = w)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    println!("{}", render(headers.iter().map(|h| h.to_string()).collect()));
    let sep: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    println!("{}", sep.join("  "));
    for row in rows {
        println!("{}", render(row));
    }
}

pub fn print_fields(fields: &FieldMap) {
    let rows = fields
        .iter()
        .map(|(name, value)| vec![name.clone(), value.to_string()])
        .collect();
    print_table(&["FIELD", "VALUE"], rows);
}

/// Reconciled view of one entity: status line, ACL, then every set field.
pub fn print_state(state: &ResourceState, json: bool) -> anyhow::Result<()> {
    if json {
        return print_json(state);
    }

    println!("{} [{}]", state.name, state.status);
    if let Some(acl) = &state.acl {
        let sharing = acl.sharing.map(|s| s.to_string()).unwrap_or_else(|| "-".into());
        println!("  owner: {}  app: {}  sharing: {}", acl.owner, acl.app, sharing);
        if !acl.read.is_empty() || !acl.write.is_empty() {
            println!("  read: {}  write: {}", acl.read.join(","), acl.write.join(","));
        }
    }
    if let Some(at) = state.synced_at {
        println!("  synced: {}", at.to_rfc3339());
    }
    println!();
    print_fields(&state.fields);
    Ok(())
}
