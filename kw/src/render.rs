//! Printing of results in the selected format

use std::io::{self, Write};

use anyhow::Result;
use console::style;
use serde::Serialize;
use tabular::{Row, Table};

use kubewrap::{KubeconfigInfo, ResourceTable, SessionSnapshot};

use crate::cli::Format;

const NONE: &str = "<none>";

fn write_structured<T: Serialize>(out: &mut impl Write, format: Format, value: &T) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        // Tables fall back to YAML for values without a tabular form.
        Format::Yaml | Format::Table => serde_yaml::to_writer(&mut *out, value)?,
    }
    Ok(())
}

fn write_pairs(out: &mut impl Write, pairs: &[(&str, Option<&str>)]) -> Result<()> {
    let mut table = Table::new("{:<}  {:<}");
    for (key, value) in pairs {
        table.add_row(Row::new().with_cell(key).with_cell(value.unwrap_or(NONE)));
    }
    write!(out, "{table}")?;
    Ok(())
}

pub fn resource_table(out: &mut impl Write, format: Format, table: &ResourceTable) -> Result<()> {
    if format != Format::Table {
        return write_structured(out, format, table);
    }

    let spec = vec!["{:<}"; table.columns.len()].join("   ");
    let mut text = Table::new(&spec);
    text.add_row(table.columns.iter().fold(Row::new(), |row, name| row.with_cell(name)));
    for cells in &table.rows {
        text.add_row(cells.iter().fold(Row::new(), |row, cell| row.with_cell(cell)));
    }

    // Styling after layout keeps escape codes out of the column widths.
    for (i, line) in text.to_string().lines().enumerate() {
        if i == 0 {
            writeln!(out, "{}", style(line).bold())?;
        } else {
            writeln!(out, "{line}")?;
        }
    }
    Ok(())
}

pub fn session(out: &mut impl Write, format: Format, snapshot: &SessionSnapshot) -> Result<()> {
    if format != Format::Table {
        return write_structured(out, format, snapshot);
    }
    write_pairs(
        out,
        &[
            ("context", snapshot.context.as_deref()),
            ("namespace", snapshot.namespace.as_deref()),
        ],
    )
}

pub fn kubeconfig_info(
    out: &mut impl Write,
    format: Format,
    info: Option<&KubeconfigInfo>,
) -> Result<()> {
    if format != Format::Table {
        return write_structured(out, format, &info);
    }
    let Some(info) = info else {
        writeln!(out, "No current context set in kubeconfig")?;
        return Ok(());
    };
    write_pairs(
        out,
        &[
            ("context", Some(info.context.as_str())),
            ("namespace", info.namespace.as_deref()),
        ],
    )
}

pub fn value<T: Serialize>(
    out: &mut impl Write,
    format: Format,
    value: &T,
    plain: &str,
) -> Result<()> {
    if format == Format::Table {
        writeln!(out, "{plain}")?;
        return Ok(());
    }
    write_structured(out, format, value)
}

/// Write kubectl's own output through unchanged.
pub fn raw(stdout: &str, stderr: &str) -> io::Result<()> {
    io::stdout().write_all(stdout.as_bytes())?;
    io::stderr().write_all(stderr.as_bytes())
}
