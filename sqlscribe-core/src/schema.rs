//! Table/column alias map and its directive-file loader
//!
//! The map records which tables and columns exist, plus an optional display
//! alias for each. A line-oriented directive file can populate the aliases in
//! bulk:
//!
//! ```text
//! ; comment lines start with a semicolon
//! TABLE[tbl_observations]=[OBS]
//! COLUMN[observation_id]=[ID]
//! COLUMN[target_name]
//! END
//! ```
//!
//! `TABLE` opens a context for a previously registered table, `COLUMN` lines
//! apply to that context, and a bare `END` closes it. The loader stops at the
//! first malformed or unresolvable line.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, error};

use crate::{Error, Result};

const CMD_TABLE: &str = "TABLE";
const CMD_COLUMN: &str = "COLUMN";
const CMD_END: &str = "END";

#[derive(Debug, Clone, Default)]
struct TableEntry {
    alias: Option<String>,
    columns: BTreeMap<String, Option<String>>,
}

/// Mapping from table/column names to display aliases
#[derive(Debug, Clone, Default)]
pub struct SchemaMap {
    tables: BTreeMap<String, TableEntry>,
}

impl SchemaMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table name. Returns false if it is already registered.
    pub fn register_table(&mut self, table: &str) -> bool {
        if self.tables.contains_key(table) {
            return false;
        }
        self.tables.insert(table.to_string(), TableEntry::default());
        true
    }

    /// Register a column under a registered table.
    ///
    /// Returns false if the table is unknown or the column already exists.
    pub fn register_column(&mut self, table: &str, column: &str) -> bool {
        let Some(entry) = self.tables.get_mut(table) else {
            return false;
        };
        if entry.columns.contains_key(column) {
            return false;
        }
        entry.columns.insert(column.to_string(), None);
        true
    }

    /// Assign a display alias to a registered table.
    ///
    /// Returns false (without recording anything) if the table is unknown.
    pub fn set_table_alias(&mut self, table: &str, alias: &str) -> bool {
        match self.tables.get_mut(table) {
            Some(entry) => {
                entry.alias = Some(alias.to_string());
                true
            }
            None => false,
        }
    }

    /// Assign a display alias to a registered column of a registered table.
    pub fn set_column_alias(&mut self, table: &str, column: &str, alias: &str) -> bool {
        match self.tables.get_mut(table).and_then(|t| t.columns.get_mut(column)) {
            Some(slot) => {
                *slot = Some(alias.to_string());
                true
            }
            None => false,
        }
    }

    pub fn has_table(&self, table: &str) -> bool {
        self.tables.contains_key(table)
    }

    pub fn has_column(&self, table: &str, column: &str) -> bool {
        self.tables
            .get(table)
            .is_some_and(|t| t.columns.contains_key(column))
    }

    /// The display alias assigned to a table, if any
    pub fn table_alias(&self, table: &str) -> Option<&str> {
        self.tables.get(table)?.alias.as_deref()
    }

    /// The display alias assigned to a column, if any
    pub fn column_alias(&self, table: &str, column: &str) -> Option<&str> {
        self.tables.get(table)?.columns.get(column)?.as_deref()
    }

    /// Substitution step applied to every table name at composition time.
    ///
    /// Currently a pass-through: the map is populated but not consulted when
    /// rendering. Wiring the alias lookup in is a one-line change here.
    pub fn map_table<'a>(&self, table: &'a str) -> &'a str {
        table
    }

    /// Substitution step applied to every column name at composition time.
    ///
    /// Currently a pass-through, see [`SchemaMap::map_table`].
    pub fn map_column<'a>(&self, column: &'a str) -> &'a str {
        column
    }

    /// Populate aliases from a directive file on disk.
    pub fn load_map_file(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|err| {
            error!(path = %path.display(), %err, "could not open SQL map file");
            Error::Io(err)
        })?;
        let result = self.load_map(BufReader::new(file));
        match &result {
            Ok(()) => debug!(path = %path.display(), "SQL map file loaded"),
            Err(err) => error!(path = %path.display(), %err, "error in SQL map file"),
        }
        result
    }

    /// Populate aliases from directive lines read from `reader`.
    ///
    /// Stops at the first fatal condition; earlier lines stay applied.
    pub fn load_map<R: BufRead>(&mut self, reader: R) -> Result<()> {
        let mut parser = MapFileParser::new();
        for (index, line) in reader.lines().enumerate() {
            parser.parse_line(self, index + 1, line?.trim_end())?;
        }
        Ok(())
    }
}

/// Token stream produced from one directive line
#[derive(Debug, PartialEq, Eq)]
struct LineTokens {
    command: String,
    token1: Option<String>,
    token2: Option<String>,
    /// True when the line carries no bracket or `=` characters at all
    bare: bool,
}

fn tokenize(line: &str) -> LineTokens {
    // The command keyword runs up to the first space or bracket token.
    let command_end = line
        .find(|c: char| c == ' ' || c == '[' || c == '=')
        .unwrap_or(line.len());
    let command = line[..command_end].trim().to_string();

    let equals = line.find('=');
    let open = line.find('[');
    let close = line.find(']');

    let token1 = match (open, close) {
        (Some(start), Some(end)) if start < end => Some(line[start + 1..end].to_string()),
        _ => None,
    };

    // The second token only counts when it follows the equals sign.
    let token2 = equals.and_then(|eq| {
        let rest = &line[eq..];
        let start = rest.find('[')?;
        let end = rest.find(']')?;
        (start < end).then(|| rest[start + 1..end].to_string())
    });

    let bare = equals.is_none() && open.is_none() && close.is_none();

    LineTokens {
        command,
        token1,
        token2,
        bare,
    }
}

/// Two-state parser over tokenized directive lines
///
/// Outside a table context only `TABLE` is legal; inside, `COLUMN` lines
/// apply to the open table and a bare `END` returns to the outside state.
#[derive(Debug, Default)]
struct MapFileParser {
    current_table: Option<String>,
}

impl MapFileParser {
    fn new() -> Self {
        Self::default()
    }

    fn parse_line(&mut self, map: &mut SchemaMap, number: usize, line: &str) -> Result<()> {
        // Comment and effectively-empty lines are skipped.
        if line.len() <= 1 || line.starts_with(';') {
            return Ok(());
        }

        let tokens = tokenize(line);
        match tokens.command.as_str() {
            CMD_TABLE => self.table_directive(map, number, tokens),
            CMD_COLUMN => self.column_directive(map, number, tokens),
            CMD_END => self.end_directive(number, tokens),
            other => {
                error!(line = number, command = other, "invalid command in SQL map file");
                Err(Error::map_syntax(
                    number,
                    format!("invalid command '{}'", other),
                ))
            }
        }
    }

    fn table_directive(
        &mut self,
        map: &mut SchemaMap,
        number: usize,
        tokens: LineTokens,
    ) -> Result<()> {
        if self.current_table.is_some() {
            error!(line = number, "TABLE directive found, but a TABLE directive is already in force");
            return Err(Error::map_syntax(
                number,
                "TABLE directive found, but a TABLE directive is already in force",
            ));
        }
        let name = match tokens.token1 {
            Some(name) if !name.is_empty() => name,
            _ => {
                error!(line = number, "TABLE directive found, but no table name");
                return Err(Error::map_syntax(
                    number,
                    "TABLE directive found, but no table name",
                ));
            }
        };
        if !map.has_table(&name) {
            error!(line = number, table = %name, "invalid table name in SQL map file");
            return Err(Error::unknown_table(number, name));
        }
        if let Some(alias) = tokens.token2.filter(|a| !a.is_empty()) {
            map.set_table_alias(&name, &alias);
        }
        self.current_table = Some(name);
        Ok(())
    }

    fn column_directive(
        &mut self,
        map: &mut SchemaMap,
        number: usize,
        tokens: LineTokens,
    ) -> Result<()> {
        let Some(table) = self.current_table.clone() else {
            error!(line = number, "COLUMN directive found, but no TABLE directive in force");
            return Err(Error::map_syntax(
                number,
                "COLUMN directive found, but no TABLE directive in force",
            ));
        };
        let name = match tokens.token1 {
            Some(name) if !name.is_empty() => name,
            _ => {
                error!(line = number, "COLUMN directive found, but no column name");
                return Err(Error::map_syntax(
                    number,
                    "COLUMN directive found, but no column name",
                ));
            }
        };
        if !map.has_column(&table, &name) {
            error!(line = number, table = %table, column = %name, "invalid column name in SQL map file");
            return Err(Error::unknown_column(number, table, name));
        }
        if let Some(alias) = tokens.token2.filter(|a| !a.is_empty()) {
            map.set_column_alias(&table, &name, &alias);
        }
        Ok(())
    }

    fn end_directive(&mut self, number: usize, tokens: LineTokens) -> Result<()> {
        if !tokens.bare {
            error!(line = number, "END directive takes no tokens");
            return Err(Error::map_syntax(number, "END directive takes no tokens"));
        }
        self.current_table = None;
        Ok(())
    }

    #[cfg(test)]
    fn context_open(&self) -> bool {
        self.current_table.is_some()
    }
}
