use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc, Local, SecondsFormat};
use clap::ValueEnum;

#[derive(Debug, Clone, Default, ValueEnum)]
pub enum DateFormat {
    #[default]
    Local,
    Utc,
    Unix
}

impl Display for DateFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            DateFormat::Local => write!(f, "local"),
            DateFormat::Utc => write!(f, "utc"),
            DateFormat::Unix => write!(f, "unix"),
        }
    }
}

pub fn datetime_to_string(dt: &DateTime<Utc>, format: &DateFormat) -> String {
    match format {
        DateFormat::Local => {
            DateTime::<Local>::from(*dt).to_rfc3339_opts(SecondsFormat::Secs, false)
        },
        DateFormat::Utc => {
            dt.to_rfc3339_opts(SecondsFormat::Secs, false)
        },
        DateFormat::Unix => {
            dt.timestamp().to_string()
        }
    }
}

/// shortens `given` to at most `max` characters, marking the cut
pub fn truncate(given: &str, max: usize) -> String {
    if given.chars().count() <= max {
        return given.to_owned();
    }

    let mut rtn: String = given.chars().take(max.saturating_sub(3)).collect();
    rtn.push_str("...");
    rtn
}

pub enum Float {
    Left,
    Right,
}

pub struct ColumnBuilder {
    name: String,
    float: Option<Float>,
}

impl ColumnBuilder {
    pub fn float(mut self, float: Float) -> Self {
        self.float = Some(float);
        self
    }

    pub fn build(self) -> Column {
        Column {
            width: self.name.chars().count(),
            name: self.name,
            float: self.float.unwrap_or(Float::Left),
        }
    }
}

pub struct Column {
    name: String,
    width: usize,
    float: Float,
}

impl Column {
    pub fn builder<N>(name: N) -> ColumnBuilder
    where
        N: Into<String>,
    {
        ColumnBuilder {
            name: name.into(),
            float: None,
        }
    }

    pub fn write_value<D, O>(&self, value: &D, output: &mut O) -> std::io::Result<()>
    where
        D: Display + ?Sized,
        O: std::io::Write,
    {
        match self.float {
            Float::Left => write!(output, "{value:<width$}", width=self.width),
            Float::Right => write!(output, "{value:>width$}", width=self.width),
        }
    }

    pub fn write_header<O>(&self, output: &mut O) -> std::io::Result<()>
    where
        O: std::io::Write
    {
        self.write_value(&self.name, output)
    }

    pub fn update_width(&mut self, width: usize) -> bool {
        if width > self.width {
            self.width = width;
            true
        } else {
            false
        }
    }
}

pub struct HeaderSep {
    pub ch: char,
    pub col_sep: &'static str,
}

pub struct TableOptions {
    pub col_sep: &'static str,
    pub header_sep: Option<HeaderSep>,
}

pub const PRETTY_OPTIONS: TableOptions = TableOptions {
    col_sep: " | ",
    header_sep: Some(HeaderSep {
        ch: '-',
        col_sep: "-+-",
    })
};

pub fn write_table<O, const N: usize>(
    output: &mut O,
    rows: &[[Option<String>; N]],
    columns: &[Column; N],
    options: &TableOptions,
) -> std::io::Result<()>
where
    O: std::io::Write,
{
    let total = rows.len().max(1);
    let index_width = (total.ilog10() + 2) as usize;

    write!(output, "{:index_width$}", "")?;

    for col in columns {
        write!(output, "{}", options.col_sep)?;

        col.write_header(output)?;
    }

    if let Some(header_sep) = &options.header_sep {
        writeln!(output)?;

        for _ in 0..index_width {
            write!(output, "{}", header_sep.ch)?;
        }

        for col in columns {
            write!(output, "{}", header_sep.col_sep)?;

            for _ in 0..col.width {
                write!(output, "{}", header_sep.ch)?;
            }
        }
    }

    writeln!(output)?;

    for (index, row) in rows.iter().enumerate() {
        write!(output, "{:>index_width$}", index + 1)?;

        for (col, value) in columns.iter().zip(row) {
            write!(output, "{}", options.col_sep)?;

            col.write_value(value.as_deref().unwrap_or(""), output)?;
        }

        writeln!(output)?;
    }

    Ok(())
}

pub struct TextTable<const N: usize> {
    columns: [Column; N],
    rows: Vec<[Option<String>; N]>
}

pub struct TextRow<'a, const N: usize> {
    table: &'a mut TextTable<N>,
    row: [Option<String>; N],
}

impl<'a, const N: usize> TextRow<'a, N> {
    pub fn set_col<V>(&mut self, index: usize, value: V) -> bool
    where
        V: Display
    {
        if index >= N {
            false
        } else {
            self.row[index] = Some(value.to_string());
            true
        }
    }

    pub fn finish(self) {
        for (value, col) in self.row.iter().zip(&mut self.table.columns) {
            if let Some(st) = value {
                col.update_width(st.chars().count());
            }
        }

        self.table.rows.push(self.row);
    }
}

impl<const N: usize> TextTable<N> {
    pub fn with_columns(columns: [Column; N]) -> Self {
        TextTable {
            columns,
            rows: Vec::new()
        }
    }

    pub fn add_row(&mut self) -> TextRow<'_, N> {
        TextRow {
            table: self,
            row: std::array::from_fn(|_| None),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn write<O>(&self, output: &mut O, options: &TableOptions) -> std::io::Result<()>
    where
        O: std::io::Write
    {
        write_table(output, &self.rows, &self.columns, options)
    }

    #[inline]
    pub fn print(&self, options: &TableOptions) -> std::io::Result<()> {
        let mut stdout = std::io::stdout();

        self.write(&mut stdout, options)
    }
}
