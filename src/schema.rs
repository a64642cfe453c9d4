//! Target table schema: an ordered, fixed list of typed columns, shared
//! read-only by the encoder and the sink.

use serde::{Deserialize, Serialize};

/// Semantic type of a target column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnType {
    Integer,
    Text,
    Date,
    Decimal,
}

/// One target column: name, type, and how to pull its value out of a
/// source record. The source field is the column name itself; columns
/// declared with [`Column::nested`] additionally unwrap one named sub-field
/// of an object-valued source field (e.g. `volume.value`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub ty: ColumnType,
    pub nested: Option<String>,
}

impl Column {
    pub fn new(name: impl Into<String>, ty: ColumnType) -> Self {
        Self { name: name.into(), ty, nested: None }
    }

    /// Column whose source field is an object; `key` names the sub-field to
    /// extract. This is a per-column declaration, not a generic deep-flatten.
    pub fn nested(name: impl Into<String>, ty: ColumnType, key: impl Into<String>) -> Self {
        Self { name: name.into(), ty, nested: Some(key.into()) }
    }
}

/// Ordered column list for the destination table. Immutable after
/// construction; defines both row order and target types for every
/// component downstream of the record source.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    name: String,
    columns: Vec<Column>,
}

impl TableSchema {
    pub fn new(name: impl Into<String>, columns: Vec<Column>) -> Self {
        Self { name: name.into(), columns }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// The canonical staging table this loader was built for: the 17-column
    /// beers catalog, with `first_brewed` as the loosely-encoded date column
    /// and `volume` extracted from a nested `{value, unit}` measurement.
    pub fn staging_beers() -> Self {
        use ColumnType::{Date, Decimal, Integer, Text};
        Self::new(
            "staging_beers",
            vec![
                Column::new("id", Integer),
                Column::new("name", Text),
                Column::new("tagline", Text),
                Column::new("first_brewed", Date),
                Column::new("description", Text),
                Column::new("image_url", Text),
                Column::new("abv", Decimal),
                Column::new("ibu", Decimal),
                Column::new("target_fg", Decimal),
                Column::new("target_og", Decimal),
                Column::new("ebc", Decimal),
                Column::new("srm", Decimal),
                Column::new("ph", Decimal),
                Column::new("attenuation_level", Decimal),
                Column::new("contributed_by", Text),
                Column::new("brewers_tips", Text),
                Column::nested("volume", Integer, "value"),
            ],
        )
    }
}
