use super::{Catalog, TableDefinition, TableId};
use crate::{DatasetError, DatasetResult};

impl Catalog {
    pub fn new(tables: Vec<TableDefinition>) -> Self {
        Catalog { tables }
    }

    /// The seven planning input tables.
    pub fn standard() -> Self {
        Catalog::new(
            TableId::ALL
                .iter()
                .map(|id| TableDefinition::standard(*id))
                .collect(),
        )
    }

    /// Resolve a raw identifier, failing with `InvalidIdentifier` when the id is not a
    /// table kind or has no definition in this catalog.
    pub fn resolve(&self, table_id: &str) -> DatasetResult<TableId> {
        self.lookup(table_id).map(|definition| definition.id)
    }

    pub fn lookup(&self, table_id: &str) -> DatasetResult<&TableDefinition> {
        let id: TableId = table_id.parse()?;
        self.definition(id)
            .ok_or_else(|| DatasetError::InvalidIdentifier(table_id.to_string()))
    }

    pub fn definition(&self, id: TableId) -> Option<&TableDefinition> {
        self.tables.iter().find(|table| table.id == id)
    }

    pub fn is_known(&self, table_id: &str) -> bool {
        self.lookup(table_id).is_ok()
    }

    pub fn definitions(&self) -> &[TableDefinition] {
        self.tables.as_slice()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Catalog::standard()
    }
}
