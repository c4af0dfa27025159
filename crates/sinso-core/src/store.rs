use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SinsoError;
use crate::model::RecordGraph;

pub type TaxpayerId = u64;

/// One persisted notice: the full record graph of a taxpayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTaxpayer {
    pub id: TaxpayerId,
    /// File the records were extracted from, when known.
    #[serde(default)]
    pub source_file: Option<String>,
    pub records: RecordGraph,
}

/// Read side of the taxpayer persistence used by the calculator.
///
/// `load` hands back the whole graph in one call, so a calculation always
/// works on a single consistent snapshot.
pub trait TaxpayerStore {
    fn load(&self, id: TaxpayerId) -> Result<Option<StoredTaxpayer>, SinsoError>;
}

/// In-process store keyed by sequential ids starting at 1.
#[derive(Debug, Default)]
pub struct MemoryStore {
    taxpayers: BTreeMap<TaxpayerId, StoredTaxpayer>,
    next_id: TaxpayerId,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new graph and return its id.
    pub fn insert(&mut self, records: RecordGraph, source_file: Option<String>) -> TaxpayerId {
        self.next_id += 1;
        let id = self.next_id;
        self.taxpayers.insert(
            id,
            StoredTaxpayer {
                id,
                source_file,
                records,
            },
        );
        log::debug!("stored taxpayer {id}");
        id
    }

    /// Replace every record of an existing taxpayer. Re-parsing a notice
    /// is a full upsert, never a merge.
    pub fn replace(&mut self, id: TaxpayerId, records: RecordGraph) -> Result<(), SinsoError> {
        let entry = self
            .taxpayers
            .get_mut(&id)
            .ok_or(SinsoError::TaxpayerNotFound(id))?;
        entry.records = records;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.taxpayers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxpayers.is_empty()
    }
}

impl TaxpayerStore for MemoryStore {
    fn load(&self, id: TaxpayerId) -> Result<Option<StoredTaxpayer>, SinsoError> {
        Ok(self.taxpayers.get(&id).cloned())
    }
}
